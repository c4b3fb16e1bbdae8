use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use bulin::config::Config;
use bulin::doc::{self, files, DocAction, Project, ProjectReducer};
use bulin::error::DecodeError;
use bulin::replay::{self, ActionLog, Recorder};
use bulin::store::Store;

#[derive(Parser, Debug)]
#[command(name = "bulin")]
#[command(version, about = "Terminal shader uniform editor")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    edit: EditArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a project in the editor (the default)
    Edit(EditArgs),
    /// Print a summary of a saved project
    Inspect {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },
    /// Replay a JSON-lines action log from an empty project
    Replay {
        #[arg(value_name = "LOG")]
        log: PathBuf,
        /// Save the resulting document here
        #[arg(long, value_name = "PROJECT")]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Project file to open; created on first save if missing
    #[arg(value_name = "PROJECT")]
    project: Option<PathBuf>,

    /// Shader source to load and watch for changes
    #[arg(long, value_name = "FILE")]
    shader: Option<PathBuf>,

    /// Config file (default: the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write every committed action to this JSON-lines log on exit
    #[arg(long, value_name = "LOG")]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    bulin::logging::init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Edit(args)) => edit(args),
        Some(Command::Inspect { project }) => inspect(&project),
        Some(Command::Replay { log, out }) => replay_log(&log, out.as_deref()),
        None => edit(cli.edit),
    }
}

fn edit(args: EditArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    let project = open_project(args.project.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let store = Store::<ProjectReducer>::builder()
        .mode(config.store.dispatch)
        .history(config.history.capacity())
        .runtime(runtime.handle().clone())
        .deps(doc::services())
        .build(project);
    tracing::info!(mode = ?store.mode(), history = ?config.history.capacity(), "editor starting");

    let recorder = args
        .record
        .as_ref()
        .map(|_| Recorder::attach(&store))
        .transpose()
        .context("Failed to start recording")?;

    store.dispatch(DocAction::SetShaderData.into());
    if let Some(shader) = &args.shader {
        store.dispatch(
            DocAction::LoadShader {
                file: shader.to_string_lossy().into_owned(),
            }
            .into(),
        );
    }

    let outcome = bulin::ui::run(store.clone(), &config.ui);

    if let (Some(path), Some(recorder)) = (&args.record, recorder) {
        let log = recorder.snapshot();
        log.write(path)
            .with_context(|| format!("Failed to write action log '{}'", path.display()))?;
        tracing::info!(path = %path.display(), entries = log.len(), "action log written");
    }
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    outcome.context("Terminal error")
}

/// The project at `path`; a fresh one (saved there later) if the file does
/// not exist yet.
fn open_project(path: Option<&Path>) -> Result<Project> {
    let Some(path) = path else {
        return Ok(Project::default());
    };
    let name = files::project_path(&path.to_string_lossy());
    match files::load_project(Path::new(&name)) {
        Ok(doc) => Ok(Project {
            path: Some(name),
            ..Project::new(doc)
        }),
        Err(DecodeError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(Project {
                path: Some(name),
                ..Project::default()
            })
        }
        Err(err) => Err(err).with_context(|| format!("Failed to open project '{name}'")),
    }
}

fn inspect(path: &Path) -> Result<()> {
    let doc = files::load_project(path)
        .with_context(|| format!("Failed to open project '{}'", path.display()))?;

    println!("project:   {}", path.display());
    if let Some(shader) = &doc.shader_path {
        println!("shader:    {shader}");
    }
    println!(
        "source:    {} lines, revision {}",
        doc.shader.lines().count(),
        doc.shader_revision
    );
    println!("uniforms:  {}", doc.uniforms.len());
    for (name, value) in doc.uniforms.iter() {
        println!("  {name:<16} {:<6} {value}", value.kind());
    }
    if !doc.extras.is_empty() {
        let keys: Vec<&str> = doc.extras.keys().collect();
        println!("preserved: {}", keys.join(", "));
    }
    Ok(())
}

fn replay_log(log: &Path, out: Option<&Path>) -> Result<()> {
    let actions = ActionLog::read(log)
        .with_context(|| format!("Failed to read action log '{}'", log.display()))?;
    let replayed = replay::replay::<ProjectReducer>(Project::default(), actions.entries())
        .context("Replay stopped")?;

    println!(
        "applied {} actions, skipped {} unknown, {} history moves, {} effects requested",
        replayed.applied,
        replayed.skipped,
        replayed.moves,
        replayed.effects.len()
    );
    println!("uniforms: {}", replayed.model.doc.uniforms.len());

    if let Some(out) = out {
        let name = files::project_path(&out.to_string_lossy());
        let bytes = bulin::codec::encode(&replayed.model.doc)?;
        std::fs::write(&name, bytes).with_context(|| format!("Failed to write '{name}'"))?;
        println!("saved {name}");
    }
    Ok(())
}
