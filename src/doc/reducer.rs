use super::action::{DocAction, ProjectAction};
use super::clock::ShaderClock;
use super::files;
use super::model::{Document, Project};
use super::pipeline::Pipeline;
use super::uniform::{Uniform, TIME_UNIFORM};
use crate::effect::Effect;
use crate::error::EffectFailure;
use crate::persist::Boxed;
use crate::store::{Reducer, Transition};

/// Reducer for a single [`Document`].
pub struct DocReducer;

impl Reducer for DocReducer {
    type Model = Document;
    type Action = DocAction;

    fn reduce(mut doc: Document, action: DocAction) -> Transition<Document, DocAction> {
        match action {
            DocAction::SetShaderData => {
                let shader = Boxed::clone(&doc.shader);
                let uniforms = doc.uniforms.clone();
                Transition::new(doc).with(Effect::run("set-shader-data", move |ctx| {
                    ctx.require::<Pipeline>()?.upload(&shader, &uniforms);
                    ctx.dispatch(DocAction::ResetPipeline);
                    Ok(())
                }))
            }
            DocAction::ResetPipeline => Transition::new(doc).with(Effect::run("reset-pipeline", |ctx| {
                ctx.require::<Pipeline>()?.rebuild();
                Ok(())
            })),
            DocAction::ChangedShaderInput { text } => {
                if *doc.shader == text {
                    return Transition::new(doc);
                }
                doc.shader = Boxed::new(text);
                doc.shader_revision += 1;
                Transition::new(doc).with(Effect::dispatch("shader-changed", DocAction::SetShaderData))
            }
            DocAction::ChangedNewUniform { uniform } => {
                doc.new_uniform = uniform;
                Transition::new(doc)
            }
            DocAction::LoadShader { file } => {
                doc.shader_path = Some(file.clone());
                Transition::new(doc).with(Effect::task("load-shader", move |ctx| async move {
                    tracing::info!(path = %file, "loading shader");
                    let text = files::read_shader(&file).await?;
                    ctx.dispatch(DocAction::ChangedShaderInput { text });
                    anyhow::Ok(())
                }))
            }
            DocAction::SaveShader { file } => {
                doc.shader_path = Some(file.clone());
                let text = Boxed::clone(&doc.shader);
                Transition::new(doc).with(Effect::task("save-shader", move |_| async move {
                    tracing::info!(path = %file, "saving shader");
                    files::write_shader(&file, &text).await
                }))
            }
            DocAction::AddTime => Transition::new(doc).with(Effect::run("add-time", |ctx| {
                ctx.require::<ShaderClock>()?.restart();
                ctx.dispatch(DocAction::AddUniform {
                    name: TIME_UNIFORM.to_string(),
                    value: Uniform::Float(0.0),
                });
                Ok(())
            })),
            DocAction::RemoveTime => Transition::new(doc).with(Effect::dispatch(
                "remove-time",
                DocAction::RemoveUniform {
                    name: TIME_UNIFORM.to_string(),
                },
            )),
            DocAction::ResetTime => Transition::new(doc).with(Effect::run("reset-time", |ctx| {
                ctx.require::<ShaderClock>()?.restart();
                ctx.dispatch(DocAction::TickTime);
                Ok(())
            })),
            DocAction::TickTime => Transition::new(doc).with(Effect::run("tick-time", |ctx| {
                let elapsed = ctx.require::<ShaderClock>()?.elapsed();
                ctx.dispatch(DocAction::UpdateUniform {
                    name: TIME_UNIFORM.to_string(),
                    value: Uniform::Float(elapsed),
                });
                Ok(())
            })),
            DocAction::AddUniform { name, value } => {
                if name.trim().is_empty() {
                    return Transition::new(doc);
                }
                doc.uniforms.insert(name, value);
                Transition::new(doc).with(Effect::dispatch("uniforms-changed", DocAction::SetShaderData))
            }
            DocAction::RemoveUniform { name } => {
                if doc.uniforms.remove(&name).is_none() {
                    return Transition::new(doc);
                }
                Transition::new(doc).with(Effect::dispatch("uniforms-changed", DocAction::SetShaderData))
            }
            DocAction::UpdateUniform { name, value } => {
                match doc.uniforms.get(&name) {
                    Some(current) if *current != value => {}
                    _ => return Transition::new(doc),
                }
                doc.uniforms.insert(name.clone(), value);
                Transition::new(doc).with(Effect::run("update-uniform", move |ctx| {
                    ctx.require::<Pipeline>()?.set_uniform(&name, value);
                    Ok(())
                }))
            }
        }
    }

    fn records(action: &DocAction) -> bool {
        match action {
            DocAction::SetShaderData | DocAction::ResetPipeline | DocAction::TickTime => false,
            DocAction::UpdateUniform { name, .. } => name != TIME_UNIFORM,
            _ => true,
        }
    }

    /// The pipeline still holds the shader and uniforms of the model we left.
    fn on_travel(_doc: &Document) -> Vec<Effect<DocAction>> {
        vec![Effect::dispatch("history-moved", DocAction::SetShaderData)]
    }
}

/// Reducer for the whole [`Project`]; document actions are delegated to
/// [`DocReducer`].
pub struct ProjectReducer;

impl Reducer for ProjectReducer {
    type Model = Project;
    type Action = ProjectAction;

    fn reduce(mut project: Project, action: ProjectAction) -> Transition<Project, ProjectAction> {
        match action {
            ProjectAction::Doc(action) => {
                let Project {
                    doc,
                    path,
                    last_error,
                } = project;
                DocReducer::reduce(doc, action).lift(
                    move |doc| Project {
                        doc,
                        path,
                        last_error,
                    },
                    ProjectAction::Doc,
                )
            }
            ProjectAction::Save { file } => {
                let file = files::project_path(&file);
                project.path = Some(file.clone());
                let doc = project.doc.clone();
                Transition::new(project).with(Effect::task("save-project", move |_| async move {
                    tracing::info!(path = %file, "saving project");
                    files::write_project(&file, &doc).await
                }))
            }
            ProjectAction::Load { file } => Transition::new(project).with(Effect::task(
                "load-project",
                move |ctx| async move {
                    tracing::info!(path = %file, "loading project");
                    let doc = files::read_project(&file).await?;
                    ctx.dispatch(ProjectAction::Loaded { file, doc });
                    anyhow::Ok(())
                },
            )),
            ProjectAction::Loaded { file, doc } => {
                project.doc = doc;
                project.path = Some(file);
                project.last_error = None;
                Transition::new(project).with(Effect::dispatch(
                    "project-loaded",
                    ProjectAction::Doc(DocAction::SetShaderData),
                ))
            }
            ProjectAction::EffectFailed { effect, message } => {
                project.last_error = Some(format!("{effect}: {message}"));
                Transition::new(project)
            }
            ProjectAction::DismissError => {
                project.last_error = None;
                Transition::new(project)
            }
        }
    }

    fn records(action: &ProjectAction) -> bool {
        match action {
            ProjectAction::Doc(action) => DocReducer::records(action),
            ProjectAction::EffectFailed { .. } | ProjectAction::DismissError => false,
            _ => true,
        }
    }

    fn on_travel(project: &Project) -> Vec<Effect<ProjectAction>> {
        DocReducer::on_travel(&project.doc)
            .into_iter()
            .map(|effect| effect.map(ProjectAction::Doc))
            .collect()
    }

    fn effect_failed(failure: EffectFailure) -> Option<ProjectAction> {
        Some(ProjectAction::EffectFailed {
            effect: failure.effect,
            message: failure.message,
        })
    }
}
