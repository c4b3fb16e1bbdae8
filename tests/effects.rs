//! Effects running on a tokio runtime: tasks, delays, cancellation and
//! failures turned into actions.

mod common;

use bulin::doc::{files, BuildStatus, DocAction, Pipeline, Project, ProjectAction, Uniform};
use bulin::effect::{CancelToken, Effect};
use bulin::store::{Action, DispatchMode, Model, Reducer, Store, Transition};
use common::*;
use std::time::Duration;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn delayed_dispatch_lands_later() {
    let store = board_store();
    store.dispatch(BoardAction::AddLater {
        card: "late".into(),
        after_ms: 20,
    });
    assert_eq!(store.current().cards.len(), 40);

    let arrived = wait_until(WAIT, || store.current().cards.last().map(String::as_str) == Some("late")).await;
    assert!(arrived);
}

// -- Cancellation ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Feed {
    items: Vec<u32>,
}

impl Model for Feed {}

#[derive(Debug, Clone)]
enum FeedAction {
    Poll(CancelToken),
    Arrived(u32),
}

impl Action for FeedAction {}

struct FeedReducer;

impl Reducer for FeedReducer {
    type Model = Feed;
    type Action = FeedAction;

    fn reduce(mut feed: Feed, action: FeedAction) -> Transition<Feed, FeedAction> {
        match action {
            FeedAction::Poll(token) => Transition::new(feed).with(
                Effect::task("poll", |ctx| async move {
                    for n in 0.. {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        if !ctx.dispatch(FeedAction::Arrived(n)) {
                            break;
                        }
                    }
                    anyhow::Ok(())
                })
                .cancellable(token),
            ),
            FeedAction::Arrived(n) => {
                feed.items.push(n);
                Transition::new(feed)
            }
        }
    }
}

#[tokio::test]
async fn cancelled_task_stops_dispatching() {
    let store = Store::<FeedReducer>::builder()
        .mode(DispatchMode::Immediate)
        .build(Feed { items: Vec::new() });
    let token = CancelToken::new();
    store.dispatch(FeedAction::Poll(token.clone()));

    assert!(wait_until(WAIT, || store.current().items.len() >= 3).await);
    token.cancel();
    let stopped_at = store.current().items.len();

    tokio::time::sleep(Duration::from_millis(50)).await;
    // At most one dispatch could already have been in flight.
    assert!(store.current().items.len() <= stopped_at + 1);
    let settled = store.current().items.len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.current().items.len(), settled);
}

#[tokio::test]
async fn already_cancelled_effects_never_start() {
    let store = Store::<FeedReducer>::builder()
        .mode(DispatchMode::Immediate)
        .build(Feed { items: Vec::new() });
    let token = CancelToken::new();
    token.cancel();
    store.dispatch(FeedAction::Poll(token));

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(store.current().items.is_empty());
}

// -- Document effects --------------------------------------------------------

#[test]
fn shader_edits_reach_the_pipeline() {
    let store = project_store();
    store.dispatch(DocAction::ChangedShaderInput {
        text: "void main() { }".into(),
    }
    .into());
    store.dispatch(DocAction::AddUniform {
        name: "gain".into(),
        value: Uniform::Float(1.0),
    }
    .into());

    let pipeline = store.deps().get::<Pipeline>().unwrap();
    let program = pipeline.snapshot();
    assert_eq!(program.shader, "void main() { }");
    assert_eq!(program.uniforms.get("gain"), Some(&Uniform::Float(1.0)));
    assert_eq!(program.status, BuildStatus::Ready);

    store.dispatch(DocAction::ChangedShaderInput {
        text: "void main() {".into(),
    }
    .into());
    assert!(matches!(pipeline.snapshot().status, BuildStatus::Rejected(_)));
}

#[test]
fn undo_rebuilds_the_pipeline_from_the_restored_shader() {
    let store = project_store();
    store.dispatch(DocAction::ChangedShaderInput {
        text: "void main() { }".into(),
    }
    .into());
    store.dispatch(DocAction::ChangedShaderInput {
        text: "void main() {".into(),
    }
    .into());
    let pipeline = store.deps().get::<Pipeline>().unwrap();
    assert!(matches!(pipeline.snapshot().status, BuildStatus::Rejected(_)));

    store.undo();
    assert_eq!(*store.current().doc.shader, "void main() { }");
    assert_eq!(pipeline.snapshot().shader, "void main() { }");
    assert_eq!(pipeline.snapshot().status, BuildStatus::Ready);

    store.redo();
    assert!(matches!(pipeline.snapshot().status, BuildStatus::Rejected(_)));
    // The resync is not an undo step: redo stays possible after undo.
    store.undo();
    assert!(store.history().unwrap().can_redo());
}

#[tokio::test]
async fn save_then_load_restores_the_document() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("scene").to_string_lossy().into_owned();

    let store = project_store();
    store.dispatch(DocAction::AddUniform {
        name: "gain".into(),
        value: Uniform::Float(0.5),
    }
    .into());
    store.dispatch(ProjectAction::Save { file: file.clone() });
    let saved_path = files::project_path(&file);
    assert_eq!(store.current().path.as_deref(), Some(saved_path.as_str()));
    assert!(wait_until(WAIT, || files::load_project(std::path::Path::new(&saved_path)).is_ok()).await);

    let saved_doc = store.current().doc.clone();
    let fresh = project_store();
    fresh.dispatch(ProjectAction::Load {
        file: saved_path.clone(),
    });
    assert!(wait_until(WAIT, || fresh.current().path.is_some()).await);
    assert_eq!(fresh.current().doc, saved_doc);
}

#[tokio::test]
async fn load_shader_reads_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wave.frag");
    std::fs::write(&path, "void main() { wave(); }").unwrap();
    let file = path.to_string_lossy().into_owned();

    let store = project_store();
    store.dispatch(DocAction::LoadShader { file: file.clone() }.into());
    assert_eq!(store.current().doc.shader_path.as_deref(), Some(file.as_str()));

    assert!(wait_until(WAIT, || store.current().doc.shader.contains("wave")).await);
    assert_eq!(store.current().doc.shader_revision, 1);
}

#[tokio::test]
async fn failed_load_becomes_last_error() {
    let store = project_store();
    store.dispatch(ProjectAction::Load {
        file: "/definitely/not/here.bulin".into(),
    });

    assert!(wait_until(WAIT, || store.current().last_error.is_some()).await);
    let error = store.current().last_error.clone().unwrap();
    assert!(error.starts_with("load-project:"), "{error}");
    // Failures are not undo steps.
    assert_eq!(store.history().map(|h| h.len()), Some(1));

    store.dispatch(ProjectAction::DismissError);
    assert_eq!(store.current().last_error, None);
}

#[test]
fn task_without_runtime_reports_failure() {
    let store = Store::<bulin::doc::ProjectReducer>::builder()
        .mode(DispatchMode::Immediate)
        .deps(bulin::doc::services())
        .build(Project::default());
    store.dispatch(ProjectAction::Save {
        file: "nowhere".into(),
    });
    let error = store.current().last_error.clone();
    assert!(error.is_some_and(|e| e.starts_with("save-project:")));
}
