use std::path::Path;
use std::time::SystemTime;

use crate::config::UiConfig;
use crate::cursor::{Cursor, Reader};
use crate::doc::{DocAction, Document, Project, ProjectAction, ProjectReducer, Uniform, TIME_UNIFORM};
use crate::store::Store;

/// Project file used by `s` when the project has never been saved.
pub const DEFAULT_PROJECT_FILE: &str = "untitled.bulin";

/// History entries skipped by one `[` or `]` press.
pub const SCRUB_STEP: isize = 10;

/// Adjustment applied to the selected uniform by one `+` or `-` press.
pub const NUDGE_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Focus {
    Uniforms,
    History,
}

/// Shader file the editor watches for changes made outside it.
#[derive(Debug, Clone, PartialEq)]
struct Watched {
    path: String,
    modified: Option<SystemTime>,
}

/// Editor state that is not part of the model: focus, selection, the
/// name prompt and the hot-reload watch.
///
/// Everything shown from the document is read through readers and cursors
/// on each frame.
pub struct App {
    store: Store<ProjectReducer>,
    doc: Reader<ProjectReducer, Document>,
    last_error: Reader<ProjectReducer, Option<String>>,
    new_uniform: Cursor<ProjectReducer, Uniform>,
    focus: Focus,
    selected: usize,
    history_selected: Option<usize>,
    prompt: Option<String>,
    notice: Option<String>,
    animate_time: bool,
    watched: Option<Watched>,
    should_quit: bool,
}

impl App {
    pub fn new(store: Store<ProjectReducer>, ui: &UiConfig) -> Self {
        let doc = store.reader().zoom(crate::lens!(Project, doc));
        let last_error = Reader::new(store.clone(), |project: &Project| project.last_error.clone());
        let new_uniform = store.cursor(
            |project: &Project| project.doc.new_uniform,
            |uniform| DocAction::ChangedNewUniform { uniform }.into(),
        );
        Self {
            store,
            doc,
            last_error,
            new_uniform,
            focus: Focus::Uniforms,
            selected: 0,
            history_selected: None,
            prompt: None,
            notice: None,
            animate_time: ui.animate_time,
            watched: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &Store<ProjectReducer> {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Uniforms => Focus::History,
            Focus::History => Focus::Uniforms,
        };
        self.history_selected = None;
    }

    pub fn document(&self) -> Document {
        self.doc.get()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    pub fn pending_uniform(&self) -> Uniform {
        self.new_uniform.get()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Uniform names in display order.
    pub fn uniform_names(&self) -> Vec<String> {
        self.doc.get().uniforms.keys().cloned().collect()
    }

    /// Index of the selected uniform, clamped to the current list.
    pub fn selected(&self) -> usize {
        let len = self.doc.get().uniforms.len();
        self.selected.min(len.saturating_sub(1))
    }

    pub fn selected_name(&self) -> Option<String> {
        self.uniform_names().into_iter().nth(self.selected())
    }

    /// History row highlighted in the history pane; the current entry
    /// unless the user moved the highlight.
    pub fn history_selected(&self) -> Option<usize> {
        self.history_selected
            .or_else(|| self.store.history().map(|history| history.index()))
    }

    /// A cursor on one uniform. Writing it updates the uniform in place.
    pub fn uniform_cursor(&self, name: &str) -> Cursor<ProjectReducer, Uniform> {
        let key = name.to_string();
        let target = name.to_string();
        self.store.cursor(
            move |project: &Project| project.doc.uniforms.get(&key).copied().unwrap_or_default(),
            move |value| {
                DocAction::UpdateUniform {
                    name: target.clone(),
                    value,
                }
                .into()
            },
        )
    }

    pub fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Uniforms => {
                let len = self.doc.get().uniforms.len();
                self.selected = step(self.selected(), delta, len);
            }
            Focus::History => {
                let Some(history) = self.store.history() else {
                    return;
                };
                let current = self.history_selected().unwrap_or(0);
                self.history_selected = Some(step(current, delta, history.len()));
            }
        }
    }

    /// Jumps to the highlighted history entry.
    pub fn jump_to_selected(&mut self) {
        let Some(history) = self.store.history() else {
            return;
        };
        if let Some(entry) = self
            .history_selected
            .and_then(|index| history.entries().nth(index))
        {
            self.store.goto(entry.sequence);
        }
        self.history_selected = None;
    }

    pub fn adjust_selected(&mut self, delta: f32) {
        if let Some(name) = self.selected_name() {
            self.uniform_cursor(&name)
                .update(move |value| value.nudged(delta));
        }
    }

    pub fn cycle_pending_kind(&mut self) {
        self.new_uniform.update(|uniform| uniform.next_kind());
    }

    pub fn begin_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn prompt_input(&mut self, ch: char) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.push(ch);
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Adds the pending uniform under the typed name.
    pub fn confirm_prompt(&mut self) {
        let Some(name) = self.prompt.take() else {
            return;
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            return;
        }
        self.store.dispatch(
            DocAction::AddUniform {
                name,
                value: self.new_uniform.get(),
            }
            .into(),
        );
    }

    pub fn delete_selected(&mut self) {
        if let Some(name) = self.selected_name() {
            self.store
                .dispatch(DocAction::RemoveUniform { name }.into());
        }
    }

    pub fn toggle_time(&mut self) {
        let action = if self.doc.get().uniforms.contains_key(TIME_UNIFORM) {
            DocAction::RemoveTime
        } else {
            DocAction::AddTime
        };
        self.store.dispatch(action.into());
    }

    pub fn undo(&mut self) {
        self.store.undo();
    }

    pub fn redo(&mut self) {
        self.store.redo();
    }

    /// Moves `steps` entries through history from the current one.
    pub fn scrub(&mut self, steps: isize) {
        let Some(history) = self.store.history() else {
            return;
        };
        let target = step(history.index(), steps, history.len());
        let sequence = history.entries().nth(target).map(|entry| entry.sequence);
        if let Some(sequence) = sequence {
            self.store.goto(sequence);
        }
    }

    pub fn save(&mut self) {
        let file = self
            .store
            .current()
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_FILE.to_string());
        self.notice = Some(format!("saving {file}"));
        self.store.dispatch(ProjectAction::Save { file });
    }

    /// Reloads the project file, or the shader file for unsaved projects.
    pub fn reload(&mut self) {
        let project = self.store.current();
        if let Some(file) = project.path.clone() {
            self.notice = Some(format!("loading {file}"));
            self.store.dispatch(ProjectAction::Load { file });
        } else if let Some(file) = project.doc.shader_path.clone() {
            self.notice = Some(format!("loading {file}"));
            self.store.dispatch(DocAction::LoadShader { file }.into());
        } else {
            self.notice = Some("nothing to reload".to_string());
        }
    }

    pub fn dismiss_error(&mut self) {
        self.notice = None;
        if self.last_error.get().is_some() {
            self.store.dispatch(ProjectAction::DismissError);
        }
    }

    /// Per-frame work: advance the time uniform and watch the shader file.
    pub fn on_tick(&mut self) {
        if self.animate_time && self.doc.get().uniforms.contains_key(TIME_UNIFORM) {
            self.store.dispatch(DocAction::TickTime.into());
        }
        self.poll_shader_file();
    }

    fn poll_shader_file(&mut self) {
        let Some(path) = self.doc.get().shader_path else {
            self.watched = None;
            return;
        };
        let modified = modified_at(&path);
        match self.watched.as_mut() {
            Some(watched) if watched.path == path => {
                if modified.is_some() && modified != watched.modified {
                    watched.modified = modified;
                    tracing::info!(path = %path, "shader changed on disk");
                    self.store
                        .dispatch(DocAction::LoadShader { file: path }.into());
                }
            }
            _ => self.watched = Some(Watched { path, modified }),
        }
    }
}

fn modified_at(path: &str) -> Option<SystemTime> {
    std::fs::metadata(Path::new(path))
        .and_then(|meta| meta.modified())
        .ok()
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::store::DispatchMode;

    fn make_app() -> App {
        let store = Store::<ProjectReducer>::builder()
            .mode(DispatchMode::Immediate)
            .history(Some(64))
            .deps(doc::services())
            .build(Project::default());
        App::new(store, &UiConfig::default())
    }

    fn add_uniform(app: &mut App, name: &str) {
        app.begin_prompt();
        for ch in name.chars() {
            app.prompt_input(ch);
        }
        app.confirm_prompt();
    }

    #[test]
    fn step_clamps_to_list() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(1, 5, 3), 2);
        assert_eq!(step(4, 1, 0), 0);
    }

    #[test]
    fn prompt_adds_pending_uniform() {
        let mut app = make_app();
        app.cycle_pending_kind();
        add_uniform(&mut app, " scale ");

        assert_eq!(app.prompt(), None);
        assert_eq!(
            app.document().uniforms.get("scale"),
            Some(&Uniform::Vec2([0.0; 2]))
        );
    }

    #[test]
    fn blank_prompt_adds_nothing() {
        let mut app = make_app();
        add_uniform(&mut app, "   ");
        assert!(app.uniform_names().is_empty());
    }

    #[test]
    fn adjust_goes_through_uniform_cursor() {
        let mut app = make_app();
        add_uniform(&mut app, "gain");
        app.adjust_selected(1.0);
        app.adjust_selected(1.0);
        assert_eq!(app.uniform_cursor("gain").get(), Uniform::Float(2.0));
    }

    #[test]
    fn presses_in_one_frame_all_count() {
        let store = Store::<ProjectReducer>::builder()
            .mode(DispatchMode::Deferred)
            .history(Some(64))
            .deps(doc::services())
            .build(Project::default());
        let mut app = App::new(store, &UiConfig::default());
        add_uniform(&mut app, "gain");
        app.store().drain();

        app.adjust_selected(1.0);
        app.adjust_selected(1.0);
        app.cycle_pending_kind();
        app.cycle_pending_kind();
        app.store().drain();

        assert_eq!(app.uniform_cursor("gain").get(), Uniform::Float(2.0));
        assert_eq!(app.pending_uniform(), Uniform::Vec2([0.0; 2]));
    }

    #[test]
    fn selection_clamps_after_delete() {
        let mut app = make_app();
        add_uniform(&mut app, "a");
        add_uniform(&mut app, "b");
        app.move_selection(1);
        assert_eq!(app.selected_name().as_deref(), Some("b"));

        app.delete_selected();
        assert_eq!(app.selected(), 0);
        assert_eq!(app.selected_name().as_deref(), Some("a"));
    }

    #[test]
    fn toggle_time_adds_then_removes() {
        let mut app = make_app();
        app.toggle_time();
        assert!(app.document().uniforms.contains_key(TIME_UNIFORM));
        app.toggle_time();
        assert!(!app.document().uniforms.contains_key(TIME_UNIFORM));
    }

    #[test]
    fn ticks_are_not_undoable() {
        let mut app = make_app();
        app.toggle_time();
        let entries = app.store().history().map(|h| h.len());
        app.on_tick();
        app.on_tick();
        assert_eq!(app.store().history().map(|h| h.len()), entries);
    }

    #[test]
    fn scrub_and_jump_move_through_history() {
        let mut app = make_app();
        for name in ["a", "b", "c"] {
            add_uniform(&mut app, name);
        }
        app.scrub(-SCRUB_STEP);
        assert!(app.uniform_names().is_empty());

        app.toggle_focus();
        app.move_selection(2);
        app.jump_to_selected();
        assert_eq!(app.uniform_names(), vec!["a", "b"]);
    }

    #[test]
    fn dismiss_clears_error() {
        let mut app = make_app();
        app.store().dispatch(ProjectAction::EffectFailed {
            effect: "load-project".into(),
            message: "missing".into(),
        });
        assert!(app.last_error().is_some());
        app.dismiss_error();
        assert_eq!(app.last_error(), None);
    }

    #[test]
    fn reload_without_paths_only_notes_it() {
        let mut app = make_app();
        let revision = app.store().revision();
        app.reload();
        assert_eq!(app.notice(), Some("nothing to reload"));
        assert_eq!(app.store().revision(), revision);
    }
}
