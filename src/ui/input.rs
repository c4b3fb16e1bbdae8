use crate::ui::app::{App, Focus, NUDGE_STEP, SCRUB_STEP};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translates one key press into app calls, and through them into actions.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if is_ctrl_char(key, 'c') {
        app.request_quit();
        return;
    }

    if app.prompt().is_some() {
        match key.code {
            KeyCode::Enter => app.confirm_prompt(),
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.prompt_backspace(),
            KeyCode::Char(ch) => app.prompt_input(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Enter if app.focus() == Focus::History => app.jump_to_selected(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_selected(NUDGE_STEP),
        KeyCode::Char('-') => app.adjust_selected(-NUDGE_STEP),
        KeyCode::Char('a') => app.begin_prompt(),
        KeyCode::Char('n') => app.cycle_pending_kind(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('t') => app.toggle_time(),
        KeyCode::Char('u') => app.undo(),
        KeyCode::Char('r') => app.redo(),
        KeyCode::Char('[') => app.scrub(-SCRUB_STEP),
        KeyCode::Char(']') => app.scrub(SCRUB_STEP),
        KeyCode::Char('s') => app.save(),
        KeyCode::Char('o') => app.reload(),
        KeyCode::Esc => app.dismiss_error(),
        _ => {}
    }
}

fn is_ctrl_char(key: KeyEvent, needle: char) -> bool {
    matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&needle))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::doc::{self, DocAction, Project, ProjectReducer, Uniform, TIME_UNIFORM};
    use crate::store::{DispatchMode, Store};
    use crossterm::event::KeyEventState;

    fn make_app() -> App {
        let store = Store::<ProjectReducer>::builder()
            .mode(DispatchMode::Immediate)
            .deps(doc::services())
            .build(Project::default());
        App::new(store, &UiConfig::default())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn type_keys(app: &mut App, keys: &str) {
        for ch in keys.chars() {
            handle_key(app, press(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn q_quits_but_not_inside_prompt() {
        let mut app = make_app();
        handle_key(&mut app, press(KeyCode::Char('a')));
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.prompt(), Some("q"));

        handle_key(&mut app, press(KeyCode::Esc));
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = make_app();
        handle_key(&mut app, press(KeyCode::Char('a')));
        let mut key = press(KeyCode::Char('c'));
        key.modifiers = KeyModifiers::CONTROL;
        handle_key(&mut app, key);
        assert!(app.should_quit());
    }

    #[test]
    fn releases_are_ignored() {
        let mut app = make_app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(!app.should_quit());
    }

    #[test]
    fn undo_and_redo_keys_walk_history() {
        let mut app = make_app();
        handle_key(&mut app, press(KeyCode::Char('a')));
        type_keys(&mut app, "speed");
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Char('+')));
        let adjusted = app.document();

        type_keys(&mut app, "uu");
        assert!(app.uniform_names().is_empty());
        type_keys(&mut app, "rr");
        assert_eq!(app.document(), adjusted);
    }

    #[test]
    fn plus_and_minus_step_int_uniforms() {
        let mut app = make_app();
        app.store().dispatch(
            DocAction::ChangedNewUniform {
                uniform: Uniform::Int(3),
            }
            .into(),
        );
        handle_key(&mut app, press(KeyCode::Char('a')));
        type_keys(&mut app, "count");
        handle_key(&mut app, press(KeyCode::Enter));

        type_keys(&mut app, "+");
        assert_eq!(app.uniform_cursor("count").get(), Uniform::Int(4));
        type_keys(&mut app, "--");
        assert_eq!(app.uniform_cursor("count").get(), Uniform::Int(2));
    }

    #[test]
    fn t_toggles_time_uniform() {
        let mut app = make_app();
        type_keys(&mut app, "t");
        assert_eq!(app.uniform_names(), vec![TIME_UNIFORM]);
    }
}
