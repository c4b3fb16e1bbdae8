use crate::config::UiConfig;
use crate::doc::ProjectReducer;
use crate::store::Store;
use crate::ui::app::App;
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::input::handle_key;
use crate::ui::render::draw;
use crate::ui::terminal::EditorTerminal;
use std::io;
use std::time::Duration;

/// Runs the editor until the user quits.
///
/// Each frame drains the store's queue, draws from the current model and
/// turns input into dispatched actions. Effects keep running on the store's
/// runtime in the meantime.
pub fn run(store: Store<ProjectReducer>, ui: &UiConfig) -> io::Result<()> {
    let mut terminal = EditorTerminal::enter()?;
    let tick_rate = Duration::from_millis(ui.tick_rate_ms);
    let mut app = App::new(store, ui);
    let events = EventHandler::new(tick_rate);

    loop {
        let processed = app.store().drain();
        if processed > 0 {
            tracing::trace!(processed, "drained store queue");
        }
        terminal.draw(|frame| draw(frame, &app))?;
        if app.should_quit() {
            break;
        }

        match events.next(tick_rate) {
            Ok(AppEvent::Input(key)) => handle_key(&mut app, key),
            Ok(AppEvent::Tick) => app.on_tick(),
            Ok(AppEvent::Resize) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    // Pick up anything queued by the last key before handing the store back.
    app.store().drain();
    drop(terminal);
    Ok(())
}
