use crate::ui::theme::{ACCENT, GLOBAL_BORDER, HEADER_TEXT, STATUS_ERROR};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HINTS: &str = " Tab: Focus │ +/-: Adjust │ a: Add │ n: Kind │ d: Delete │ t: Time │ u/r: Undo/Redo │ [ ]: Scrub │ s: Save │ o: Reload │ q: Quit";

/// What the footer line shows, most urgent first.
pub enum FooterContent<'a> {
    Prompt(&'a str),
    Error(&'a str),
    Notice(&'a str),
    Hints,
}

pub struct Footer;

impl Footer {
    pub fn widget(content: FooterContent<'_>, area: Rect) -> Paragraph<'static> {
        let text_style = Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM);
        let (message, style) = match content {
            FooterContent::Prompt(name) => (
                format!(" name: {name}_  (Enter: add │ Esc: cancel)"),
                Style::default().fg(ACCENT),
            ),
            FooterContent::Error(error) => (
                format!(" error: {error}  (Esc: dismiss)"),
                Style::default().fg(STATUS_ERROR),
            ),
            FooterContent::Notice(notice) => (format!(" {notice}"), text_style),
            FooterContent::Hints => (HINTS.to_string(), text_style),
        };
        let version = format!("v{} ", VERSION);

        // Padding by char count; the hints contain box-drawing characters.
        let content_width = area.width.saturating_sub(2) as usize;
        let padding = content_width
            .saturating_sub(message.chars().count())
            .saturating_sub(version.chars().count());

        let line = Line::from(vec![
            Span::styled(message, style),
            Span::styled(" ".repeat(padding), text_style),
            Span::styled(version, text_style),
        ]);

        Paragraph::new(line)
            .style(text_style)
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(GLOBAL_BORDER)),
            )
    }
}
