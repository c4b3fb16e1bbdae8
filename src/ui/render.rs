use crate::doc::{BuildStatus, DocAction, Pipeline, ProjectAction};
use crate::ui::app::{App, Focus};
use crate::ui::footer::{Footer, FooterContent};
use crate::ui::layout::layout_regions;
use crate::ui::theme::{
    ACCENT, ACTIVE_HIGHLIGHT, FOCUS_BORDER, GLOBAL_BORDER, HEADER_TEXT, MUTED_TEXT, STATUS_ERROR,
    STATUS_OK,
};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let regions = layout_regions(frame.area());
    let doc = app.document();

    frame.render_widget(header(app), regions.header);

    let names = app.uniform_names();
    let selected = app.selected();
    let mut lines: Vec<Line> = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let value = doc.uniforms.get(name).copied().unwrap_or_default();
            let line = Line::from(vec![
                Span::styled(format!("{name:<12}"), Style::default().fg(HEADER_TEXT)),
                Span::styled(format!("{:<6}", value.kind()), Style::default().fg(MUTED_TEXT)),
                Span::raw(value.to_string()),
            ]);
            if index == selected && app.focus() == Focus::Uniforms {
                line.style(Style::default().bg(ACTIVE_HIGHLIGHT))
            } else {
                line
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::styled("no uniforms (a: add, t: time)", Style::default().fg(MUTED_TEXT)));
    }
    frame.render_widget(
        Paragraph::new(lines).block(pane("Uniforms", app.focus() == Focus::Uniforms)),
        regions.uniforms,
    );

    let pending = app.pending_uniform();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<6}", pending.kind()), Style::default().fg(ACCENT)),
            Span::raw(pending.to_string()),
        ]))
        .block(pane("Next uniform (n: kind)", false)),
        regions.pending,
    );

    let title = match doc.shader_path.as_deref() {
        Some(path) => format!("Shader: {path}"),
        None => "Shader".to_string(),
    };
    frame.render_widget(
        Paragraph::new(doc.shader.as_str()).block(pane(&title, false)),
        regions.shader,
    );

    frame.render_widget(history(app, regions.history), regions.history);

    let error = app.last_error();
    let content = match (app.prompt(), error.as_deref(), app.notice()) {
        (Some(name), _, _) => FooterContent::Prompt(name),
        (None, Some(error), _) => FooterContent::Error(error),
        (None, None, Some(notice)) => FooterContent::Notice(notice),
        (None, None, None) => FooterContent::Hints,
    };
    frame.render_widget(Footer::widget(content, regions.footer), regions.footer);
}

fn pane(title: &str, focused: bool) -> Block<'static> {
    let border = if focused { FOCUS_BORDER } else { GLOBAL_BORDER };
    Block::default()
        .title(Span::styled(title.to_string(), Style::default().fg(ACCENT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn header(app: &App) -> Paragraph<'static> {
    let project = app.store().current();
    let path = project.path.clone().unwrap_or_else(|| "unsaved".to_string());
    let build = app
        .store()
        .deps()
        .get::<Pipeline>()
        .map(|pipeline| pipeline.snapshot().status);
    let (status, color) = match build {
        Some(BuildStatus::Ready) => ("ready".to_string(), STATUS_OK),
        Some(BuildStatus::Rejected(reason)) => (format!("rejected: {reason}"), STATUS_ERROR),
        Some(BuildStatus::Empty) | None => ("not built".to_string(), MUTED_TEXT),
    };
    let separator = Span::styled(" │ ", Style::default().fg(MUTED_TEXT));

    let line = Line::from(vec![
        Span::styled(
            "bulin",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        separator.clone(),
        Span::styled(path, Style::default().fg(HEADER_TEXT)),
        separator.clone(),
        Span::raw(format!("rev {}", project.doc.shader_revision)),
        separator,
        Span::styled(status, Style::default().fg(color)),
    ]);
    Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(GLOBAL_BORDER)),
    )
}

fn history(app: &App, area: Rect) -> Paragraph<'static> {
    let focused = app.focus() == Focus::History;
    let Some(history) = app.store().history() else {
        return Paragraph::new(Line::styled("history disabled", Style::default().fg(MUTED_TEXT)))
            .block(pane("History", focused));
    };

    let current = history.index();
    let highlighted = app.history_selected().unwrap_or(current);
    let visible = area.height.saturating_sub(2).max(1) as usize;
    let skip = (highlighted + 1).saturating_sub(visible);

    let lines: Vec<Line> = history
        .entries()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(index, entry)| {
            let marker = if index == current { "▶ " } else { "  " };
            let label = entry
                .action
                .as_ref()
                .map(summary)
                .unwrap_or_else(|| "start".to_string());
            let style = if index > current {
                Style::default().fg(MUTED_TEXT)
            } else {
                Style::default().fg(HEADER_TEXT)
            };
            let line = Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:>4} ", entry.sequence), Style::default().fg(MUTED_TEXT)),
                Span::styled(label, style),
            ]);
            if focused && index == highlighted {
                line.style(Style::default().bg(ACTIVE_HIGHLIGHT))
            } else {
                line
            }
        })
        .collect();

    let title = format!("History {}/{}", current + 1, history.len());
    Paragraph::new(lines).block(pane(&title, focused))
}

/// One-line description of a recorded action.
pub fn summary(action: &ProjectAction) -> String {
    match action {
        ProjectAction::Doc(action) => match action {
            DocAction::ChangedShaderInput { .. } => "edit shader".to_string(),
            DocAction::ChangedNewUniform { uniform } => format!("next uniform {}", uniform.kind()),
            DocAction::LoadShader { file } => format!("load shader {file}"),
            DocAction::SaveShader { file } => format!("save shader {file}"),
            DocAction::AddTime => "add time".to_string(),
            DocAction::RemoveTime => "remove time".to_string(),
            DocAction::ResetTime => "reset time".to_string(),
            DocAction::AddUniform { name, value } => format!("add {name} = {value}"),
            DocAction::RemoveUniform { name } => format!("remove {name}"),
            DocAction::UpdateUniform { name, value } => format!("set {name} = {value}"),
            other => format!("{other:?}"),
        },
        ProjectAction::Save { file } => format!("save {file}"),
        ProjectAction::Load { file } | ProjectAction::Loaded { file, .. } => format!("load {file}"),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Uniform;

    #[test]
    fn summaries_name_the_uniform() {
        let action = ProjectAction::Doc(DocAction::UpdateUniform {
            name: "gain".into(),
            value: Uniform::Int(3),
        });
        assert_eq!(summary(&action), "set gain = 3");
        assert_eq!(summary(&ProjectAction::DismissError), "DismissError");
    }
}
