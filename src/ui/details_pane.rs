use crate::app::AppState;
use crate::domain::DATE_FORMAT;
use crate::ui::styles::{border_style, default_style, done_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(selected) = app.selected_task() else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Task:    ", title_style()),
        Span::raw(selected.task.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Project: ", title_style()),
        Span::raw(selected.project.clone()),
    ]));

    let status = if selected.completed {
        Span::styled("done", done_style())
    } else {
        Span::raw("to do")
    };
    lines.push(Line::from(vec![Span::styled("Status:  ", title_style()), status]));

    let due = app
        .store
        .due_date(&selected.project, &selected.task)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::from(vec![
        Span::styled("Due:     ", title_style()),
        Span::raw(due),
    ]));
    lines.push(Line::raw(""));

    // Memo
    let memo = app.store.memo(&selected.project, &selected.task);
    if !memo.trim().is_empty() {
        lines.push(Line::from(Span::styled("Memo:", title_style())));
        for memo_line in memo.lines() {
            lines.push(Line::raw(format!("  {}", memo_line)));
        }
    } else {
        lines.push(Line::from(Span::styled("Memo: (empty)", default_style())));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
