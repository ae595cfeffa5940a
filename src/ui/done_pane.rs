use crate::app::AppState;
use crate::domain::{DisplayState, Pane};
use crate::ui::list_pane::{pane_block, row_style};
use crate::ui::styles::done_style;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Create a line for a completed task
fn create_done_line(label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("✓ ".to_string(), done_style()),
        Span::raw(label.to_string()),
    ])
}

/// Render the completed tasks pane
pub fn render_done_pane(f: &mut Frame, app: &AppState, view: &DisplayState, area: Rect) {
    let focused = app.focus == Pane::CompletedTasks;

    let items: Vec<ListItem> = view
        .completed_labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            ListItem::new(create_done_line(label)).style(row_style(idx, app.selected_completed, focused))
        })
        .collect();

    let title = format!(" Done ({}) ", items.len());
    f.render_widget(List::new(items).block(pane_block(title, focused)), area);
}
