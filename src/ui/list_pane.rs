use crate::app::AppState;
use crate::domain::{parse_task_label, DisplayState, Pane};
use crate::ui::styles::{
    border_style, default_style, focused_border_style, hint_style, selected_style,
    selected_unfocused_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Row style for a list entry
pub fn row_style(idx: usize, selected: usize, focused: bool) -> ratatui::style::Style {
    match (idx == selected, focused) {
        (true, true) => selected_style(),
        (true, false) => selected_unfocused_style(),
        _ => default_style(),
    }
}

/// Bordered block with the focus highlight
pub fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border_style()
        } else {
            border_style()
        })
        .title(Span::styled(title, title_style()))
}

/// Render the project list
pub fn render_projects_pane(f: &mut Frame, app: &AppState, view: &DisplayState, area: Rect) {
    let focused = app.focus == Pane::Projects;

    let items: Vec<ListItem> = view
        .project_names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            ListItem::new(Line::raw(format!(" {}", name)))
                .style(row_style(idx, app.selected_project, focused))
        })
        .collect();

    let title = format!(" Projects ({}) ", view.project_names.len());
    f.render_widget(List::new(items).block(pane_block(title, focused)), area);
}

/// Render the active tasks of the selected project
pub fn render_active_pane(f: &mut Frame, app: &AppState, view: &DisplayState, area: Rect) {
    let focused = app.focus == Pane::ActiveTasks;

    let items: Vec<ListItem> = view
        .active_labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            ListItem::new(create_active_line(label)).style(row_style(idx, app.selected_active, focused))
        })
        .collect();

    let title = match app.current_project() {
        Some(project) => format!(" {} - To do ({}) ", project, items.len()),
        None => " To do ".to_string(),
    };
    f.render_widget(List::new(items).block(pane_block(title, focused)), area);
}

/// "[ ] name" with the due-date suffix dimmed
fn create_active_line(label: &str) -> Line<'static> {
    let name = parse_task_label(label);
    Line::from(vec![
        Span::raw("[ ] "),
        Span::raw(name.to_string()),
        Span::styled(label[name.len()..].to_string(), hint_style()),
    ])
}
