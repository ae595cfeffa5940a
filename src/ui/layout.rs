use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    /// Everything between the keybindings bar and the timer strip
    pub content_area: Rect,
    pub projects_area: Rect,
    pub active_area: Rect,
    pub completed_area: Rect,
    pub details_area: Rect,
    pub timer_strip_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: Projects (25%) | Active over Completed (45%) | Details (30%)
/// - Bottom strip: timer status (3 rows)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Timer strip
        ])
        .split(area);

    let content_area = main_chunks[1];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
        ])
        .split(content_area);

    let task_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    MainLayout {
        keybindings_area: main_chunks[0],
        content_area,
        projects_area: columns[0],
        active_area: task_rows[0],
        completed_area: task_rows[1],
        details_area: columns[2],
        timer_strip_area: main_chunks[2],
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(14),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
