use crate::domain::{Phase, TimerStatus};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Selected row in a pane without focus
pub fn selected_unfocused_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

/// Running status badge style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Paused status badge style
pub fn paused_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Idle status badge style
pub fn idle_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn status_style(status: TimerStatus) -> Style {
    match status {
        TimerStatus::Running => running_style(),
        TimerStatus::Paused => paused_style(),
        TimerStatus::Idle => idle_style(),
    }
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Border of the pane receiving navigation keys
pub fn focused_border_style() -> Style {
    Style::default().fg(Color::LightCyan)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Timer gauge style, green for work and blue for rest
pub fn gauge_style(phase: Phase) -> Style {
    let fg = match phase {
        Phase::Work => Color::Green,
        Phase::Rest => Color::Blue,
    };
    Style::default().fg(fg).bg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default().fg(Color::Green)
}
