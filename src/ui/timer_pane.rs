use crate::app::AppState;
use crate::domain::{format_remaining, IntervalTimer, Phase};
use crate::ui::styles::{border_style, gauge_style, hint_style, status_style, title_style};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// One-line summary: "WORK 24:59 RUNNING · [Home] - Clean"
fn summary_line(timer: &IntervalTimer) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!(" {} ", timer.phase().label()), title_style()),
        Span::raw(format_remaining(timer.remaining())),
        Span::raw(" "),
        Span::styled(timer.status().to_tag().to_string(), status_style(timer.status())),
    ];
    if let Some(task) = timer.attached_task() {
        spans.push(Span::raw(format!(" · {}", task)));
    }
    Line::from(spans)
}

/// Timer strip shown under the task lists
pub fn render_timer_strip(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(summary_line(&app.timer)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Timer ", title_style())),
    );
    f.render_widget(paragraph, area);
}

/// Full timer screen
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let timer = &app.timer;

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" Interval Timer ({}m work / {}m rest) ", timer.work_minutes(), timer.rest_minutes()),
            title_style(),
        ));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2), // Phase
            Constraint::Length(2), // Countdown
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Task
            Constraint::Min(0),
        ])
        .split(inner);

    let phase_text = match timer.phase() {
        Phase::Work => "Focus",
        Phase::Rest => "Rest",
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(phase_text, title_style()),
            Span::raw("  "),
            Span::styled(timer.status().to_tag().to_string(), status_style(timer.status())),
        ]))
        .alignment(Alignment::Center),
        rows[1],
    );

    f.render_widget(
        Paragraph::new(format_remaining(timer.remaining())).alignment(Alignment::Center),
        rows[2],
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(border_style()))
        .gauge_style(gauge_style(timer.phase()))
        .ratio(timer.progress_ratio())
        .label(format!("{:.0}%", timer.progress_ratio() * 100.0));
    f.render_widget(gauge, rows[3]);

    let task_line = match timer.attached_task() {
        Some(task) => Line::from(vec![
            Span::styled("Task: ", title_style()),
            Span::raw(task.to_string()),
        ]),
        None => Line::from(Span::styled("No task selected (add a task first)", hint_style())),
    };
    f.render_widget(Paragraph::new(task_line).alignment(Alignment::Center), rows[4]);
}
