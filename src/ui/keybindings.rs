use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the screen the user is on
fn hints_for(base_mode: UiMode) -> Line<'static> {
    match base_mode {
        UiMode::Timer => Line::from(vec![
            Span::raw(" Space/Enter start/pause   "),
            Span::raw("s stop   "),
            Span::raw("n next task   "),
            Span::raw("o settings   "),
            Span::raw("Esc back   "),
            Span::raw("q quit"),
        ]),
        _ => Line::from(vec![
            Span::raw(" ↑/↓ select   "),
            Span::raw("Tab pane   "),
            Span::raw("p project   "),
            Span::raw("r rename   "),
            Span::raw("a task   "),
            Span::raw("e edit   "),
            Span::raw("m memo   "),
            Span::raw("c done/restore   "),
            Span::raw("d delete   "),
            Span::raw("t timer   "),
            Span::raw("q quit"),
        ]),
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, base_mode: UiMode, area: Rect) {
    let paragraph = Paragraph::new(hints_for(base_mode)).style(hint_style());
    f.render_widget(paragraph, area);
}
