use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the open input form, one labelled line per field
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let mut lines = Vec::new();

        for (idx, (label, value)) in form.labels.iter().zip(&form.values).enumerate() {
            let editing = idx == form.editing_field;
            lines.push(Line::raw(""));
            lines.push(Line::raw(if editing {
                format!("{}: (editing)", label)
            } else {
                format!("{}:", label)
            }));
            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(value.as_str(), modal_title_style()),
                if editing {
                    Span::styled("█", modal_title_style()) // Cursor
                } else {
                    Span::raw("")
                },
            ]));
        }

        lines.push(Line::raw(""));
        if form.values.len() > 1 {
            lines.push(Line::raw("Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"));
        } else {
            lines.push(Line::raw("Enter to submit  ·  Esc to cancel"));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(form.title, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
