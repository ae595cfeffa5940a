use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the front popup of the queue
pub fn render_popup(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(popup) = app.popups.first() {
        let modal_area = create_modal_area(area);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let title_style = if popup.title == "Error" || popup.title == "Duplicate name" {
            error_style()
        } else {
            modal_title_style()
        };

        let mut lines = vec![Line::raw("")];
        for message_line in popup.message.lines() {
            lines.push(Line::raw(format!("  {}", message_line)));
        }
        lines.push(Line::raw(""));

        let queued = app.popups.len() - 1;
        let mut footer = vec![Span::styled("  [Enter]", modal_title_style()), Span::raw(" OK")];
        if queued > 0 {
            footer.push(Span::raw(format!("  ({} more)", queued)));
        }
        lines.push(Line::from(footer));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(format!(" {} ", popup.title), title_style))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

/// Render the yes/no confirmation for a pending delete
pub fn render_confirm(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(confirm) = &app.confirm {
        let modal_area = create_modal_area(area);

        f.render_widget(Clear, modal_area);

        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  {}", confirm.message)),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [y]", modal_title_style()),
                Span::raw(" Delete  "),
                Span::styled("[n]", modal_title_style()),
                Span::raw(" Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Confirm ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
