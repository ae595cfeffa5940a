pub mod details_pane;
pub mod done_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use done_pane::render_done_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::{render_active_pane, render_projects_pane};
use modal::{render_confirm, render_popup};
use ratatui::{widgets::Clear, Frame};
use timer_pane::{render_timer_pane, render_timer_strip};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.base_mode, layout.keybindings_area);

    if app.base_mode == UiMode::Timer {
        f.render_widget(Clear, layout.content_area);
        render_timer_pane(f, app, layout.content_area);
    } else {
        let view = app.display_state();
        render_projects_pane(f, app, &view, layout.projects_area);
        render_active_pane(f, app, &view, layout.active_area);
        render_done_pane(f, app, &view, layout.completed_area);
        render_details_pane(f, app, layout.details_area);
    }
    render_timer_strip(f, app, layout.timer_strip_area);

    // Overlays
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
    if app.ui_mode == UiMode::Confirm {
        render_confirm(f, app, size);
    }
    if app.ui_mode == UiMode::Popup {
        render_popup(f, app, size);
    }
}
