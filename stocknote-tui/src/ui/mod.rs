//! Top-level layout: the two panes over a one-line status bar.

pub mod company_list;
pub mod form_panel;
pub mod overlays;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::app::{AppState, Overlay, Pane};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(main_area);

    draw_pane(f, panes[0], app, Pane::Companies);
    draw_pane(f, panes[1], app, Pane::Form);

    status_bar::render(f, status_area, app);

    // Draw overlays on top.
    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::OpenFile => overlays::render_open(f, main_area, &app.path_input),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// Draw a single pane with its border.
fn draw_pane(f: &mut Frame, area: Rect, app: &AppState, pane: Pane) {
    let is_active = app.active_pane == pane;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(is_active))
        .title(format!(" {} ", pane.label()))
        .title_style(theme::panel_title(is_active));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match pane {
        Pane::Companies => company_list::render(f, inner, app),
        Pane::Form => form_panel::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with_sample;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_selected_company_form() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_sample(dir.path());
        let screen = rendered(&app);
        assert!(screen.contains("Companies"));
        assert!(screen.contains("ACM-Lot Size: 100"));
        assert!(screen.contains("55 SMA Status"));
        assert!(screen.contains("Update Record"));
    }

    #[test]
    fn renders_empty_state_without_table() {
        let app = AppState::new(&stocknote_core::AppConfig::default());
        let screen = rendered(&app);
        assert!(screen.contains("No spreadsheet loaded"));
    }
}
