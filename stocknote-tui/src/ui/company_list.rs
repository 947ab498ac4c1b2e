//! Left pane: company selector, sorted case-insensitively.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, Pane};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    if app.companies.is_empty() {
        lines.push(Line::from(Span::styled("No spreadsheet loaded.", theme::muted())));
        lines.push(Line::from(Span::styled("Press o to open one.", theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(vec![
        Span::styled(format!("{} ", app.companies.len()), theme::accent()),
        Span::styled("companies  [Enter]edit", theme::muted()),
    ]));
    lines.push(Line::from(""));

    // Keep the cursor in view.
    let visible = (area.height as usize).saturating_sub(lines.len()).max(1);
    let start = app.company_cursor.saturating_sub(visible - 1);
    let selected = app.session.selected();
    let focused = app.active_pane == Pane::Companies;

    for (i, company) in app.companies.iter().enumerate().skip(start).take(visible) {
        let is_cursor = i == app.company_cursor;
        let is_selected = selected == Some(company.as_str());
        let marker = if is_selected { "● " } else { "  " };

        let style = if is_cursor && focused {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else if is_selected {
            theme::accent_bold()
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, theme::positive()),
            Span::styled(company.as_str(), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
