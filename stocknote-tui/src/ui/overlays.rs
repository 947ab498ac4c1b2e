//! Popups drawn over the panes.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Share Market Data Manager ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Press o and enter the path of an .xlsx file", theme::muted())),
        Line::from(Span::styled("  2. Pick a company with j/k and Enter", theme::muted())),
        Line::from(Span::styled("  3. Adjust fields with h/l, then press u to update", theme::muted())),
        Line::from(Span::styled("  4. Press s to save a timestamped copy", theme::muted())),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Keyboard reference.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help [Esc]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "o", "Open a spreadsheet");
    key(&mut lines, "u", "Update Record for the selected company");
    key(&mut lines, "s", "Save to Excel (Updated_data_<timestamp>.xlsx)");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "? / q", "Help / quit");
    lines.push(Line::from(""));

    section(&mut lines, "Companies");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "g / G", "Jump to first / last");
    key(&mut lines, "Enter", "Select company and edit");
    key(&mut lines, "Tab", "Switch to the form");
    lines.push(Line::from(""));

    section(&mut lines, "Annotation");
    key(&mut lines, "Tab / Shift+Tab", "Next / previous field");
    key(&mut lines, "h / l", "Change the selected option");
    key(&mut lines, "Enter", "Update Record (in Comment)");
    key(&mut lines, "Esc", "Back to companies");
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Switching company discards an unsaved comment.",
        theme::muted(),
    )));

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn section(lines: &mut Vec<Line<'static>>, title: &'static str) {
    lines.push(Line::from(Span::styled(title, theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'static>>, keys: &'static str, desc: &'static str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:<18}"), theme::accent()),
        Span::styled(desc, theme::text()),
    ]));
}

/// Path prompt for opening a spreadsheet.
pub fn render_open(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(60, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Open Spreadsheet [Enter]open [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Path to an .xlsx file:", theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input, theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];

    f.render_widget(Paragraph::new(text), inner);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let visible = inner.height as usize;
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(visible)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme::muted()),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
