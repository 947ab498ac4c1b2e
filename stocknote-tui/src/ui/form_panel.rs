//! Right pane: read-only company header plus the five annotation inputs.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use stocknote_core::{Field, FormView};

use crate::app::{AppState, Pane};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = FormView::for_session(&app.session) else {
        let msg = if app.session.table().is_some() {
            "Select a company to edit."
        } else {
            "No spreadsheet loaded. Press o to open an .xlsx file."
        };
        f.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), area);
        return;
    };

    let focused = app.active_pane == Pane::Form;
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(view.company.clone(), theme::accent_bold())).alignment(Alignment::Center),
        Line::from(Span::styled(view.headline(), theme::neutral())).alignment(Alignment::Center),
        Line::from(""),
    ];

    for field in Field::ALL {
        let is_active = focused && app.field == field;
        let label_style = if is_active {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::accent()
        };
        let mut spans = vec![Span::styled(format!(" {:<18}", field.label()), label_style), Span::raw("  ")];

        match field.options(&view.values) {
            Some((labels, current)) => {
                for (i, label) in labels.iter().enumerate() {
                    if i == current {
                        spans.push(Span::styled(format!("(●) {label}"), theme::choice(label)));
                    } else {
                        spans.push(Span::styled(format!("( ) {label}"), theme::muted()));
                    }
                    spans.push(Span::raw("   "));
                }
            }
            None => {
                spans.push(Span::styled(view.values.comment.clone(), theme::text()));
                if is_active {
                    spans.push(Span::styled("_", theme::accent()));
                }
            }
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let updated = view.last_update.as_deref().unwrap_or("never");
    lines.push(Line::from(vec![
        Span::styled(" Last update: ", theme::muted()),
        Span::styled(updated.to_string(), theme::text()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [u] Update Record ", theme::accent_bold()),
        Span::raw("   "),
        Span::styled(" [s] Save to Excel ", theme::accent_bold()),
    ]));
    if let Some(path) = &app.last_export {
        lines.push(Line::from(vec![
            Span::styled(" Download: ", theme::muted()),
            Span::styled(path.display().to_string(), theme::positive()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
