//! Read model for the edit form and the field cursor that drives it.

use crate::schema::{self, Annotation, Choice, COMPANY_NAME, LOT_SIZE, SYMBOL, UPDATE_DATE};
use crate::session::{Session, SessionEvent};

/// Everything the form shows for the selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub company: String,
    pub symbol: String,
    pub lot_size: String,
    pub last_update: Option<String>,
    pub values: Annotation,
}

impl FormView {
    /// `None` until a company is selected.
    pub fn for_session(session: &Session) -> Option<Self> {
        let table = session.table()?;
        let row = session.selected_row()?;
        let text = |column: &str| table.get(row, column).map(|c| c.to_string()).unwrap_or_default();

        Some(Self {
            company: text(COMPANY_NAME),
            symbol: text(SYMBOL),
            lot_size: schema::lot_size_display(table.get(row, LOT_SIZE)),
            last_update: table
                .get(row, UPDATE_DATE)
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string()),
            values: session.form().clone(),
        })
    }

    /// Subtitle line: `SYMBOL-Lot Size: N`.
    pub fn headline(&self) -> String {
        format!("{}-{}", self.symbol, self.lot_size)
    }
}

/// The five editable inputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    DailyCorrection,
    SmaStatus,
    Rsi,
    Tradeable,
    Comment,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::DailyCorrection,
        Field::SmaStatus,
        Field::Rsi,
        Field::Tradeable,
        Field::Comment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::DailyCorrection => schema::DAILY_CORRECTION,
            Field::SmaStatus => schema::SMA_STATUS,
            Field::Rsi => schema::RSI,
            Field::Tradeable => schema::TRADEABLE,
            Field::Comment => schema::COMMENT,
        }
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }

    pub fn is_text(self) -> bool {
        self == Field::Comment
    }

    /// Option labels for a choice field, with the index of `values`' current one.
    pub fn options(self, values: &Annotation) -> Option<(Vec<&'static str>, usize)> {
        fn listed<C: Choice>(current: C) -> (Vec<&'static str>, usize) {
            (C::ALL.iter().map(|c| c.label()).collect(), current.position())
        }
        match self {
            Field::DailyCorrection => Some(listed(values.daily_correction)),
            Field::SmaStatus => Some(listed(values.sma_status)),
            Field::Rsi => Some(listed(values.rsi)),
            Field::Tradeable => Some(listed(values.tradeable)),
            Field::Comment => None,
        }
    }

    /// Event that moves this choice one step forward or back. `None` for Comment.
    pub fn cycle(self, values: &Annotation, forward: bool) -> Option<SessionEvent> {
        fn step<C: Choice>(c: C, forward: bool) -> C {
            if forward {
                c.next()
            } else {
                c.prev()
            }
        }
        match self {
            Field::DailyCorrection => Some(SessionEvent::SetCorrection(step(
                values.daily_correction,
                forward,
            ))),
            Field::SmaStatus => Some(SessionEvent::SetSmaStatus(step(values.sma_status, forward))),
            Field::Rsi => Some(SessionEvent::SetRsi(step(values.rsi, forward))),
            Field::Tradeable => Some(SessionEvent::SetTradeable(step(values.tradeable, forward))),
            Field::Comment => None,
        }
    }
}
