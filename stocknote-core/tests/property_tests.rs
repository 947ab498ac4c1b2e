//! Property tests for table invariants.
//!
//! 1. Normalization is idempotent
//! 2. Export ordering: `Update Date` last, rows case-insensitively sorted
//! 3. Commit isolation: only the selected row's annotation cells change

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use proptest::prelude::*;
use stocknote_core::schema::{
    self, COMMENT, COMPANY_NAME, DAILY_CORRECTION, RSI, SMA_STATUS, SYMBOL, TRADEABLE, UPDATE_DATE,
};
use stocknote_core::store::prepare_for_export;
use stocknote_core::{Cell, Session, SessionEvent, SourceId, Table, YesNo};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[A-Za-z][A-Za-z ]{0,8}", 1..12)
        .prop_map(|set| set.into_iter().collect())
}

/// Identity columns plus a random subset of annotation columns.
fn arb_table() -> impl Strategy<Value = Table> {
    (arb_names(), prop::collection::vec(any::<bool>(), 7)).prop_map(|(names, present)| {
        let mut table = Table::new(
            vec![COMPANY_NAME.into(), SYMBOL.into()],
            names
                .iter()
                .map(|n| vec![Cell::text(n.clone()), Cell::text(n.to_uppercase())])
                .collect(),
        );
        for ((name, _), keep) in schema::annotation_defaults().into_iter().zip(present) {
            if keep {
                table.add_column(name, Cell::text("pre-existing"));
            }
        }
        table
    })
}

proptest! {
    #[test]
    fn normalize_twice_equals_once(table in arb_table()) {
        let mut once = table.clone();
        schema::normalize(&mut once);
        let mut twice = once.clone();
        let added = schema::normalize(&mut twice);
        prop_assert!(added.is_empty());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_keeps_existing_cells(table in arb_table()) {
        let mut normalized = table.clone();
        schema::normalize(&mut normalized);
        for col in table.columns() {
            for row in 0..table.len() {
                prop_assert_eq!(table.get(row, col), normalized.get(row, col));
            }
        }
    }

    #[test]
    fn export_order_holds(table in arb_table()) {
        let mut table = table;
        schema::normalize(&mut table);
        let out = prepare_for_export(&table);

        prop_assert_eq!(out.columns().last().map(String::as_str), Some(UPDATE_DATE));
        let keys: Vec<String> = out
            .rows()
            .iter()
            .map(|r| r[0].to_string().to_lowercase())
            .collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] <= pair[1], "{:?} > {:?}", pair[0], pair[1]);
        }
        let before: HashSet<String> = table.rows().iter().map(|r| r[0].to_string()).collect();
        let after: HashSet<String> = out.rows().iter().map(|r| r[0].to_string()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn commit_changes_only_selected_row(table in arb_table(), pick in any::<prop::sample::Index>()) {
        let mut session = Session::new();
        session
            .apply(SessionEvent::Load {
                source: SourceId { path: PathBuf::from("p.xlsx"), len: 0, modified: None },
                table,
            })
            .unwrap();
        let before = session.table().unwrap().clone();
        let companies = session.companies();
        let company = pick.get(&companies).clone();

        session.apply(SessionEvent::Select(company.clone())).unwrap();
        session.apply(SessionEvent::SetTradeable(YesNo::Yes)).unwrap();
        session.apply(SessionEvent::EditComment("note".into())).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(23, 59, 59).unwrap();
        session.apply(SessionEvent::Commit { at }).unwrap();

        let after = session.table().unwrap();
        let target = after.find_row(COMPANY_NAME, &company).unwrap();
        let editable = [DAILY_CORRECTION, SMA_STATUS, RSI, TRADEABLE, COMMENT, UPDATE_DATE];
        prop_assert_eq!(after.columns(), before.columns());
        for row in 0..before.len() {
            for col in before.columns() {
                if row == target && editable.contains(&col.as_str()) {
                    continue;
                }
                prop_assert_eq!(after.get(row, col), before.get(row, col));
            }
        }
        prop_assert_eq!(after.get(target, TRADEABLE), Some(&Cell::text("Yes")));
        prop_assert_eq!(after.get(target, UPDATE_DATE), Some(&Cell::text("2024-02-29 23:59:59")));
    }
}
