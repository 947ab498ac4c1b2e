//! Stocknote CLI: headless access to the annotation spreadsheet.
//!
//! Commands:
//! - `companies`: list company names in selector order
//! - `show`: print the form view for one company
//! - `annotate`: update one company's record and write a timestamped export
//! - `export`: write a sorted, timestamped copy without edits

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use stocknote_core::schema::COMMENT;
use stocknote_core::{
    export_table, AppConfig, Choice, FormView, Outcome, RsiBucket, Session, SessionEvent,
    SmaStatus, YesNo,
};

#[derive(Parser)]
#[command(
    name = "stocknote-cli",
    about = "Stocknote CLI: annotate and export share market spreadsheets"
)]
struct Cli {
    /// TOML config file. Missing file means defaults.
    #[arg(long, global = true, default_value = "stocknote.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List company names, sorted case-insensitively.
    Companies {
        /// Spreadsheet to read.
        file: PathBuf,
    },
    /// Show symbol, lot size, and annotation values for a company.
    Show {
        /// Spreadsheet to read.
        file: PathBuf,
        /// Exact Company Name.
        company: String,
    },
    /// Update one company's annotations and export the result.
    Annotate {
        /// Spreadsheet to read.
        file: PathBuf,
        /// Exact Company Name.
        company: String,

        /// Daily Correction: Yes or No.
        #[arg(long, value_parser = parse_choice::<YesNo>)]
        correction: Option<YesNo>,

        /// 55 SMA Status: "Below 55 SMA", "On 55 SMA" or "Above 55 SMA".
        #[arg(long, value_parser = parse_choice::<SmaStatus>)]
        sma: Option<SmaStatus>,

        /// RSI: "Below 60" or "Above 60".
        #[arg(long, value_parser = parse_choice::<RsiBucket>)]
        rsi: Option<RsiBucket>,

        /// Tradeable: Yes or No.
        #[arg(long, value_parser = parse_choice::<YesNo>)]
        tradeable: Option<YesNo>,

        /// Comment text. Without it the row's current comment is kept.
        #[arg(long)]
        comment: Option<String>,

        /// Output directory. Defaults to the configured one.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write `Updated_data_<timestamp>.xlsx` without editing anything.
    Export {
        /// Spreadsheet to read.
        file: PathBuf,

        /// Output directory. Defaults to the configured one.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Per-field edits requested on the command line.
#[derive(Default)]
struct Edits {
    correction: Option<YesNo>,
    sma: Option<SmaStatus>,
    rsi: Option<RsiBucket>,
    tradeable: Option<YesNo>,
    comment: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    init_logging(&config.log_filter);

    match cli.command {
        Commands::Companies { file } => run_companies(&file),
        Commands::Show { file, company } => run_show(&file, &company),
        Commands::Annotate {
            file,
            company,
            correction,
            sma,
            rsi,
            tradeable,
            comment,
            output_dir,
        } => {
            let edits = Edits {
                correction,
                sma,
                rsi,
                tradeable,
                comment,
            };
            let out = output_dir.unwrap_or(config.output_dir);
            run_annotate(&file, &company, edits, &out)
        }
        Commands::Export { file, output_dir } => {
            run_export(&file, &output_dir.unwrap_or(config.output_dir))
        }
    }
}

fn init_logging(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(format_layer)
        .init();
}

fn parse_choice<C: Choice>(raw: &str) -> Result<C, String> {
    C::from_label(raw).ok_or_else(|| {
        let labels: Vec<&str> = C::ALL.iter().map(|c| c.label()).collect();
        format!("expected one of: {}", labels.join(", "))
    })
}

fn open(file: &Path) -> Result<Session> {
    let mut session = Session::new();
    session
        .open_path(file)
        .with_context(|| format!("opening {}", file.display()))?;
    Ok(session)
}

fn open_selected(file: &Path, company: &str) -> Result<Session> {
    let mut session = open(file)?;
    session
        .apply(SessionEvent::Select(company.to_string()))
        .with_context(|| format!("selecting {company:?} in {}", file.display()))?;
    Ok(session)
}

fn run_companies(file: &Path) -> Result<()> {
    let session = open(file)?;
    for company in session.companies() {
        println!("{company}");
    }
    Ok(())
}

fn run_show(file: &Path, company: &str) -> Result<()> {
    let session = open_selected(file, company)?;
    let Some(view) = FormView::for_session(&session) else {
        bail!("no form for {company:?}");
    };
    print_view(&view);
    Ok(())
}

fn print_view(view: &FormView) {
    println!("{}", view.company);
    println!("{}", view.headline());
    println!("  {:<18}{}", "Daily Correction", view.values.daily_correction.label());
    println!("  {:<18}{}", "55 SMA Status", view.values.sma_status.label());
    println!("  {:<18}{}", "RSI", view.values.rsi.label());
    println!("  {:<18}{}", "Tradeable", view.values.tradeable.label());
    println!("  {:<18}{}", "Comment", view.values.comment);
    println!(
        "  {:<18}{}",
        "Update Date",
        view.last_update.as_deref().unwrap_or("-")
    );
}

fn run_annotate(file: &Path, company: &str, edits: Edits, output_dir: &Path) -> Result<()> {
    let mut session = open_selected(file, company)?;

    // Selecting clears the draft comment; keep the stored one unless replaced.
    let comment = match edits.comment {
        Some(text) => text,
        None => session
            .selected_row()
            .and_then(|row| session.table()?.get(row, COMMENT))
            .map(|c| c.to_string())
            .unwrap_or_default(),
    };

    let mut events = vec![SessionEvent::EditComment(comment)];
    events.extend(edits.correction.map(SessionEvent::SetCorrection));
    events.extend(edits.sma.map(SessionEvent::SetSmaStatus));
    events.extend(edits.rsi.map(SessionEvent::SetRsi));
    events.extend(edits.tradeable.map(SessionEvent::SetTradeable));
    for event in events {
        session.apply(event)?;
    }

    let now = chrono::Local::now().naive_local();
    if let Outcome::Committed(receipt) = session.apply(SessionEvent::Commit { at: now })? {
        tracing::info!(file = %file.display(), company = %receipt.company, "annotate committed");
        println!("Record updated successfully! ({} at {})", receipt.company, receipt.stamped);
    }

    if let Some(view) = FormView::for_session(&session) {
        print_view(&view);
    }
    write_export(&session, output_dir)?;
    Ok(())
}

fn run_export(file: &Path, output_dir: &Path) -> Result<()> {
    let session = open(file)?;
    write_export(&session, output_dir)?;
    Ok(())
}

fn write_export(session: &Session, output_dir: &Path) -> Result<PathBuf> {
    let Some(table) = session.table() else {
        bail!("no spreadsheet loaded");
    };
    let now = chrono::Local::now().naive_local();
    tracing::debug!(output_dir = %output_dir.display(), rows = table.len(), "exporting");
    let path = export_table(table, output_dir, now)
        .with_context(|| format!("writing export to {}", output_dir.display()))?;
    println!("Data saved successfully! Written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_choice_accepts_labels() {
        assert_eq!(parse_choice::<YesNo>("Yes"), Ok(YesNo::Yes));
        assert_eq!(parse_choice::<SmaStatus>("Above 55 SMA"), Ok(SmaStatus::Above));
        assert_eq!(parse_choice::<RsiBucket>(" Below 60 "), Ok(RsiBucket::Below60));
    }

    #[test]
    fn parse_choice_lists_valid_labels() {
        let err = parse_choice::<YesNo>("maybe").unwrap_err();
        assert_eq!(err, "expected one of: Yes, No");
    }

    fn sample(dir: &Path) -> PathBuf {
        let path = dir.join("list.csv");
        std::fs::write(&path, "Company Name,Symbol,Comment\nzeta,ZTA,old note\nAcme,ACM,\n").unwrap();
        path
    }

    #[test]
    fn export_writes_sorted_timestamped_copy() {
        let dir = tempfile::tempdir().unwrap();
        let session = open(&sample(dir.path())).unwrap();
        let written = write_export(&session, &dir.path().join("out")).unwrap();

        let name = written.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Updated_data_") && name.ends_with(".xlsx"));
        let exported = stocknote_core::store::load(&written).unwrap();
        assert_eq!(exported.rows()[0][0].to_string(), "Acme");
    }

    #[test]
    fn annotate_keeps_stored_comment_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let edits = Edits {
            tradeable: Some(YesNo::Yes),
            ..Edits::default()
        };
        run_annotate(&sample(dir.path()), "zeta", edits, &out).unwrap();

        let written = std::fs::read_dir(&out).unwrap().next().unwrap().unwrap().path();
        let exported = stocknote_core::store::load(&written).unwrap();
        let row = exported.find_row("Company Name", "zeta").unwrap();
        assert_eq!(exported.get(row, COMMENT).unwrap().to_string(), "old note");
        assert_eq!(exported.get(row, "Tradeable").unwrap().to_string(), "Yes");
    }

    #[test]
    fn cli_parses_annotate_flags() {
        let cli = Cli::try_parse_from([
            "stocknote-cli",
            "annotate",
            "list.xlsx",
            "Acme",
            "--sma",
            "Below 55 SMA",
            "--tradeable",
            "Yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Annotate { company, sma, tradeable, rsi, .. } => {
                assert_eq!(company, "Acme");
                assert_eq!(sma, Some(SmaStatus::Below));
                assert_eq!(tradeable, Some(YesNo::Yes));
                assert_eq!(rsi, None);
            }
            _ => panic!("expected annotate"),
        }
    }
}
