//! Roundturn CLI — trade-performance reports over execution snapshots.
//!
//! Commands:
//! - `report` — load executions (plus optional instruments and annotations)
//!   from JSON, run one analytics pass, print a summary, and optionally save
//!   JSON/CSV artifacts

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roundturn_analytics::{
    recompute, save_artifacts, AnalyticsBundle, Dimension, FilterCriteria, Granularity,
    ReportOptions, Snapshot, TagMatch,
};
use roundturn_core::domain::{Execution, InstrumentCatalog, TradeAnnotation, TradeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "roundturn", about = "Roundturn CLI — trading-performance analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one analytics pass over an execution snapshot.
    Report {
        /// Path to executions JSON (array of executions).
        #[arg(long)]
        executions: PathBuf,

        /// Path to instrument catalog JSON.
        #[arg(long)]
        instruments: Option<PathBuf>,

        /// Path to trade annotations JSON (map of trade id to annotation).
        #[arg(long)]
        annotations: Option<PathBuf>,

        /// Path to a TOML criteria file. Flags below override its fields.
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// First local close date included (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// First local close date excluded (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Restrict to these accounts.
        #[arg(long)]
        account: Vec<String>,

        /// Restrict to trades carrying these tags.
        #[arg(long)]
        tag: Vec<String>,

        /// Require every --tag to match instead of any.
        #[arg(long, default_value_t = false)]
        all_tags: bool,

        /// Reporting timezone (IANA name). Overrides the criteria file;
        /// defaults to UTC when neither is given.
        #[arg(long)]
        timezone: Option<String>,

        /// Bucket granularity: day, week, or month.
        #[arg(long, default_value = "day")]
        granularity: String,

        /// Save report.json and trades.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            executions,
            instruments,
            annotations,
            criteria,
            start,
            end,
            account,
            tag,
            all_tags,
            timezone,
            granularity,
            output_dir,
        } => run_report(ReportArgs {
            executions,
            instruments,
            annotations,
            criteria,
            start,
            end,
            account,
            tag,
            all_tags,
            timezone,
            granularity,
            output_dir,
        }),
    }
}

struct ReportArgs {
    executions: PathBuf,
    instruments: Option<PathBuf>,
    annotations: Option<PathBuf>,
    criteria: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    account: Vec<String>,
    tag: Vec<String>,
    all_tags: bool,
    timezone: Option<String>,
    granularity: String,
    output_dir: Option<PathBuf>,
}

fn run_report(args: ReportArgs) -> Result<()> {
    let snapshot = load_snapshot(&args)?;
    let criteria = build_criteria(&args)?;
    let options = ReportOptions {
        granularity: parse_granularity(&args.granularity)?,
        dimensions: Dimension::ALL.to_vec(),
    };

    let bundle = recompute(&snapshot, &criteria, &options)?;
    print_summary(&bundle);

    if let Some(output_dir) = &args.output_dir {
        let run_dir = save_artifacts(&bundle, output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn load_snapshot(args: &ReportArgs) -> Result<Snapshot> {
    let executions: Vec<Execution> = read_json(&args.executions)?;

    let instruments: InstrumentCatalog = match &args.instruments {
        Some(path) => read_json(path)?,
        None => InstrumentCatalog::new(),
    };

    let annotations: HashMap<TradeId, TradeAnnotation> = match &args.annotations {
        Some(path) => read_json(path)?,
        None => HashMap::new(),
    };

    Ok(Snapshot { executions, instruments, annotations })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn build_criteria(args: &ReportArgs) -> Result<FilterCriteria> {
    let mut criteria = match &args.criteria {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => {
            let start = args
                .start
                .as_deref()
                .context("--start is required without a criteria file")?;
            let end =
                args.end.as_deref().context("--end is required without a criteria file")?;
            FilterCriteria::over_range(parse_date(start)?, parse_date(end)?)
        }
    };

    if let Some(start) = args.start.as_deref() {
        criteria.start = parse_date(start)?;
    }
    if let Some(end) = args.end.as_deref() {
        criteria.end = parse_date(end)?;
    }
    criteria.accounts.extend(args.account.iter().cloned());
    criteria.tags.extend(args.tag.iter().cloned());
    if args.all_tags {
        criteria.tag_match = TagMatch::All;
    }
    if let Some(timezone) = &args.timezone {
        criteria.reporting_timezone = timezone.clone();
    }

    Ok(criteria)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn parse_granularity(s: &str) -> Result<Granularity> {
    match s {
        "day" => Ok(Granularity::Day),
        "week" => Ok(Granularity::Week),
        "month" => Ok(Granularity::Month),
        _ => bail!("unknown granularity '{s}'. Valid: day, week, month"),
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}

fn print_summary(bundle: &AnalyticsBundle) {
    let t = &bundle.totals;
    println!();
    println!("=== Performance Report ===");
    println!("Period:         {} to {}", bundle.criteria.start, bundle.criteria.end);
    println!("Timezone:       {}", bundle.criteria.reporting_timezone);
    println!("Trades:         {} ({} open positions)", t.trades, bundle.open_positions.len());
    println!("W / L / S:      {} / {} / {}", t.wins, t.losses, t.scratches);
    println!();
    println!("Gross:          {:.2}", t.gross_proceeds);
    println!("Commission:     {:.2}", t.commission);
    println!("Net:            {:.2}", t.net_proceeds);
    println!();
    println!("Win Rate:       {}", fmt_opt(t.win_rate.map(|r| r * 100.0), 1));
    println!("Avg Win:        {}", fmt_opt(t.average_win, 2));
    println!("Avg Loss:       {}", fmt_opt(t.average_loss, 2));
    println!("Profit Factor:  {}", fmt_opt(t.profit_factor, 2));
    println!("Expectancy:     {}", fmt_opt(bundle.profit.expectancy, 2));

    if !bundle.buckets.is_empty() {
        println!();
        println!("{:<12} {:>8} {:>12} {:>12}", "Period", "Trades", "Net", "Cumulative");
        println!("{}", "-".repeat(48));
        for bucket in &bundle.buckets {
            println!(
                "{:<12} {:>8} {:>12.2} {:>12.2}",
                bucket.period.label(),
                bucket.trades,
                bucket.net_proceeds,
                bucket.cumulative_net
            );
        }
    }

    if !bundle.diagnostics.is_empty() {
        println!();
        for diagnostic in &bundle.diagnostics {
            println!("WARNING: {diagnostic}");
        }
    }
    println!();
}
