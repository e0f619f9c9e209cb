//! Artifact export — JSON bundles and the CSV trade tape.
//!
//! Persisted bundles carry a `schema_version` field; versions newer than this
//! build are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use roundturn_core::domain::RoundTurnTrade;

use crate::pipeline::{AnalyticsBundle, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalyticsBundle` to pretty JSON.
pub fn export_json(bundle: &AnalyticsBundle) -> Result<String> {
    serde_json::to_string_pretty(bundle).context("failed to serialize AnalyticsBundle to JSON")
}

/// Deserialize an `AnalyticsBundle` from JSON, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<AnalyticsBundle> {
    let bundle: AnalyticsBundle =
        serde_json::from_str(json).context("failed to deserialize AnalyticsBundle from JSON")?;
    if bundle.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            bundle.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(bundle)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the filtered trade tape as CSV.
///
/// Columns: trade_id, account, symbol, side, opened_at, closed_at,
/// entry_price, exit_price, quantity, gross_proceeds, commission,
/// net_proceeds, outcome, approximate, tags, strategy
pub fn export_trades_csv(trades: &[RoundTurnTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "trade_id",
        "account",
        "symbol",
        "side",
        "opened_at",
        "closed_at",
        "entry_price",
        "exit_price",
        "quantity",
        "gross_proceeds",
        "commission",
        "net_proceeds",
        "outcome",
        "approximate",
        "tags",
        "strategy",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.id.to_string(),
            &t.account,
            &t.symbol,
            &format!("{:?}", t.side),
            &t.opened_at.to_rfc3339(),
            &t.closed_at.to_rfc3339(),
            &format!("{:.6}", t.entry_price),
            &format!("{:.6}", t.exit_price),
            &format!("{:.6}", t.quantity),
            &format!("{:.2}", t.gross_proceeds),
            &format!("{:.2}", t.commission),
            &format!("{:.2}", t.net_proceeds),
            &format!("{:?}", t.outcome),
            &t.approximate.to_string(),
            &t.tags.join("|"),
            t.strategy.as_deref().unwrap_or(""),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one analytics pass under `output_dir`:
/// `report.json` (the full bundle) and `trades.csv` (the filtered tape).
///
/// Returns the created directory's path.
pub fn save_artifacts(bundle: &AnalyticsBundle, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("report_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(bundle)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    let trades_csv = export_trades_csv(&bundle.trades)?;
    std::fs::write(run_dir.join("trades.csv"), &trades_csv)?;

    Ok(run_dir)
}

/// Load an `AnalyticsBundle` from an artifact directory's report.json.
///
/// Rejects newer schema versions.
pub fn load_artifacts(dir: &Path) -> Result<AnalyticsBundle> {
    let report_path = dir.join("report.json");
    let json = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    import_json(&json)
}
