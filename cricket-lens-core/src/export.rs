use std::io::Write;
use std::path::Path;
use cricket_lens_common::{CricketLensError, Result};
use crate::histogram::{BinStat, HistogramSummary};
use crate::models::GameAnalysis;
use crate::summary::win_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(CricketLensError::Other(format!("Unknown format: {other} (use json or csv)"))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

pub fn export_json(output_path: &Path, analysis: &GameAnalysis, summary: &HistogramSummary) -> Result<()> {
    let doc = serde_json::json!({
        "game": analysis.game,
        "home_win_probability": analysis.home_win_probability,
        "total_simulations": analysis.total_simulations,
        "win_summary": win_summary(&analysis.simulations),
        "histogram": summary,
    });
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, &doc)?;
    file.write_all(b"\n")?;
    tracing::info!(path = %output_path.display(), "wrote JSON export");
    Ok(())
}

pub fn export_csv(output_path: &Path, bins: &[BinStat]) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    writeln!(file, "label,min,max,home_count,away_count,home_pct,away_pct")?;
    for b in bins {
        writeln!(file, "{},{},{},{},{},{:.4},{:.4}",
            b.bin.label,
            b.bin.min,
            b.bin.max,
            b.home_count,
            b.away_count,
            b.home_percentage,
            b.away_percentage,
        )?;
    }
    tracing::info!(path = %output_path.display(), rows = bins.len(), "wrote CSV export");
    Ok(())
}
