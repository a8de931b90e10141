pub mod client;
pub mod export;
pub mod histogram;
pub mod models;
pub mod summary;

pub use cricket_lens_common::{CricketLensError, Result};
pub use client::{ApiClient, GameBundle};
pub use export::{export_csv, export_json, ExportFormat};
pub use histogram::{bin_scores, bin_scores_with_width, make_bins, AxisScale, Bin, BinStat, HistogramSummary, BIN_WIDTH, MAX_BINS};
pub use models::{Game, GameAnalysis, HistogramData, ScoreFrequency, ScoreRange, Simulation};
pub use summary::{occupied_bins, print_game_summary, print_histogram, render_text_histogram, win_summary, WinSummary};
