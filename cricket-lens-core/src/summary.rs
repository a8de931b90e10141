use crate::histogram::{BinStat, HistogramSummary};
use crate::models::{GameAnalysis, Simulation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinSummary {
    pub home_wins: u64,
    pub away_wins: u64,
    pub ties: u64,
    pub total: u64,
    pub home_win_pct: f64,
    pub away_win_pct: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Home wins only on a strictly higher score; equal scores are ties.
pub fn win_summary(simulations: &[Simulation]) -> WinSummary {
    let (mut home_wins, mut away_wins, mut ties) = (0u64, 0u64, 0u64);
    for s in simulations {
        match s.home_score.cmp(&s.away_score) {
            std::cmp::Ordering::Greater => home_wins += 1,
            std::cmp::Ordering::Less => away_wins += 1,
            std::cmp::Ordering::Equal => ties += 1,
        }
    }
    let total = simulations.len() as u64;
    let pct = |n: u64| if total > 0 { round2(n as f64 / total as f64 * 100.0) } else { 0.0 };
    WinSummary {
        home_wins,
        away_wins,
        ties,
        total,
        home_win_pct: pct(home_wins),
        away_win_pct: pct(away_wins),
    }
}

pub fn print_game_summary(analysis: &GameAnalysis) {
    let g = &analysis.game;
    let ws = win_summary(&analysis.simulations);
    println!("{:<20} {} (Home) vs {} (Away)", "Game:", g.home_team, g.away_team);
    println!("{:<20} {}", "Venue:", g.venue_name);
    if let Some(date) = &g.date {
        println!("{:<20} {}", "Date:", date);
    }
    println!("{:<20} {}%", "Home win %:", analysis.home_win_probability);
    println!("{:<20} {}", "Total simulations:", analysis.total_simulations);
    if ws.total > 0 {
        println!("{:<20} {} home / {} away / {} tied", "Outcomes:", ws.home_wins, ws.away_wins, ws.ties);
    }
}

/// Renders the grouped distribution chart as text, one line per bar.
pub fn render_text_histogram(summary: &HistogramSummary, home_team: &str, away_team: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Simulation Results Distribution".to_owned());
    lines.push(format!("  H = {home_team} (Home)   A = {away_team} (Away)"));
    lines.push(String::new());
    let label_w = summary.bins.iter().map(|b| b.bin.label.len()).max().unwrap_or(0);
    let bar_w = width.saturating_sub(label_w + 20).max(10);
    for b in &summary.bins {
        lines.push(bar_line(&b.bin.label, 'H', b.home_percentage, b.home_count, summary, label_w, bar_w));
        lines.push(bar_line("", 'A', b.away_percentage, b.away_count, summary, label_w, bar_w));
    }
    lines.push(String::new());
    let ticks: Vec<String> = summary.axis.ticks.iter().map(|t| format!("{t:.0}")).collect();
    lines.push(format!("Percentage of matches, axis ticks: {}", ticks.join(" ")));
    lines
}

fn bar_line(label: &str, side: char, pct: f64, count: u64, summary: &HistogramSummary, label_w: usize, bar_w: usize) -> String {
    let len = summary.axis.scale(pct, bar_w as f64).round() as usize;
    let count_txt = if count > 0 { format!(" {count}") } else { String::new() };
    format!("{label:>label_w$} {side} |{:<bar_w$}| {pct:5.1}%{count_txt}", "█".repeat(len))
}

pub fn print_histogram(summary: &HistogramSummary, home_team: &str, away_team: &str, width: usize) {
    for line in render_text_histogram(summary, home_team, away_team, width) {
        println!("{line}");
    }
}

/// Bins where either side has at least one simulated score.
pub fn occupied_bins(summary: &HistogramSummary) -> impl Iterator<Item = &BinStat> {
    summary.bins.iter().filter(|b| b.home_count > 0 || b.away_count > 0)
}
