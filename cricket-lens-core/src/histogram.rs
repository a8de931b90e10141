use crate::models::{ScoreFrequency, ScoreRange};
use serde::{Deserialize, Serialize};

/// Width of every bin but possibly the last.
pub const BIN_WIDTH: i64 = 10;
/// The chart ceiling is rounded up to a multiple of this.
pub const AXIS_STEP: f64 = 5.0;
/// Number of intervals between ticks; there are `TICK_INTERVALS + 1` tick values.
pub const TICK_INTERVALS: usize = 5;
/// Upper bound on bins per chart; scores past the last bin count toward totals only.
pub const MAX_BINS: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    pub min: i64,
    pub max: i64,
    pub label: String,
}

impl Bin {
    fn new(min: i64, max: i64) -> Self {
        Self { min, max, label: format!("{min}-{max}") }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinStat {
    #[serde(flatten)]
    pub bin: Bin,
    pub home_count: u64,
    pub away_count: u64,
    pub home_percentage: f64,
    pub away_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    pub axis_max: f64,
    pub ticks: Vec<f64>,
}

impl AxisScale {
    pub fn for_max(max_percentage: f64) -> Self {
        let max = if max_percentage.is_finite() { max_percentage.max(0.0) } else { 0.0 };
        let mut axis_max = (max / AXIS_STEP).ceil() * AXIS_STEP;
        if axis_max < max {
            axis_max += AXIS_STEP;
        }
        let ticks = (0..=TICK_INTERVALS)
            .map(|i| i as f64 * axis_max / TICK_INTERVALS as f64)
            .collect();
        Self { axis_max, ticks }
    }

    /// Height of a bar for `percentage` on a chart `height` units tall; 0 on an empty axis.
    pub fn scale(&self, percentage: f64, height: f64) -> f64 {
        if self.axis_max <= 0.0 {
            return 0.0;
        }
        (percentage / self.axis_max * height).clamp(0.0, height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub bins: Vec<BinStat>,
    pub max_percentage: f64,
    pub axis: AxisScale,
}

impl HistogramSummary {
    pub fn home_binned(&self) -> u64 {
        self.bins.iter().fold(0u64, |acc, b| acc.saturating_add(b.home_count))
    }
    pub fn away_binned(&self) -> u64 {
        self.bins.iter().fold(0u64, |acc, b| acc.saturating_add(b.away_count))
    }
}

/// Splits `range` into consecutive bins of `width` scores, ascending.
/// A zero-width or inverted range collapses to the single bin `[min,min]`.
/// At most `MAX_BINS` bins are produced.
pub fn make_bins(range: ScoreRange, width: i64) -> Vec<Bin> {
    let width = width.max(1);
    if range.max <= range.min {
        return vec![Bin::new(range.min, range.min)];
    }
    let span = range.max.saturating_sub(range.min).saturating_add(1);
    let mut count = span / width + i64::from(span % width != 0);
    if count > MAX_BINS {
        tracing::warn!(min = range.min, max = range.max, count, "score range too wide, truncating bins");
        count = MAX_BINS;
    }
    (0..count)
        .map(|i| {
            let lo = range.min.saturating_add(i.saturating_mul(width));
            let hi = lo.saturating_add(width - 1).min(range.max);
            Bin::new(lo, hi)
        })
        .collect()
}

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn bin_scores(home: &ScoreFrequency, away: &ScoreFrequency, range: ScoreRange) -> HistogramSummary {
    bin_scores_with_width(home, away, range, BIN_WIDTH)
}

pub fn bin_scores_with_width(
    home: &ScoreFrequency,
    away: &ScoreFrequency,
    range: ScoreRange,
    width: i64,
) -> HistogramSummary {
    let home_total = home.total();
    let away_total = away.total();
    let bins: Vec<BinStat> = make_bins(range, width)
        .into_iter()
        .map(|bin| {
            let home_count = home.count_in(bin.min..=bin.max);
            let away_count = away.count_in(bin.min..=bin.max);
            BinStat {
                home_percentage: percentage(home_count, home_total),
                away_percentage: percentage(away_count, away_total),
                home_count,
                away_count,
                bin,
            }
        })
        .collect();
    let max_percentage = bins
        .iter()
        .map(|b| b.home_percentage.max(b.away_percentage))
        .fold(0.0, f64::max);
    tracing::debug!(
        bins = bins.len(),
        home_total,
        away_total,
        max_percentage,
        "binned score frequencies"
    );
    HistogramSummary { axis: AxisScale::for_max(max_percentage), bins, max_percentage }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(pairs: &[(i64, u64)]) -> ScoreFrequency {
        pairs.iter().copied().collect()
    }

    fn spans(bins: &[Bin]) -> Vec<(i64, i64)> {
        bins.iter().map(|b| (b.min, b.max)).collect()
    }

    #[test]
    fn three_aligned_bins() {
        let s = bin_scores(&freq(&[(150, 5), (160, 3)]), &freq(&[(140, 4)]), ScoreRange::new(140, 169));
        assert_eq!(s.bins.len(), 3);
        assert_eq!(s.bins.iter().map(|b| b.bin.label.as_str()).collect::<Vec<_>>(), ["140-149", "150-159", "160-169"]);
        assert_eq!((s.bins[0].home_count, s.bins[0].away_count), (0, 4));
        assert_eq!(s.bins[0].away_percentage, 100.0);
        assert_eq!(s.bins[0].home_percentage, 0.0);
        assert_eq!((s.bins[1].home_count, s.bins[1].away_count), (5, 0));
        assert!((s.bins[1].home_percentage - 62.5).abs() < 1e-9);
        assert_eq!((s.bins[2].home_count, s.bins[2].away_count), (3, 0));
        assert!((s.bins[2].home_percentage - 37.5).abs() < 1e-9);
        assert_eq!(s.max_percentage, 100.0);
        assert_eq!(s.axis.axis_max, 100.0);
    }

    #[test]
    fn empty_maps_zero_range() {
        let s = bin_scores(&ScoreFrequency::new(), &ScoreFrequency::new(), ScoreRange::new(0, 0));
        assert_eq!(s.bins.len(), 1);
        let b = &s.bins[0];
        assert_eq!(b.bin.label, "0-0");
        assert_eq!((b.home_count, b.away_count), (0, 0));
        assert_eq!((b.home_percentage, b.away_percentage), (0.0, 0.0));
        assert_eq!(s.max_percentage, 0.0);
        assert_eq!(s.axis.axis_max, 0.0);
        assert!(s.axis.ticks.iter().all(|t| *t == 0.0));
    }

    #[test]
    fn single_score_range() {
        let s = bin_scores(&freq(&[(150, 1)]), &ScoreFrequency::new(), ScoreRange::new(150, 150));
        assert_eq!(spans(&s.bins.iter().map(|b| b.bin.clone()).collect::<Vec<_>>()), [(150, 150)]);
        assert_eq!(s.bins[0].home_count, 1);
        assert_eq!(s.bins[0].home_percentage, 100.0);
        assert_eq!(s.bins[0].away_percentage, 0.0);
    }

    #[test]
    fn inverted_range_falls_back_to_one_bin() {
        let bins = make_bins(ScoreRange::new(170, 150), BIN_WIDTH);
        assert_eq!(spans(&bins), [(170, 170)]);
    }

    #[test]
    fn last_bin_narrower() {
        // range from the original dashboard fixture
        let bins = make_bins(ScoreRange::new(125, 180), BIN_WIDTH);
        assert_eq!(spans(&bins), [(125, 134), (135, 144), (145, 154), (155, 164), (165, 174), (175, 180)]);
    }

    #[test]
    fn max_score_on_bin_boundary_gets_its_own_bin() {
        let bins = make_bins(ScoreRange::new(140, 150), BIN_WIDTH);
        assert_eq!(spans(&bins), [(140, 149), (150, 150)]);
    }

    #[test]
    fn out_of_range_keys_count_in_total_only() {
        let s = bin_scores(&freq(&[(150, 1), (300, 1)]), &ScoreFrequency::new(), ScoreRange::new(150, 159));
        assert_eq!(s.bins.len(), 1);
        assert_eq!(s.bins[0].home_count, 1);
        assert_eq!(s.bins[0].home_percentage, 50.0);
        assert_eq!(s.home_binned(), 1);
    }

    #[test]
    fn sides_normalized_independently() {
        let s = bin_scores(&freq(&[(100, 1)]), &freq(&[(100, 9), (115, 1)]), ScoreRange::new(100, 119));
        assert_eq!(s.bins[0].home_percentage, 100.0);
        assert!((s.bins[0].away_percentage - 90.0).abs() < 1e-9);
        assert!((s.bins[1].away_percentage - 10.0).abs() < 1e-9);
    }

    #[test]
    fn axis_rounds_up_to_multiple_of_five() {
        let a = AxisScale::for_max(62.5);
        assert_eq!(a.axis_max, 65.0);
        assert_eq!(a.ticks, vec![0.0, 13.0, 26.0, 39.0, 52.0, 65.0]);
        assert_eq!(AxisScale::for_max(20.0).axis_max, 20.0);
        assert_eq!(AxisScale::for_max(0.1).axis_max, 5.0);
        assert_eq!(AxisScale::for_max(f64::NAN).axis_max, 0.0);
    }

    #[test]
    fn scale_guards_empty_axis() {
        assert_eq!(AxisScale::for_max(0.0).scale(10.0, 300.0), 0.0);
        let a = AxisScale::for_max(50.0);
        assert_eq!(a.scale(25.0, 300.0), 150.0);
        assert_eq!(a.scale(50.0, 300.0), 300.0);
    }

    #[test]
    fn custom_width() {
        let bins = make_bins(ScoreRange::new(0, 9), 5);
        assert_eq!(spans(&bins), [(0, 4), (5, 9)]);
        // non-positive widths are clamped to 1
        assert_eq!(make_bins(ScoreRange::new(0, 2), 0).len(), 3);
    }

    #[test]
    fn extreme_range_is_capped() {
        let s = bin_scores(&freq(&[(150, 1)]), &ScoreFrequency::new(), ScoreRange::new(0, i64::MAX));
        assert_eq!(s.bins.len(), MAX_BINS as usize);
        assert_eq!(spans(&[s.bins[15].bin.clone()]), [(150, 159)]);
        assert_eq!(s.bins[15].home_percentage, 100.0);

        let bins = make_bins(ScoreRange::new(i64::MIN, i64::MAX), BIN_WIDTH);
        assert_eq!(bins.len(), MAX_BINS as usize);
        assert_eq!(bins[0].min, i64::MIN);
        assert!(bins.windows(2).all(|w| w[0].max + 1 == w[1].min));
    }
}
