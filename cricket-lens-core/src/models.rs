use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue_id: Option<i64>,
    #[serde(default = "unknown_venue", deserialize_with = "venue_or_unknown")]
    pub venue_name: String,
}

fn unknown_venue() -> String {
    "Unknown Venue".into()
}

fn venue_or_unknown<'de, D: serde::Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(unknown_venue))
}

impl Game {
    /// Dropdown label: `home vs away - venue`.
    pub fn label(&self) -> String {
        format!("{} vs {} - {}", self.home_team, self.away_team, self.venue_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub home_score: i64,
    pub away_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub game: Game,
    #[serde(default)]
    pub simulations: Vec<Simulation>,
    pub home_win_probability: f64,
    pub total_simulations: u64,
}

/// Occurrence count per exact score for one side. JSON keys are decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreFrequency(BTreeMap<i64, u64>);

impl ScoreFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_scores(scores: &[i64]) -> Self {
        let mut map = BTreeMap::new();
        for &s in scores {
            *map.entry(s).or_insert(0u64) += 1;
        }
        Self(map)
    }

    pub fn get(&self, score: i64) -> u64 {
        self.0.get(&score).copied().unwrap_or(0)
    }

    /// Sum over every key, including keys outside any score range.
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    pub fn count_in(&self, span: RangeInclusive<i64>) -> u64 {
        if span.start() > span.end() {
            return 0;
        }
        self.0.range(span).fold(0u64, |acc, (_, &c)| acc.saturating_add(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

impl FromIterator<(i64, u64)> for ScoreFrequency {
    fn from_iter<I: IntoIterator<Item = (i64, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl ScoreRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Combined bounds of both sides; `{0,0}` when neither side has scores.
    pub fn from_scores(home: &[i64], away: &[i64]) -> Self {
        let mut all = home.iter().chain(away.iter()).copied();
        let Some(first) = all.next() else { return Self::default() };
        let (min, max) = all.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s)));
        Self { min, max }
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min <= score && score <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_scores: Vec<i64>,
    #[serde(default)]
    pub away_scores: Vec<i64>,
    pub home_frequency: ScoreFrequency,
    pub away_frequency: ScoreFrequency,
    pub score_range: ScoreRange,
}
