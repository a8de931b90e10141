use crate::histogram::{bin_scores, HistogramSummary, BIN_WIDTH, MAX_BINS};
use crate::models::{Game, GameAnalysis, HistogramData, ScoreRange};
use cricket_lens_common::{Config, CricketLensError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the simulation API (`/games`, `/games/{id}/analysis`, `/games/{id}/histogram-data`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

/// Everything the dashboard shows for one selected game.
#[derive(Debug, Clone)]
pub struct GameBundle {
    pub analysis: GameAnalysis,
    pub histogram: HistogramData,
    pub summary: HistogramSummary,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(CricketLensError::Config("API base URL is empty".into()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &Config, url_override: Option<&str>) -> Result<Self> {
        Self::new(config.api_base_url(url_override), Duration::from_secs(config.api.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "request failed");
            return Err(CricketLensError::Api { status: status.as_u16(), url });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn games(&self) -> Result<Vec<Game>> {
        let games: Vec<Game> = self.get_json("/games").await?;
        tracing::info!(count = games.len(), "retrieved games");
        Ok(games)
    }

    pub async fn game_analysis(&self, game_id: i64) -> Result<GameAnalysis> {
        check_id(game_id)?;
        let analysis: GameAnalysis = self.get_json(&format!("/games/{game_id}/analysis")).await?;
        tracing::info!(game_id, simulations = analysis.total_simulations, "retrieved analysis");
        Ok(analysis)
    }

    pub async fn histogram_data(&self, game_id: i64) -> Result<HistogramData> {
        check_id(game_id)?;
        let data: HistogramData = self.get_json(&format!("/games/{game_id}/histogram-data")).await?;
        check_range(&data)?;
        tracing::info!(
            game_id,
            home_scores = data.home_frequency.total(),
            away_scores = data.away_frequency.total(),
            "retrieved histogram data"
        );
        Ok(data)
    }

    /// Fetches analysis and histogram data concurrently and bins the scores.
    pub async fn game_bundle(&self, game_id: i64) -> Result<GameBundle> {
        let (analysis, histogram) = tokio::try_join!(self.game_analysis(game_id), self.histogram_data(game_id))?;
        let summary = bin_scores(&histogram.home_frequency, &histogram.away_frequency, histogram.score_range);
        let outside = histogram
            .home_frequency
            .total()
            .saturating_sub(summary.home_binned())
            .saturating_add(histogram.away_frequency.total().saturating_sub(summary.away_binned()));
        if outside > 0 {
            tracing::warn!(game_id, outside, "scores outside the reported range were left out of the chart");
        }
        Ok(GameBundle { analysis, histogram, summary })
    }

    /// True iff `/health` answers 2xx; transport errors count as unhealthy.
    pub async fn health(&self) -> bool {
        let url = self.url("/health");
        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                tracing::info!(%url, ok, "health check");
                ok
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "health check failed");
                false
            }
        }
    }
}

fn check_id(game_id: i64) -> Result<()> {
    if game_id <= 0 {
        return Err(CricketLensError::InvalidGameId(game_id));
    }
    Ok(())
}

/// Rejects spans that would need more than `MAX_BINS` bins; inverted ranges are left to the binner.
fn check_range(data: &HistogramData) -> Result<()> {
    let ScoreRange { min, max } = data.score_range;
    if max.saturating_sub(min) >= MAX_BINS * BIN_WIDTH {
        tracing::warn!(min, max, "rejecting score range");
        return Err(CricketLensError::ScoreRangeTooWide { min, max });
    }
    Ok(())
}
