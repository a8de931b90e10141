use crate::tui::theme::Theme;
use cricket_lens_common::Config;
use cricket_lens_core::{Game, GameBundle};
use std::sync::mpsc::{Receiver, TryRecvError};

pub const GAMES_ERROR: &str = "Failed to load games. Make sure the backend is running.";
pub const GAME_ERROR: &str = "Failed to load game data";
const TASK_GONE: &str = "request task ended without a result";

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    Sidebar,
    Main,
}

/// A fetch the draw loop should start on its next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Games,
    Game(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading(Request),
}

pub enum LoadResult {
    Games(Result<Vec<Game>, String>),
    Game(i64, Result<Box<GameBundle>, String>),
}

pub struct App {
    pub api_url: String,
    pub games: Vec<Game>,
    pub sidebar_selected: usize,
    pub selected_game_id: Option<i64>,
    pub bundle: Option<Box<GameBundle>>,
    pub load: LoadState,
    pub pending: Option<Request>,
    pub load_rx: Option<Receiver<LoadResult>>,
    pub error: Option<String>,
    pub view: View,
    pub focus: Focus,
    pub chart_scroll: usize,
    pub status_msg: String,
    pub should_quit: bool,
    pub theme: Theme,
    pub sidebar_width: u16, // runtime-adjustable, clamped 20..=80
    pub config: Config,
}

impl App {
    pub fn new(api_url: String, config: Config) -> Self {
        Self {
            api_url,
            games: Vec::new(),
            sidebar_selected: 0,
            selected_game_id: None,
            bundle: None,
            load: LoadState::Idle,
            pending: None,
            load_rx: None,
            error: None,
            view: View::Dashboard,
            focus: Focus::Sidebar,
            chart_scroll: 0,
            status_msg: String::from("Loading..."),
            should_quit: false,
            theme: Theme::from_name(&config.display.theme),
            sidebar_width: config.display.sidebar_width.unwrap_or(40).clamp(20, 80),
            config,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading(_)) || self.pending.is_some()
    }

    pub fn sidebar_down(&mut self) {
        let max = self.games.len().saturating_sub(1);
        if self.sidebar_selected < max {
            self.sidebar_selected += 1;
        }
    }
    pub fn sidebar_up(&mut self) {
        if self.sidebar_selected > 0 {
            self.sidebar_selected -= 1;
        }
    }
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Main,
            Focus::Main => Focus::Sidebar,
        };
    }

    pub fn highlighted_game(&self) -> Option<&Game> {
        self.games.get(self.sidebar_selected)
    }

    pub fn request_games(&mut self) {
        if self.is_loading() {
            return;
        }
        self.pending = Some(Request::Games);
        self.status_msg = "Loading games...".into();
    }

    pub fn request_highlighted_game(&mut self) {
        if self.is_loading() {
            return;
        }
        let Some(id) = self.highlighted_game().map(|g| g.id) else { return };
        self.selected_game_id = Some(id);
        self.pending = Some(Request::Game(id));
        self.status_msg = format!("Loading game {id}...");
    }

    pub fn clear_selection(&mut self) {
        self.selected_game_id = None;
        self.bundle = None;
        self.chart_scroll = 0;
        self.status_msg = "Choose a game...".into();
    }

    /// Hands the pending request to the caller and marks it in flight.
    pub fn take_pending(&mut self) -> Option<Request> {
        let req = self.pending.take()?;
        self.load = LoadState::Loading(req);
        Some(req)
    }

    /// Applies the in-flight result if it has arrived. A sender dropped without a
    /// result counts as a failed load so the request can be retried.
    pub fn poll_load(&mut self) {
        let Some(rx) = &self.load_rx else { return };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => match self.load {
                LoadState::Loading(Request::Game(id)) => LoadResult::Game(id, Err(TASK_GONE.into())),
                _ => LoadResult::Games(Err(TASK_GONE.into())),
            },
        };
        self.load_rx = None;
        self.apply(result);
    }

    pub fn apply(&mut self, result: LoadResult) {
        self.load = LoadState::Idle;
        match result {
            LoadResult::Games(Ok(games)) => {
                self.status_msg = format!("{} games | Enter: load  ?: help  q: quit", games.len());
                self.games = games;
                self.sidebar_selected = self.sidebar_selected.min(self.games.len().saturating_sub(1));
                self.error = None;
            }
            LoadResult::Games(Err(e)) => {
                tracing::error!(error = %e, "loading games failed");
                self.error = Some(GAMES_ERROR.into());
                self.status_msg = "r: retry".into();
            }
            LoadResult::Game(id, _) if self.selected_game_id != Some(id) => {
                tracing::debug!(id, "dropping result for deselected game");
            }
            LoadResult::Game(id, Ok(bundle)) => {
                self.status_msg = format!(
                    "{} vs {} | {} simulations",
                    bundle.analysis.game.home_team, bundle.analysis.game.away_team, bundle.analysis.total_simulations
                );
                tracing::info!(id, bins = bundle.summary.bins.len(), "game loaded");
                self.bundle = Some(bundle);
                self.chart_scroll = 0;
                self.error = None;
            }
            LoadResult::Game(id, Err(e)) => {
                tracing::error!(id, error = %e, "loading game failed");
                self.bundle = None;
                self.error = Some(GAME_ERROR.into());
                self.status_msg = "Enter: retry".into();
            }
        }
    }

    pub fn scroll_chart_right(&mut self) {
        let bins = self.bundle.as_ref().map(|b| b.summary.bins.len()).unwrap_or(0);
        if self.chart_scroll + 1 < bins {
            self.chart_scroll += 1;
        }
    }
    pub fn scroll_chart_left(&mut self) {
        self.chart_scroll = self.chart_scroll.saturating_sub(1);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cricket_lens_core::{bin_scores, GameAnalysis, HistogramData, ScoreFrequency, ScoreRange, Simulation};

    pub fn game(id: i64, home: &str, away: &str) -> Game {
        Game { id, home_team: home.into(), away_team: away.into(), date: None, venue_id: Some(1), venue_name: "Oval".into() }
    }

    pub fn bundle(id: i64) -> Box<GameBundle> {
        let home: ScoreFrequency = [(150, 5), (160, 3)].into_iter().collect();
        let away: ScoreFrequency = [(140, 4)].into_iter().collect();
        let range = ScoreRange::new(140, 169);
        Box::new(GameBundle {
            analysis: GameAnalysis {
                game: game(id, "Alpha", "Beta"),
                simulations: vec![Simulation { home_score: 160, away_score: 140 }],
                home_win_probability: 62.5,
                total_simulations: 8,
            },
            summary: bin_scores(&home, &away, range),
            histogram: HistogramData {
                home_team: "Alpha".into(),
                away_team: "Beta".into(),
                home_scores: Vec::new(),
                away_scores: Vec::new(),
                home_frequency: home,
                away_frequency: away,
                score_range: range,
            },
        })
    }

    pub fn loaded_app() -> App {
        let mut app = App::new("http://localhost:8000".into(), Config::default());
        app.apply(LoadResult::Games(Ok(vec![game(1, "Alpha", "Beta"), game(2, "Gamma", "Delta")])));
        app
    }

    #[test]
    fn selection_flow() {
        let mut app = loaded_app();
        app.sidebar_down();
        app.request_highlighted_game();
        assert_eq!(app.selected_game_id, Some(2));
        assert_eq!(app.take_pending(), Some(Request::Game(2)));
        assert!(app.is_loading());
        // a second request while in flight is ignored
        app.request_games();
        assert_eq!(app.pending, None);
        app.apply(LoadResult::Game(2, Ok(bundle(2))));
        assert!(!app.is_loading());
        assert!(app.bundle.is_some());
        assert!(app.error.is_none());
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut app = loaded_app();
        app.request_highlighted_game();
        app.take_pending();
        app.clear_selection();
        app.apply(LoadResult::Game(1, Ok(bundle(1))));
        assert!(app.bundle.is_none());
        assert!(!app.is_loading());
    }

    #[test]
    fn errors_use_dashboard_messages() {
        let mut app = App::new("http://x".into(), Config::default());
        app.apply(LoadResult::Games(Err("connection refused".into())));
        assert_eq!(app.error.as_deref(), Some(GAMES_ERROR));
        let mut app = loaded_app();
        app.request_highlighted_game();
        app.take_pending();
        app.apply(LoadResult::Game(1, Err("HTTP 500".into())));
        assert_eq!(app.error.as_deref(), Some(GAME_ERROR));
        assert!(app.bundle.is_none());
    }

    #[test]
    fn poll_load_applies_sent_result() {
        let mut app = loaded_app();
        app.request_games();
        app.take_pending();
        let (tx, rx) = std::sync::mpsc::channel();
        app.load_rx = Some(rx);
        app.poll_load();
        assert!(app.is_loading());
        tx.send(LoadResult::Games(Ok(vec![game(3, "Eta", "Theta")]))).unwrap();
        app.poll_load();
        assert!(!app.is_loading());
        assert!(app.load_rx.is_none());
        assert_eq!(app.games.len(), 1);
    }

    #[test]
    fn dropped_games_task_allows_retry() {
        let mut app = loaded_app();
        app.request_games();
        app.take_pending();
        let (tx, rx) = std::sync::mpsc::channel::<LoadResult>();
        drop(tx);
        app.load_rx = Some(rx);
        app.poll_load();
        assert!(!app.is_loading());
        assert!(app.load_rx.is_none());
        assert_eq!(app.error.as_deref(), Some(GAMES_ERROR));
        app.request_games();
        assert_eq!(app.pending, Some(Request::Games));
    }

    #[test]
    fn dropped_game_task_reports_game_error() {
        let mut app = loaded_app();
        app.request_highlighted_game();
        app.take_pending();
        let (tx, rx) = std::sync::mpsc::channel::<LoadResult>();
        drop(tx);
        app.load_rx = Some(rx);
        app.poll_load();
        assert!(!app.is_loading());
        assert_eq!(app.error.as_deref(), Some(GAME_ERROR));
        app.request_highlighted_game();
        assert_eq!(app.pending, Some(Request::Game(1)));
    }

    #[test]
    fn sidebar_bounds() {
        let mut app = loaded_app();
        app.sidebar_up();
        assert_eq!(app.sidebar_selected, 0);
        app.sidebar_down();
        app.sidebar_down();
        assert_eq!(app.sidebar_selected, 1);
    }

    #[test]
    fn chart_scroll_bounded_by_bins() {
        let mut app = loaded_app();
        app.selected_game_id = Some(1);
        app.apply(LoadResult::Game(1, Ok(bundle(1))));
        for _ in 0..10 {
            app.scroll_chart_right();
        }
        assert_eq!(app.chart_scroll, 2);
        app.scroll_chart_left();
        assert_eq!(app.chart_scroll, 1);
    }
}
