mod tui;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;
use tui::app::{App, LoadResult, Request};
use tui::events::handle_key;
use tui::ui::render;
use cricket_lens_common::Config;
use cricket_lens_core::{
    export_csv, export_json, occupied_bins, print_game_summary, print_histogram, ApiClient, ExportFormat,
};

#[derive(Parser)]
#[command(name = "cricket-lens", version, about = "Cricket simulation dashboard")]
struct Cli {
    /// API base URL (overrides $CRICKET_LENS_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// -v for info, -vv for debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard (default)
    Dashboard,
    /// List available games
    Games,
    /// Print win summary and score distribution for a game
    Show {
        game_id: i64,
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
    /// Write a game's summary and bins to JSON or CSV
    Export {
        game_id: i64,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Check backend health
    Health,
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn init_tracing(verbose: u8, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)?; }
            let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(std::sync::Mutex::new(file)).init();
        }
        None => tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init(),
    }
    Ok(())
}

fn dashboard_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cricket-lens")
        .join("cricket-lens.log")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);
    // the dashboard owns the terminal, so its logs go to a file
    let log_file = matches!(command, Commands::Dashboard).then(dashboard_log_path);
    init_tracing(cli.verbose, log_file)?;
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        Config::default()
    });
    let client = ApiClient::from_config(&config, cli.api_url.as_deref())?;
    tracing::info!(base_url = client.base_url(), "using API");
    match command {
        Commands::Dashboard => run_dashboard(client, config)?,
        Commands::Games => run_games(&client).await?,
        Commands::Show { game_id, width } => run_show(&client, game_id, width).await?,
        Commands::Export { game_id, format, output } => run_export(&client, game_id, format, output, &config).await?,
        Commands::Health => run_health(&client).await?,
        Commands::InitConfig { force } => run_init_config(force)?,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cricket-lens", &mut io::stdout());
        }
    }
    Ok(())
}

async fn run_games(client: &ApiClient) -> anyhow::Result<()> {
    let games = client.games().await?;
    if games.is_empty() {
        println!("No games found");
    }
    for g in &games {
        println!("{:>4}  {}", g.id, g.label());
    }
    Ok(())
}

async fn run_show(client: &ApiClient, game_id: i64, width: usize) -> anyhow::Result<()> {
    let bundle = client.game_bundle(game_id).await?;
    print_game_summary(&bundle.analysis);
    println!();
    print_histogram(&bundle.summary, &bundle.histogram.home_team, &bundle.histogram.away_team, width);
    println!(
        "{} of {} bins occupied, peak {:.1}%",
        occupied_bins(&bundle.summary).count(),
        bundle.summary.bins.len(),
        bundle.summary.max_percentage
    );
    Ok(())
}

async fn run_export(client: &ApiClient, game_id: i64, format: Option<String>, output: Option<String>, config: &Config) -> anyhow::Result<()> {
    let format = ExportFormat::parse(format.as_deref().unwrap_or(&config.export.format))?;
    let out_path: PathBuf = match output {
        Some(o) => PathBuf::from(o),
        None => PathBuf::from(&config.export.output_dir).join(format!("game_{game_id}.{}", format.extension())),
    };
    let bundle = client.game_bundle(game_id).await?;
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
    }
    match format {
        ExportFormat::Json => export_json(&out_path, &bundle.analysis, &bundle.summary)?,
        ExportFormat::Csv => export_csv(&out_path, &bundle.summary.bins)?,
    }
    println!("Exported to {}", out_path.display());
    Ok(())
}

fn run_init_config(force: bool) -> anyhow::Result<()> {
    let path = Config::active_path();
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let written = Config::default().save()?;
    println!("Wrote {}", written.display());
    Ok(())
}

async fn run_health(client: &ApiClient) -> anyhow::Result<()> {
    if client.health().await {
        println!("{}: OK", client.base_url());
        Ok(())
    } else {
        anyhow::bail!("{}: backend unhealthy", client.base_url())
    }
}

fn spawn_request(client: &ApiClient, req: Request) -> std::sync::mpsc::Receiver<LoadResult> {
    let (tx, rx) = std::sync::mpsc::channel();
    let client = client.clone();
    tokio::spawn(async move {
        let result = match req {
            Request::Games => LoadResult::Games(client.games().await.map_err(|e| e.to_string())),
            Request::Game(id) => LoadResult::Game(id, client.game_bundle(id).await.map(Box::new).map_err(|e| e.to_string())),
        };
        let _ = tx.send(result);
    });
    rx
}

fn run_dashboard(client: ApiClient, config: Config) -> anyhow::Result<()> {
    let mut app = App::new(client.base_url().to_owned(), config);
    app.request_games();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick = Duration::from_millis(66); // 15Hz
    let result = (|| -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| render(f, &app))?;
            if let Some(req) = app.take_pending() {
                app.load_rx = Some(spawn_request(&client, req));
            }
            app.poll_load();
            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? { handle_key(&mut app, key); }
            }
            if app.should_quit { return Ok(()); }
        }
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
