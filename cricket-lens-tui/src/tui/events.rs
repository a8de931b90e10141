use crate::tui::app::{App, Focus, View};
use crossterm::event::{KeyCode, KeyEvent};
use cricket_lens_core::{export_csv, export_json, ExportFormat};
use std::path::Path;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // the help overlay swallows everything but close and quit
    if app.view == View::Help {
        match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('?') | KeyCode::Esc => app.view = View::Dashboard,
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        KeyCode::Char('?') => {
            app.view = View::Help;
            return;
        }
        KeyCode::Char('r') => {
            app.request_games();
            return;
        }
        KeyCode::Char('E') => {
            export_current(app);
            return;
        }
        _ => {}
    }
    match app.focus {
        Focus::Sidebar => handle_sidebar(app, key),
        Focus::Main => handle_main(app, key),
    }
}

fn handle_sidebar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('[') => {
            app.sidebar_width = app.sidebar_width.saturating_sub(1).max(20);
        }
        KeyCode::Char(']') => {
            app.sidebar_width = (app.sidebar_width + 1).min(80);
        }
        KeyCode::Char('j') | KeyCode::Down => app.sidebar_down(),
        KeyCode::Char('k') | KeyCode::Up => app.sidebar_up(),
        KeyCode::PageDown => {
            for _ in 0..10 {
                app.sidebar_down();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..10 {
                app.sidebar_up();
            }
        }
        KeyCode::Enter => app.request_highlighted_game(),
        KeyCode::Esc => app.clear_selection(),
        _ => {}
    }
}

fn handle_main(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.scroll_chart_left(),
        KeyCode::Right | KeyCode::Char('l') => app.scroll_chart_right(),
        KeyCode::Esc => app.focus = Focus::Sidebar,
        _ => {}
    }
}

fn export_current(app: &mut App) {
    let Some(bundle) = app.bundle.as_ref() else {
        app.status_msg = "no game loaded".into();
        return;
    };
    let format = match ExportFormat::parse(&app.config.export.format) {
        Ok(f) => f,
        Err(e) => {
            app.status_msg = format!("export error: {e}");
            return;
        }
    };
    let out_dir = Path::new(&app.config.export.output_dir);
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        app.status_msg = format!("export dir error: {e}");
        return;
    }
    let out_path = out_dir.join(format!("game_{}.{}", bundle.analysis.game.id, format.extension()));
    let res = match format {
        ExportFormat::Json => export_json(&out_path, &bundle.analysis, &bundle.summary),
        ExportFormat::Csv => export_csv(&out_path, &bundle.summary.bins),
    };
    app.status_msg = match res {
        Ok(()) => format!("exported to {}", out_path.display()),
        Err(e) => format!("export error: {e}"),
    };
}
