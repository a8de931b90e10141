use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use crate::tui::app::{App, Focus, View};
use crate::tui::theme::Theme;
use cricket_lens_core::{win_summary, GameBundle, HistogramSummary};

/// Bar values are integers; percentages are drawn in tenths.
const BAR_RESOLUTION: f64 = 10.0;
const AXIS_LABEL_WIDTH: u16 = 5;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_topbar(frame, app, chunks[0], theme);
    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(app.sidebar_width), Constraint::Min(0)])
        .split(chunks[1]);
    render_sidebar(frame, app, mid[0], theme);
    render_main(frame, app, mid[1], theme);
    render_bottombar(frame, app, chunks[2], theme);
    if app.view == View::Help { render_help(frame, area); }
}

fn render_topbar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let badge = if app.is_loading() {
        Span::styled("[LOADING]", Style::default().fg(theme.warning))
    } else if app.error.is_some() {
        Span::styled("[ERROR]", Style::default().fg(theme.error))
    } else {
        Span::styled("[READY]", Style::default().fg(theme.success))
    };
    let line = Line::from(vec![badge, Span::raw(format!(" Cricket Simulation Analysis | {}", app.api_url))]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default().borders(Borders::ALL).title("Select a Game")
        .border_style(if focused { Style::default().fg(theme.highlight) } else { Style::default() });
    if app.games.is_empty() {
        let msg = if app.is_loading() { "Loading..." } else { "No games" };
        frame.render_widget(Paragraph::new(msg).style(Style::default().fg(theme.muted)).block(block), area);
        return;
    }
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app.games.iter().map(|g| {
        let marker = if app.selected_game_id == Some(g.id) { "●" } else { " " };
        ListItem::new(Line::from(format!("{marker} {}", truncate(&g.label(), width))))
    }).collect();
    let mut state = ListState::default();
    state.select(Some(app.sidebar_selected.min(items.len().saturating_sub(1))));
    let list = List::new(items).block(block).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    if let Some(err) = &app.error {
        let lines = vec![
            Line::from(Span::styled(err.clone(), Style::default().fg(theme.error).add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("Press r to retry loading games, or Enter to retry the selected game."),
        ];
        frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Error")).wrap(Wrap { trim: false }), area);
        return;
    }
    let Some(bundle) = &app.bundle else {
        let msg = if app.is_loading() { "Loading..." } else { "Choose a game... (j/k to move, Enter to load)" };
        frame.render_widget(Paragraph::new(msg).style(Style::default().fg(theme.muted)).block(Block::default().borders(Borders::ALL).title("Game Analysis")), area);
        return;
    };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);
    render_game_info(frame, bundle, parts[0], theme);
    render_histogram(frame, app, bundle, parts[1], theme);
}

fn render_game_info(frame: &mut Frame, bundle: &GameBundle, area: Rect, theme: &Theme) {
    let a = &bundle.analysis;
    let ws = win_summary(&a.simulations);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(a.game.home_team.clone(), bold.fg(theme.home)),
            Span::raw(" (Home)  VS  "),
            Span::styled(a.game.away_team.clone(), bold.fg(theme.away)),
            Span::raw(" (Away)"),
        ]),
        Line::from(vec![Span::styled("Venue:              ", bold), Span::raw(a.game.venue_name.clone())]),
    ];
    if let Some(date) = &a.game.date {
        lines.push(Line::from(vec![Span::styled("Date:               ", bold), Span::raw(date.clone())]));
    }
    lines.push(Line::from(vec![
        Span::styled("Home Win Percentage:", bold),
        Span::styled(format!(" {}%", a.home_win_probability), Style::default().fg(theme.success)),
    ]));
    lines.push(Line::from(vec![Span::styled("Total Simulations:  ", bold), Span::raw(format!(" {}", a.total_simulations))]));
    if ws.total > 0 {
        lines.push(Line::from(format!("Outcomes:            {} home / {} away / {} tied", ws.home_wins, ws.away_wins, ws.ties)));
    }
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Game Analysis")).wrap(Wrap { trim: false }), area);
}

fn render_histogram(frame: &mut Frame, app: &App, bundle: &GameBundle, area: Rect, theme: &Theme) {
    let focused = app.focus == Focus::Main;
    let block = Block::default().borders(Borders::ALL).title("Simulation Results Distribution (% of matches)")
        .border_style(if focused { Style::default().fg(theme.highlight) } else { Style::default() });
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    let h = &bundle.histogram;
    let legend = Line::from(vec![
        Span::styled("■ ", Style::default().fg(theme.home)),
        Span::raw(format!("{} (Home)   ", h.home_team)),
        Span::styled("■ ", Style::default().fg(theme.away)),
        Span::raw(format!("{} (Away)", h.away_team)),
    ]);
    frame.render_widget(Paragraph::new(legend), rows[0]);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(AXIS_LABEL_WIDTH), Constraint::Min(0)])
        .split(rows[1]);
    // the bar chart keeps its bottom row for group labels
    let bar_rows = cols[1].height.saturating_sub(1);
    frame.render_widget(Paragraph::new(axis_lines(&bundle.summary, bar_rows)).alignment(Alignment::Right).style(Style::default().fg(theme.muted)), cols[0]);
    frame.render_widget(bar_chart(&bundle.summary, app.chart_scroll, theme), cols[1]);
}

/// Tick labels placed on the rows matching their bar heights.
fn axis_lines(summary: &HistogramSummary, bar_rows: u16) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""); bar_rows as usize];
    if bar_rows == 0 {
        return lines;
    }
    let top = f64::from(bar_rows - 1);
    for tick in &summary.axis.ticks {
        let filled = summary.axis.scale(*tick, top).round() as usize;
        let row = (bar_rows as usize - 1).saturating_sub(filled);
        lines[row] = Line::from(format!("{tick:.0}┤"));
    }
    lines
}

fn bar_chart<'a>(summary: &'a HistogramSummary, scroll: usize, theme: &Theme) -> BarChart<'a> {
    let max = (summary.axis.axis_max * BAR_RESOLUTION).round().max(1.0) as u64;
    let mut chart = BarChart::default().bar_width(4).bar_gap(0).group_gap(2).max(max);
    for b in summary.bins.iter().skip(scroll) {
        let bars = [
            bar(b.home_percentage, b.home_count, theme.home),
            bar(b.away_percentage, b.away_count, theme.away),
        ];
        chart = chart.data(BarGroup::default().label(Line::from(b.bin.label.clone())).bars(&bars));
    }
    chart
}

fn bar(pct: f64, count: u64, color: ratatui::style::Color) -> Bar<'static> {
    let text = if count > 0 { count.to_string() } else { String::new() };
    Bar::default()
        .value((pct * BAR_RESOLUTION).round() as u64)
        .text_value(text)
        .style(Style::default().fg(color))
        .value_style(Style::default().fg(color).add_modifier(Modifier::REVERSED))
}

fn render_help(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  q        Quit"),
        Line::from("  ?        Toggle help"),
        Line::from("  Tab      Cycle focus"),
        Line::from("  j/k      Move through games"),
        Line::from("  Enter    Load selected game"),
        Line::from("  Esc      Clear selection"),
        Line::from("  r        Reload games"),
        Line::from("  h/l      Scroll chart (chart focus)"),
        Line::from("  [/]      Sidebar width"),
        Line::from("  E        Export loaded game"),
    ];
    let popup = centered_rect(50, 60, area);
    frame.render_widget(ratatui::widgets::Clear, popup);
    frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help (?)")), popup);
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let bar_text = format!(" {} | q:quit ?:help Tab:focus r:reload E:export", app.status_msg);
    frame.render_widget(Paragraph::new(bar_text).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn centered_rect(px: u16, py: u16, r: Rect) -> Rect {
    let v = Layout::default().direction(Direction::Vertical).constraints([Constraint::Percentage((100-py)/2), Constraint::Percentage(py), Constraint::Percentage((100-py)/2)]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([Constraint::Percentage((100-px)/2), Constraint::Percentage(px), Constraint::Percentage((100-px)/2)]).split(v[1])[1]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_owned() } else { format!("{}\u{2026}", s.chars().take(max.saturating_sub(1)).collect::<String>()) }
}
