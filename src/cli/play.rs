//! Play command implementation - interactive terminal battle.

use super::{CliError, load_lineup, resolve_seed};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gemclash::battle::Troop;
use gemclash::{
    Battle, BattleEvent, Coord, GemType, LogEntry, LogKind, Move, Pacing, Phase, Session, Side,
    Step,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::VecDeque;
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the team file is unusable or the terminal fails.
pub(crate) fn execute(
    teams: Option<PathBuf>,
    seed: Option<u64>,
    hints: bool,
) -> Result<(), CliError> {
    let lineup = load_lineup(teams)?;
    let mut session = Session::new(lineup.config, resolve_seed(seed));
    session.start(&lineup.player, &lineup.enemy)?;

    run_tui(App::new(session, Pacing::default(), hints))
}

/// App state for the TUI.
struct App {
    session: Session,
    pacing: Pacing,
    hints: bool,
    cursor: Coord,
    log: VecDeque<LogEntry>,
    status: String,
    next_step_at: Option<Instant>,
    last_input: Instant,
    hint: Option<Move>,
    popping: Vec<Coord>,
    result: Option<bool>,
}

impl App {
    fn new(session: Session, pacing: Pacing, hints: bool) -> Self {
        let mut app = Self {
            session,
            pacing,
            hints,
            cursor: Coord::new(0, 0),
            log: VecDeque::new(),
            status: String::new(),
            next_step_at: None,
            last_input: Instant::now(),
            hint: None,
            popping: Vec::new(),
            result: None,
        };
        app.pull_log();
        app
    }

    fn battle(&self) -> Option<&Battle> {
        self.session.battle()
    }

    /// Move entries from the engine into the scrollback, keeping the newest.
    fn pull_log(&mut self) {
        let Some(battle) = self.session.battle_mut() else {
            return;
        };
        let retention = battle.config().log_retention;
        self.log.extend(battle.drain_log());
        while self.log.len() > retention {
            self.log.pop_front();
        }
    }

    fn touched(&mut self) {
        self.last_input = Instant::now();
        self.hint = None;
        self.status.clear();
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let size = self.battle().map_or(0, |b| b.board().size());
        let clamp = |v: usize, d: isize| v.saturating_add_signed(d).min(size.saturating_sub(1));
        self.cursor = Coord::new(clamp(self.cursor.row, dr), clamp(self.cursor.col, dc));
    }

    fn swap_toward(&mut self, dr: isize, dc: isize) {
        self.touched();
        let (Some(row), Some(col)) = (
            self.cursor.row.checked_add_signed(dr),
            self.cursor.col.checked_add_signed(dc),
        ) else {
            "That gem has no neighbor there".clone_into(&mut self.status);
            return;
        };
        let target = Coord::new(row, col);
        let Some(battle) = self.session.battle_mut() else {
            return;
        };
        match battle.attempt_swap(self.cursor, target) {
            Ok(_) => {
                self.cursor = target;
                self.schedule(self.pacing.swap_ms);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn cast(&mut self, index: usize) {
        self.touched();
        let Some(battle) = self.session.battle_mut() else {
            return;
        };
        match battle.cast(index) {
            Ok(events) => {
                if events
                    .iter()
                    .any(|e| matches!(e, BattleEvent::BattleOver { .. }))
                {
                    self.schedule(self.pacing.end_ms);
                }
            }
            Err(e) => self.status = e.to_string(),
        }
        self.pull_log();
    }

    fn show_hint(&mut self) {
        self.touched();
        self.hint = self.session.battle_mut().and_then(Battle::hint);
        if self.hint.is_none() {
            "No hint right now".clone_into(&mut self.status);
        }
    }

    fn retry(&mut self) {
        if self.result.is_none() {
            return;
        }
        self.touched();
        match self.session.retry() {
            Ok(_) => {
                self.log.clear();
                self.result = None;
                self.popping.clear();
                self.next_step_at = None;
                self.cursor = Coord::new(0, 0);
                self.pull_log();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn schedule(&mut self, delay_ms: u64) {
        self.next_step_at = Some(Instant::now() + Duration::from_millis(delay_ms));
    }

    /// Advance the pipeline once its delay has passed.
    fn tick(&mut self) {
        if self.next_step_at.is_some_and(|at| Instant::now() < at) {
            return;
        }
        let step = self.session.battle_mut().and_then(Battle::step);
        match step {
            Some(step) => {
                self.absorb(&step);
                self.schedule(step.pause(&self.pacing));
            }
            None => self.next_step_at = None,
        }
        self.pull_log();
        self.maybe_hint();
    }

    fn absorb(&mut self, step: &Step) {
        for event in &step.events {
            match event {
                BattleEvent::MatchPopped { cells, .. } => self.popping.clone_from(cells),
                BattleEvent::CellsCleared { .. } | BattleEvent::Reshuffled { .. } => {
                    self.popping.clear();
                }
                // Idle time for hints counts from the start of the player's turn
                BattleEvent::TurnPassed { to: Side::Player } | BattleEvent::ExtraTurn => {
                    self.last_input = Instant::now();
                    self.hint = None;
                }
                BattleEvent::BattleEnded { player_won } => self.result = Some(*player_won),
                _ => {}
            }
        }
    }

    fn maybe_hint(&mut self) {
        if !self.hints
            || self.hint.is_some()
            || self.last_input.elapsed() < Duration::from_millis(self.pacing.hint_ms)
        {
            return;
        }
        self.hint = self.session.battle_mut().and_then(Battle::hint);
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        app.tick();

        // Handle input with timeout
        if event::poll(Duration::from_millis(30)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up => app.move_cursor(-1, 0),
                KeyCode::Down => app.move_cursor(1, 0),
                KeyCode::Left => app.move_cursor(0, -1),
                KeyCode::Right => app.move_cursor(0, 1),
                KeyCode::Char('w') => app.swap_toward(-1, 0),
                KeyCode::Char('s') => app.swap_toward(1, 0),
                KeyCode::Char('a') => app.swap_toward(0, -1),
                KeyCode::Char('d') => app.swap_toward(0, 1),
                KeyCode::Char(c @ '1'..='4') => {
                    if let Some(index) = "1234".find(c) {
                        app.cast(index);
                    }
                }
                KeyCode::Char('h') => app.show_hint(),
                KeyCode::Char('r') => app.retry(),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let Some(battle) = app.battle() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Board and teams
            Constraint::Length(8), // Log
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app, battle);

    let board_width = u16::try_from(battle.board().size() * 3 + 2).unwrap_or(u16::MAX);
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Min(30)])
        .split(chunks[1]);

    render_board(f, main_chunks[0], app, battle);
    render_teams(f, main_chunks[1], battle);
    render_log(f, chunks[2], app);
    render_footer(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, battle: &Battle) {
    let state = match (app.result, battle.phase()) {
        (Some(true), _) => "VICTORY",
        (Some(false), _) => "DEFEAT",
        (None, Phase::GameOver) => "BATTLE OVER",
        (None, Phase::PlayerTurn) if battle.is_idle() => "YOUR TURN",
        (None, Phase::EnemyDeciding) => "ENEMY TURN",
        (None, _) => "RESOLVING",
    };
    let mut title = format!(" Gemclash | {state} ");
    if !app.status.is_empty() {
        title.push_str(&format!("| {} ", app.status));
    }

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_board(f: &mut Frame, area: Rect, app: &App, battle: &Battle) {
    let board = battle.board();
    let hinted = |coord: Coord| app.hint.is_some_and(|mv| mv.from == coord || mv.to == coord);

    let lines: Vec<Line> = (0..board.size())
        .map(|row| {
            let spans: Vec<Span> = (0..board.size())
                .map(|col| {
                    let coord = Coord::new(row, col);
                    let Some(kind) = board.kind_at(coord) else {
                        return Span::raw("   ");
                    };
                    let mut style = Style::default()
                        .fg(gem_color(kind))
                        .add_modifier(Modifier::BOLD);
                    if app.popping.contains(&coord) {
                        style = style.add_modifier(Modifier::SLOW_BLINK);
                    }
                    if hinted(coord) {
                        style = style.bg(Color::DarkGray);
                    }
                    if coord == app.cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(format!(" {} ", kind.symbol()), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Board "));
    f.render_widget(widget, area);
}

const fn gem_color(kind: GemType) -> Color {
    match kind {
        GemType::Red => Color::Red,
        GemType::Blue => Color::Blue,
        GemType::Green => Color::Green,
        GemType::Yellow => Color::Yellow,
        GemType::Purple => Color::Magenta,
        GemType::Brown => Color::Rgb(160, 110, 60),
        GemType::Skull => Color::White,
    }
}

fn render_teams(f: &mut Frame, area: Rect, battle: &Battle) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let player: Vec<Line> = battle
        .player()
        .iter()
        .enumerate()
        .flat_map(|(i, troop)| troop_lines(Some(i + 1), troop))
        .collect();
    let enemy: Vec<Line> = battle
        .enemy()
        .iter()
        .flat_map(|troop| troop_lines(None, troop))
        .collect();

    f.render_widget(
        Paragraph::new(player)
            .block(Block::default().borders(Borders::ALL).title(" Your team "))
            .wrap(Wrap { trim: false }),
        halves[0],
    );
    f.render_widget(
        Paragraph::new(enemy)
            .block(Block::default().borders(Borders::ALL).title(" Enemy "))
            .wrap(Wrap { trim: false }),
        halves[1],
    );
}

fn troop_lines(key: Option<usize>, troop: &Troop) -> [Line<'static>; 2] {
    let color = gem_color(troop.template.color);
    let label = key.map_or_else(String::new, |k| format!("[{k}] "));
    let name_style = if troop.is_alive() {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    };

    let mut head = vec![
        Span::raw(label),
        Span::styled(troop.name().to_string(), name_style),
    ];
    if troop.is_ready() {
        head.push(Span::styled(
            format!("  {} READY", troop.template.ability.name),
            Style::default().fg(Color::Cyan),
        ));
    }

    let stats = Line::from(format!(
        "    life {}/{}  atk {}  arm {}  mana {}/{}",
        troop.life,
        troop.max_life(),
        troop.template.attack,
        troop.armor,
        troop.mana,
        troop.mana_cost()
    ));
    [Line::from(head), stats]
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let visible = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = app
        .log
        .iter()
        .skip(app.log.len().saturating_sub(visible))
        .map(|entry| {
            let color = match entry.kind {
                LogKind::MatchResource => Color::Gray,
                LogKind::SkullDamage | LogKind::Death => Color::Red,
                LogKind::ExtraTurn => Color::Yellow,
                LogKind::System => Color::Cyan,
                LogKind::Spell => Color::Magenta,
                LogKind::EnemyMove => Color::LightRed,
            };
            Line::from(Span::styled(entry.text.clone(), Style::default().fg(color)))
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Log "));
    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.result.is_some() {
        " [q] Quit  [r] Retry "
    } else {
        " [q] Quit  [←↑↓→] Cursor  [w/a/s/d] Swap  [1-4] Cast  [h] Hint "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
