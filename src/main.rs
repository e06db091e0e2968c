//! ASCII Arcade entry point
//!
//! Parses the command line, sets up logging and runs either the terminal game
//! loop or one of the leaderboard maintenance commands.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use ascii_arcade::highscores::{MAX_NAME_LEN, now_ms};
use ascii_arcade::persistence::{ScoreStore, export_document, import_document};
use ascii_arcade::platform::{ActiveRegistry, Command, Scheduler, map_key};
use ascii_arcade::renderer::{MENU_HINT, TerminalSink, compose_frame};
use ascii_arcade::sim::{Controller, GameKind, Mode, TerminationEvent};
use ascii_arcade::{Leaderboards, Settings, Tier};

/// Longest wait for a key before re-checking the schedule
const FRAME_WAIT: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "ascii-arcade", version, about = "Four text-grid arcade games for the terminal")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = ascii_arcade::settings::DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Leaderboard file (overrides the settings file)
    #[arg(long, global = true)]
    scores: Option<PathBuf>,
    /// Write logs to this file (the terminal is busy while playing)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play a game
    Play {
        #[arg(value_parser = parse_game)]
        game: GameKind,
        #[arg(long, value_parser = parse_tier)]
        tier: Option<Tier>,
        /// Practice mode: scores are never recorded
        #[arg(long)]
        practice: bool,
        /// Replay a recorded seed
        #[arg(long)]
        seed: Option<u32>,
    },
    /// Print a game's leaderboard
    Scores {
        #[arg(value_parser = parse_game)]
        game: GameKind,
    },
    /// Clear a game's leaderboard
    Reset {
        #[arg(value_parser = parse_game)]
        game: GameKind,
    },
    /// Write every leaderboard to a JSON file
    Export { file: PathBuf },
    /// Load leaderboards from a JSON file written by `export`
    Import { file: PathBuf },
}

fn parse_game(s: &str) -> Result<GameKind, String> {
    GameKind::from_str(s).ok_or_else(|| format!("unknown game '{s}' (flappy, snake, tetris, road)"))
}

fn parse_tier(s: &str) -> Result<Tier, String> {
    Tier::from_str(s).ok_or_else(|| format!("unknown tier '{s}' (easy, normal, hard, insane)"))
}

fn init_logging(log_file: Option<&Path>, playing: bool) -> Result<()> {
    // stderr would scribble over the game screen
    let default_level = match (log_file, playing) {
        (Some(_), _) => "info",
        (None, true) => "off",
        (None, false) => "warn",
    };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), matches!(cli.command, Cmd::Play { .. }))?;
    log::info!("ASCII Arcade starting...");

    let settings = Settings::load(&cli.config)?;
    let scores_path = cli.scores.unwrap_or(settings.general.scores_path.clone());
    let store = ScoreStore::new(scores_path);

    match cli.command {
        Cmd::Play {
            game,
            tier,
            practice,
            seed,
        } => {
            let tier = tier.unwrap_or(settings.general.tier);
            let mode = if practice { Mode::Practice } else { settings.general.mode };
            play(game, tier, mode, seed, &store)
        }
        Cmd::Scores { game } => {
            let boards = store.load();
            println!("{} leaderboard", game.title());
            match boards.board(game) {
                Some(board) => board.table().iter().for_each(|row| println!("{row}")),
                None => println!("—"),
            }
            Ok(())
        }
        Cmd::Reset { game } => {
            let mut boards = store.load();
            boards.reset(game);
            store.save(&boards)?;
            println!("{} leaderboard cleared", game.title());
            Ok(())
        }
        Cmd::Export { file } => {
            let document = export_document(&store.load())?;
            fs::write(&file, document).with_context(|| format!("cannot write {}", file.display()))?;
            println!("Leaderboards exported to {}", file.display());
            Ok(())
        }
        Cmd::Import { file } => {
            let json = fs::read_to_string(&file).with_context(|| format!("cannot read {}", file.display()))?;
            let mut boards = store.load();
            let games = import_document(&mut boards, &json)?;
            store.save(&boards)?;
            let names: Vec<&str> = games.iter().map(GameKind::as_str).collect();
            println!("Imported leaderboards: {}", names.join(", "));
            Ok(())
        }
    }
}

/// Everything the game loop carries between frames
struct Arcade<'a> {
    controller: Controller,
    registry: Rc<ActiveRegistry>,
    scheduler: Scheduler,
    sink: TerminalSink,
    store: &'a ScoreStore,
    boards: Leaderboards,
    seed: Option<u32>,
    footer: String,
}

fn play(game: GameKind, tier: Tier, mode: Mode, seed: Option<u32>, store: &ScoreStore) -> Result<()> {
    let registry = Rc::new(ActiveRegistry::new());
    let controller = Controller::new(game.engine(), tier, mode).with_registry(registry.clone());
    let scheduler = Scheduler::new(controller.tick_interval_ms(), Instant::now());

    let mut arcade = Arcade {
        controller,
        registry,
        scheduler,
        sink: TerminalSink::new(),
        store,
        boards: store.load(),
        seed,
        footer: MENU_HINT.to_string(),
    };

    arcade.sink.init().context("terminal init failed")?;
    let result = arcade.run();
    arcade.sink.cleanup().context("terminal cleanup failed")?;
    result?;

    if let Some(event) = arcade.controller.last_termination() {
        println!("{}", event.summary().join("\n"));
    }
    Ok(())
}

impl Arcade<'_> {
    fn run(&mut self) -> io::Result<()> {
        loop {
            let wait = self
                .scheduler
                .next_deadline()
                .saturating_duration_since(Instant::now())
                .min(FRAME_WAIT);

            if event::poll(wait)? {
                if let Event::Key(key) = event::read()? {
                    match map_key(&key, self.registry.any_active()) {
                        Some(Command::Quit) => {
                            if let Some(event) = self.controller.stop() {
                                self.finish(&event)?;
                            }
                            return Ok(());
                        }
                        Some(Command::Game(input)) => {
                            if let Some(event) = self.controller.input(input).termination {
                                self.finish(&event)?;
                            }
                        }
                        Some(Command::Start) => self.start(),
                        Some(Command::NextTier) => {
                            let tier = next_tier(self.controller.tier());
                            self.controller.select_tier(tier);
                        }
                        Some(Command::ToggleMode) => {
                            let mode = match self.controller.mode() {
                                Mode::Marathon => Mode::Practice,
                                Mode::Practice => Mode::Marathon,
                            };
                            self.controller.select_mode(mode);
                        }
                        None => {}
                    }
                }
            }

            let due = self.scheduler.poll(Instant::now());
            for _ in 0..due.ticks {
                if let Some(event) = self.controller.advance_tick() {
                    self.finish(&event)?;
                    break;
                }
            }
            for _ in 0..due.clocks {
                self.controller.advance_clock();
            }

            let footer = if self.controller.is_active() {
                None
            } else {
                Some(self.footer.as_str())
            };
            self.sink.draw(&compose_frame(&self.controller, footer))?;
        }
    }

    fn start(&mut self) {
        let started = match self.seed {
            Some(seed) => self.controller.start_with_seed(seed),
            None => self.controller.start(),
        };
        if started {
            self.scheduler
                .reset(self.controller.tick_interval_ms(), Instant::now());
            self.footer = MENU_HINT.to_string();
        }
    }

    /// Leaderboard follow-up for a finished run. Store failures are logged only.
    fn finish(&mut self, event: &TerminationEvent) -> io::Result<()> {
        let Some(rank) = self.boards.potential_rank(event) else {
            return Ok(());
        };

        let name = self.prompt_name(rank)?;
        if let Some(rank) = self.boards.record(event, name.as_deref(), now_ms()) {
            self.footer = format!("High score #{rank}! · {MENU_HINT}");
            if let Err(e) = self.store.save(&self.boards) {
                log::warn!("Failed to save leaderboard: {e}");
            }
        }
        Ok(())
    }

    /// Read a name on the footer line. Esc cancels.
    fn prompt_name(&mut self, rank: usize) -> io::Result<Option<String>> {
        let mut name = String::new();
        loop {
            let footer = format!("New high score #{rank}! Name: {name}_   (Enter save · Esc skip)");
            self.sink
                .draw(&compose_frame(&self.controller, Some(&footer)))?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(None);
            }
            match key.code {
                KeyCode::Enter => return Ok(Some(name)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    name.pop();
                }
                KeyCode::Char(c) if name.chars().count() < MAX_NAME_LEN => name.push(c),
                _ => {}
            }
        }
    }
}

fn next_tier(tier: Tier) -> Tier {
    let index = Tier::ALL.iter().position(|t| *t == tier).unwrap_or(0);
    Tier::ALL[(index + 1) % Tier::ALL.len()]
}
