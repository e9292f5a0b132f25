//! Terminal match-3 runner (default binary).
//!
//! Crossterm for input, the framebuffer renderer for output. Logs go to a file
//! because the terminal is in raw mode for the whole session.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tui_match3::core::{Board, BoardSnapshot};
use tui_match3::event_log::JsonLinesLog;
use tui_match3::input::{handle_key_event, should_quit, Cursor};
use tui_match3::term::{FrameBuffer, GameView, TerminalRenderer, TilePresenter, ViewState, Viewport};
use tui_match3::types::{
    BoardAction, BoardConfig, SelectOutcome, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_VARIATIONS,
};

const FRAME_MS: u64 = 16;

#[derive(Debug, Parser)]
#[command(name = "tui-match3", version, about = "Swap adjacent tiles to line up three or more")]
struct Args {
    /// Board height in tiles
    #[arg(long, env = "MATCH3_ROWS", default_value_t = DEFAULT_ROWS, value_name = "N")]
    rows: usize,

    /// Board width in tiles
    #[arg(long, env = "MATCH3_COLS", default_value_t = DEFAULT_COLS, value_name = "N")]
    cols: usize,

    /// Number of distinct tile types (3..=9)
    #[arg(long, env = "MATCH3_VARIATIONS", default_value_t = DEFAULT_VARIATIONS, value_name = "N")]
    variations: u8,

    /// Seed for the tile generator; random when omitted
    #[arg(long, env = "MATCH3_SEED")]
    seed: Option<u32>,

    /// Dump both matrices to the log after setup and every cascade
    #[arg(long, env = "MATCH3_DEBUG")]
    debug: bool,

    /// Log file path (defaults to the system temp directory)
    #[arg(long, env = "MATCH3_LOG", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Write every board event to FILE as JSON lines
    #[arg(long, env = "MATCH3_EVENT_LOG", value_name = "FILE")]
    event_log: Option<PathBuf>,

    /// Apply board changes instantly instead of animating them
    #[arg(long)]
    no_animation: bool,
}

impl Args {
    fn board_config(&self) -> BoardConfig {
        BoardConfig::new(self.rows, self.cols, self.variations).with_debug(self.debug)
    }
}

fn init_logging(path: Option<&Path>, debug: bool) -> Result<(WorkerGuard, PathBuf)> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("tui-match3.log"));
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file = path
        .file_name()
        .context("log file path has no file name")?
        .to_owned();

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
    Ok((guard, path))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.board_config();
    config.validate()?;

    let (_guard, log_path) = init_logging(args.log_file.as_deref(), args.debug)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, log = %log_path.display(), "tui-match3 starting");

    let board = Board::new(config, seed)?;
    let events = args
        .event_log
        .as_deref()
        .map(|p| JsonLinesLog::create(p).with_context(|| format!("creating {}", p.display())))
        .transpose()?;

    let mut session = Session::new(board, events, !args.no_animation);

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = session.run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        warn!(error = %err, "session ended with error");
    }
    result
}

struct Session {
    board: Board,
    presenter: TilePresenter,
    cursor: Cursor,
    events: Option<JsonLinesLog<BufWriter<File>>>,
}

impl Session {
    fn new(board: Board, events: Option<JsonLinesLog<BufWriter<File>>>, animate: bool) -> Self {
        let mut presenter = TilePresenter::from_snapshot(&board.snapshot());
        if !animate {
            presenter = presenter.without_animation();
        }
        let cursor = Cursor::new(board.rows(), board.cols());
        Self {
            board,
            presenter,
            cursor,
            events,
        }
    }

    fn run(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        let view = GameView::default();
        let mut fb = FrameBuffer::new(0, 0);
        let mut snap = BoardSnapshot::default();
        let frame = Duration::from_millis(FRAME_MS);
        let mut last_tick = Instant::now();

        loop {
            self.board.snapshot_into(&mut snap);
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let state = ViewState {
                presenter: &self.presenter,
                cursor: self.cursor.position(),
            };
            view.render_into(&snap, state, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;

            let timeout = frame.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = handle_key_event(key) {
                            self.apply(action)?;
                        }
                    }
                    Event::Resize(..) => term.invalidate(),
                    _ => {}
                }
            }

            let elapsed = last_tick.elapsed();
            if elapsed >= frame {
                last_tick = Instant::now();
                self.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
            }
        }
    }

    fn apply(&mut self, action: BoardAction) -> Result<()> {
        if self.cursor.apply(action) {
            return Ok(());
        }
        match action {
            BoardAction::Select => self.select()?,
            BoardAction::Deselect => self.board.deselect(),
            BoardAction::Restart => {
                self.board.restart()?;
                self.presenter.sync(&self.board.snapshot());
                info!(seed = self.board.seed(), "board restarted");
            }
            _ => {}
        }
        Ok(())
    }

    fn select(&mut self) -> Result<()> {
        let pos = self.cursor.position();
        let mut observer = (&mut self.presenter, self.events.as_mut());
        let outcome = self.board.select(pos, &mut observer)?;

        if let SelectOutcome::Swapped { outcome } = outcome {
            if !outcome.is_rejected() && self.presenter.is_animating() {
                // Keep players out until the cascade has finished playing.
                self.board.lock_input();
            }
        }
        if let Some(events) = self.events.as_mut() {
            events.flush()?;
        }
        Ok(())
    }

    fn tick(&mut self, ms: u32) {
        self.presenter.tick(ms);
        if self.board.is_input_locked() && !self.presenter.is_animating() {
            self.board.unlock_input();
        }
    }
}
