use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread;

use clap::Parser;
use hanoi_runtime::{Clock, Controller, HanoiConfig, Settings, SystemClock, VirtualClock};

use crate::error::{AppError, Result};
use crate::logging;
use crate::terminal::TerminalSurface;

#[derive(Debug, Default, Parser)]
#[command(
    name = "hanoi",
    about = "Animate the optimal multi-peg Tower of Hanoi solution",
    version
)]
pub struct Cli {
    /// Number of pegs; overrides the config file.
    #[arg(long)]
    pub pegs: Option<u32>,

    /// Number of discs; overrides the config file.
    #[arg(long)]
    pub discs: Option<u32>,

    /// Duration of one move in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub seconds_per_move: Option<f64>,

    /// TOML or JSON settings file (chosen by extension).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Replay on a virtual clock and print only the final board.
    #[arg(long)]
    pub headless: bool,

    /// Largest three-peg board replayed in full; 0 disables the limit.
    #[arg(long, value_name = "DISCS")]
    pub three_peg_limit: Option<u32>,

    /// Read further `PEGS DISCS SECONDS` lines from stdin.
    #[arg(long)]
    pub stdin: bool,
}

impl Cli {
    /// Settings file (or defaults) with flags applied on top, validated.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        if let Some(pegs) = self.pegs {
            settings.board.pegs = pegs;
        }
        if let Some(discs) = self.discs {
            settings.board.discs = discs;
        }
        if let Some(seconds) = self.seconds_per_move {
            settings.board.seconds_per_move = seconds;
        }
        if let Some(limit) = self.three_peg_limit {
            settings.animator.three_peg_disc_limit = limit;
        }
        Ok(settings.validated()?)
    }
}

pub fn run_from_env() -> Result<()> {
    logging::init()?;
    let cli = Cli::parse();
    run(cli, &mut io::stdout())
}

/// Replay the configured board; the closing summary goes to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let settings = cli.settings()?;
    let live = !cli.headless;
    let clock: Arc<dyn Clock> = if live {
        Arc::new(SystemClock)
    } else {
        Arc::new(VirtualClock::new())
    };
    tracing::info!(
        pegs = settings.board.pegs,
        discs = settings.board.discs,
        seconds_per_move = settings.board.seconds_per_move,
        headless = cli.headless,
        "starting"
    );

    let mut controller = Controller::new(&settings.animator, clock, move || {
        let writer: Box<dyn Write + Send> = if live {
            Box::new(io::stdout())
        } else {
            Box::new(io::sink())
        };
        TerminalSurface::new(writer, live)
    });

    let (tx, rx) = mpsc::channel();
    let reader = if cli.stdin {
        Some(spawn_stdin_reader(tx)?)
    } else {
        drop(tx);
        None
    };

    let report = controller.run_loop(Some(settings.board), &rx)?;
    if let Some(reader) = reader
        && reader.join().is_err()
    {
        tracing::warn!("stdin reader panicked");
    }

    match report {
        Some(report) => {
            if !live {
                out.write_all(report.surface.frame().as_bytes())?;
            }
            if let Some(reason) = report.cancelled {
                writeln!(out, "stopped: {reason}")?;
            }
        }
        None => writeln!(out, "no run scheduled")?,
    }
    out.flush()?;
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<HanoiConfig>) -> Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("hanoi-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_board_line(&line) {
                    Ok(config) => {
                        if tx.send(config).is_err() {
                            break;
                        }
                    }
                    Err(error) => tracing::warn!(%error, "ignoring input line"),
                }
            }
        })?;
    Ok(handle)
}

/// Parse `PEGS DISCS SECONDS`.
pub fn parse_board_line(line: &str) -> Result<HanoiConfig> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [pegs, discs, seconds] = fields[..] else {
        return Err(AppError::invalid(format!(
            "expected `PEGS DISCS SECONDS`, got {line:?}"
        )));
    };
    let pegs = pegs
        .parse()
        .map_err(|_| AppError::invalid(format!("pegs must be a whole number, got {pegs:?}")))?;
    let discs = discs
        .parse()
        .map_err(|_| AppError::invalid(format!("discs must be a whole number, got {discs:?}")))?;
    let seconds = seconds
        .parse()
        .map_err(|_| AppError::invalid(format!("seconds must be a number, got {seconds:?}")))?;
    Ok(HanoiConfig::new(pegs, discs, seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless(args: &[&str]) -> Cli {
        Cli::parse_from(["hanoi", "--headless"].iter().chain(args))
    }

    #[test]
    fn flags_override_defaults() {
        let cli = headless(&["--pegs", "5", "--discs", "7", "--three-peg-limit", "0"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.board.pegs, 5);
        assert_eq!(settings.board.discs, 7);
        assert_eq!(settings.animator.disc_limit(), None);
    }

    #[test]
    fn invalid_flags_fail_validation() {
        let err = headless(&["--discs", "0"]).settings().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn headless_run_prints_the_solved_board() {
        let mut out = Vec::new();
        run(headless(&["--pegs", "4", "--discs", "4"]), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("9 of 9\n"), "{out}");
        let top_row = out.lines().nth(1).unwrap();
        assert!(top_row.trim_end().ends_with("=1="));
    }

    #[test]
    fn unsolvable_board_schedules_nothing() {
        let mut out = Vec::new();
        run(headless(&["--pegs", "2", "--discs", "3"]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "no run scheduled\n");
    }

    #[test]
    fn single_peg_is_fatal() {
        let err = run(headless(&["--pegs", "1"]), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("destination peg"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn board_lines_parse() {
        assert_eq!(
            parse_board_line(" 4  6 0.5 ").unwrap(),
            HanoiConfig::new(4, 6, 0.5)
        );
        assert!(parse_board_line("4 6").is_err());
        assert!(parse_board_line("four 6 1").is_err());
        assert!(parse_board_line("4 6 fast").is_err());
    }
}
