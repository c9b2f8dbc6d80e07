use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zcalc::config::Config;
use zcalc::session::{Session, Step};

/// A pocket-calculator style running-total evaluator.
///
/// With KEYS, presses them in order and prints the final display. Without,
/// reads key sequences from stdin, one line at a time.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the display after every key instead of only the last one.
    #[arg(short, long)]
    trace: bool,

    /// Print the engine state as JSON after each line.
    #[arg(short, long)]
    json: bool,

    /// Copy the final display to the clipboard.
    #[arg(short, long)]
    copy: bool,

    /// Configuration file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keys to press, e.g. `12+3=` or `4 + 2 Enter`.
    keys: Vec<String>,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_steps(out: &mut impl Write, session: &Session, steps: &[Step], args: &Args) -> Result<()> {
    if args.trace {
        for step in steps {
            writeln!(out, "{:>12}  {}", step.key, step.display)?;
        }
    }

    if args.json {
        let json = serde_json::to_string(&session.snapshot())?;
        writeln!(out, "{}", json)?;
    } else if !args.trace {
        writeln!(out, "{}", session.display())?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    init_logging(&config.log_filter);
    debug!(?config, "configuration loaded");

    let keymap = config.keymap().context("Invalid key binding in configuration")?;
    let mut session = Session::new(keymap, config.copy_on_equals);
    let mut stdout = io::stdout().lock();

    if !args.keys.is_empty() {
        let line = args.keys.join(" ");
        if let Some(steps) = session.run_line(&line) {
            print_steps(&mut stdout, &session, &steps, &args)?;
        }
    } else {
        let interactive = io::stdin().is_terminal();

        loop {
            if interactive {
                write!(stdout, "> ")?;
                stdout.flush()?;
            }

            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line)? == 0 {
                break;
            }

            match session.run_line(&line) {
                Some(steps) => print_steps(&mut stdout, &session, &steps, &args)?,
                None => break,
            }
        }
    }

    if args.copy {
        session.copy();
    }

    Ok(())
}
