//! Drive a form layout from the command line.
//!
//! Reads commands from stdin, one per line, and prints the events each one
//! emits. Log output goes to stderr and is controlled by `RUST_LOG` or `-v`.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use stepform::{Config, Controller, FormLayout, Level, StepMode, form::active_ids};
use tracing_subscriber::EnvFilter;

mod repl;

use repl::Command;

/// Step through a multi-step form layout interactively.
#[derive(Parser, Debug)]
#[command(name = "stepform", version, about)]
struct Args {
    /// Form layout, TOML or JSON.
    layout: PathBuf,

    /// Navigation settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Step granularity: field, group, set or card.
    #[arg(short, long)]
    step_mode: Option<StepMode>,

    /// Start with navigation switched off.
    #[arg(long)]
    disabled: bool,

    /// Log verbosity; repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .compact()
        .init();
}

/// Settings from file, then command-line overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(mode) = args.step_mode {
        config.step_mode = mode;
    }
    if args.disabled {
        config.navigation_enabled = false;
    }
    Ok(config)
}

/// Print the position, or the active ids at one level.
fn show(out: &mut impl Write, c: &Controller, level: Option<Level>) -> Result<()> {
    match level {
        None => writeln!(out, "{}", c.position())?,
        Some(l) => writeln!(out, "{l}: {}", active_ids(c.form(), l).join(" "))?,
    }
    Ok(())
}

/// Run one command. Returns false when the driver should stop.
fn execute(out: &mut impl Write, c: &mut Controller, cmd: Command) -> Result<bool> {
    match cmd {
        Command::Next => c.next()?,
        Command::Prev => c.prev()?,
        Command::Submit => c.submit()?,
        Command::Enter(focus) => {
            let key = c.confirm_key();
            c.key(key, focus)?;
        }
        Command::Click(id) => c.click(&id)?,
        Command::Valid(id, v) => c.set_input_valid(&id, v)?,
        Command::Include(id, v) => c.set_input_included(&id, v)?,
        Command::Show(level) => show(out, c, level)?,
        Command::Quit => return Ok(false),
    }
    for event in c.drain_emitted() {
        writeln!(out, "{event}")?;
    }
    Ok(true)
}

/// Load the layout and run commands until stdin closes.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let layout = FormLayout::from_path(&args.layout)
        .with_context(|| format!("loading {}", args.layout.display()))?;
    let mut controller = Controller::from_layout(&layout, &config)?;
    tracing::info!(
        "{}: {} cards, step mode {}",
        args.layout.display(),
        controller.form().cards().len(),
        config.step_mode
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in controller.drain_emitted() {
        writeln!(out, "{event}")?;
    }
    show(&mut out, &controller, None)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match line.parse::<Command>() {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };
        match execute(&mut out, &mut controller, cmd) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn signup() -> Result<Controller> {
        let layout = FormLayout::from_toml(include_str!("../forms/signup.toml"))?;
        let config = Config::from_toml(include_str!("../forms/stepform.toml"))?;
        Ok(Controller::from_layout(&layout, &config)?)
    }

    fn run(c: &mut Controller, line: &str) -> Result<String> {
        let mut out = Vec::new();
        execute(&mut out, c, line.parse()?)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn overrides_apply_over_defaults() -> Result<()> {
        let args = Args::parse_from(["stepform", "form.toml", "--step-mode", "by_field", "--disabled"]);
        let config = load_config(&args)?;
        assert_eq!(config.step_mode, StepMode::Field);
        assert!(!config.navigation_enabled);
        Ok(())
    }

    #[test]
    fn drives_the_sample_form() -> Result<()> {
        let mut c = signup()?;
        c.drain_emitted();
        assert_eq!(run(&mut c, "show groups")?, "group: name login\n");
        assert_eq!(run(&mut c, "next")?, "navigation-changed group\n");
        assert_eq!(run(&mut c, "next")?, "navigation-denied invalid\n");
        run(&mut c, "valid email-input yes")?;
        let out = run(&mut c, "enter input")?;
        assert!(out.starts_with("navigation-changed group\n"));
        assert!(out.contains("attach profile-next"));
        assert_eq!(run(&mut c, "show")?, "card=1 set=1 group=2 field=3 input=3\n");
        Ok(())
    }
}
