//! Foreground timer loop.
//!
//! Ticks the session on a fixed interval and reads single-letter commands
//! from stdin. The status line is redrawn in place.

use std::io::Write;

use clap::Args;
use focusgrid_core::{Config, Event, ModeSet, Tick, TimerSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::{format_clock, open_log};
use crate::sink::TerminalSink;

#[derive(Args)]
pub struct RunArgs {
    /// Mode to run (see `modes`; default from config)
    #[arg(long)]
    mode: Option<String>,
    /// Wait for a keypress between phases
    #[arg(long)]
    no_auto_advance: bool,
    /// Do not ring the terminal bell
    #[arg(long)]
    no_sound: bool,
    /// Exit after this many completed focus sessions
    #[arg(long)]
    cycles: Option<u64>,
}

/// What a line typed on stdin asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Start,
    Pause,
    Reset,
    Mode(String),
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" | "s" | "start" => Input::Start,
        "p" | "pause" => Input::Pause,
        "r" | "reset" => Input::Reset,
        "q" | "quit" => Input::Quit,
        _ => match line.split_once(' ') {
            Some(("m" | "mode", key)) => Input::Mode(key.trim().to_string()),
            _ => Input::Unknown(line.to_string()),
        },
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let modes = config.modes()?;
    let mode = match &args.mode {
        Some(key) => modes.get(key)?.clone(),
        None => config.selected_mode()?,
    };

    let mut policy = config.auto_advance_policy();
    if args.no_auto_advance {
        policy.enabled = false;
    }
    let sink = TerminalSink::new(
        config.sound_enabled && !args.no_sound,
        config.notifications_enabled,
    );

    let session = TimerSession::new(mode, open_log(&config)?)
        .with_sink(sink)
        .with_auto_advance(policy);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(session, &modes, &config, args.cycles))
}

async fn drive(
    mut session: TimerSession,
    modes: &ModeSet,
    config: &Config,
    cycles: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!(
        "{}: [enter] start  [p] pause  [r] reset  [m KEY] mode  [q] quit",
        session.clock().mode().name()
    );
    session.start();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match session.tick() {
                    Tick::Completed { recorded, .. } => {
                        if let Some(day) = recorded {
                            tracing::debug!(date = %day.date, sessions = day.focus_sessions, "focus session logged");
                        }
                        if cycles.is_some_and(|n| session.completed_focus_sessions() >= n) {
                            break;
                        }
                    }
                    Tick::Restarted(event) => tracing::debug!(?event, "next phase started"),
                    Tick::Idle | Tick::Remaining(_) => {}
                }
                draw_status(&session);
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if !handle_input(&mut session, modes, parse_input(&line)) {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("stdin closed; running without input");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut ctrl_c => {
                tracing::debug!("interrupted");
                break;
            }
        }
    }

    let stats = session.log().summary(session.today());
    println!(
        "\nToday: {} focus sessions, {} minutes",
        stats.today_sessions, stats.today_minutes
    );
    Ok(())
}

/// Apply one input line. Returns `false` when the loop should stop.
fn handle_input(session: &mut TimerSession, modes: &ModeSet, input: Input) -> bool {
    let event = match input {
        Input::Start => session.start(),
        Input::Pause => session.pause(),
        Input::Reset => session.reset(),
        Input::Mode(key) => match modes.get(&key) {
            Ok(mode) => session.change_mode(mode.clone()),
            Err(e) => {
                eprintln!("\n{e}");
                None
            }
        },
        Input::Quit => return false,
        Input::Unknown(line) => {
            eprintln!("\nunknown command: {line}");
            None
        }
    };
    if let Some(event) = event {
        log_event(&event);
    }
    draw_status(session);
    true
}

fn log_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::debug!(event = %json, "timer event"),
        Err(e) => tracing::warn!(error = %e, "event not serializable"),
    }
}

fn draw_status(session: &TimerSession) {
    let state = if session.is_running() {
        ""
    } else if session.restart_pending() {
        " (next phase starting)"
    } else {
        " (paused)"
    };
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        "\r{} {}{state}\x1b[K",
        session.phase(),
        format_clock(session.remaining_secs())
    );
    let _ = out.flush();
}
