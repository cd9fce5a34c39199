#![deny(warnings)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use landlord_app::{GameController, TableConfig};
use landlord_bot::BotDifficulty;
use landlord_core::model::action::TurnAction;
use landlord_core::model::card::friendly;
use landlord_core::model::mode::GameMode;
use landlord_core::{AppInfo, GameEvent, GamePhase, GameSnapshot};
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Headless Dou Dizhu table: deals a hand and plays it out with the human
/// seat on autopilot.
#[derive(Debug, Parser)]
#[command(name = "landlord", author, version, about = "Dou Dizhu rule engine on autopilot")]
struct Cli {
    /// Table size: `three` or `four`.
    #[arg(long, value_name = "MODE")]
    mode: Option<GameMode>,

    /// Seed for the shuffle (overrides LANDLORD_SEED).
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Bot profile: `casual` or `thinking`.
    #[arg(long, value_name = "LEVEL")]
    difficulty: Option<BotDifficulty>,

    /// Number of hands to play.
    #[arg(long, default_value_t = 1)]
    hands: usize,

    /// Sleep through the bot thinking delay instead of skipping it.
    #[arg(long)]
    realtime: bool,

    /// Print every play as it happens.
    #[arg(long)]
    verbose: bool,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct HandReport {
    hand: usize,
    difficulty: String,
    snapshot: GameSnapshot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if cli.hands == 0 {
        bail!("--hands must be at least 1");
    }

    let mut config = TableConfig::from_env();
    if let Some(mode) = cli.mode {
        config = config.with_mode(mode);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(difficulty) = cli.difficulty {
        config = config.with_difficulty(difficulty);
    }

    let mut controller = GameController::new(config);
    if cli.verbose && !cli.json {
        controller.subscribe(print_transition);
    }

    let mut reports = Vec::with_capacity(cli.hands);
    for hand in 1..=cli.hands {
        let snapshot = play_hand(&mut controller, cli.realtime)
            .with_context(|| format!("playing hand {hand}"))?;
        if !cli.json {
            print_summary(hand, &snapshot);
        }
        reports.push(HandReport {
            hand,
            difficulty: controller.difficulty().to_string(),
            snapshot,
        });
    }

    if cli.json {
        let json = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        println!("{json}");
    }

    Ok(())
}

fn play_hand(controller: &mut GameController, realtime: bool) -> Result<GameSnapshot> {
    let mode = controller.config().mode;
    controller
        .dispatch(GameEvent::Start { mode })
        .context("starting hand")?;

    // A hand never needs more human moves than cards plus auction turns.
    let limit = mode.deck_size() * 2;
    for _ in 0..limit {
        drive_bots(controller, realtime);
        let snapshot = controller.snapshot();
        if snapshot.phase.is_settled() {
            return Ok(snapshot);
        }
        let Some(event) = controller.autopilot_event() else {
            bail!("no move available in phase {}", snapshot.phase.name());
        };
        controller
            .dispatch(event)
            .context("autopilot move rejected")?;
    }
    bail!("hand did not finish after {limit} human moves")
}

fn drive_bots(controller: &mut GameController, realtime: bool) {
    if !realtime {
        controller.run_until_human();
        return;
    }
    while controller.pending_turns() > 0 {
        let delay = controller.config().ai_delay;
        std::thread::sleep(delay.min(Duration::from_secs(5)));
        controller.tick(delay);
    }
}

fn print_transition(snapshot: &GameSnapshot) {
    let Some(cue) = snapshot.audio_cue else {
        return;
    };
    let played = snapshot
        .last_actor
        .and_then(|seat| snapshot.last_played.get(&seat).map(|action| (seat, action)));
    match played {
        Some((seat, action)) => println!("[{cue}] {seat}: {}", describe(action)),
        None => println!("[{cue}] {}", snapshot.phase.name()),
    }
}

fn describe(action: &TurnAction) -> String {
    match action {
        TurnAction::Pass => "pass".to_string(),
        TurnAction::Play { cards, pattern } => format!("{pattern} {}", friendly(cards)),
    }
}

fn print_summary(hand: usize, snapshot: &GameSnapshot) {
    let GamePhase::Settled {
        landlord,
        winner,
        multiplier,
    } = &snapshot.phase
    else {
        println!("hand {hand}: stopped in {}", snapshot.phase.name());
        return;
    };
    println!(
        "{} {} hand {hand}: landlord {landlord}, winner {winner}, multiplier x{multiplier}{}",
        AppInfo::name(),
        snapshot.mode,
        if snapshot.spring { " (spring)" } else { "" }
    );
    for player in &snapshot.players {
        println!("  {:<6} {:>+5}", player.id.label(), player.score);
    }
}
