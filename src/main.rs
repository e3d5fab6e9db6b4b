//! spellduel - replay a scripted duel between two stored accounts

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spellduel::combat::RandRoller;
use spellduel::{Battle, BattleRoom, Config, MemoryStore, TurnSubmission};

/// Spell duel replay tool
#[derive(Parser, Debug)]
#[command(
    name = "spellduel",
    version,
    about = "Replay a scripted spell duel and print per-turn reports"
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON fixture with spells and accounts (overrides the config)
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Account that plays first
    #[arg(long)]
    player1: String,

    /// Account that plays second
    #[arg(long)]
    player2: String,

    /// JSON array of turns: [{"player1": {...}, "player2": {...}}, ...]
    #[arg(short, long)]
    script: PathBuf,

    /// Dice seed for a reproducible replay (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Both players' submissions for one turn
#[derive(Debug, Deserialize)]
struct ScriptTurn {
    player1: TurnSubmission,
    player2: TurnSubmission,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "spellduel=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Reports go to stdout, logs to stderr
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    if args.player1 == args.player2 {
        bail!("a player cannot duel themselves: {}", args.player1);
    }

    let mut config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    if args.fixture.is_some() {
        config.fixture = args.fixture.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let fixture = config
        .fixture
        .clone()
        .context("no fixture given; pass --fixture or set `fixture` in the config")?;
    let store = Arc::new(
        MemoryStore::from_json_file(&fixture)
            .with_context(|| format!("failed to load fixture {}", fixture.display()))?,
    );

    let script_text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let script: Vec<ScriptTurn> =
        serde_json::from_str(&script_text).context("invalid turn script")?;

    let roller = match config.seed {
        Some(seed) => RandRoller::seeded(seed),
        None => RandRoller::from_os_rng(),
    };
    let battle = Battle::from_accounts(
        &args.player1,
        &args.player2,
        store.clone(),
        store,
        roller,
    )?
    .with_rules(config.rules);
    let mut room = BattleRoom::new(battle);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let total = script.len();

    for (index, step) in script.into_iter().enumerate() {
        if room.is_over() {
            info!(skipped = total - index, "battle over, ignoring remaining turns");
            break;
        }

        room.take_turn(&args.player1, step.player1)?;
        let Some(reports) = room
            .take_turn(&args.player2, step.player2)
            .with_context(|| format!("turn {} failed", index + 1))?
        else {
            continue;
        };

        for report in &reports {
            serde_json::to_writer(&mut out, report)?;
            writeln!(out)?;
        }
    }

    info!(
        turns = room.turn(),
        phase = %room.battle().phase(),
        "replay finished"
    );

    Ok(())
}
