//! Robot-vs-robot skirmish on a built-in map.
//!
//! A single robot drives whichever team is current, so both sides play with
//! the same engine. Set `RUST_LOG=runtime=debug` to follow every decision.
mod export;
mod scenario;

use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use game_core::{BattleManager, GameManager, Phase, TeamId};
use runtime::{MetricsSnapshot, Robot, RobotConfig, SharedManager};
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const MAX_FAILED_STEPS: u64 = 16;

/// Skirmish settings read from the environment.
#[derive(Debug, Clone)]
struct SkirmishConfig {
    /// Rounds played before the skirmish is called a draw.
    max_turns: u32,
    /// Where to write the final board and metrics as JSON, if anywhere.
    export_path: Option<PathBuf>,
}

impl SkirmishConfig {
    const DEFAULT_MAX_TURNS: u32 = 30;

    fn from_env() -> Self {
        Self {
            max_turns: read_env("SKIRMISH_MAX_TURNS").unwrap_or(Self::DEFAULT_MAX_TURNS),
            export_path: env::var_os("SKIRMISH_EXPORT").map(PathBuf::from),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let config = SkirmishConfig::from_env();
    let manager: SharedManager<BattleManager> = Arc::new(Mutex::new(scenario::skirmish()?));
    let robot = Robot::spawn(Arc::clone(&manager), RobotConfig::from_env());
    let handle = robot.handle();
    info!(max_turns = config.max_turns, "skirmish started");

    let mut active: Option<TeamId> = None;
    loop {
        if handle.is_calculating() {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }
        let failed = handle.metrics().steps_failed;
        if failed > MAX_FAILED_STEPS {
            bail!("robot failed {failed} steps; giving up");
        }

        let (phase, team, turn) = {
            let game = manager
                .lock()
                .map_err(|_| anyhow!("game manager lock poisoned"))?;
            (game.phase(), game.current_team(), game.turn())
        };
        if phase == Phase::GameOver || turn > config.max_turns {
            break;
        }

        if active != Some(team) {
            handle.initialize_for_turn().await?;
            info!(%team, turn, "robot takes over");
            active = Some(team);
        }
        handle.request_step().await?;
    }

    let metrics = handle.metrics();
    report(&manager, &config, metrics)?;
    info!(
        steps = metrics.steps_completed,
        failed = metrics.steps_failed,
        actions = metrics.actions_submitted,
        recruited = metrics.units_recruited,
        turns = metrics.turns_ended,
        "robot metrics"
    );

    robot.shutdown().await?;
    Ok(())
}

fn report(
    manager: &SharedManager<BattleManager>,
    config: &SkirmishConfig,
    metrics: MetricsSnapshot,
) -> Result<()> {
    let game = manager
        .lock()
        .map_err(|_| anyhow!("game manager lock poisoned"))?;
    match game.winner() {
        Some(alliance) => info!(alliance, turn = game.turn(), "skirmish won"),
        None => info!(turn = game.turn(), "skirmish drawn"),
    }
    for player in game.players() {
        let units = game.board().units_of(player.team).count();
        info!(team = %player.team, gold = player.gold, units, "final standing");
    }
    if let Some(path) = &config.export_path {
        export::write_summary(path, &game, metrics)?;
        info!(path = %path.display(), "match summary exported");
    }
    Ok(())
}

/// Setup logging to stderr, filtered by `RUST_LOG`.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
