//! Headless duel trainer
//!
//! Runs episodes of a scripted hero against the learning knight and keeps the
//! knight's value table on disk between runs.
//!
//! Environment:
//! - `DUEL_CONFIG`: JSON arena config overrides
//! - `DUEL_POLICY_PATH`: value table file (default `knight_q.json`)
//! - `DUEL_EPISODES`: episodes to run (default 10)
//! - `DUEL_SEED`: overrides the config seed
//! - `DUEL_MAX_EPISODE_SECS`: simulated time limit per episode (default 120)
//! - `RUST_LOG`: log filter (default `info`)

use anyhow::{Context, Result};
use duel_agent::{JsonFileStore, KnightAgent, PolicySaver, PolicyStore, load_or_empty};
use duel_arena::{Arena, ArenaConfig, Outcome, SparringPartner};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_POLICY_PATH: &str = "knight_q.json";

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

fn load_config() -> ArenaConfig {
    let Ok(path) = std::env::var("DUEL_CONFIG") else {
        return ArenaConfig::default();
    };
    match ArenaConfig::from_json_file(&path) {
        Ok(config) => {
            info!("Loaded arena config from {}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load config {}: {}, using defaults", path, e);
            ArenaConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_config();
    config.seed = env_or("DUEL_SEED", config.seed);
    let episodes: u32 = env_or("DUEL_EPISODES", 10);
    let max_secs: f32 = env_or("DUEL_MAX_EPISODE_SECS", 120.0);
    let policy_path = std::env::var("DUEL_POLICY_PATH").unwrap_or_else(|_| DEFAULT_POLICY_PATH.into());

    info!(
        seed = config.seed,
        episodes,
        policy = %policy_path,
        "Duel trainer starting"
    );

    let store: Arc<dyn PolicyStore> = Arc::new(JsonFileStore::new(&policy_path));
    let table = load_or_empty(store.as_ref());
    let agent = KnightAgent::new(config.learning.clone(), table).with_saver(PolicySaver::spawn(store));

    let frame_ms = config.frame_ms;
    let max_ticks = (max_secs * 1000.0 / frame_ms).ceil() as u64;
    let mut partner = SparringPartner::new(config.seed.wrapping_add(1));
    let mut arena = Arena::headless(config, agent).context("invalid arena config")?;

    let (mut hero_wins, mut knight_wins, mut timeouts) = (0u32, 0u32, 0u32);
    for episode in 1..=episodes {
        let mut outcome = Outcome::Ongoing;
        while arena.tick_count() < max_ticks {
            let input = partner.next_input(&arena, frame_ms);
            outcome = arena.tick(&input, frame_ms).outcome;
            if outcome.is_over() {
                break;
            }
        }

        match outcome {
            Outcome::HeroWon => hero_wins += 1,
            Outcome::KnightWon => knight_wins += 1,
            Outcome::Ongoing => {
                timeouts += 1;
                arena.agent_mut().end_episode();
            }
        }
        let stats = arena.agent().stats();
        info!(
            episode,
            ?outcome,
            ticks = arena.tick_count(),
            knight_health = arena.knight().health,
            hero_health = arena.hero().health,
            reward = stats.episode_reward.total,
            states = stats.known_states,
            hit_rate = stats.hit_rate(),
            "Episode finished"
        );
        arena.reset();
    }

    info!(hero_wins, knight_wins, timeouts, "Training run complete");
    let table = arena.shutdown().await;
    info!(states = table.len(), path = %policy_path, "Policy flushed");
    Ok(())
}
