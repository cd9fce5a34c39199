mod rotation;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary};
use landlord_bot::{BotDifficulty, HeuristicPolicy, Policy, propose};
use landlord_core::engine::scoring::Side;
use landlord_core::model::mode::GameMode;
use landlord_core::model::player::PlayerId;
use landlord_core::{ActionError, GamePhase, Session};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs};

pub use rotation::SeatRotations;

/// Primary entry point for orchestrating tournaments.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    seat_rotations: SeatRotations,
    logging_enabled: bool,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub hands_played: usize,
    pub rotations: usize,
    pub rows_written: usize,
    pub standings: AnalyticsSummary,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        let seats = config.deals.mode.player_count();

        if agents.len() != seats {
            return Err(RunnerError::SeatCount {
                mode: config.deals.mode,
                expected: seats,
                found: agents.len(),
            });
        }

        let seat_rotations = SeatRotations::new(seats, config.deals.rotation_count());

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            seat_rotations,
        })
    }

    /// Plays every seed in the range under every rotation, streaming one
    /// JSONL row per seat and table.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let rotations = self.seat_rotations.as_slice();
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config);

        for (hand_index, deal_seed) in self.config.deals.seeds.iter().enumerate() {
            for (rotation_index, rotation) in rotations.iter().enumerate() {
                let outcome = self.play_hand(hand_index, rotation_index, deal_seed, rotation)?;
                analytics.record_hand(&outcome)?;
                rows_written += write_hand_rows(
                    &mut writer,
                    &self.config,
                    hand_index,
                    rotation_index,
                    deal_seed,
                    &outcome,
                )?;
            }
        }

        writer.flush()?;

        let standings = analytics.finalize();
        standings.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.telemetry_path());

        Ok(RunSummary {
            hands_played: self.config.deals.hands(),
            rotations: rotations.len(),
            rows_written,
            standings,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_hand_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    hand_index: usize,
    rotation_index: usize,
    deal_seed: u64,
    outcome: &HandOutcome,
) -> Result<usize, RunnerError> {
    let deal_id = format!("H{hand_index:05}_R{rotation_index:02}");

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = HandLogRow {
            run_id: &config.run_id,
            deal_id: &deal_id,
            mode: config.deals.mode,
            hand_index,
            rotation_index,
            deal_seed,
            seat: seat_result.seat,
            bot: &seat_result.agent_name,
            seating: &outcome.seating,
            landlord: seat_result.is_landlord,
            won: seat_result.won,
            score: seat_result.score,
            multiplier: outcome.multiplier,
            spring: outcome.spring,
            speed_ms_turn: seat_result.metrics.avg_ms_per_decision,
            decisions: seat_result.metrics.decisions,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

impl TournamentRunner {
    fn play_hand(
        &self,
        hand_index: usize,
        rotation_index: usize,
        deal_seed: u64,
        rotation: &[usize],
    ) -> Result<HandOutcome, RunnerError> {
        let mode = self.config.deals.mode;
        let mut seats = build_seat_states(mode, rotation, &self.agents)?;
        let mut rng = StdRng::seed_from_u64(deal_seed);
        let mut session = Session::start(mode, &mut rng).bidding;

        // Each play removes a card and is answered by at most one pass per
        // other seat; the auction adds at most two turns per seat.
        let step_limit = (mode.deck_size() + 2) * mode.player_count();
        for _ in 0..step_limit {
            let Some(actor) = session.phase().actor() else {
                break;
            };
            let seat = seats
                .iter_mut()
                .find(|seat| seat.seat == actor)
                .ok_or_else(|| RunnerError::game(format!("no agent seated at {actor}")))?;

            let start = Instant::now();
            let request = propose(seat.policy.as_mut(), &session, actor).ok_or_else(|| {
                RunnerError::game(format!(
                    "{actor} had nothing to propose in {}",
                    session.phase().name()
                ))
            })?;
            let elapsed_ms = seat.metrics.record(start.elapsed());

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "landlord_bench::decision",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    hand_index = hand_index as u32,
                    rotation_index = rotation_index as u32,
                    seat = actor.label(),
                    agent = %seat.agent_name,
                    request = ?request,
                    elapsed_ms
                );
            }

            let stages = session
                .apply(&request, &mut rng)
                .map_err(|source| RunnerError::Rejected {
                    seat: actor,
                    event: request.name(),
                    source,
                })?;
            session = stages
                .into_iter()
                .last()
                .ok_or_else(|| RunnerError::game(format!("{} produced no state", request.name())))?;
        }

        let GamePhase::Settled {
            landlord,
            winner,
            multiplier,
        } = *session.phase()
        else {
            return Err(RunnerError::game(format!(
                "hand {hand_index} did not settle, stopped in {}",
                session.phase().name()
            )));
        };

        let seating = seats
            .iter()
            .map(|seat| SeatSnapshot {
                seat: seat.seat,
                bot: seat.agent_name.clone(),
            })
            .collect();

        let winning_side = Side::of(winner, landlord);
        let mut seat_results = Vec::with_capacity(seats.len());
        for seat in seats {
            let score = session
                .player(seat.seat)
                .map(|player| player.score)
                .ok_or_else(|| RunnerError::game(format!("{} left the table", seat.seat)))?;
            seat_results.push(SeatResult {
                agent_name: seat.agent_name,
                seat: seat.seat,
                is_landlord: seat.seat == landlord,
                won: Side::of(seat.seat, landlord) == winning_side,
                score,
                metrics: seat.metrics.finalize(),
            });
        }

        Ok(HandOutcome {
            seating,
            seat_results,
            landlord,
            winning_side,
            multiplier,
            spring: session.is_spring(),
        })
    }
}

/// Seats in turn order, filled from the rotation's agent indices.
fn build_seat_states(
    mode: GameMode,
    rotation: &[usize],
    agents: &[AgentBlueprint],
) -> Result<Vec<SeatState>, RunnerError> {
    let order = mode.turn_order();
    let mut seats = Vec::with_capacity(order.len());
    for (seat_idx, &seat) in order.iter().enumerate() {
        let agent_index = rotation
            .get(seat_idx)
            .copied()
            .ok_or(RunnerError::InvalidRotation {
                index: seat_idx,
                agent_index: None,
            })?;
        let agent = agents.get(agent_index).ok_or(RunnerError::InvalidRotation {
            index: seat_idx,
            agent_index: Some(agent_index),
        })?;
        seats.push(SeatState::new(seat, agent));
    }
    Ok(seats)
}

struct SeatState {
    seat: PlayerId,
    agent_name: String,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

impl SeatState {
    fn new(seat: PlayerId, agent: &AgentBlueprint) -> Self {
        Self {
            seat,
            agent_name: agent.name.clone(),
            policy: agent.spawn_policy(),
            metrics: DecisionMetrics::default(),
        }
    }
}

pub struct HandOutcome {
    pub seating: Vec<SeatSnapshot>,
    pub seat_results: Vec<SeatResult>,
    pub landlord: PlayerId,
    pub winning_side: Side,
    pub multiplier: u32,
    pub spring: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: PlayerId,
    pub bot: String,
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: PlayerId,
    pub is_landlord: bool,
    /// On the side that emptied a hand first.
    pub won: bool,
    pub score: i32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct HandLogRow<'a> {
    run_id: &'a str,
    deal_id: &'a str,
    mode: GameMode,
    hand_index: usize,
    rotation_index: usize,
    deal_seed: u64,
    seat: PlayerId,
    bot: &'a str,
    seating: &'a [SeatSnapshot],
    landlord: bool,
    won: bool,
    score: i32,
    multiplier: u32,
    spring: bool,
    speed_ms_turn: f64,
    decisions: u32,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("{seat} sent a rejected {event}: {source}")]
    Rejected {
        seat: PlayerId,
        event: &'static str,
        #[source]
        source: ActionError,
    },
    #[error("{mode} player tables need exactly {expected} agents but found {found}")]
    SeatCount {
        mode: GameMode,
        expected: usize,
        found: usize,
    },
    #[error("rotation seat {index} references invalid agent index {agent_index:?}")]
    InvalidRotation {
        index: usize,
        agent_index: Option<usize>,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid heuristic parameter for agent '{name}': {message}")]
    InvalidHeuristicParam { name: String, message: String },
}

struct AgentBlueprint {
    name: String,
    difficulty: BotDifficulty,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let difficulty = match config.kind {
            AgentKind::Heuristic => heuristic_difficulty(&config.name, &config.params)?,
        };

        Ok(Self {
            name: config.name.clone(),
            difficulty,
        })
    }

    fn spawn_policy(&self) -> Box<dyn Policy> {
        Box::new(HeuristicPolicy::new(self.difficulty))
    }
}

fn heuristic_difficulty(
    name: &str,
    params: &serde_yaml::Value,
) -> Result<BotDifficulty, AgentError> {
    if params.is_null() {
        return Ok(BotDifficulty::default());
    }

    let mapping = params
        .as_mapping()
        .ok_or_else(|| AgentError::InvalidHeuristicParam {
            name: name.to_string(),
            message: "expected mapping for heuristic params".to_string(),
        })?;

    let Some(value) = mapping
        .iter()
        .find_map(|(key, value)| (key.as_str() == Some("difficulty")).then_some(value))
    else {
        return Ok(BotDifficulty::default());
    };

    let text = value
        .as_str()
        .ok_or_else(|| AgentError::InvalidHeuristicParam {
            name: name.to_string(),
            message: "difficulty must be a string".to_string(),
        })?;

    BotDifficulty::parse(text).ok_or_else(|| AgentError::InvalidHeuristicParam {
        name: name.to_string(),
        message: format!("unknown difficulty '{text}'"),
    })
}
