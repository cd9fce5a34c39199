use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use landlord_core::engine::scoring::Side;
use serde::Serialize;
use thiserror::Error;

use crate::config::{BenchmarkConfig, SeedRange};
use crate::tournament::HandOutcome;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' played a hand but is not in the configuration")]
    UnknownAgent(String),
    #[error("writing summary to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Hands played and won from one side of the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideRecord {
    pub played: usize,
    pub won: usize,
}

impl SideRecord {
    fn record(&mut self, won: bool) {
        self.played += 1;
        if won {
            self.won += 1;
        }
    }

    pub fn lost(&self) -> usize {
        self.played - self.won
    }

    pub fn win_rate(&self) -> f64 {
        rate(self.won, self.played)
    }
}

/// One agent's results, split by the side it sat on.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStanding {
    pub name: String,
    pub as_landlord: SideRecord,
    pub as_peasant: SideRecord,
    pub net_score: i64,
    pub springs: usize,
    pub decisions: u64,
    pub total_ms: f64,
}

impl AgentStanding {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            as_landlord: SideRecord::default(),
            as_peasant: SideRecord::default(),
            net_score: 0,
            springs: 0,
            decisions: 0,
            total_ms: 0.0,
        }
    }

    pub fn hands(&self) -> usize {
        self.as_landlord.played + self.as_peasant.played
    }

    pub fn wins(&self) -> usize {
        self.as_landlord.won + self.as_peasant.won
    }

    pub fn ms_per_decision(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_ms / self.decisions as f64
        }
    }
}

/// Folds hand outcomes into side and per-agent records.
pub struct AnalyticsCollector {
    summary: AnalyticsSummary,
    index: HashMap<String, usize>,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let agents: Vec<AgentStanding> = config
            .agents
            .iter()
            .map(|agent| AgentStanding::new(&agent.name))
            .collect();
        let index = agents
            .iter()
            .enumerate()
            .map(|(position, agent)| (agent.name.clone(), position))
            .collect();

        Self {
            summary: AnalyticsSummary {
                run_id: config.run_id.clone(),
                mode: config.deals.mode.to_string(),
                seeds: config.deals.seeds,
                tables: 0,
                landlord: SideRecord::default(),
                springs: 0,
                agents,
            },
            index,
        }
    }

    pub fn record_hand(&mut self, outcome: &HandOutcome) -> Result<(), AnalyticsError> {
        let summary = &mut self.summary;
        summary.tables += 1;
        summary
            .landlord
            .record(outcome.winning_side == Side::Landlord);
        if outcome.spring {
            summary.springs += 1;
        }

        for seat in &outcome.seat_results {
            let position = *self
                .index
                .get(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            let standing = &mut summary.agents[position];
            if seat.is_landlord {
                standing.as_landlord.record(seat.won);
            } else {
                standing.as_peasant.record(seat.won);
            }
            standing.net_score += i64::from(seat.score);
            if seat.won && outcome.spring {
                standing.springs += 1;
            }
            standing.decisions += u64::from(seat.metrics.decisions);
            standing.total_ms += seat.metrics.total_ms;
        }
        Ok(())
    }

    pub fn finalize(self) -> AnalyticsSummary {
        self.summary
    }
}

/// Standings for a whole run. `Display` prints the terminal report; the
/// markdown form is written beside the JSONL rows.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub run_id: String,
    pub mode: String,
    #[serde(serialize_with = "serialize_seeds")]
    pub seeds: SeedRange,
    /// Hands times rotations.
    pub tables: usize,
    /// Every table seen from the landlord's chair.
    pub landlord: SideRecord,
    pub springs: usize,
    pub agents: Vec<AgentStanding>,
}

impl AnalyticsSummary {
    pub fn agent(&self, name: &str) -> Option<&AgentStanding> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    pub fn peasant_wins(&self) -> usize {
        self.landlord.lost()
    }

    pub fn peasant_win_rate(&self) -> f64 {
        rate(self.peasant_wins(), self.tables)
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {} standings\n", self.run_id);
        let _ = writeln!(
            out,
            "{} tables, {} mode, seeds `{}`. Landlord won {} ({:.1}%), peasants won {}, {} springs.\n",
            self.tables,
            self.mode,
            self.seeds,
            self.landlord.won,
            self.landlord.win_rate() * 100.0,
            self.peasant_wins(),
            self.springs,
        );
        out.push_str(
            "| Agent | Hands | Landlord W-L | Landlord win % | Peasant W-L | Peasant win % | Net score | Springs | ms/decision |\n",
        );
        out.push_str("|---|---|---|---|---|---|---|---|---|\n");
        for agent in &self.agents {
            let _ = writeln!(
                out,
                "| {} | {} | {}-{} | {:.1}% | {}-{} | {:.1}% | {:+} | {} | {:.3} |",
                agent.name,
                agent.hands(),
                agent.as_landlord.won,
                agent.as_landlord.lost(),
                agent.as_landlord.win_rate() * 100.0,
                agent.as_peasant.won,
                agent.as_peasant.lost(),
                agent.as_peasant.win_rate() * 100.0,
                agent.net_score,
                agent.springs,
                agent.ms_per_decision(),
            );
        }
        out
    }

    pub fn write_markdown(&self, path: &Path) -> Result<(), AnalyticsError> {
        fs::write(path, self.render_markdown()).map_err(|source| AnalyticsError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl fmt::Display for AnalyticsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} tables ({} mode, seeds {})",
            self.tables, self.mode, self.seeds
        )?;
        writeln!(
            f,
            "landlord wins {:>5.1}%  peasant wins {:>5.1}%  springs {}",
            self.landlord.win_rate() * 100.0,
            self.peasant_win_rate() * 100.0,
            self.springs
        )?;
        writeln!(
            f,
            "{:<16} {:>6} {:>10} {:>10} {:>9}",
            "agent", "hands", "landlord%", "peasant%", "net"
        )?;
        for agent in &self.agents {
            writeln!(
                f,
                "{:<16} {:>6} {:>9.1}% {:>9.1}% {:>+9}",
                agent.name,
                agent.hands(),
                agent.as_landlord.win_rate() * 100.0,
                agent.as_peasant.win_rate() * 100.0,
                agent.net_score
            )?;
        }
        Ok(())
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn serialize_seeds<S>(seeds: &SeedRange, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(seeds)
}
