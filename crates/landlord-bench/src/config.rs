use landlord_core::model::mode::GameMode;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

const NAME_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Tournament description loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub deals: DealConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Parses a YAML file. Call `validate` once command-line overrides
    /// have been applied.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ConfigError::Read {
            source,
            path: path.clone(),
        })?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse { source, path })
    }

    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_name("run_id", &self.run_id)?;
        self.deals.validate()?;
        self.outputs.validate(&self.run_id)?;
        validate_agents(&self.agents, self.deals.mode)?;
        self.logging.normalize();
        Ok(())
    }

    /// Output paths with `{run_id}` filled in.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Which deals are played and how the table is seated for each.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: GameMode,
    /// One hand per seed; the seed alone fixes the deck and every draw
    /// the hand makes.
    #[serde(deserialize_with = "deserialize_seeds")]
    pub seeds: SeedRange,
    /// Seat rotations played per deal; every rotation when unset.
    #[serde(default)]
    pub rotations: Option<usize>,
}

impl DealConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(rotations) = self.rotations {
            let seats = self.mode.player_count();
            if rotations == 0 || rotations > seats {
                return Err(invalid(
                    "deals.rotations",
                    format!("rotations must be between 1 and {seats}"),
                ));
            }
        }
        Ok(())
    }

    pub fn hands(&self) -> usize {
        self.seeds.len()
    }

    pub fn rotation_count(&self) -> usize {
        self.rotations.unwrap_or(self.mode.player_count())
    }
}

/// Half-open range of deal seeds, written `START..END`, `START..=END` or
/// a single `SEED`. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRange {
    start: u64,
    end: u64,
}

impl SeedRange {
    pub fn new(start: u64, end: u64) -> Result<Self, SeedRangeError> {
        if start >= end {
            return Err(SeedRangeError::Empty { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.end - self.start).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn iter(&self) -> Range<u64> {
        self.start..self.end
    }
}

impl fmt::Display for SeedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for SeedRange {
    type Err = SeedRangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let number = |text: &str| {
            text.trim()
                .parse::<u64>()
                .map_err(|_| SeedRangeError::Number(text.trim().to_string()))
        };

        if let Some((start, end)) = raw.split_once("..=") {
            let (start, end) = (number(start)?, number(end)?);
            let end = end
                .checked_add(1)
                .ok_or(SeedRangeError::Empty { start, end })?;
            return Self::new(start, end);
        }
        if let Some((start, end)) = raw.split_once("..") {
            return Self::new(number(start)?, number(end)?);
        }
        let seed = number(raw)?;
        let end = seed
            .checked_add(1)
            .ok_or(SeedRangeError::Empty { start: seed, end: seed })?;
        Self::new(seed, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedRangeError {
    #[error("'{0}' is not a seed")]
    Number(String),
    #[error("seed range {start}..{end} holds no seeds")]
    Empty { start: u64, end: u64 },
}

fn deserialize_seeds<'de, D>(deserializer: D) -> Result<SeedRange, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Single(u64),
        Text(String),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Single(seed) => SeedRange::from_str(&seed.to_string()),
        Raw::Text(text) => SeedRange::from_str(&text),
    };
    parsed.map_err(serde::de::Error::custom)
}

fn deserialize_mode<'de, D>(deserializer: D) -> Result<GameMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// One seat's bot.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Heuristic,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if resolve_template(run_id, value.trim())
                .components()
                .next()
                .is_none()
            {
                return Err(invalid(label, "path must not be empty"));
            }
        }
        Ok(())
    }
}

/// Structured logging is off unless asked for.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        self.tracing_level.trim().parse().ok()
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if !value.chars().all(|c| NAME_ALLOWED.contains(c)) {
        return Err(invalid(
            field,
            format!("'{value}' may only contain alphanumerics, '.', '_' or '-'"),
        ));
    }
    Ok(())
}

fn validate_agents(agents: &[AgentConfig], mode: GameMode) -> Result<(), ValidationError> {
    let seats = mode.player_count();
    if agents.len() != seats {
        return Err(invalid(
            "agents",
            format!(
                "{mode} player tables need exactly {seats} agents, found {}",
                agents.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for agent in agents {
        validate_name("agents.name", &agent.name)?;
        if !seen.insert(agent.name.as_str()) {
            return Err(invalid(
                "agents",
                format!("agent name '{}' defined more than once", agent.name),
            ));
        }
    }
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Telemetry lands next to the summary.
    pub fn telemetry_path(&self) -> PathBuf {
        self.summary_md
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("telemetry.jsonl")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
deals:
  seeds: "100..116"
agents:
  - name: "casual"
    kind: "heuristic"
    params:
      difficulty: "casual"
  - name: "thinking"
    kind: "heuristic"
    params:
      difficulty: "thinking"
  - name: "casual_2"
    kind: "heuristic"
outputs:
  jsonl: "bench/out/{run_id}/hands.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> BenchmarkConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.deals.mode, GameMode::ThreePlayer);
        assert_eq!(cfg.deals.seeds, SeedRange::new(100, 116).unwrap());
        assert_eq!(cfg.deals.hands(), 16);
        assert_eq!(cfg.deals.rotation_count(), 3);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/hands.jsonl")
        );
        assert_eq!(
            outputs.telemetry_path(),
            PathBuf::from("bench/out/stage0_smoke/telemetry.jsonl")
        );
    }

    #[test]
    fn seed_ranges_parse_in_every_form() {
        assert_eq!("5..9".parse(), SeedRange::new(5, 9));
        assert_eq!(" 5..=9 ".parse(), SeedRange::new(5, 10));
        assert_eq!("42".parse(), SeedRange::new(42, 43));
        assert_eq!(
            "9..5".parse::<SeedRange>(),
            Err(SeedRangeError::Empty { start: 9, end: 5 })
        );
        assert_eq!(
            "a..5".parse::<SeedRange>(),
            Err(SeedRangeError::Number("a".into()))
        );
        assert!(format!("{}..=5", u64::MAX).parse::<SeedRange>().is_err());

        let range = SeedRange::new(7, 10).unwrap();
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(range.to_string(), "7..10");
    }

    #[test]
    fn a_bare_number_is_a_single_seed() {
        let cfg = parse(&BASIC_YAML.replace("\"100..116\"", "7"));
        assert_eq!(cfg.deals.seeds, SeedRange::new(7, 8).unwrap());
    }

    #[test]
    fn empty_seed_range_fails_to_parse() {
        let yaml = BASIC_YAML.replace("100..116", "116..100");
        let result: Result<BenchmarkConfig, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err());
    }

    #[test]
    fn four_player_mode_needs_four_agents() {
        let yaml = BASIC_YAML.replace("seeds: ", "mode: \"four\"\n  seeds: ");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("three agents for four seats");
        assert!(err.to_string().contains("exactly 4 agents"), "{err}");
    }

    #[test]
    fn unknown_mode_fails_to_parse() {
        let yaml = BASIC_YAML.replace("seeds: ", "mode: \"five\"\n  seeds: ");
        let result: Result<BenchmarkConfig, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_rotations_beyond_seat_count() {
        let yaml = BASIC_YAML.replace("seeds: ", "rotations: 4\n  seeds: ");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("four rotations at a three seat table");
        assert!(err.to_string().starts_with("deals.rotations"), "{err}");
    }

    #[test]
    fn rejects_invalid_names() {
        let mut cfg = parse(&BASIC_YAML.replace("stage0_smoke", "bad id!"));
        assert!(cfg.validate().is_err());
        let mut cfg = parse(&BASIC_YAML.replace("casual_2", "casual"));
        let err = cfg.validate().expect_err("duplicate agent");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn from_path_reports_the_file() {
        let err = BenchmarkConfig::from_path("does/not/exist.yaml").expect_err("missing file");
        assert!(matches!(
            err,
            ConfigError::Read { ref path, .. } if path == Path::new("does/not/exist.yaml")
        ));
    }
}
