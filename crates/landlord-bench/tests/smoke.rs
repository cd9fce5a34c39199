use std::fs;
use std::path::Path;

use landlord_bench::config::BenchmarkConfig;
use landlord_bench::tournament::{RunSummary, TournamentRunner};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(
    output_dir: &Path,
    mode: &str,
    seeds: &str,
    agents: &[(&str, &str)],
) -> BenchmarkConfig {
    let agent_yaml: String = agents
        .iter()
        .map(|(name, difficulty)| {
            format!(
                "  - name: \"{name}\"\n    kind: \"heuristic\"\n    params:\n      difficulty: \"{difficulty}\"\n"
            )
        })
        .collect();
    let yaml = format!(
        r#"
run_id: "test_smoke"
deals:
  seeds: "{seeds}"
  mode: "{mode}"
agents:
{agent_yaml}outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("hands.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run(dir: &Path, mode: &str, agents: &[(&str, &str)]) -> RunSummary {
    run_seeds(dir, mode, "4242..4244", agents)
}

fn run_seeds(dir: &Path, mode: &str, seeds: &str, agents: &[(&str, &str)]) -> RunSummary {
    let config = load_config(dir, mode, seeds, agents);
    let outputs = config.resolved_outputs();
    TournamentRunner::new(config, outputs)
        .expect("runner created")
        .run()
        .expect("tournament completes")
}

/// Hash of the JSONL rows with wall-clock timings zeroed.
fn normalized_digest(path: &Path) -> (String, Vec<serde_json::Value>) {
    let jsonl = fs::read_to_string(path).expect("jsonl readable");
    let mut rows = Vec::new();
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        if let Some(speed) = value.get_mut("speed_ms_turn") {
            *speed = serde_json::json!(0.0);
        }
        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
        rows.push(value);
    }

    let digest = Sha256::digest(normalized.as_bytes());
    (hex::encode(digest), rows)
}

const THREE: [(&str, &str); 3] = [
    ("casual", "casual"),
    ("thinking", "thinking"),
    ("casual_2", "easy"),
];

#[test]
fn tournament_smoke_test_is_deterministic() {
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");
    let first = run(first_dir.path(), "three", &THREE);
    let second = run(second_dir.path(), "three", &THREE);

    assert_eq!(first.hands_played, 2);
    assert_eq!(first.rotations, 3);
    assert_eq!(first.rows_written, 2 * 3 * 3);
    assert!(first.telemetry_path.is_none());

    let (first_hash, rows) = normalized_digest(&first.jsonl_path);
    let (second_hash, _) = normalized_digest(&second.jsonl_path);
    assert_eq!(first_hash, second_hash, "same seed must replay the same hands");
    assert_eq!(rows.len(), first.rows_written);

    assert_eq!(first.standings.tables, 2 * 3);
    assert_eq!(
        first.standings.landlord.won + first.standings.peasant_wins(),
        first.standings.tables
    );

    assert!(first.summary_path.exists(), "summary markdown missing");
    let summary = fs::read_to_string(&first.summary_path).expect("summary readable");
    for (name, _) in THREE {
        assert!(summary.contains(&format!("| {name} |")), "{name} missing from summary");
    }
}

#[test]
fn every_hand_is_zero_sum_with_one_landlord() {
    let dir = tempdir().expect("temp dir");
    let summary = run(dir.path(), "three", &THREE);
    let (_, rows) = normalized_digest(&summary.jsonl_path);

    for hand in rows.chunks(3) {
        let total: i64 = hand.iter().map(|row| row["score"].as_i64().unwrap()).sum();
        assert_eq!(total, 0);
        let landlords = hand.iter().filter(|row| row["landlord"] == true).count();
        assert_eq!(landlords, 1);
        let deal_ids: Vec<&str> = hand.iter().map(|row| row["deal_id"].as_str().unwrap()).collect();
        assert!(deal_ids.iter().all(|id| *id == deal_ids[0]));
        let winners = hand.iter().filter(|row| row["won"] == true).count();
        assert!(winners == 1 || winners == 2, "one landlord or two peasants win");
    }
}

#[test]
fn four_player_tables_seat_four_agents() {
    let agents = [
        ("casual", "casual"),
        ("thinking", "thinking"),
        ("casual_2", "casual"),
        ("thinking_2", "hard"),
    ];
    let dir = tempdir().expect("temp dir");
    let summary = run(dir.path(), "four", &agents);
    assert_eq!(summary.rotations, 4);
    assert_eq!(summary.rows_written, 2 * 4 * 4);

    let (_, rows) = normalized_digest(&summary.jsonl_path);
    assert!(rows.iter().all(|row| row["mode"] == "four_player"));
    assert!(rows.iter().any(|row| row["seat"] == "top_ai"));
}

#[test]
fn a_seed_deals_the_same_hand_alone_or_inside_a_range() {
    let range_dir = tempdir().expect("temp dir");
    let single_dir = tempdir().expect("temp dir");
    let range = run_seeds(range_dir.path(), "three", "4242..4245", &THREE);
    let single = run_seeds(single_dir.path(), "three", "4243", &THREE);

    let (_, range_rows) = normalized_digest(&range.jsonl_path);
    let (_, single_rows) = normalized_digest(&single.jsonl_path);
    let strip = |row: &serde_json::Value| {
        let mut row = row.clone();
        row["hand_index"] = serde_json::json!(0);
        row["deal_id"] = serde_json::json!("");
        row
    };
    let from_range: Vec<_> = range_rows
        .iter()
        .filter(|row| row["deal_seed"] == 4243)
        .map(strip)
        .collect();
    let alone: Vec<_> = single_rows.iter().map(strip).collect();
    assert_eq!(from_range.len(), 3 * 3);
    assert_eq!(from_range, alone);
}
