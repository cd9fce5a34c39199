use assert_cmd::Command;
use predicates::prelude::*;

fn landlord() -> Command {
    let mut cmd = Command::cargo_bin("landlord").unwrap();
    cmd.env_remove("LANDLORD_MODE")
        .env_remove("LANDLORD_SEED")
        .env_remove("LANDLORD_BOT_DIFFICULTY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn plays_a_three_player_hand() {
    landlord()
        .args(["--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("landlord three hand 1"))
        .stdout(predicate::str::contains("winner"));
}

#[test]
fn json_report_ends_settled() {
    landlord()
        .args(["--seed", "11", "--mode", "four", "--difficulty", "thinking", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"settled\""))
        .stdout(predicate::str::contains("\"difficulty\": \"thinking\""))
        .stdout(predicate::str::contains("\"mode\": \"four_player\""));
}

#[test]
fn same_seed_gives_same_output() {
    let first = landlord().args(["--seed", "3", "--json"]).output().unwrap();
    let second = landlord().args(["--seed", "3", "--json"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn environment_selects_mode() {
    landlord()
        .env("LANDLORD_MODE", "four")
        .args(["--seed", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("landlord four hand 1"));
}

#[test]
fn verbose_narrates_plays() {
    landlord()
        .args(["--seed", "9", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[shuffle] shuffling"))
        .stdout(predicate::str::contains("[play]"));
}

#[test]
fn rejects_unknown_mode() {
    landlord()
        .args(["--mode", "five"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown game mode"));
}
