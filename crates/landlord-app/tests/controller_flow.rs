use landlord_app::{GameController, SharedController, TableConfig};
use landlord_bot::BotDifficulty;
use landlord_core::model::mode::GameMode;
use landlord_core::model::player::PlayerId;
use landlord_core::{GameEvent, GamePhase, GameSnapshot};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn play_to_end(controller: &mut GameController) -> GameSnapshot {
    for _ in 0..500 {
        controller.run_until_human();
        let snapshot = controller.snapshot();
        if snapshot.phase.is_settled() {
            return snapshot;
        }
        let event = controller.autopilot_event().expect("human move");
        controller.dispatch(event).expect("autopilot move accepted");
    }
    panic!("hand did not settle");
}

#[test]
fn every_published_snapshot_conserves_cards() {
    for mode in [GameMode::ThreePlayer, GameMode::FourPlayer] {
        let config = TableConfig::default()
            .with_mode(mode)
            .with_seed(99)
            .with_difficulty(BotDifficulty::Thinking);
        let mut controller = GameController::new(config);
        let seen: Arc<Mutex<Vec<GameSnapshot>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));

        controller.dispatch(GameEvent::Start { mode }).unwrap();
        let last = play_to_end(&mut controller);

        let seen = seen.lock().unwrap();
        assert!(seen.len() > 10);
        for snapshot in seen.iter().filter(|s| !matches!(s.phase, GamePhase::Shuffling)) {
            let held: usize = snapshot.remaining_cards.values().sum();
            assert_eq!(
                held + snapshot.bottom_cards.len() + snapshot.discarded_count,
                mode.deck_size()
            );
        }
        assert_eq!(seen.last(), Some(&last));
    }
}

#[test]
fn seeded_tables_replay_identically() {
    let run = |seed| {
        let mut controller = GameController::new(TableConfig::default().with_seed(seed));
        controller
            .dispatch(GameEvent::Start {
                mode: GameMode::ThreePlayer,
            })
            .unwrap();
        play_to_end(&mut controller)
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn finish_discards_pending_bot_turns() {
    let shared = SharedController::new(GameController::new(TableConfig::default().with_seed(4)));
    shared
        .dispatch(GameEvent::Start {
            mode: GameMode::ThreePlayer,
        })
        .unwrap();
    shared
        .dispatch(GameEvent::Bid {
            player: PlayerId::Human,
            score: 0,
        })
        .unwrap();
    assert_eq!(shared.with(|c| c.pending_turns()), 1);
    shared.dispatch(GameEvent::Finish).unwrap();
    assert_eq!(shared.tick(Duration::from_secs(10)), 0);
    assert_eq!(shared.snapshot().phase, GamePhase::Idle);
}
