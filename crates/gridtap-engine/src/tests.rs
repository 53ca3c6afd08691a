use gridtap_core::enums::{EnginePhase, ModeId};
use gridtap_core::state::ModeView;
use gridtap_progress::{MemoryProgress, ProgressStore, SharedProgress};

use crate::deferred::DeferredQueue;
use crate::modes::{
    EndlessConfig, EndlessMode, ForceConfig, ForceMode, GameMode, RecallConfig, RecallMode,
    RushConfig, RushMode, SequenceConfig, SequenceMode,
};
use crate::scheduler::{TickEvent, TickScheduler};

/// Tick until `pred` holds on the view, or give up after `max_ticks`.
fn tick_until<M: GameMode>(game: &mut M, max_ticks: usize, pred: impl Fn(&ModeView) -> bool) -> bool {
    for _ in 0..max_ticks {
        game.tick();
        if pred(&game.view()) {
            return true;
        }
    }
    false
}

fn active_tile(view: &ModeView) -> Option<usize> {
    view.cards
        .iter()
        .position(|c| c.is_target && !c.is_resolved)
}

// --- deferred queue ---

#[test]
fn deferred_fires_after_its_delay() {
    let mut queue: DeferredQueue<&str> = DeferredQueue::new();
    queue.schedule(0.5, "go");
    for _ in 0..9 {
        assert!(queue.tick().is_empty());
    }
    assert_eq!(queue.tick(), vec!["go"]);
    assert!(queue.tick().is_empty());
}

#[test]
fn deferred_same_tick_preserves_schedule_order() {
    let mut queue: DeferredQueue<u32> = DeferredQueue::new();
    queue.schedule(0.1, 1);
    queue.schedule(0.1, 2);
    queue.schedule(0.05, 0);
    assert_eq!(queue.tick(), vec![0]);
    assert_eq!(queue.tick(), vec![1, 2]);
}

#[test]
fn deferred_cancel_all_drops_pending_tasks() {
    let mut queue: DeferredQueue<&str> = DeferredQueue::new();
    queue.schedule(0.1, "stale");
    let before = queue.generation();
    queue.cancel_all();
    assert_eq!(queue.generation(), before + 1);
    queue.schedule(0.1, "fresh");
    queue.tick();
    assert_eq!(queue.tick(), vec!["fresh"]);
}

#[test]
fn deferred_zero_delay_fires_next_tick_not_immediately() {
    let mut queue: DeferredQueue<&str> = DeferredQueue::new();
    queue.schedule(0.0, "soon");
    assert_eq!(queue.tick(), vec!["soon"]);
}

// --- scheduler ---

#[test]
fn scheduler_expires_tiles_in_index_order() {
    let mut scheduler = TickScheduler::new();
    scheduler.start(None);
    scheduler.activate_tile(7, 0.05);
    scheduler.activate_tile(2, 0.05);
    let events = scheduler.tick();
    assert_eq!(
        events,
        vec![TickEvent::TileExpired(2), TickEvent::TileExpired(7)]
    );
    assert_eq!(scheduler.active_count(), 0);
}

#[test]
fn scheduler_level_timeout_fires_once() {
    let mut scheduler = TickScheduler::new();
    scheduler.start(Some(0.1));
    assert!(scheduler.tick().is_empty());
    assert_eq!(scheduler.tick(), vec![TickEvent::LevelTimeout]);
    assert!(scheduler.tick().is_empty());
    assert_eq!(scheduler.level_remaining(), None);
}

#[test]
fn scheduler_does_nothing_while_stopped() {
    let mut scheduler = TickScheduler::new();
    scheduler.start(Some(0.05));
    scheduler.activate_tile(0, 0.05);
    scheduler.stop();
    scheduler.stop();
    for _ in 0..10 {
        assert!(scheduler.tick().is_empty());
    }
    assert!(scheduler.is_tile_active(0));
    assert_eq!(scheduler.tile_remaining(0), Some(0.05));
}

#[test]
fn scheduler_deactivated_tile_never_fires() {
    let mut scheduler = TickScheduler::new();
    scheduler.start(None);
    scheduler.activate_tile(3, 0.05);
    scheduler.deactivate_tile(3);
    assert!(scheduler.tick().is_empty());
}

// --- sequence mode ---

#[test]
fn sequence_clears_a_level_and_persists_exactly_one_increment() {
    let progress = SharedProgress::new(MemoryProgress::new());
    let mut game = SequenceMode::new(SequenceConfig::default(), progress.clone());
    game.start_game();

    let view = game.view();
    assert_eq!(view.level, 1);
    assert_eq!(view.grid_size, 2);
    assert_eq!(view.total_rounds, 2);
    assert_eq!(view.phase, EnginePhase::Previewing);
    assert!(!view.can_tap);

    for round in 1..=2 {
        assert!(tick_until(&mut game, 200, |v| v.can_tap), "round {round} preview");
        assert_eq!(game.view().round, round);
        let sequence = game.sequence().to_vec();
        assert_eq!(sequence.len(), 3);
        for index in sequence {
            game.tap_card(index);
        }
    }

    let view = game.view();
    assert!(view.is_level_cleared);
    assert!(!view.can_tap);
    // The round counter runs past the total to signal completion.
    assert_eq!(view.round, 3);
    assert_eq!(progress.current_level(ModeId::Sequence), 2);

    // The pending advance rolls into level 2 at the new difficulty.
    assert!(tick_until(&mut game, 200, |v| v.level == 2));
    assert_eq!(game.view().phase, EnginePhase::Previewing);
    assert_eq!(progress.current_level(ModeId::Sequence), 2);
}

#[test]
fn sequence_wrong_taps_burn_lives_then_end_the_run() {
    let mut game = SequenceMode::new(SequenceConfig::default(), MemoryProgress::new());
    game.start_game();
    assert!(tick_until(&mut game, 200, |v| v.can_tap));

    let expected = game.sequence()[0];
    let wrong = (0..4).find(|&i| i != expected).unwrap();

    game.tap_card(wrong);
    assert_eq!(game.view().lives, 2);
    game.tap_card(wrong);
    assert_eq!(game.view().lives, 1);
    game.tap_card(wrong);

    let view = game.view();
    assert_eq!(view.lives, 0);
    assert!(view.is_game_over);
    assert_eq!(view.phase, EnginePhase::GameOver);

    // Terminal: further taps change nothing.
    game.tap_card(expected);
    let after = game.view();
    assert_eq!(after.lives, 0);
    assert!(after.is_game_over);
}

#[test]
fn sequence_wrong_tap_does_not_advance_the_cursor() {
    let mut game = SequenceMode::new(SequenceConfig::default(), MemoryProgress::new());
    game.start_game();
    assert!(tick_until(&mut game, 200, |v| v.can_tap));

    let sequence = game.sequence().to_vec();
    let wrong = (0..4).find(|&i| i != sequence[0]).unwrap();
    game.tap_card(wrong);
    assert_eq!(game.view().targets_remaining, sequence.len());

    // The whole sequence still clears the round after the miss.
    for index in sequence {
        game.tap_card(index);
    }
    let view = game.view();
    assert_eq!(view.targets_remaining, 0);
    assert_eq!(view.phase, EnginePhase::Resolving);
}

#[test]
fn sequence_reset_mid_preview_discards_stale_actions() {
    let mut game = SequenceMode::new(SequenceConfig::default(), MemoryProgress::new());
    game.start_game();
    for _ in 0..5 {
        game.tick();
    }
    game.reset_game();

    // The old preview would have enabled taps 25 ticks from here; only the
    // fresh one, a full 30 ticks out, may do so.
    for tick in 1..=29 {
        game.tick();
        assert!(!game.view().can_tap, "taps enabled early at tick {tick}");
    }
    game.tick();
    assert!(game.view().can_tap);
}

#[test]
fn sequence_round_advance_waits_one_extra_flip_step() {
    let mut game = SequenceMode::new(SequenceConfig::default(), MemoryProgress::new());
    game.start_game();
    assert!(tick_until(&mut game, 200, |v| v.can_tap));

    for index in game.sequence().to_vec() {
        game.tap_card(index);
    }
    // The completed round already counts toward the next one.
    assert_eq!(game.view().round, 2);

    // Three flip-backs land at 0.3/0.6/0.9 s; the next preview starts a
    // full flip step after the last, at 1.2 s.
    for _ in 0..23 {
        game.tick();
        assert_eq!(game.view().phase, EnginePhase::Resolving);
    }
    game.tick();
    assert_eq!(game.view().phase, EnginePhase::Previewing);
}

#[test]
fn sequence_same_seed_same_views() {
    let mut a = SequenceMode::new(SequenceConfig::default(), MemoryProgress::new());
    let mut b = SequenceMode::new(SequenceConfig::default(), MemoryProgress::new());
    a.start_game();
    b.start_game();
    for _ in 0..200 {
        a.tick();
        b.tick();
        let ja = serde_json::to_string(&a.view()).unwrap();
        let jb = serde_json::to_string(&b.view()).unwrap();
        assert_eq!(ja, jb);
    }
}

// --- rush mode ---

#[test]
fn rush_spawns_up_to_the_concurrency_cap() {
    let mut game = RushMode::new(RushConfig::default(), MemoryProgress::new());
    game.start_game();
    let view = game.view();
    assert_eq!(view.grid_size, 2);
    assert_eq!(view.targets_remaining, 2);
    assert!(view.can_tap);

    game.tick();
    let view = game.view();
    // Level 1 allows one lit tile at a time.
    let lit = view
        .cards
        .iter()
        .filter(|c| c.is_target && !c.is_resolved)
        .count();
    assert_eq!(lit, 1);
}

#[test]
fn rush_expiry_costs_exactly_one_life() {
    let mut game = RushMode::new(RushConfig::default(), MemoryProgress::new());
    game.start_game();
    game.tick();
    assert!(active_tile(&game.view()).is_some());

    // The 1.0s fuse burns out untouched; one life, no clear credit.
    assert!(tick_until(&mut game, 25, |v| v.lives == 2));
    let view = game.view();
    assert_eq!(view.targets_remaining, 2);
    assert!(view.cards.iter().all(|c| !c.is_resolved));
    // A replacement tile lights up in the same tick.
    assert!(active_tile(&view).is_some());
}

#[test]
fn rush_clears_a_level_by_tapping_lit_tiles() {
    let progress = SharedProgress::new(MemoryProgress::new());
    let mut game = RushMode::new(RushConfig::default(), progress.clone());
    game.start_game();

    for remaining in (0..2).rev() {
        game.tick();
        let lit = active_tile(&game.view()).unwrap();
        game.tap_card(lit);
        assert_eq!(game.view().targets_remaining, remaining);
        assert!(game.view().cards[lit].is_resolved);
    }

    let view = game.view();
    assert!(view.is_level_cleared);
    assert_eq!(view.phase, EnginePhase::LevelCleared);
    assert_eq!(view.lives, 3);
    assert_eq!(progress.current_level(ModeId::Rush), 2);

    assert!(tick_until(&mut game, 50, |v| v.level == 2));
    assert!(game.view().can_tap);
}

#[test]
fn rush_reset_mid_advance_discards_the_pending_level_load() {
    let progress = SharedProgress::new(MemoryProgress::new());
    let mut game = RushMode::new(RushConfig::default(), progress.clone());
    game.start_game();

    for _ in 0..2 {
        game.tick();
        let lit = active_tile(&game.view()).unwrap();
        game.tap_card(lit);
    }
    assert!(game.view().is_level_cleared);

    // Reset partway through the advance pause; the stale level load would
    // otherwise fire 15 ticks from here and rewind the fresh level clock.
    for _ in 0..5 {
        game.tick();
    }
    game.reset_game();
    assert_eq!(game.view().level, 2);

    let mut last = game.view().level_time_remaining;
    assert!(last > 0.0);
    for _ in 0..30 {
        game.tick();
        let now = game.view().level_time_remaining;
        assert!(now < last, "level clock rewound");
        last = now;
    }
}

#[test]
fn rush_tapping_an_unlit_tile_costs_a_life() {
    let mut game = RushMode::new(RushConfig::default(), MemoryProgress::new());
    game.start_game();
    game.tick();
    let lit = active_tile(&game.view()).unwrap();
    let unlit = (0..4).find(|&i| i != lit).unwrap();
    game.tap_card(unlit);
    let view = game.view();
    assert_eq!(view.lives, 2);
    assert_eq!(view.targets_remaining, 2);
}

// --- force mode ---

fn force_at_level_15() -> (ForceMode<SharedProgress>, SharedProgress) {
    let mut store = MemoryProgress::new();
    store.set_level(ModeId::Force, 15);
    let progress = SharedProgress::new(store);
    let mut game = ForceMode::new(ForceConfig::default(), progress.clone());
    game.start_game();
    (game, progress)
}

#[test]
fn force_tiles_take_several_taps() {
    let (mut game, _) = force_at_level_15();
    assert_eq!(game.view().grid_size, 3);
    assert_eq!(game.taps_per_tile(), 3);

    game.tick();
    let lit = active_tile(&game.view()).unwrap();
    assert_eq!(game.view().cards[lit].remaining_taps, 3);

    game.tap_card(lit);
    game.tap_card(lit);
    let card = game.view().cards[lit];
    assert_eq!(card.remaining_taps, 1);
    assert!(!card.is_resolved);

    let before = game.view().targets_remaining;
    game.tap_card(lit);
    let view = game.view();
    assert!(view.cards[lit].is_resolved);
    assert_eq!(view.targets_remaining, before - 1);

    // A resolved tile soaks up extra taps without penalty.
    game.tap_card(lit);
    assert_eq!(game.view().lives, 3);
}

#[test]
fn force_burnout_is_free_and_respawns() {
    let (mut game, _) = force_at_level_15();
    game.tick();
    let lit = active_tile(&game.view()).unwrap();
    let before = game.view().targets_remaining;

    // taps_per_tile = 3 gives a 3 second fuse; let it burn out.
    for _ in 0..61 {
        game.tick();
    }
    let view = game.view();
    assert_eq!(view.lives, 3);
    assert_eq!(view.targets_remaining, before);
    assert!(!view.cards[lit].is_resolved);
    // A replacement tile is already lit.
    assert!(active_tile(&view).is_some());
}

#[test]
fn force_wrong_taps_end_the_run() {
    let (mut game, _) = force_at_level_15();
    game.tick();
    let lit = active_tile(&game.view()).unwrap();
    let unlit = (0..9).find(|&i| i != lit).unwrap();
    for _ in 0..3 {
        game.tap_card(unlit);
    }
    let view = game.view();
    assert_eq!(view.lives, 0);
    assert!(view.is_game_over);
    game.tap_card(lit);
    assert!(!game.view().cards[lit].is_resolved);
}

// --- recall mode ---

#[test]
fn recall_replays_one_sequence_with_a_shrinking_preview() {
    let progress = SharedProgress::new(MemoryProgress::new());
    let mut game = RecallMode::new(RecallConfig::default(), progress.clone());
    game.start_game();

    let view = game.view();
    assert_eq!(view.total_rounds, 3);
    assert_eq!(view.round, 1);
    assert!((view.preview_secs - 0.6).abs() < 1e-9);

    let sequence = game.sequence().to_vec();
    assert!(!sequence.is_empty());

    for repetition in 1..=3u32 {
        assert!(
            tick_until(&mut game, 400, |v| v.can_tap),
            "repetition {repetition} preview"
        );
        // The same sequence every repetition.
        assert_eq!(game.sequence(), sequence.as_slice());
        for &index in &sequence {
            game.tap_card(index);
        }
    }

    let view = game.view();
    assert!(view.is_level_cleared);
    assert_eq!(progress.current_level(ModeId::Recall), 2);

    assert!(tick_until(&mut game, 100, |v| v.level == 2));
    // Preview resets for the new level.
    assert!((game.view().preview_secs - 0.6).abs() < 1e-9);
}

#[test]
fn recall_preview_shrinks_but_never_below_the_floor() {
    let mut game = RecallMode::new(
        RecallConfig {
            preview_start_secs: 0.3,
            ..RecallConfig::default()
        },
        MemoryProgress::new(),
    );
    game.start_game();
    let sequence = game.sequence().to_vec();

    assert!(tick_until(&mut game, 400, |v| v.can_tap));
    for &index in &sequence {
        game.tap_card(index);
    }
    assert!((game.view().preview_secs - 0.2).abs() < 1e-9);

    assert!(tick_until(&mut game, 400, |v| v.can_tap));
    for &index in &sequence {
        game.tap_card(index);
    }
    // 0.2 - 0.1 would undercut the floor; it stays pinned.
    assert!((game.view().preview_secs - 0.2).abs() < 1e-9);
}

#[test]
fn recall_wrong_taps_burn_lives() {
    let mut game = RecallMode::new(RecallConfig::default(), MemoryProgress::new());
    game.start_game();
    assert!(tick_until(&mut game, 400, |v| v.can_tap));

    let expected = game.sequence()[0];
    let area = game.view().cards.len();
    let wrong = (0..area).find(|&i| i != expected).unwrap();
    game.tap_card(wrong);
    assert_eq!(game.view().lives, 2);
    game.tap_card(wrong);
    game.tap_card(wrong);
    assert!(game.view().is_game_over);
}

// --- endless mode ---

#[test]
fn endless_round_clear_scores_and_escalates() {
    let progress = SharedProgress::new(MemoryProgress::new());
    let mut game = EndlessMode::new(EndlessConfig::default(), progress.clone());
    game.start_game();

    let view = game.view();
    assert_eq!(view.level, 1);
    assert_eq!(view.grid_size, 2);
    assert!(view.can_tap);

    let first_targets = game.targets().clone();
    assert_eq!(first_targets.len(), 1);
    let target = *first_targets.iter().next().unwrap();
    game.tap_card(target);

    let view = game.view();
    assert!(view.is_level_cleared);
    // level 1, one target, 0.5s preview: 1 * 1 * floor(10 / 0.5) = 20.
    assert_eq!(view.score, 20);

    assert!(tick_until(&mut game, 50, |v| v.level == 2));
    assert_eq!(game.view().grid_size, 3);
    // Fresh targets avoid last round's positions.
    assert!(game.targets().is_disjoint(&first_targets));
}

#[test]
fn endless_score_decays_at_one_hertz_through_round_pauses() {
    let mut game = EndlessMode::new(EndlessConfig::default(), MemoryProgress::new());
    game.start_game();

    let target = *game.targets().iter().next().unwrap();
    game.tap_card(target);
    assert_eq!(game.view().score, 20);

    // First decay step lands one second after the clear, mid round-pause:
    // floor(20 × 0.95) = 19.
    assert!(tick_until(&mut game, 25, |v| v.score == 19));
    assert_eq!(game.view().phase, EnginePhase::Resolving);
    // The next one ticks over during the following round's preview.
    assert!(tick_until(&mut game, 25, |v| v.score == 18));
    assert_ne!(game.view().phase, EnginePhase::Active);
}

#[test]
fn endless_wrong_tap_rehides_and_costs_a_life() {
    let mut game = EndlessMode::new(EndlessConfig::default(), MemoryProgress::new());
    game.start_game();
    assert!(tick_until(&mut game, 50, |v| v.phase == EnginePhase::Active));

    let target = *game.targets().iter().next().unwrap();
    let wrong = (0..4).find(|&i| i != target).unwrap();
    game.tap_card(wrong);

    let view = game.view();
    assert_eq!(view.lives, 2);
    assert!(!view.can_tap);
    assert!(view.cards[wrong].is_face_up);

    // Taps stay locked until the card flips back (0.4s = 8 ticks).
    game.tap_card(target);
    assert_eq!(game.view().targets_remaining, 1);
    assert!(tick_until(&mut game, 10, |v| v.can_tap));
    assert!(!game.view().cards[wrong].is_face_up);
}

#[test]
fn endless_game_over_records_the_high_score() {
    let progress = SharedProgress::new(MemoryProgress::new());
    let mut game = EndlessMode::new(EndlessConfig::default(), progress.clone());
    game.start_game();

    let target = *game.targets().iter().next().unwrap();
    game.tap_card(target);
    assert!(tick_until(&mut game, 50, |v| v.phase == EnginePhase::Active));

    let mut lives = game.view().lives;
    while lives > 0 {
        let target = *game.targets().iter().next().unwrap();
        let area = game.view().cards.len();
        let wrong = (0..area)
            .find(|&i| !game.targets().contains(&i) && i != target)
            .unwrap();
        game.tap_card(wrong);
        lives = game.view().lives;
        if lives > 0 {
            assert!(tick_until(&mut game, 10, |v| v.can_tap));
        }
    }

    let view = game.view();
    assert!(view.is_game_over);
    assert!(view.score > 0);
    assert_eq!(progress.high_score(ModeId::Endless), view.score);

    // Decay halts at 0 lives; the final score is frozen.
    let frozen = view.score;
    for _ in 0..40 {
        game.tick();
    }
    assert_eq!(game.view().score, frozen);

    // A fresh run starts over from scratch.
    game.start_game();
    let view = game.view();
    assert_eq!(view.lives, 3);
    assert_eq!(view.score, 0);
    assert_eq!(view.level, 1);
    assert!(!view.is_game_over);
    // The recorded best survives the restart.
    assert!(progress.high_score(ModeId::Endless) > 0);
}

#[test]
fn endless_same_seed_same_views() {
    let mut a = EndlessMode::new(EndlessConfig::default(), MemoryProgress::new());
    let mut b = EndlessMode::new(EndlessConfig::default(), MemoryProgress::new());
    a.start_game();
    b.start_game();
    for _ in 0..200 {
        a.tick();
        b.tick();
        let ja = serde_json::to_string(&a.view()).unwrap();
        let jb = serde_json::to_string(&b.view()).unwrap();
        assert_eq!(ja, jb);
    }
}
