// Host-side tests for the effects controller, driven through the in-memory
// surface and the virtual clock.

use background_effects::core::headless::{run_for, ManualTimers, MemorySurface};
use background_effects::core::rng::{self, RandomSource, Sequence};
use background_effects::core::{
    eviction_order, Command, Controller, Disposition, EffectsSurface, Event, KeyChord,
    LiveParticle, ParticleId, ParticleKind, Recurring, Viewport, Visibility,
};

const FULL_HD: Viewport = Viewport {
    width: 1920.0,
    height: 1080.0,
};

fn started_with<R: RandomSource>(
    surface: MemorySurface,
    r: R,
    viewport: Viewport,
) -> Controller<MemorySurface, ManualTimers, R> {
    let mut ctl = Controller::new(surface, ManualTimers::new(), r, viewport);
    ctl.handle(Event::Start {
        viewport,
        hidden: false,
    });
    ctl
}

fn started(seed: u64) -> Controller<MemorySurface, ManualTimers, rand::rngs::StdRng> {
    started_with(MemorySurface::new(), rng::seeded(seed), FULL_HD)
}

fn ids<R: RandomSource>(
    ctl: &Controller<MemorySurface, ManualTimers, R>,
    kind: ParticleKind,
) -> Vec<ParticleId> {
    ctl.surface().particles(kind).iter().map(|p| p.id).collect()
}

fn count<R: RandomSource>(
    ctl: &Controller<MemorySurface, ManualTimers, R>,
    kind: ParticleKind,
) -> usize {
    ctl.surface().particles(kind).len()
}

fn chord(key: &str) -> KeyChord {
    KeyChord::new(key).ctrl().shift()
}

#[test]
fn setup_populates_exact_counts() {
    let ctl = started(1);
    assert!(ctl.is_initialized());
    assert_eq!(count(&ctl, ParticleKind::Firefly), 34);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 25);
    assert!(ctl.surface().container(ParticleKind::Firefly).unwrap().created);
    // Three recurring timers: two spawners and cleanup
    assert_eq!(ctl.timers().pending_count(), 3);
    // Initial particles are indexed and persistent
    let fireflies = ctl.surface().particles(ParticleKind::Firefly);
    assert!(fireflies.iter().all(|p| !p.temporary));
    assert_eq!(fireflies[0].index, Some(0));
    assert_eq!(fireflies[33].index, Some(33));
}

#[test]
fn setup_reuses_existing_containers() {
    let ctl = started_with(MemorySurface::with_existing_containers(), rng::seeded(1), FULL_HD);
    assert!(ctl.is_initialized());
    assert!(!ctl.surface().container(ParticleKind::Sparkle).unwrap().created);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 25);
}

#[test]
fn setup_failure_is_swallowed() {
    let mut ctl = started_with(MemorySurface::failing(), rng::seeded(1), FULL_HD);
    assert!(!ctl.is_initialized());
    assert_eq!(ctl.timers().pending_count(), 0);
    // Everything else degrades to no-ops
    ctl.handle(Event::Tick(Recurring::SpawnFirefly));
    ctl.handle(Event::Tick(Recurring::Cleanup));
    assert_eq!(ctl.spawn_transient(ParticleKind::Firefly), None);
    assert_eq!(
        ctl.handle(Event::Key(chord("E"))),
        Disposition::PreventDefault
    );
    assert!(!ctl.surface().is_hidden(ParticleKind::Firefly));
}

#[test]
fn start_is_idempotent() {
    let mut ctl = started(3);
    let before = ids(&ctl, ParticleKind::Firefly);
    ctl.handle(Event::Start {
        viewport: Viewport::new(400.0, 800.0),
        hidden: true,
    });
    assert_eq!(ctl.visibility(), Visibility::Active);
    assert_eq!(ids(&ctl, ParticleKind::Firefly), before);
    assert_eq!(ctl.timers().pending_count(), 3);
}

#[test]
fn firefly_expires_after_lifetime() {
    let mut ctl = started(4);
    let id = ctl.spawn_transient(ParticleKind::Firefly).unwrap();
    let spawned = ctl
        .surface()
        .particles(ParticleKind::Firefly)
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .unwrap();
    assert!(spawned.temporary);
    assert_eq!(spawned.delay_sec, 0.0);

    run_for(&mut ctl, 11_999);
    assert!(ids(&ctl, ParticleKind::Firefly).contains(&id));
    run_for(&mut ctl, 1);
    assert!(!ids(&ctl, ParticleKind::Firefly).contains(&id));
}

#[test]
fn sparkle_expires_after_lifetime() {
    let mut ctl = started(5);
    let id = ctl.spawn_transient(ParticleKind::Sparkle).unwrap();
    run_for(&mut ctl, 4_999);
    assert!(ids(&ctl, ParticleKind::Sparkle).contains(&id));
    run_for(&mut ctl, 1);
    assert!(!ids(&ctl, ParticleKind::Sparkle).contains(&id));
    assert_eq!(ctl.snapshot().pending_expiries, 0);
}

#[test]
fn expiry_of_detached_particle_is_noop() {
    let mut ctl = started(6);
    let before = ids(&ctl, ParticleKind::Sparkle);
    ctl.handle(Event::Expire {
        kind: ParticleKind::Sparkle,
        id: ParticleId(u64::MAX),
    });
    assert_eq!(ids(&ctl, ParticleKind::Sparkle), before);
    assert!(!ctl.surface_mut().remove(ParticleKind::Sparkle, ParticleId(u64::MAX)));
}

#[test]
fn spawn_ticks_follow_chance_and_visibility() {
    // 0.0 always wins the spawn roll
    let mut ctl = started_with(MemorySurface::new(), Sequence::new(vec![0.0]), FULL_HD);
    ctl.handle(Event::Tick(Recurring::SpawnFirefly));
    ctl.handle(Event::Tick(Recurring::SpawnSparkle));
    assert_eq!(count(&ctl, ParticleKind::Firefly), 35);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 26);

    ctl.handle(Event::VisibilityChanged { hidden: true });
    for _ in 0..10 {
        ctl.handle(Event::Tick(Recurring::SpawnFirefly));
        ctl.handle(Event::Tick(Recurring::SpawnSparkle));
    }
    assert_eq!(count(&ctl, ParticleKind::Firefly), 35);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 26);

    // 0.99 always loses it
    let mut ctl = started_with(MemorySurface::new(), Sequence::new(vec![0.99]), FULL_HD);
    for _ in 0..10 {
        ctl.handle(Event::Tick(Recurring::SpawnFirefly));
    }
    assert_eq!(count(&ctl, ParticleKind::Firefly), 34);
}

#[test]
fn visibility_transitions_are_idempotent() {
    let mut ctl = started(7);
    assert_eq!(ctl.visibility(), Visibility::Active);
    ctl.handle(Event::VisibilityChanged { hidden: true });
    ctl.handle(Event::VisibilityChanged { hidden: true });
    assert_eq!(ctl.visibility(), Visibility::Paused);
    assert!(ctl.surface().is_paused());
    ctl.handle(Event::VisibilityChanged { hidden: false });
    assert_eq!(ctl.visibility(), Visibility::Active);
    assert!(!ctl.surface().is_paused());
    ctl.handle(Event::VisibilityChanged { hidden: false });
    assert_eq!(ctl.visibility(), Visibility::Active);
}

#[test]
fn cleanup_caps_at_twice_target_evicting_temporaries_first() {
    let mut ctl = started(8);
    let persistent = ids(&ctl, ParticleKind::Firefly);
    for _ in 0..50 {
        ctl.spawn_transient(ParticleKind::Firefly).unwrap();
    }
    assert_eq!(count(&ctl, ParticleKind::Firefly), 84);
    assert_eq!(ctl.timers().pending_count(), 3 + 50);
    let all = ids(&ctl, ParticleKind::Firefly);

    ctl.handle(Event::Tick(Recurring::Cleanup));
    assert_eq!(count(&ctl, ParticleKind::Firefly), 68);
    let after = ids(&ctl, ParticleKind::Firefly);
    assert!(persistent.iter().all(|id| after.contains(id)));
    assert_eq!(ctl.snapshot().pending_expiries, 34);

    // Expiries of evicted temporaries still arrive but remove nothing
    for id in all.iter().filter(|id| !after.contains(id)) {
        ctl.handle(Event::Expire {
            kind: ParticleKind::Firefly,
            id: *id,
        });
    }
    assert_eq!(count(&ctl, ParticleKind::Firefly), 68);
    let survivor = *after.iter().find(|id| !persistent.contains(id)).unwrap();
    ctl.handle(Event::Expire {
        kind: ParticleKind::Firefly,
        id: survivor,
    });
    assert_eq!(count(&ctl, ParticleKind::Firefly), 67);
    assert_eq!(ctl.snapshot().pending_expiries, 33);
}

#[test]
fn cleanup_leaves_populations_under_cap_alone() {
    let mut ctl = started(9);
    let before = ids(&ctl, ParticleKind::Sparkle);
    ctl.handle(Event::Tick(Recurring::Cleanup));
    assert_eq!(ids(&ctl, ParticleKind::Sparkle), before);
}

#[test]
fn eviction_order_prefers_oldest_temporaries() {
    let p = |id, temporary| LiveParticle {
        id: ParticleId(id),
        temporary,
    };
    let all_persistent = [p(1, false), p(2, false), p(3, false), p(4, false), p(5, false)];
    assert_eq!(
        eviction_order(&all_persistent, 3),
        vec![ParticleId(1), ParticleId(2)]
    );
    let mixed = [p(1, false), p(2, true), p(3, false), p(4, true)];
    assert_eq!(
        eviction_order(&mixed, 1),
        vec![ParticleId(2), ParticleId(4), ParticleId(1)]
    );
    assert!(eviction_order(&mixed, 4).is_empty());
    assert!(eviction_order(&[], 0).is_empty());
}

#[test]
fn long_run_stays_bounded() {
    let mut ctl = started(10);
    for _ in 0..40 {
        run_for(&mut ctl, 30_000);
        assert!(count(&ctl, ParticleKind::Firefly) <= ctl.config().fireflies.cleanup_cap());
        assert!(count(&ctl, ParticleKind::Sparkle) <= ctl.config().sparkles.cleanup_cap());
    }
}

#[test]
fn toggle_twice_restores_visibility() {
    let mut ctl = started(11);
    assert_eq!(ctl.handle(Event::Key(chord("E"))), Disposition::PreventDefault);
    assert!(ctl.surface().is_hidden(ParticleKind::Firefly));
    assert!(ctl.surface().is_hidden(ParticleKind::Sparkle));
    ctl.handle(Event::Command(Command::ToggleVisibility));
    assert!(!ctl.surface().is_hidden(ParticleKind::Firefly));
    assert!(!ctl.surface().is_hidden(ParticleKind::Sparkle));
}

#[test]
fn unmatched_keys_keep_default_action() {
    let mut ctl = started(12);
    assert_eq!(ctl.handle(Event::Key(KeyChord::new("E").shift())), Disposition::Default);
    assert_eq!(ctl.handle(Event::Key(KeyChord::new("e").ctrl())), Disposition::Default);
    assert_eq!(ctl.handle(Event::Key(chord("X"))), Disposition::Default);
    assert!(!ctl.surface().is_hidden(ParticleKind::Firefly));
}

#[test]
fn recreate_rebuilds_and_drops_temporaries() {
    let mut ctl = started(13);
    let before = ids(&ctl, ParticleKind::Firefly);
    let firefly = ctl.spawn_transient(ParticleKind::Firefly).unwrap();
    let sparkle = ctl.spawn_transient(ParticleKind::Sparkle).unwrap();
    assert_eq!(
        ctl.handle(Event::Key(KeyChord::new("R").meta().shift())),
        Disposition::PreventDefault
    );
    let after = ids(&ctl, ParticleKind::Firefly);
    assert_eq!(after.len(), 34);
    assert!(after.iter().all(|id| !before.contains(id)));
    assert!(ctl
        .surface()
        .particles(ParticleKind::Sparkle)
        .iter()
        .all(|p| !p.temporary));
    assert_eq!(ctl.snapshot().pending_expiries, 0);
    // The old expiries still arrive and find nothing of theirs to remove
    let sparkles = ids(&ctl, ParticleKind::Sparkle);
    ctl.handle(Event::Expire {
        kind: ParticleKind::Firefly,
        id: firefly,
    });
    ctl.handle(Event::Expire {
        kind: ParticleKind::Sparkle,
        id: sparkle,
    });
    assert_eq!(ids(&ctl, ParticleKind::Firefly), after);
    assert_eq!(ids(&ctl, ParticleKind::Sparkle), sparkles);
}

#[test]
fn debug_snapshot_reports_state() {
    let mut ctl = started(14);
    assert_eq!(ctl.handle(Event::Key(chord("d"))), Disposition::PreventDefault);
    let snap = ctl.snapshot();
    assert!(snap.initialized);
    assert_eq!(snap.visibility, Visibility::Active);
    assert_eq!(snap.fireflies, 34);
    assert_eq!(snap.sparkles, 25);
    assert_eq!(snap.config.fireflies.count, 34);
}

#[test]
fn resize_burst_collapses_to_final_dimensions() {
    let mut ctl = started(15);
    let before = ids(&ctl, ParticleKind::Firefly);
    ctl.handle(Event::Resize(Viewport::new(400.0, 800.0)));
    run_for(&mut ctl, 100);
    ctl.handle(Event::Resize(Viewport::new(1280.0, 720.0)));
    run_for(&mut ctl, 100);
    ctl.handle(Event::Resize(Viewport::new(800.0, 1000.0)));
    run_for(&mut ctl, 249);
    // Still inside the quiet period
    assert_eq!(ids(&ctl, ParticleKind::Firefly), before);
    assert_eq!(ctl.config().fireflies.count, 34);

    run_for(&mut ctl, 1);
    assert_eq!(ctl.config().fireflies.count, 10);
    assert_eq!(ctl.config().sparkles.count, 8);
    assert_eq!(count(&ctl, ParticleKind::Firefly), 10);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 8);
    assert_eq!(ctl.timers().pending_count(), 3);
}

#[test]
fn resize_without_count_change_keeps_particles() {
    let mut ctl = started(16);
    let before = ids(&ctl, ParticleKind::Firefly);
    ctl.handle(Event::Resize(Viewport::new(1921.0, 1080.0)));
    run_for(&mut ctl, 250);
    assert_eq!(ids(&ctl, ParticleKind::Firefly), before);
}

#[test]
fn resize_rebuild_discards_temporaries() {
    let mut ctl = started(17);
    ctl.spawn_transient(ParticleKind::Firefly).unwrap();
    ctl.spawn_transient(ParticleKind::Sparkle).unwrap();
    ctl.handle(Event::Resize(Viewport::new(400.0, 800.0)));
    run_for(&mut ctl, 250);
    assert_eq!(count(&ctl, ParticleKind::Firefly), 4);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 3);
    assert_eq!(ctl.snapshot().pending_expiries, 0);
}

#[test]
fn shutdown_stops_recurring_timers() {
    let mut ctl = started(18);
    ctl.spawn_transient(ParticleKind::Firefly).unwrap();
    ctl.handle(Event::Resize(Viewport::new(400.0, 800.0)));
    assert_eq!(ctl.timers().pending_count(), 5);
    ctl.handle(Event::Shutdown);
    assert!(!ctl.is_initialized());
    // Recurring timers are gone; the two one-shots are left to lapse
    assert_eq!(ctl.timers().pending_count(), 2);
    let before = ids(&ctl, ParticleKind::Firefly);
    assert_eq!(run_for(&mut ctl, 120_000), 2);
    assert_eq!(ctl.timers().pending_count(), 0);
    // Particles stay mounted and the stale resize is ignored
    assert_eq!(ids(&ctl, ParticleKind::Firefly), before);
    assert_eq!(ctl.config().fireflies.count, 34);
}

#[test]
fn start_in_background_tab_pauses_spawning() {
    let viewport = FULL_HD;
    let mut ctl = Controller::new(
        MemorySurface::new(),
        ManualTimers::new(),
        Sequence::new(vec![0.0]),
        viewport,
    );
    ctl.handle(Event::Start {
        viewport,
        hidden: true,
    });
    assert!(ctl.is_initialized());
    assert_eq!(ctl.visibility(), Visibility::Paused);
    assert!(ctl.surface().is_paused());
    ctl.handle(Event::Tick(Recurring::SpawnFirefly));
    ctl.handle(Event::Tick(Recurring::SpawnSparkle));
    assert_eq!(count(&ctl, ParticleKind::Firefly), 34);
    assert_eq!(count(&ctl, ParticleKind::Sparkle), 25);

    // First look at the tab resumes spawning
    ctl.handle(Event::VisibilityChanged { hidden: false });
    assert!(!ctl.surface().is_paused());
    ctl.handle(Event::Tick(Recurring::SpawnFirefly));
    assert_eq!(count(&ctl, ParticleKind::Firefly), 35);
}

#[test]
fn stale_resize_settle_is_ignored() {
    let mut ctl = started(19);
    let before = ids(&ctl, ParticleKind::Firefly);
    ctl.handle(Event::Resize(Viewport::new(400.0, 800.0)));
    ctl.handle(Event::Resize(Viewport::new(800.0, 1000.0)));
    // Debounce from the first resize event lapses without effect
    ctl.handle(Event::ResizeSettled { generation: 1 });
    assert_eq!(ids(&ctl, ParticleKind::Firefly), before);
    assert_eq!(ctl.config().fireflies.count, 34);
    ctl.handle(Event::ResizeSettled { generation: 2 });
    assert_eq!(ctl.config().fireflies.count, 10);
    assert_eq!(count(&ctl, ParticleKind::Firefly), 10);
}
