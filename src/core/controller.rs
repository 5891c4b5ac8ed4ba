//! The particle effects controller.
//!
//! A single-threaded actor: every input (start, resize, visibility, keys,
//! timer ticks, expiries, shutdown) arrives as an [`Event`] and is handled to
//! completion before the next one. DOM access goes through an
//! [`EffectsSurface`] and all time-based work through a [`Scheduler`].

use super::config::{optimal_count, EffectsConfig, Viewport};
use super::events::{command_for_chord, Command, Disposition, Event, Recurring};
use super::particle::{Particle, ParticleId, ParticleKind};
use super::rng::RandomSource;
use super::surface::{EffectsSurface, LiveParticle};
use super::timers::{Scheduler, TimerId};
use fnv::FnvHashSet;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Active,
    Paused,
}

/// State dumped by the debug shortcut.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugSnapshot {
    pub initialized: bool,
    pub visibility: Visibility,
    pub fireflies: usize,
    pub sparkles: usize,
    pub pending_expiries: usize,
    pub config: EffectsConfig,
}

pub struct Controller<S, T, R> {
    config: EffectsConfig,
    surface: S,
    timers: T,
    rng: R,
    initialized: bool,
    visibility: Visibility,
    viewport: Viewport,
    next_id: u64,
    recurring: SmallVec<[TimerId; 3]>,
    // Bumped per resize event; only the newest debounce may settle.
    resize_generation: u64,
    // Temporary particles still owed a removal. One-shot timers are never
    // cancelled, so a stale expiry is recognised by its id missing here.
    expiries: FnvHashSet<ParticleId>,
}

impl<S, T, R> Controller<S, T, R>
where
    S: EffectsSurface,
    T: Scheduler,
    R: RandomSource,
{
    pub fn new(surface: S, timers: T, rng: R, viewport: Viewport) -> Self {
        Self {
            config: EffectsConfig::for_viewport(viewport),
            surface,
            timers,
            rng,
            initialized: false,
            visibility: Visibility::Active,
            viewport,
            next_id: 0,
            recurring: SmallVec::new(),
            resize_generation: 0,
            expiries: FnvHashSet::default(),
        }
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn handle(&mut self, event: Event) -> Disposition {
        match event {
            Event::Start { viewport, hidden } => self.start(viewport, hidden),
            Event::Resize(viewport) => self.on_resize(viewport),
            Event::ResizeSettled { generation } => {
                if generation == self.resize_generation {
                    self.apply_viewport();
                }
            }
            Event::VisibilityChanged { hidden } => self.set_visibility(hidden),
            Event::Key(chord) => {
                return match command_for_chord(&chord) {
                    Some(cmd) => {
                        self.run_command(cmd);
                        Disposition::PreventDefault
                    }
                    None => Disposition::Default,
                };
            }
            Event::Command(cmd) => self.run_command(cmd),
            Event::Tick(Recurring::SpawnFirefly) => self.maybe_spawn(ParticleKind::Firefly),
            Event::Tick(Recurring::SpawnSparkle) => self.maybe_spawn(ParticleKind::Sparkle),
            Event::Tick(Recurring::Cleanup) => self.cleanup_excess(),
            Event::Expire { kind, id } => self.expire(kind, id),
            Event::Shutdown => self.shutdown(),
        }
        Disposition::Default
    }

    // ---------------- setup ----------------

    fn start(&mut self, viewport: Viewport, hidden: bool) {
        if self.initialized {
            return;
        }
        self.viewport = viewport;
        self.visibility = if hidden {
            Visibility::Paused
        } else {
            Visibility::Active
        };
        self.config = EffectsConfig::for_viewport(viewport);
        match self.setup() {
            Ok(()) => {
                self.initialized = true;
                log::info!(
                    "[effects] started fireflies={} sparkles={}",
                    self.config.fireflies.count,
                    self.config.sparkles.count
                );
            }
            Err(e) => {
                self.cancel_recurring();
                log::warn!("[effects] setup failed, effects disabled: {:#}", e);
            }
        }
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        for kind in ParticleKind::ALL {
            self.surface.ensure_container(kind)?;
        }
        self.populate_all()?;
        let fireflies = self.config.fireflies.spawn_period_ms;
        let sparkles = self.config.sparkles.spawn_period_ms;
        let cleanup = self.config.cleanup_period_ms;
        for (period, which) in [
            (fireflies, Recurring::SpawnFirefly),
            (sparkles, Recurring::SpawnSparkle),
            (cleanup, Recurring::Cleanup),
        ] {
            let id = self.timers.set_interval(period, Event::Tick(which));
            self.recurring.push(id);
        }
        Ok(())
    }

    fn alloc_id(&mut self) -> ParticleId {
        self.next_id += 1;
        ParticleId(self.next_id)
    }

    fn populate(&mut self, kind: ParticleKind) -> anyhow::Result<()> {
        if !self.surface.has_container(kind) {
            return Ok(());
        }
        let count = self.config.group(kind).count;
        let mut particles = Vec::with_capacity(count);
        for i in 0..count {
            let id = self.alloc_id();
            let group = self.config.group(kind);
            particles.push(Particle::generate(kind, id, Some(i), group, &mut self.rng));
        }
        self.surface.replace_all(kind, &particles)?;
        Ok(())
    }

    /// Rebuild both populations from scratch. Temporary particles are
    /// discarded along with their pending expiries.
    fn populate_all(&mut self) -> anyhow::Result<()> {
        self.expiries.clear();
        for kind in ParticleKind::ALL {
            self.populate(kind)?;
        }
        self.surface.set_paused(self.visibility == Visibility::Paused);
        Ok(())
    }

    // ---------------- resize ----------------

    fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.resize_generation += 1;
        let generation = self.resize_generation;
        self.timers.set_timeout(
            self.config.resize_debounce_ms,
            Event::ResizeSettled { generation },
        );
    }

    fn apply_viewport(&mut self) {
        let Viewport { width, height } = self.viewport;
        let fireflies = optimal_count(ParticleKind::Firefly, width, height);
        let sparkles = optimal_count(ParticleKind::Sparkle, width, height);
        if fireflies == self.config.fireflies.count && sparkles == self.config.sparkles.count {
            return;
        }
        log::info!(
            "[resize] {}x{} fireflies {} -> {} sparkles {} -> {}",
            width,
            height,
            self.config.fireflies.count,
            fireflies,
            self.config.sparkles.count,
            sparkles
        );
        self.config.fireflies.count = fireflies;
        self.config.sparkles.count = sparkles;
        if !self.initialized {
            return;
        }
        if let Err(e) = self.populate_all() {
            log::warn!("[resize] rebuild failed: {:#}", e);
        }
    }

    // ---------------- visibility ----------------

    fn set_visibility(&mut self, hidden: bool) {
        let next = if hidden {
            Visibility::Paused
        } else {
            Visibility::Active
        };
        if next == self.visibility {
            return;
        }
        self.visibility = next;
        self.surface.set_paused(hidden);
    }

    // ---------------- commands ----------------

    fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::ToggleVisibility => {
                if !self.initialized {
                    return;
                }
                for kind in ParticleKind::ALL {
                    self.surface.toggle_hidden(kind);
                }
                log::info!("[effects] toggled");
            }
            Command::Recreate => match self.populate_all() {
                Ok(()) => log::info!("[effects] recreated"),
                Err(e) => log::warn!("[effects] recreate failed: {:#}", e),
            },
            Command::DumpDebug => log::info!("[effects] debug {:?}", self.snapshot()),
        }
    }

    pub fn snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            initialized: self.initialized,
            visibility: self.visibility,
            fireflies: self.surface.live_count(ParticleKind::Firefly),
            sparkles: self.surface.live_count(ParticleKind::Sparkle),
            pending_expiries: self.expiries.len(),
            config: self.config.clone(),
        }
    }

    // ---------------- spawning ----------------

    fn maybe_spawn(&mut self, kind: ParticleKind) {
        if self.visibility == Visibility::Paused {
            return;
        }
        let chance = self.config.group(kind).spawn_chance;
        if self.rng.chance(chance) {
            self.spawn_transient(kind);
        }
    }

    /// Mount one temporary particle and schedule its removal.
    pub fn spawn_transient(&mut self, kind: ParticleKind) -> Option<ParticleId> {
        if !self.initialized || !self.surface.has_container(kind) {
            return None;
        }
        let id = self.alloc_id();
        let group = self.config.group(kind);
        let lifetime_ms = group.lifetime_ms;
        let particle = Particle::transient(kind, id, group, &mut self.rng);
        if let Err(e) = self.surface.append(&particle) {
            log::warn!("[effects] spawn {:?} failed: {}", kind, e);
            return None;
        }
        self.timers.set_timeout(lifetime_ms, Event::Expire { kind, id });
        self.expiries.insert(id);
        Some(id)
    }

    fn expire(&mut self, kind: ParticleKind, id: ParticleId) {
        // Already evicted by cleanup, a rebuild or shutdown: nothing to do.
        if self.expiries.remove(&id) {
            self.surface.remove(kind, id);
        }
    }

    // ---------------- cleanup ----------------

    fn cleanup_excess(&mut self) {
        for kind in ParticleKind::ALL {
            if !self.surface.has_container(kind) {
                continue;
            }
            let cap = self.config.group(kind).cleanup_cap();
            let live = self.surface.live_particles(kind);
            let victims = eviction_order(&live, cap);
            if victims.is_empty() {
                continue;
            }
            log::debug!(
                "[effects] cleanup {:?}: {} live, cap {}, evicting {}",
                kind,
                live.len(),
                cap,
                victims.len()
            );
            for id in victims {
                self.expiries.remove(&id);
                self.surface.remove(kind, id);
            }
        }
    }

    // ---------------- shutdown ----------------

    fn cancel_recurring(&mut self) {
        for id in self.recurring.drain(..) {
            self.timers.clear(id);
        }
    }

    fn shutdown(&mut self) {
        self.cancel_recurring();
        // Outstanding one-shots still fire, but find nothing to act on.
        self.resize_generation += 1;
        self.expiries.clear();
        if self.initialized {
            log::info!("[effects] shut down");
        }
        self.initialized = false;
    }
}

/// Particles to remove so that at most `cap` remain: temporary ones first,
/// then persistent ones, oldest first within each group.
pub fn eviction_order(live: &[LiveParticle], cap: usize) -> Vec<ParticleId> {
    let surplus = live.len().saturating_sub(cap);
    if surplus == 0 {
        return Vec::new();
    }
    live.iter()
        .filter(|p| p.temporary)
        .chain(live.iter().filter(|p| !p.temporary))
        .take(surplus)
        .map(|p| p.id)
        .collect()
}
