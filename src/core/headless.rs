//! In-memory stand-ins for the DOM and the browser timer queue.
//!
//! Used by the native simulator and the host-side tests; they follow the
//! same contracts as the `web` implementations.

use super::constants::HIDDEN_CLASS;
use super::controller::Controller;
use super::events::Event;
use super::particle::{Particle, ParticleId, ParticleKind};
use super::rng::RandomSource;
use super::surface::{EffectsSurface, LiveParticle, SurfaceError};
use super::timers::{Scheduler, TimerId};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct MemoryContainer {
    pub particles: Vec<Particle>,
    pub classes: Vec<&'static str>,
    /// Created by us rather than found in the page.
    pub created: bool,
}

#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    fireflies: Option<MemoryContainer>,
    sparkles: Option<MemoryContainer>,
    paused: bool,
    fail_containers: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose page already contains both containers.
    pub fn with_existing_containers() -> Self {
        Self {
            fireflies: Some(MemoryContainer::default()),
            sparkles: Some(MemoryContainer::default()),
            ..Self::default()
        }
    }

    /// Surface on which every container lookup fails, as on a page without
    /// a body.
    pub fn failing() -> Self {
        Self {
            fail_containers: true,
            ..Self::default()
        }
    }

    pub fn container(&self, kind: ParticleKind) -> Option<&MemoryContainer> {
        match kind {
            ParticleKind::Firefly => self.fireflies.as_ref(),
            ParticleKind::Sparkle => self.sparkles.as_ref(),
        }
    }

    fn container_mut(&mut self, kind: ParticleKind) -> Option<&mut MemoryContainer> {
        match kind {
            ParticleKind::Firefly => self.fireflies.as_mut(),
            ParticleKind::Sparkle => self.sparkles.as_mut(),
        }
    }

    pub fn particles(&self, kind: ParticleKind) -> &[Particle] {
        self.container(kind)
            .map(|c| c.particles.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl EffectsSurface for MemorySurface {
    fn ensure_container(&mut self, kind: ParticleKind) -> Result<(), SurfaceError> {
        if self.fail_containers {
            return Err(SurfaceError::MissingContainer(kind.group_name()));
        }
        let slot = match kind {
            ParticleKind::Firefly => &mut self.fireflies,
            ParticleKind::Sparkle => &mut self.sparkles,
        };
        if slot.is_none() {
            *slot = Some(MemoryContainer {
                created: true,
                ..MemoryContainer::default()
            });
        }
        Ok(())
    }

    fn has_container(&self, kind: ParticleKind) -> bool {
        self.container(kind).is_some()
    }

    fn replace_all(
        &mut self,
        kind: ParticleKind,
        particles: &[Particle],
    ) -> Result<(), SurfaceError> {
        let c = self
            .container_mut(kind)
            .ok_or(SurfaceError::MissingContainer(kind.group_name()))?;
        c.particles = particles.to_vec();
        Ok(())
    }

    fn append(&mut self, particle: &Particle) -> Result<(), SurfaceError> {
        let c = self
            .container_mut(particle.kind)
            .ok_or(SurfaceError::MissingContainer(particle.kind.group_name()))?;
        c.particles.push(particle.clone());
        Ok(())
    }

    fn remove(&mut self, kind: ParticleKind, id: ParticleId) -> bool {
        let Some(c) = self.container_mut(kind) else {
            return false;
        };
        match c.particles.iter().position(|p| p.id == id) {
            Some(i) => {
                c.particles.remove(i);
                true
            }
            None => false,
        }
    }

    fn live_particles(&self, kind: ParticleKind) -> Vec<LiveParticle> {
        self.particles(kind)
            .iter()
            .map(|p| LiveParticle {
                id: p.id,
                temporary: p.temporary,
            })
            .collect()
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn toggle_hidden(&mut self, kind: ParticleKind) -> bool {
        let Some(c) = self.container_mut(kind) else {
            return false;
        };
        if let Some(i) = c.classes.iter().position(|&cl| cl == HIDDEN_CLASS) {
            c.classes.remove(i);
            false
        } else {
            c.classes.push(HIDDEN_CLASS);
            true
        }
    }

    fn is_hidden(&self, kind: ParticleKind) -> bool {
        self.container(kind)
            .map(|c| c.classes.contains(&HIDDEN_CLASS))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug)]
struct PendingTimer {
    due_ms: u64,
    period_ms: Option<u32>,
    event: Event,
}

/// Virtual clock. Timers fire only when the owner calls [`ManualTimers::fire_next`]
/// or drives a controller with [`run_for`].
#[derive(Clone, Debug, Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<TimerId, PendingTimer>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time. Intervals re-arm.
    pub fn fire_next(&mut self, until_ms: u64) -> Option<Event> {
        let id = self
            .pending
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(id, t)| (t.due_ms, **id))
            .map(|(id, _)| *id)?;
        let timer = self.pending.remove(&id)?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        let event = timer.event.clone();
        if let Some(period) = timer.period_ms {
            self.pending.insert(
                id,
                PendingTimer {
                    due_ms: timer.due_ms + u64::from(period.max(1)),
                    ..timer
                },
            );
        }
        Some(event)
    }

    fn insert(&mut self, delay_ms: u32, period_ms: Option<u32>, event: Event) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert(
            id,
            PendingTimer {
                due_ms: self.now_ms + u64::from(delay_ms),
                period_ms,
                event,
            },
        );
        id
    }
}

impl Scheduler for ManualTimers {
    fn set_timeout(&mut self, delay_ms: u32, event: Event) {
        self.insert(delay_ms, None, event);
    }

    fn set_interval(&mut self, period_ms: u32, event: Event) -> TimerId {
        self.insert(period_ms, Some(period_ms), event)
    }

    fn clear(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}

/// Drive a headless controller for `ms` of virtual time, handling each timer
/// event at its due time. Returns the number of events handled.
pub fn run_for<R: RandomSource>(
    controller: &mut Controller<MemorySurface, ManualTimers, R>,
    ms: u64,
) -> usize {
    let target = controller.timers().now_ms() + ms;
    let mut handled = 0;
    while let Some(ev) = controller.timers_mut().fire_next(target) {
        controller.handle(ev);
        handled += 1;
    }
    controller.timers_mut().now_ms = target;
    handled
}
