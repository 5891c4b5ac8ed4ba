//! The seam between the controller and whatever actually displays particles.
//!
//! In the browser this is the DOM (`web::DomSurface`); on the host it is
//! `headless::MemorySurface`.

use super::particle::{Particle, ParticleId, ParticleKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("missing #{0} container")]
    MissingContainer(&'static str),
    #[error("dom: {0}")]
    Dom(String),
}

/// A particle currently attached to its container, in child order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveParticle {
    pub id: ParticleId,
    pub temporary: bool,
}

pub trait EffectsSurface {
    /// Reuse the container if the page already has one, otherwise create it.
    fn ensure_container(&mut self, kind: ParticleKind) -> Result<(), SurfaceError>;

    fn has_container(&self, kind: ParticleKind) -> bool;

    /// Empty the container and mount `particles` in order.
    fn replace_all(
        &mut self,
        kind: ParticleKind,
        particles: &[Particle],
    ) -> Result<(), SurfaceError>;

    fn append(&mut self, particle: &Particle) -> Result<(), SurfaceError>;

    /// Detach a particle. Returns `false` if it was already gone.
    fn remove(&mut self, kind: ParticleKind, id: ParticleId) -> bool;

    /// Attached particles, oldest first.
    fn live_particles(&self, kind: ParticleKind) -> Vec<LiveParticle>;

    fn live_count(&self, kind: ParticleKind) -> usize {
        self.live_particles(kind).len()
    }

    /// Pause or resume every particle animation.
    fn set_paused(&mut self, paused: bool);

    /// Toggle the hidden class on a container; returns the new hidden state.
    fn toggle_hidden(&mut self, kind: ParticleKind) -> bool;

    fn is_hidden(&self, kind: ParticleKind) -> bool;
}
