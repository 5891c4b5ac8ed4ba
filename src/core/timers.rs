use super::events::Event;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Timer service the controller uses for everything time-based. Fired timers
/// come back as `Event`s through the controller's inbound queue.
pub trait Scheduler {
    /// One-shot. Always fires once; the controller drops events it no longer
    /// cares about when they arrive.
    fn set_timeout(&mut self, delay_ms: u32, event: Event);
    fn set_interval(&mut self, period_ms: u32, event: Event) -> TimerId;
    /// Stop an interval. Unknown ids are a no-op.
    fn clear(&mut self, id: TimerId);
}
