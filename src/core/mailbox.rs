use super::events::{Disposition, Event};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Anything that consumes events one at a time.
pub trait Actor {
    fn handle(&mut self, event: Event) -> Disposition;
}

impl<S, T, R> Actor for super::controller::Controller<S, T, R>
where
    S: super::surface::EffectsSurface,
    T: super::timers::Scheduler,
    R: super::rng::RandomSource,
{
    fn handle(&mut self, event: Event) -> Disposition {
        super::controller::Controller::handle(self, event)
    }
}

/// Single ordered inbound queue in front of an actor.
///
/// Listener and timer callbacks post here. If an event arrives while another
/// is being handled it is queued and picked up by the pump already running,
/// so handlers never interleave.
pub struct Mailbox<A> {
    queue: RefCell<VecDeque<Event>>,
    actor: RefCell<A>,
}

impl<A: Actor> Mailbox<A> {
    pub fn new(actor: A) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            actor: RefCell::new(actor),
        }
    }

    /// Enqueue `event` and drain the queue if nobody else is.
    ///
    /// Returns the disposition of `event` when it was handled right away, or
    /// `None` when it was queued behind a running pump.
    pub fn post(&self, event: Event) -> Option<Disposition> {
        self.queue.borrow_mut().push_back(event);
        let Ok(mut actor) = self.actor.try_borrow_mut() else {
            return None;
        };
        let mut first = None;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(ev) = next else { break };
            let d = actor.handle(ev);
            if first.is_none() {
                first = Some(d);
            }
        }
        first
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run `f` against the actor, e.g. to read a snapshot. Returns `None` if
    /// called from inside a handler.
    pub fn with<O>(&self, f: impl FnOnce(&mut A) -> O) -> Option<O> {
        self.actor.try_borrow_mut().ok().map(|mut a| f(&mut a))
    }
}
