use crate::core::{Event, Scheduler, TimerId};
use fnv::FnvHashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Where fired timers deliver their events (the controller's mailbox).
pub type EventSink = Rc<dyn Fn(Event)>;

/// `setTimeout` / `setInterval` behind the `Scheduler` trait.
pub struct BrowserTimers {
    window: web::Window,
    sink: EventSink,
    next_id: u64,
    // One-shot closures free themselves after firing and are never cleared,
    // so only intervals need their closure kept alive here.
    intervals: FnvHashMap<TimerId, (i32, Closure<dyn FnMut()>)>,
}

impl BrowserTimers {
    pub fn new(window: web::Window, sink: EventSink) -> Self {
        Self {
            window,
            sink,
            next_id: 0,
            intervals: FnvHashMap::default(),
        }
    }

    fn alloc(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

impl Scheduler for BrowserTimers {
    fn set_timeout(&mut self, delay_ms: u32, event: Event) {
        let sink = self.sink.clone();
        let callback = Closure::once_into_js(move || sink(event));
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            )
        {
            log::warn!("[timers] setTimeout failed: {:?}", e);
        }
    }

    fn set_interval(&mut self, period_ms: u32, event: Event) -> TimerId {
        let id = self.alloc();
        let sink = self.sink.clone();
        let closure = Closure::wrap(Box::new(move || sink(event.clone())) as Box<dyn FnMut()>);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            ) {
            Ok(handle) => {
                self.intervals.insert(id, (handle, closure));
            }
            Err(e) => log::warn!("[timers] setInterval failed: {:?}", e),
        }
        id
    }

    fn clear(&mut self, id: TimerId) {
        if let Some((handle, _closure)) = self.intervals.remove(&id) {
            self.window.clear_interval_with_handle(handle);
        }
    }
}
