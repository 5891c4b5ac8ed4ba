//! Ambient firefly and sparkle particles for web pages.
//!
//! The platform-neutral part lives in [`core`]; the browser front-end below
//! is only compiled for `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod scheduler;

#[cfg(target_arch = "wasm32")]
pub use web_front::BackgroundEffects;

#[cfg(target_arch = "wasm32")]
pub(crate) type EffectsMailbox = crate::core::Mailbox<
    crate::core::Controller<dom::DomSurface, scheduler::BrowserTimers, rand::rngs::StdRng>,
>;

#[cfg(target_arch = "wasm32")]
mod web_front {
    use crate::core::{rng, Command, Controller, Event, Mailbox, Viewport};
    use crate::dom::{self, DomSurface};
    use crate::events::{self, Listeners};
    use crate::scheduler::{BrowserTimers, EventSink};
    use crate::EffectsMailbox;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        Ok(())
    }

    struct Wired {
        mailbox: Rc<EffectsMailbox>,
        listeners: Listeners,
    }

    /// Handle owned by the host page: `const fx = new BackgroundEffects()`.
    ///
    /// Construction never throws; if the page can't host the effects the
    /// handle is inert and a warning is logged.
    #[wasm_bindgen]
    pub struct BackgroundEffects {
        inner: Option<Wired>,
    }

    #[wasm_bindgen]
    impl BackgroundEffects {
        #[wasm_bindgen(constructor)]
        pub fn new() -> BackgroundEffects {
            Self::build(None)
        }

        /// Deterministic particle layout, mostly for demos and screenshots.
        #[wasm_bindgen(js_name = withSeed)]
        pub fn with_seed(seed: u32) -> BackgroundEffects {
            Self::build(Some(u64::from(seed)))
        }

        pub fn toggle(&self) {
            self.post(Event::Command(Command::ToggleVisibility));
        }

        pub fn recreate(&self) {
            self.post(Event::Command(Command::Recreate));
        }

        pub fn debug(&self) {
            self.post(Event::Command(Command::DumpDebug));
        }

        #[wasm_bindgen(js_name = isInitialized)]
        pub fn is_initialized(&self) -> bool {
            self.inner
                .as_ref()
                .and_then(|w| w.mailbox.with(|c| c.is_initialized()))
                .unwrap_or(false)
        }

        /// `{ fireflies, sparkles, initialized, paused }` as a plain object.
        #[wasm_bindgen(js_name = debugState)]
        pub fn debug_state(&self) -> JsValue {
            let obj = js_sys::Object::new();
            let Some(snap) = self
                .inner
                .as_ref()
                .and_then(|w| w.mailbox.with(|c| c.snapshot()))
            else {
                return obj.into();
            };
            let set = |k: &str, v: JsValue| {
                _ = js_sys::Reflect::set(&obj, &JsValue::from_str(k), &v);
            };
            set("fireflies", JsValue::from(snap.fireflies as u32));
            set("sparkles", JsValue::from(snap.sparkles as u32));
            set(
                "targetFireflies",
                JsValue::from(snap.config.fireflies.count as u32),
            );
            set(
                "targetSparkles",
                JsValue::from(snap.config.sparkles.count as u32),
            );
            set("initialized", JsValue::from_bool(snap.initialized));
            set(
                "paused",
                JsValue::from_bool(snap.visibility == crate::core::Visibility::Paused),
            );
            obj.into()
        }

        /// Stop all timers and detach listeners. Particles stay in the page.
        pub fn shutdown(&mut self) {
            if let Some(mut w) = self.inner.take() {
                w.listeners.remove_all();
                w.mailbox.post(Event::Shutdown);
            }
        }
    }

    impl BackgroundEffects {
        fn build(seed: Option<u64>) -> BackgroundEffects {
            match wire(seed) {
                Ok(inner) => BackgroundEffects { inner: Some(inner) },
                Err(e) => {
                    log::warn!("[effects] unavailable: {:#}", e);
                    BackgroundEffects { inner: None }
                }
            }
        }

        fn post(&self, event: Event) {
            if let Some(w) = &self.inner {
                w.mailbox.post(event);
            }
        }
    }

    impl Default for BackgroundEffects {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for BackgroundEffects {
        fn drop(&mut self) {
            self.shutdown();
        }
    }

    fn wire(seed: Option<u64>) -> anyhow::Result<Wired> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        let rng = match seed {
            Some(s) => rng::seeded(s),
            None => rng::from_entropy(),
        };
        let initial: Viewport = dom::viewport(&window);
        let surface = DomSurface::new(document.clone());
        let timer_window = window.clone();
        let mailbox: Rc<EffectsMailbox> = Rc::new_cyclic(|weak: &Weak<EffectsMailbox>| {
            let weak = weak.clone();
            let sink: EventSink = Rc::new(move |ev: Event| {
                if let Some(mb) = weak.upgrade() {
                    mb.post(ev);
                }
            });
            Mailbox::new(Controller::new(
                surface,
                BrowserTimers::new(timer_window, sink),
                rng,
                initial,
            ))
        });

        let mut listeners = Listeners::default();
        events::wire_page_listeners(&window, &document, &mailbox, &mut listeners)?;
        events::start_when_ready(&window, &document, &mailbox, &mut listeners)?;
        log::info!("[effects] wired {} listeners", listeners.len());
        Ok(Wired { mailbox, listeners })
    }
}
