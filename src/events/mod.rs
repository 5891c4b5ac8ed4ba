pub mod keyboard;

use crate::core::{Disposition, Event};
use crate::dom;
use crate::EffectsMailbox;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Registration {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Page listeners owned by one effects instance; removed on `remove_all`
/// or drop.
#[derive(Default)]
pub struct Listeners {
    registered: Vec<Registration>,
}

impl Listeners {
    fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<()> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("addEventListener({}): {:?}", kind, e))?;
        self.registered.push(Registration {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    pub fn remove_all(&mut self) {
        for r in self.registered.drain(..) {
            _ = r
                .target
                .remove_event_listener_with_callback(r.kind, r.closure.as_ref().unchecked_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Resize, visibility and keyboard listeners feeding the mailbox.
pub fn wire_page_listeners(
    window: &web::Window,
    document: &web::Document,
    mailbox: &Rc<EffectsMailbox>,
    listeners: &mut Listeners,
) -> anyhow::Result<()> {
    {
        let mb = mailbox.clone();
        let win = window.clone();
        listeners.add(window, "resize", move |_ev| {
            mb.post(Event::Resize(dom::viewport(&win)));
        })?;
    }
    {
        let mb = mailbox.clone();
        let doc = document.clone();
        listeners.add(document, "visibilitychange", move |_ev| {
            mb.post(Event::VisibilityChanged {
                hidden: doc.hidden(),
            });
        })?;
    }
    {
        let mb = mailbox.clone();
        listeners.add(document, "keydown", move |ev| {
            let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() else {
                return;
            };
            let chord = keyboard::chord_from_event(kev);
            if mb.post(Event::Key(chord)) == Some(Disposition::PreventDefault) {
                ev.prevent_default();
            }
        })?;
    }
    Ok(())
}

/// Post `Start` now, or on `DOMContentLoaded` while the document is still
/// loading.
pub fn start_when_ready(
    window: &web::Window,
    document: &web::Document,
    mailbox: &Rc<EffectsMailbox>,
    listeners: &mut Listeners,
) -> anyhow::Result<()> {
    let start = |window: &web::Window, document: &web::Document| Event::Start {
        viewport: dom::viewport(window),
        hidden: document.hidden(),
    };
    if document.ready_state() != "loading" {
        mailbox.post(start(window, document));
        return Ok(());
    }
    let mb = mailbox.clone();
    let win = window.clone();
    let doc = document.clone();
    listeners.add(document, "DOMContentLoaded", move |_ev| {
        // Start is idempotent, so a stray second dispatch is harmless.
        mb.post(start(&win, &doc));
    })
}
