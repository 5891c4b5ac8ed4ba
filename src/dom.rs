use crate::core::constants::{HIDDEN_CLASS, PARTICLE_ID_ATTR, PARTICLE_INDEX_ATTR, TEMPORARY_CLASS};
use crate::core::{EffectsSurface, LiveParticle, Particle, ParticleId, ParticleKind, SurfaceError};
use crate::core::config::Viewport;
use fnv::FnvHashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> SurfaceError {
    SurfaceError::Dom(format!("{:?}", e))
}

/// Current `innerWidth` x `innerHeight`; zero when the browser won't say.
pub fn viewport(window: &web::Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Particle containers and elements living in the page.
pub struct DomSurface {
    document: web::Document,
    fireflies: Option<web::Element>,
    sparkles: Option<web::Element>,
    elements: FnvHashMap<ParticleId, (ParticleKind, web::HtmlElement)>,
}

impl DomSurface {
    pub fn new(document: web::Document) -> Self {
        Self {
            document,
            fireflies: None,
            sparkles: None,
            elements: FnvHashMap::default(),
        }
    }

    fn container(&self, kind: ParticleKind) -> Option<&web::Element> {
        match kind {
            ParticleKind::Firefly => self.fireflies.as_ref(),
            ParticleKind::Sparkle => self.sparkles.as_ref(),
        }
    }

    fn build_element(&self, p: &Particle) -> Result<web::HtmlElement, SurfaceError> {
        let el = self
            .document
            .create_element("div")
            .map_err(js_err)?
            .dyn_into::<web::HtmlElement>()
            .map_err(|_| SurfaceError::Dom("div is not an HtmlElement".into()))?;
        el.set_class_name(&p.classes().join(" "));
        el.set_attribute(PARTICLE_INDEX_ATTR, &p.index_attr())
            .map_err(js_err)?;
        el.set_attribute(PARTICLE_ID_ATTR, &p.id.0.to_string())
            .map_err(js_err)?;
        let style = el.style();
        for (prop, value) in p.style_decls() {
            style.set_property(prop, &value).map_err(js_err)?;
        }
        Ok(el)
    }
}

impl EffectsSurface for DomSurface {
    fn ensure_container(&mut self, kind: ParticleKind) -> Result<(), SurfaceError> {
        if self.container(kind).is_some() {
            return Ok(());
        }
        let id = kind.group_name();
        let el = match self.document.get_element_by_id(id) {
            Some(existing) => existing,
            None => {
                let body = self.document.body().ok_or(SurfaceError::NoBody)?;
                let el = self.document.create_element("div").map_err(js_err)?;
                el.set_id(id);
                el.set_class_name(id);
                body.append_child(&el).map_err(js_err)?;
                log::info!("[dom] created #{}", id);
                el
            }
        };
        match kind {
            ParticleKind::Firefly => self.fireflies = Some(el),
            ParticleKind::Sparkle => self.sparkles = Some(el),
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
        let container = self
            .container(kind)
            .cloned()
            .ok_or(SurfaceError::MissingContainer(kind.group_name()))?;
        container.set_inner_html("");
        self.elements.retain(|_, (k, _)| *k != kind);
        let fragment = self.document.create_document_fragment();
        for p in particles {
            let el = self.build_element(p)?;
            fragment.append_child(&el).map_err(js_err)?;
            self.elements.insert(p.id, (kind, el));
        }
        container.append_child(&fragment).map_err(js_err)?;
        Ok(())
    }

    fn append(&mut self, particle: &Particle) -> Result<(), SurfaceError> {
        let container = self
            .container(particle.kind)
            .cloned()
            .ok_or(SurfaceError::MissingContainer(particle.kind.group_name()))?;
        let el = self.build_element(particle)?;
        container.append_child(&el).map_err(js_err)?;
        self.elements.insert(particle.id, (particle.kind, el));
        Ok(())
    }

    fn remove(&mut self, _kind: ParticleKind, id: ParticleId) -> bool {
        match self.elements.remove(&id) {
            Some((_, el)) if el.parent_node().is_some() => {
                el.remove();
                true
            }
            _ => false,
        }
    }

    fn live_particles(&self, kind: ParticleKind) -> Vec<LiveParticle> {
        let Some(container) = self.container(kind) else {
            return Vec::new();
        };
        let children = container.children();
        let mut out = Vec::with_capacity(children.length() as usize);
        for i in 0..children.length() {
            let Some(child) = children.item(i) else { continue };
            let classes = child.class_list();
            if !classes.contains(kind.class_name()) {
                continue;
            }
            // Elements the page put there itself carry no id; leave them alone.
            let Some(pid) = child
                .get_attribute(PARTICLE_ID_ATTR)
                .and_then(|s| s.parse::<u64>().ok())
            else {
                continue;
            };
            out.push(LiveParticle {
                id: ParticleId(pid),
                temporary: classes.contains(TEMPORARY_CLASS),
            });
        }
        out
    }

    fn set_paused(&mut self, paused: bool) {
        let state = if paused { "paused" } else { "running" };
        let Ok(nodes) = self.document.query_selector_all(".firefly, .sparkle") else {
            return;
        };
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) {
                _ = el.style().set_property("animation-play-state", state);
            }
        }
    }

    fn toggle_hidden(&mut self, kind: ParticleKind) -> bool {
        self.container(kind)
            .and_then(|c| c.class_list().toggle(HIDDEN_CLASS).ok())
            .unwrap_or(false)
    }

    fn is_hidden(&self, kind: ParticleKind) -> bool {
        self.container(kind)
            .map(|c| c.class_list().contains(HIDDEN_CLASS))
            .unwrap_or(false)
    }
}
