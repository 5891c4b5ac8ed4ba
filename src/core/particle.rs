use super::config::GroupConfig;
use super::constants::*;
use super::rng::RandomSource;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Firefly,
    Sparkle,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 2] = [ParticleKind::Firefly, ParticleKind::Sparkle];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fireflies" | "firefly" => Some(ParticleKind::Firefly),
            "sparkles" | "sparkle" => Some(ParticleKind::Sparkle),
            _ => None,
        }
    }

    /// Group name, also the container id.
    pub fn group_name(self) -> &'static str {
        match self {
            ParticleKind::Firefly => FIREFLIES_CONTAINER_ID,
            ParticleKind::Sparkle => SPARKLES_CONTAINER_ID,
        }
    }

    /// CSS class carried by every particle of this kind.
    pub fn class_name(self) -> &'static str {
        match self {
            ParticleKind::Firefly => FIREFLY_CLASS,
            ParticleKind::Sparkle => SPARKLE_CLASS,
        }
    }
}

/// Identifier allocated by the controller; unique for the controller's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: ParticleKind,
    /// Position in the initial population; `None` for spawned particles.
    pub index: Option<usize>,
    pub left_pct: f64,
    pub top_pct: Option<f64>,
    pub delay_sec: f64,
    pub duration_sec: Option<f64>,
    pub color: &'static str,
    pub size_px: Option<f64>,
    pub temporary: bool,
}

pub type StyleDecls = SmallVec<[(&'static str, String); 8]>;

impl Particle {
    /// Randomized particle for the initial population or a spawn.
    pub fn generate(
        kind: ParticleKind,
        id: ParticleId,
        index: Option<usize>,
        group: &GroupConfig,
        rng: &mut impl RandomSource,
    ) -> Self {
        let left_pct = rng.range(0.0, 100.0);
        let top_pct = match kind {
            ParticleKind::Sparkle => Some(rng.range(0.0, 100.0)),
            ParticleKind::Firefly => None,
        };
        let delay_sec = rng.range(0.0, group.max_delay_sec);
        let duration_sec = match kind {
            ParticleKind::Firefly => Some(rng.range(group.duration.min_sec, group.duration.max_sec)),
            ParticleKind::Sparkle => None,
        };
        let color = if group.colors.is_empty() {
            "#ffffff"
        } else {
            group.colors[rng.index(group.colors.len())]
        };
        let size_px = rng
            .chance(group.oversize_chance)
            .then(|| rng.range(group.oversize_px.0, group.oversize_px.1));
        Self {
            id,
            kind,
            index,
            left_pct,
            top_pct,
            delay_sec,
            duration_sec,
            color,
            size_px,
            temporary: false,
        }
    }

    /// Particle spawned by a timer: starts immediately and is marked temporary.
    pub fn transient(
        kind: ParticleKind,
        id: ParticleId,
        group: &GroupConfig,
        rng: &mut impl RandomSource,
    ) -> Self {
        let mut p = Self::generate(kind, id, None, group, rng);
        p.delay_sec = 0.0;
        if kind == ParticleKind::Firefly {
            p.duration_sec = Some(rng.range(group.duration.min_sec, group.duration.max_sec));
        }
        p.temporary = true;
        p
    }

    /// Class list in the order it is applied to the element.
    pub fn classes(&self) -> SmallVec<[&'static str; 2]> {
        let mut c = SmallVec::new();
        c.push(self.kind.class_name());
        if self.temporary {
            c.push(TEMPORARY_CLASS);
        }
        c
    }

    /// Value for `data-index`; spawned particles use `-1`.
    pub fn index_attr(&self) -> String {
        self.index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-1".to_string())
    }

    /// Inline style declarations as (CSS property, value) pairs.
    pub fn style_decls(&self) -> StyleDecls {
        let mut decls = StyleDecls::new();
        decls.push(("left", format!("{}%", css_number(self.left_pct))));
        if let Some(top) = self.top_pct {
            decls.push(("top", format!("{}%", css_number(top))));
        }
        decls.push(("animation-delay", format!("{}s", css_number(self.delay_sec))));
        if let Some(d) = self.duration_sec {
            decls.push(("animation-duration", format!("{}s", css_number(d))));
        }
        decls.push(("background", self.color.to_string()));
        if self.kind == ParticleKind::Firefly {
            let c = self.color;
            decls.push((
                "box-shadow",
                format!("0 0 10px {c}, 0 0 20px {c}, 0 0 30px {c}"),
            ));
        }
        if let Some(size) = self.size_px {
            let px = format!("{}px", css_number(size));
            decls.push(("width", px.clone()));
            decls.push(("height", px));
        }
        decls
    }
}

/// Three decimals, trailing zeros dropped (`2.500` -> `2.5`, `0.000` -> `0`).
pub fn css_number(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
