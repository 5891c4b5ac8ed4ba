//! Population sizing and per-group configuration.
//!
//! Everything here is a pure function of the viewport, so the same values are
//! used by the browser front-end, the native simulator and the tests.

use super::constants::*;
use super::particle::ParticleKind;

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    // Garbage from the host (NaN, negative) collapses to zero area.
    fn sanitized(self) -> (f64, f64) {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        (clean(self.width), clean(self.height))
    }

    pub fn area(self) -> f64 {
        let (w, h) = self.sanitized();
        w * h
    }

    pub fn device_class(self) -> DeviceClass {
        DeviceClass::from_width(self.sanitized().0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn from_width(width: f64) -> Self {
        if width < TABLET_MIN_WIDTH {
            DeviceClass::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            DeviceClass::Mobile => 0,
            DeviceClass::Tablet => 1,
            DeviceClass::Desktop => 2,
        }
    }
}

/// Smallest population a group may have on the given device class.
pub fn min_count(kind: ParticleKind, class: DeviceClass) -> usize {
    match kind {
        ParticleKind::Firefly => FIREFLY_MIN_COUNTS[class.slot()],
        ParticleKind::Sparkle => SPARKLE_MIN_COUNTS[class.slot()],
    }
}

/// Target population for `kind` on a `width` x `height` viewport.
pub fn optimal_count(kind: ParticleKind, width: f64, height: f64) -> usize {
    let viewport = Viewport::new(width, height);
    let class = viewport.device_class();
    let divisor = match kind {
        ParticleKind::Firefly => FIREFLY_AREA_DIVISORS[class.slot()],
        ParticleKind::Sparkle => SPARKLE_AREA_DIVISORS[class.slot()],
    };
    let scaled = (viewport.area() / divisor).floor() as usize;
    scaled.max(min_count(kind, class))
}

/// Same as [`optimal_count`] but keyed by group name; unknown names get
/// [`DEFAULT_COUNT`].
pub fn optimal_count_for_name(name: &str, width: f64, height: f64) -> usize {
    match ParticleKind::from_name(name) {
        Some(kind) => optimal_count(kind, width, height),
        None => DEFAULT_COUNT,
    }
}

/// Animation duration bounds in seconds (inclusive min, exclusive max).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationRange {
    pub min_sec: f64,
    pub max_sec: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupConfig {
    pub count: usize,
    pub duration: DurationRange,
    pub max_delay_sec: f64,
    pub colors: &'static [&'static str],
    pub oversize_chance: f64,
    pub oversize_px: (f64, f64),
    pub spawn_period_ms: u32,
    pub spawn_chance: f64,
    pub lifetime_ms: u32,
}

impl GroupConfig {
    pub fn fireflies(count: usize) -> Self {
        Self {
            count,
            duration: DurationRange {
                min_sec: FIREFLY_MIN_DURATION_SEC,
                max_sec: FIREFLY_MAX_DURATION_SEC,
            },
            max_delay_sec: FIREFLY_MAX_DELAY_SEC,
            colors: FIREFLY_COLORS,
            oversize_chance: FIREFLY_OVERSIZE_CHANCE,
            oversize_px: FIREFLY_OVERSIZE_PX,
            spawn_period_ms: FIREFLY_SPAWN_PERIOD_MS,
            spawn_chance: FIREFLY_SPAWN_CHANCE,
            lifetime_ms: FIREFLY_LIFETIME_MS,
        }
    }

    pub fn sparkles(count: usize) -> Self {
        Self {
            count,
            duration: DurationRange {
                min_sec: SPARKLE_DURATION_SEC,
                max_sec: SPARKLE_DURATION_SEC,
            },
            max_delay_sec: SPARKLE_DURATION_SEC,
            colors: SPARKLE_COLORS,
            oversize_chance: SPARKLE_OVERSIZE_CHANCE,
            oversize_px: SPARKLE_OVERSIZE_PX,
            spawn_period_ms: SPARKLE_SPAWN_PERIOD_MS,
            spawn_chance: SPARKLE_SPAWN_CHANCE,
            lifetime_ms: SPARKLE_LIFETIME_MS,
        }
    }

    /// Live particles allowed before the cleanup pass starts evicting.
    #[inline]
    pub fn cleanup_cap(&self) -> usize {
        self.count * CLEANUP_CAP_FACTOR
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectsConfig {
    pub fireflies: GroupConfig,
    pub sparkles: GroupConfig,
    pub resize_debounce_ms: u32,
    pub cleanup_period_ms: u32,
}

impl EffectsConfig {
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            fireflies: GroupConfig::fireflies(optimal_count(
                ParticleKind::Firefly,
                viewport.width,
                viewport.height,
            )),
            sparkles: GroupConfig::sparkles(optimal_count(
                ParticleKind::Sparkle,
                viewport.width,
                viewport.height,
            )),
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            cleanup_period_ms: CLEANUP_PERIOD_MS,
        }
    }

    pub fn group(&self, kind: ParticleKind) -> &GroupConfig {
        match kind {
            ParticleKind::Firefly => &self.fireflies,
            ParticleKind::Sparkle => &self.sparkles,
        }
    }
}
