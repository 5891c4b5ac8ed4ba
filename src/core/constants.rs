/// Tuning constants for the ambient particle layer.
///
/// Timings are in milliseconds unless the name says otherwise; animation
/// values end up in CSS as seconds.
// Device classes (viewport width, CSS px)
pub const TABLET_MIN_WIDTH: f64 = 768.0;
pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;

// Population sizing: area divisors and floors per device class
pub const FIREFLY_AREA_DIVISORS: [f64; 3] = [120_000.0, 80_000.0, 60_000.0]; // mobile, tablet, desktop
pub const FIREFLY_MIN_COUNTS: [usize; 3] = [4, 8, 12];
pub const SPARKLE_AREA_DIVISORS: [f64; 3] = [150_000.0, 100_000.0, 80_000.0];
pub const SPARKLE_MIN_COUNTS: [usize; 3] = [3, 6, 8];
pub const DEFAULT_COUNT: usize = 8; // unknown group names

// Fireflies
pub const FIREFLY_MIN_DURATION_SEC: f64 = 6.0;
pub const FIREFLY_MAX_DURATION_SEC: f64 = 12.0;
pub const FIREFLY_MAX_DELAY_SEC: f64 = 8.0;
pub const FIREFLY_COLORS: &[&str] = &["#00ffff", "#00ffcc", "#33ddff", "#66ffdd"];
pub const FIREFLY_OVERSIZE_CHANCE: f64 = 0.2;
pub const FIREFLY_OVERSIZE_PX: (f64, f64) = (3.0, 7.0);
pub const FIREFLY_SPAWN_PERIOD_MS: u32 = 10_000;
pub const FIREFLY_SPAWN_CHANCE: f64 = 0.3;
pub const FIREFLY_LIFETIME_MS: u32 = 12_000;

// Sparkles (one fixed cycle length; it bounds the start delay)
pub const SPARKLE_DURATION_SEC: f64 = 3.0;
pub const SPARKLE_COLORS: &[&str] = &["#ff00ff", "#ff66ff", "#cc00cc", "#ff33cc"];
pub const SPARKLE_OVERSIZE_CHANCE: f64 = 0.3;
pub const SPARKLE_OVERSIZE_PX: (f64, f64) = (4.0, 10.0);
pub const SPARKLE_SPAWN_PERIOD_MS: u32 = 15_000;
pub const SPARKLE_SPAWN_CHANCE: f64 = 0.2;
pub const SPARKLE_LIFETIME_MS: u32 = 5_000;

// Housekeeping
pub const RESIZE_DEBOUNCE_MS: u32 = 250;
pub const CLEANUP_PERIOD_MS: u32 = 30_000;
pub const CLEANUP_CAP_FACTOR: usize = 2; // live particles allowed per target count

// Host page / styling contract
pub const FIREFLIES_CONTAINER_ID: &str = "fireflies";
pub const SPARKLES_CONTAINER_ID: &str = "sparkles";
pub const FIREFLY_CLASS: &str = "firefly";
pub const SPARKLE_CLASS: &str = "sparkle";
pub const TEMPORARY_CLASS: &str = "temporary";
pub const HIDDEN_CLASS: &str = "hidden";
pub const PARTICLE_ID_ATTR: &str = "data-pid";
pub const PARTICLE_INDEX_ATTR: &str = "data-index";
