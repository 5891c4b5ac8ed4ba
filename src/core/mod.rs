pub mod config;
pub mod constants;
pub mod controller;
pub mod events;
pub mod headless;
pub mod mailbox;
pub mod particle;
pub mod rng;
pub mod surface;
pub mod timers;

pub use config::*;
pub use controller::*;
pub use events::*;
pub use mailbox::*;
pub use particle::*;
pub use surface::*;
pub use timers::*;
