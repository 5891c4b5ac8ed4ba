use super::config::Viewport;
use super::particle::{ParticleId, ParticleKind};

/// Recurring timers started at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recurring {
    SpawnFirefly,
    SpawnSparkle,
    Cleanup,
}

/// User-facing actions, reachable from the keyboard or the host handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleVisibility,
    Recreate,
    DumpDebug,
}

/// Everything the controller reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Page is ready. `hidden` is `document.hidden` at that moment, since no
    /// `visibilitychange` fires for a tab that loads in the background.
    Start { viewport: Viewport, hidden: bool },
    Resize(Viewport),
    /// Debounce expired for the resize burst numbered `generation`.
    ResizeSettled { generation: u64 },
    VisibilityChanged { hidden: bool },
    Key(KeyChord),
    Command(Command),
    Tick(Recurring),
    Expire { kind: ParticleKind, id: ParticleId },
    Shutdown,
}

/// What the host should do with the originating browser event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Default,
    PreventDefault,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Ctrl/Cmd + Shift + {E, R, D}. Letter case is ignored since Shift usually
/// uppercases `key` but not on every layout.
#[inline]
pub fn command_for_chord(chord: &KeyChord) -> Option<Command> {
    if !(chord.ctrl || chord.meta) || !chord.shift {
        return None;
    }
    match chord.key.as_str() {
        "e" | "E" => Some(Command::ToggleVisibility),
        "r" | "R" => Some(Command::Recreate),
        "d" | "D" => Some(Command::DumpDebug),
        _ => None,
    }
}
