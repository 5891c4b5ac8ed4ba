use crate::core::KeyChord;
use web_sys as web;

#[inline]
pub fn chord_from_event(ev: &web::KeyboardEvent) -> KeyChord {
    KeyChord {
        key: ev.key(),
        ctrl: ev.ctrl_key(),
        meta: ev.meta_key(),
        alt: ev.alt_key(),
        shift: ev.shift_key(),
    }
}
