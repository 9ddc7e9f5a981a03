//! iOS Safari stops speaking after the page has been in the background until
//! speech is started again from a user gesture. On return we cancel whatever
//! was queued and re-arm the engine with an empty utterance on the next touch.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, SpeechSynthesisUtterance, VisibilityState, Window};

use crate::dom::{has_global, listen};
use crate::platform::Platform;

#[derive(Debug, Default)]
pub struct SpeechSession {
    armed: Cell<bool>,
}

impl SpeechSession {
    /// Page came back to the foreground; the engine needs a gesture.
    pub fn arm_on_return(&self) {
        self.armed.set(true);
    }

    /// Returns whether a re-arm is pending and clears it.
    pub fn consume_armed_state(&self) -> bool {
        self.armed.replace(false)
    }
}

pub fn install_speech_recovery(win: &Window, doc: &Document, platform: &Platform) -> Result<(), JsValue> {
    if !platform.is_ios || !has_global(win, "speechSynthesis") {
        return Ok(());
    }
    let synth = win.speech_synthesis()?;
    let session = Rc::new(SpeechSession::default());
    {
        let (d, synth, session) = (doc.clone(), synth.clone(), session.clone());
        listen(doc, "visibilitychange", true, move |_evt: web_sys::Event| {
            if d.visibility_state() == VisibilityState::Visible {
                synth.cancel();
                session.arm_on_return();
            }
        })?;
    }
    listen(doc, "touchstart", true, move |_evt: web_sys::Event| {
        if session.consume_armed_state() {
            if let Ok(utterance) = SpeechSynthesisUtterance::new_with_text("") {
                synth.speak(&utterance);
            }
        }
    })
}
