//! Touch feedback for game controls: no long-press context menu, and a
//! `touch-active` class while a finger is down. Controls created after load
//! (quiz answers, language buttons) are picked up through a MutationObserver.

use js_sys::WeakSet;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, MutationObserver, MutationObserverInit, MutationRecord, Window};

use crate::config::PlatformConfig;
use crate::dom::{has_global, listen, on_dom_ready};
use crate::log::cwarn;

/// Clones share the set of enhanced elements.
#[derive(Clone, Debug)]
pub struct TouchFeedback {
    selector: String,
    active_class: String,
    // Identity, not markup: a copied control (cloneNode, innerHTML) is a new
    // element without listeners and must be enhanced again.
    enhanced: WeakSet,
}

impl TouchFeedback {
    pub fn new(cfg: &PlatformConfig) -> Self {
        Self {
            selector: cfg.control_selector(),
            active_class: cfg.touch_active_class.clone(),
            enhanced: WeakSet::new(),
        }
    }

    pub fn is_enhanced(&self, el: &Element) -> bool {
        self.enhanced.has(el.unchecked_ref())
    }

    /// Attach listeners to every matching control not seen before. Returns
    /// how many controls were newly enhanced.
    pub fn enhance(&self, doc: &Document) -> Result<u32, JsValue> {
        let nodes = doc.query_selector_all(&self.selector)?;
        let mut added = 0;
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i) else { continue };
            let el: Element = node.dyn_into()?;
            if self.is_enhanced(&el) {
                continue;
            }
            self.attach(&el)?;
            self.enhanced.add(el.unchecked_ref());
            added += 1;
        }
        Ok(added)
    }

    fn attach(&self, el: &Element) -> Result<(), JsValue> {
        listen(el, "contextmenu", false, |evt: Event| evt.prevent_default())?;
        {
            let (target, class) = (el.clone(), self.active_class.clone());
            listen(el, "touchstart", true, move |_evt: Event| {
                let _ = target.class_list().add_1(&class);
            })?;
        }
        for name in ["touchend", "touchcancel"] {
            let (target, class) = (el.clone(), self.active_class.clone());
            listen(el, name, true, move |_evt: Event| {
                let _ = target.class_list().remove_1(&class);
            })?;
        }
        Ok(())
    }

    /// Rescan whenever nodes are added anywhere under the body.
    fn observe(&self, doc: &Document) -> Result<(), JsValue> {
        let Some(body) = doc.body() else {
            return Ok(());
        };
        let (feedback, d) = (self.clone(), doc.clone());
        let closure = Closure::wrap(Box::new(move |records: js_sys::Array, _obs: MutationObserver| {
            let added_nodes = records.iter().any(|r| {
                r.dyn_into::<MutationRecord>()
                    .map(|m| m.added_nodes().length() > 0)
                    .unwrap_or(false)
            });
            if added_nodes {
                if let Err(e) = feedback.enhance(&d) {
                    cwarn(&format!("touch feedback rescan failed: {:?}", e));
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;
        closure.forget();
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)
    }
}

pub fn install_touch_feedback(win: &Window, doc: &Document, cfg: &PlatformConfig) -> Result<(), JsValue> {
    let feedback = TouchFeedback::new(cfg);
    let can_observe = has_global(win, "MutationObserver");
    let d = doc.clone();
    on_dom_ready(doc, move || {
        let res = feedback.enhance(&d).and_then(|_| {
            if can_observe { feedback.observe(&d) } else { Ok(()) }
        });
        if let Err(e) = res {
            cwarn(&format!("touch feedback setup failed: {:?}", e));
        }
    })
}
