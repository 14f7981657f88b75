use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::{self, PageContext};
use crate::error::SetupError;

// Browsers report ratios with a little rounding error around the threshold.
const RATIO_EPSILON: f64 = 1e-3;

pub fn should_reveal(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio + RATIO_EPSILON >= threshold
}

/// Watches reveal targets until each has been shown once. Disconnects on drop
/// and takes the scripted marker off `<html>` again, so targets that were
/// never shown fall back to visible.
pub struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
    root: Option<Element>,
    scripted_class: String,
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Some(root) = &self.root {
            dom::set_class(root, &self.scripted_class, false);
        }
    }
}

pub fn observer_available(ctx: &PageContext) -> bool {
    Reflect::has(&ctx.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

pub fn show(ctx: &PageContext, target: &Element) {
    dom::set_class(target, &ctx.config.shown_class, true);
}

pub fn show_all(ctx: &PageContext, targets: &[Element]) {
    for target in targets {
        show(ctx, target);
    }
}

pub fn install(ctx: &Rc<PageContext>) -> Result<Option<RevealObserver>, SetupError> {
    let targets = dom::query_all(&ctx.document, &ctx.config.reveal_selector);
    if targets.is_empty() {
        return Ok(None);
    }
    if !observer_available(ctx) {
        log::info!("IntersectionObserver unavailable, showing {} elements", targets.len());
        show_all(ctx, &targets);
        return Ok(None);
    }

    let threshold = ctx.config.reveal_threshold;
    let callback = {
        let ctx = ctx.clone();
        Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if should_reveal(entry.is_intersecting(), entry.intersection_ratio(), threshold) {
                    let target = entry.target();
                    show(&ctx, &target);
                    observer.unobserve(&target);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>)
    };

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    for target in &targets {
        observer.observe(target);
    }
    let root = ctx.document.document_element();
    if let Some(root) = &root {
        dom::set_class(root, &ctx.config.scripted_class, true);
    }

    log::info!("Reveal animations installed on {} elements", targets.len());
    Ok(Some(RevealObserver {
        observer,
        _callback: callback,
        root,
        scripted_class: ctx.config.scripted_class.clone(),
    }))
}
