use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod behaviors {
    pub mod nav;
    pub mod page;
    pub mod reveal;
    pub mod scroll_state;
    pub mod smooth_scroll;
    pub mod validation;
}

use config::PageConfig;
use controller::PageController;
use dom::PageContext;
use error::SetupError;

thread_local! {
    static CONTROLLER: RefCell<Option<PageController>> = const { RefCell::new(None) };
}

fn boot(window: Window, document: Document) {
    let config = PageConfig::from_document(&document);
    let ctx = PageContext::new(window, document, config);
    let controller = PageController::install(ctx);
    // Replacing an earlier controller detaches its listeners.
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
}

/// Installs the page behaviors once the DOM is parsed.
pub fn start() -> Result<(), SetupError> {
    let window = web_sys::window().ok_or(SetupError::NoWindow)?;
    let document = window.document().ok_or(SetupError::NoDocument)?;

    if document.ready_state() != "loading" {
        boot(window, document);
        return Ok(());
    }

    log::info!("Waiting for DOMContentLoaded");
    let target = document.clone();
    let callback = Closure::once_into_js(move || boot(window, document));
    target.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    Ok(())
}
