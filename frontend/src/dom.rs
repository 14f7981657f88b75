use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Node, Window};

use crate::behaviors::nav::NavState;
use crate::behaviors::page;
use crate::config::PageConfig;
use crate::error::SetupError;

/// An event listener that stays registered for as long as the handle lives.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, SetupError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Nodes every behavior may need, queried once when the controller starts.
pub struct PageContext {
    pub window: Window,
    pub document: Document,
    pub body: Option<HtmlElement>,
    pub header: Option<HtmlElement>,
    pub nav_menu: Option<Element>,
    pub toggle: Option<Element>,
    pub overlay: Option<Element>,
    pub config: PageConfig,
    pub nav: Cell<NavState>,
}

impl PageContext {
    pub fn new(window: Window, document: Document, config: PageConfig) -> Rc<Self> {
        let body = document.body();
        let header = query(&document, &config.header_selector)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let nav_menu = query(&document, &config.nav_menu_selector);
        let toggle = query(&document, &config.toggle_selector).or_else(|| {
            let menu = nav_menu.as_ref()?;
            let width = window.inner_width().ok().and_then(|w| w.as_f64())?;
            page::inject_mobile_toggle(&document, &config, menu, width)
        });
        let overlay = query(&document, &config.overlay_selector);

        log::debug!(
            "Page context: header={} nav_menu={} toggle={} overlay={}",
            header.is_some(),
            nav_menu.is_some(),
            toggle.is_some(),
            overlay.is_some()
        );

        Rc::new(Self {
            window,
            document,
            body,
            header,
            nav_menu,
            toggle,
            overlay,
            config,
            nav: Cell::new(NavState::default()),
        })
    }

    /// Current vertical scroll offset, 0 when the window cannot report one.
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// All elements under `root` matching `selector`. An invalid selector yields
/// nothing rather than an error.
pub fn query_all(root: &impl AsRef<Node>, selector: &str) -> Vec<Element> {
    let list = if let Some(document) = root.as_ref().dyn_ref::<Document>() {
        document.query_selector_all(selector)
    } else if let Some(element) = root.as_ref().dyn_ref::<Element>() {
        element.query_selector_all(selector)
    } else {
        return Vec::new();
    };
    let Ok(list) = list else {
        log::warn!("Invalid selector: {}", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if result.is_err() {
        log::debug!("Could not update class {:?}", class);
    }
}

pub fn event_target_node(event: &Event) -> Option<Node> {
    event.target().and_then(|t| t.dyn_into::<Node>().ok())
}

/// Whether `node` is `container` or one of its descendants.
pub fn contains(container: &Element, node: Option<&Node>) -> bool {
    node.is_some() && container.contains(node)
}
