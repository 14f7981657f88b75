use std::rc::Rc;

use web_sys::{Event, ScrollBehavior, ScrollToOptions};

use crate::behaviors::nav;
use crate::dom::{self, Listener, PageContext};
use crate::error::SetupError;

/// What an in-page link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentLink<'a> {
    /// A bare `#`.
    Bare,
    Target(&'a str),
}

impl<'a> FragmentLink<'a> {
    /// Returns `None` for hrefs that are not in-page fragments.
    pub fn parse(href: &'a str) -> Option<Self> {
        let id = href.strip_prefix('#')?;
        if id.is_empty() {
            Some(FragmentLink::Bare)
        } else {
            Some(FragmentLink::Target(id))
        }
    }
}

/// Scroll position that puts a target at `document_top` just below the fixed
/// header. A header that is missing or measures zero falls back to `fallback`.
pub fn scroll_target_offset(document_top: f64, header_height: Option<f64>, fallback: f64) -> f64 {
    let header = header_height.filter(|h| *h > 0.0).unwrap_or(fallback);
    document_top - header
}

/// Scroll offset for the element with `id`, or `None` if the page has no such
/// element.
pub fn scroll_target(ctx: &PageContext, id: &str) -> Option<f64> {
    let target = ctx.document.get_element_by_id(id)?;
    let page_offset = ctx.window.page_y_offset().unwrap_or(0.0);
    let document_top = target.get_bounding_client_rect().top() + page_offset;
    let header_height = ctx.header.as_ref().map(|h| f64::from(h.offset_height()));
    Some(scroll_target_offset(
        document_top,
        header_height,
        ctx.config.header_fallback_offset,
    ))
}

fn scroll_to(ctx: &PageContext, id: &str) {
    let Some(top) = scroll_target(ctx, id) else {
        log::debug!("No element with id {:?}, ignoring link", id);
        return;
    };
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    ctx.window.scroll_to_with_scroll_to_options(&options);
    log::debug!("Scrolling to #{} at {}", id, top);
}

pub fn install(ctx: &Rc<PageContext>) -> Result<Vec<Listener>, SetupError> {
    let anchors = dom::query_all(&ctx.document, r##"a[href^="#"]"##);
    let mut listeners = Vec::with_capacity(anchors.len());

    for anchor in anchors {
        let ctx = ctx.clone();
        let link = anchor.clone();
        listeners.push(Listener::new(&anchor, "click", move |e: Event| {
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            let Some(fragment) = FragmentLink::parse(&href) else {
                return;
            };
            e.prevent_default();
            // The menu has to be collapsed before measuring, or the offset
            // includes a still-expanded panel.
            nav::close(&ctx);
            if let FragmentLink::Target(id) = fragment {
                scroll_to(&ctx, id);
            }
        })?);
    }

    log::info!("Smooth scrolling installed on {} links", listeners.len());
    Ok(listeners)
}
