use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement};

use crate::dom::{self, Listener, PageContext};
use crate::error::SetupError;

pub fn is_header_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Vertical extent of a page section, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    /// Both the scroll position and the section top are shifted by
    /// `lookahead`, so a section turns active shortly before it reaches the
    /// top of the viewport.
    pub fn contains(&self, scroll_y: f64, lookahead: f64) -> bool {
        let position = scroll_y + lookahead;
        let top = self.top - lookahead;
        position >= top && position < top + self.height
    }
}

/// Active flag for every section, in document order. Overlapping spans may
/// both be active.
pub fn active_sections<'a>(
    spans: &'a [SectionSpan],
    scroll_y: f64,
    lookahead: f64,
) -> Vec<(&'a str, bool)> {
    spans
        .iter()
        .map(|span| (span.id.as_str(), span.contains(scroll_y, lookahead)))
        .collect()
}

/// Exact fragment match: `#plan` does not target `planning`.
pub fn link_targets_section(href: &str, section_id: &str) -> bool {
    href.rsplit_once('#')
        .is_some_and(|(_, fragment)| fragment == section_id)
}

fn section_spans(ctx: &PageContext) -> Vec<SectionSpan> {
    dom::query_all(&ctx.document, &ctx.config.section_selector)
        .into_iter()
        .filter_map(|el| {
            let id = el.get_attribute("id").filter(|id| !id.is_empty())?;
            let el = el.dyn_into::<HtmlElement>().ok()?;
            Some(SectionSpan {
                id,
                top: f64::from(el.offset_top()),
                height: f64::from(el.offset_height()),
            })
        })
        .collect()
}

pub fn update(ctx: &PageContext) {
    let config = &ctx.config;
    let scroll_y = ctx.scroll_y();

    if let Some(header) = &ctx.header {
        dom::set_class(
            header,
            &config.scrolled_class,
            is_header_scrolled(scroll_y, config.scrolled_threshold),
        );
    }

    let Some(menu) = &ctx.nav_menu else {
        return;
    };
    let links = dom::query_all(menu, "a[href]");
    if links.is_empty() {
        return;
    }
    let spans = section_spans(ctx);
    for (id, active) in active_sections(&spans, scroll_y, config.section_lookahead) {
        let link = links.iter().find(|link| {
            link.get_attribute("href")
                .is_some_and(|href| link_targets_section(&href, id))
        });
        if let Some(link) = link {
            dom::set_class(link, &config.active_class, active);
        }
    }
}

pub fn install(ctx: &Rc<PageContext>) -> Result<Vec<Listener>, SetupError> {
    let throttle_ms = ctx.config.scroll_throttle_ms;
    let pending = Rc::new(Cell::new(false));
    let listener = {
        let ctx = ctx.clone();
        let window = ctx.window.clone();
        Listener::new(&window, "scroll", move |_: Event| {
            if throttle_ms == 0 {
                update(&ctx);
                return;
            }
            if pending.get() {
                return;
            }
            pending.set(true);
            let ctx = ctx.clone();
            let pending = pending.clone();
            Timeout::new(throttle_ms, move || {
                pending.set(false);
                update(&ctx);
            })
            .forget();
        })?
    };

    // Initial check
    update(ctx);

    log::info!("Scroll state installed (throttle {}ms)", throttle_ms);
    Ok(vec![listener])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(id: &str, top: f64, height: f64) -> SectionSpan {
        SectionSpan {
            id: id.to_string(),
            top,
            height,
        }
    }

    fn page() -> Vec<SectionSpan> {
        vec![
            span("hero", 0.0, 600.0),
            span("benefits", 600.0, 800.0),
            span("pricing", 1400.0, 500.0),
        ]
    }

    fn active_ids(spans: &[SectionSpan], scroll_y: f64) -> Vec<&str> {
        active_sections(spans, scroll_y, 100.0)
            .into_iter()
            .filter(|(_, active)| *active)
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn header_scrolled_strictly_past_threshold() {
        assert!(!is_header_scrolled(0.0, 50.0));
        assert!(!is_header_scrolled(50.0, 50.0));
        assert!(is_header_scrolled(50.5, 50.0));
    }

    #[test]
    fn scrolling_into_benefits_activates_only_benefits() {
        let spans = page();
        assert_eq!(active_ids(&spans, 700.0), vec!["benefits"]);
    }

    #[test]
    fn lookahead_activates_section_early() {
        let spans = page();
        // 200px before the section top: 100px from the position, 100px from the span.
        assert_eq!(active_ids(&spans, 400.0), vec!["benefits"]);
        assert_eq!(active_ids(&spans, 399.0), vec!["hero"]);
    }

    #[test]
    fn span_end_is_exclusive() {
        let benefits = span("benefits", 600.0, 800.0);
        // top - lookahead + height = 1300, position = scroll + 100
        assert!(benefits.contains(1199.0, 100.0));
        assert!(!benefits.contains(1200.0, 100.0));
    }

    #[test]
    fn nothing_active_past_last_section() {
        let spans = page();
        assert!(active_ids(&spans, 5000.0).is_empty());
    }

    #[test]
    fn overlapping_spans_are_not_deconflicted() {
        let spans = vec![span("a", 0.0, 1000.0), span("b", 500.0, 1000.0)];
        assert_eq!(active_ids(&spans, 600.0), vec!["a", "b"]);
    }

    #[test]
    fn every_section_gets_a_verdict() {
        let spans = page();
        let verdicts = active_sections(&spans, 700.0, 100.0);
        assert_eq!(
            verdicts,
            vec![("hero", false), ("benefits", true), ("pricing", false)]
        );
    }

    #[test]
    fn link_matching_is_exact() {
        assert!(link_targets_section("#plan", "plan"));
        assert!(!link_targets_section("#plan", "planning"));
        assert!(!link_targets_section("#planning", "plan"));
        assert!(link_targets_section("/#benefits", "benefits"));
        assert!(!link_targets_section("/benefits", "benefits"));
    }
}
