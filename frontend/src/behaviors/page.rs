use std::rc::Rc;

use chrono::{Datelike, Local};
use web_sys::{Document, Element, Event, Node};

use crate::config::PageConfig;
use crate::dom::{self, Listener, PageContext};
use crate::error::SetupError;

/// Replaces every occurrence of `token` with `year`. `None` when the token is
/// absent, i.e. the template renderer already filled it in.
pub fn substitute_year(html: &str, token: &str, year: i32) -> Option<String> {
    if token.is_empty() || !html.contains(token) {
        return None;
    }
    Some(html.replace(token, &year.to_string()))
}

/// US dollar formatting, e.g. `$1,234.50`. Missing, zero or unparseable
/// values render as `$0.00`.
pub fn format_currency(raw: &str) -> String {
    let value = raw
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);

    let fixed = format!("{:.2}", value.abs());
    let (dollars, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Adds a hamburger button in front of the menu on narrow viewports when the
/// markup ships without one.
pub fn inject_mobile_toggle(
    document: &Document,
    config: &PageConfig,
    nav_menu: &Element,
    viewport_width: f64,
) -> Option<Element> {
    if viewport_width > config.mobile_breakpoint {
        return None;
    }
    let container = dom::query(document, &config.header_container_selector)?;
    let menu_node: &Node = nav_menu;
    if !dom::contains(&container, Some(menu_node)) {
        return None;
    }
    let parent = nav_menu.parent_node()?;
    let button = document.create_element("button").ok()?;
    button.set_class_name(&config.injected_toggle_class);
    let _ = button.set_attribute("type", "button");
    let _ = button.set_attribute("aria-label", "Toggle navigation");
    button.set_text_content(Some("☰"));
    parent.insert_before(&button, Some(menu_node)).ok()?;
    log::debug!("Injected mobile menu toggle");
    Some(button)
}

fn update_footer_year(ctx: &PageContext) {
    let year = Local::now().year();
    for element in dom::query_all(&ctx.document, &ctx.config.footer_year_selector) {
        if let Some(html) = substitute_year(&element.inner_html(), &ctx.config.year_token, year) {
            element.set_inner_html(&html);
        }
    }
}

fn format_currency_elements(ctx: &PageContext) {
    for element in dom::query_all(&ctx.document, &ctx.config.currency_selector) {
        let raw = element.text_content().unwrap_or_default();
        element.set_text_content(Some(&format_currency(&raw)));
    }
}

pub fn install(ctx: &Rc<PageContext>) -> Result<Vec<Listener>, SetupError> {
    update_footer_year(ctx);
    format_currency_elements(ctx);

    let mut listeners = Vec::new();
    if let Some(trigger) = ctx.document.get_element_by_id(&ctx.config.print_trigger_id) {
        let window = ctx.window.clone();
        listeners.push(Listener::new(&trigger, "click", move |_: Event| {
            if let Err(e) = window.print() {
                log::warn!("Print failed: {:?}", e);
            }
        })?);
    }
    Ok(listeners)
}
