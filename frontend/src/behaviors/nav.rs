use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::dom::{self, Listener, PageContext};
use crate::error::SetupError;

/// Open/closed state of the mobile navigation panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    open: bool,
}

impl NavState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed(self) -> Self {
        Self { open: false }
    }
}

/// The outside-click rule: only an open panel closes, and only for clicks
/// that land neither in the panel nor on its control.
pub fn closes_on_outside_click(state: NavState, inside_panel: bool, on_control: bool) -> bool {
    state.is_open() && !inside_panel && !on_control
}

fn apply(ctx: &PageContext, state: NavState) {
    ctx.nav.set(state);
    let open = state.is_open();
    let active = &ctx.config.active_class;
    if let Some(menu) = &ctx.nav_menu {
        dom::set_class(menu, active, open);
    }
    if let Some(toggle) = &ctx.toggle {
        dom::set_class(toggle, active, open);
        let _ = toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
    }
    if let Some(overlay) = &ctx.overlay {
        dom::set_class(overlay, active, open);
    }
    if let Some(body) = &ctx.body {
        dom::set_class(body, &ctx.config.body_lock_class, open);
    }
}

pub fn toggle(ctx: &PageContext) {
    let next = ctx.nav.get().toggled();
    log::debug!("Navigation {}", if next.is_open() { "opened" } else { "closed" });
    apply(ctx, next);
}

/// Closes the panel if it is open. Safe to call at any time.
pub fn close(ctx: &PageContext) {
    let state = ctx.nav.get();
    if state.is_open() {
        log::debug!("Navigation closed");
        apply(ctx, state.closed());
    }
}

pub fn install(ctx: &Rc<PageContext>) -> Result<Vec<Listener>, SetupError> {
    let Some(menu) = ctx.nav_menu.clone() else {
        log::debug!("No navigation menu, skipping menu toggle");
        return Ok(Vec::new());
    };
    let mut listeners = Vec::new();

    if let Some(control) = &ctx.toggle {
        let ctx = ctx.clone();
        listeners.push(Listener::new(control, "click", move |e: Event| {
            e.prevent_default();
            toggle(&ctx);
        })?);
    }

    {
        let ctx = ctx.clone();
        let menu = menu.clone();
        let document = ctx.document.clone();
        listeners.push(Listener::new(&document, "click", move |e: Event| {
            let target = dom::event_target_node(&e);
            let inside_panel = dom::contains(&menu, target.as_ref());
            let on_control = ctx
                .toggle
                .as_ref()
                .is_some_and(|control| dom::contains(control, target.as_ref()));
            if closes_on_outside_click(ctx.nav.get(), inside_panel, on_control) {
                close(&ctx);
            }
        })?);
    }

    {
        let ctx = ctx.clone();
        listeners.push(Listener::new(&menu, "click", move |e: Event| {
            let link = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("a").ok().flatten());
            if link.is_some() {
                close(&ctx);
            }
        })?);
    }

    log::info!("Navigation toggle installed");
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert!(!NavState::default().is_open());
    }

    #[test]
    fn open_after_n_toggles_is_n_odd() {
        let mut state = NavState::default();
        for n in 1..=9 {
            state = state.toggled();
            assert_eq!(state.is_open(), n % 2 == 1, "after {} toggles", n);
        }
    }

    #[test]
    fn toggling_twice_restores_state() {
        let open = NavState::default().toggled();
        assert_eq!(open.toggled().toggled(), open);
    }

    #[test]
    fn close_is_idempotent() {
        let open = NavState::default().toggled();
        assert!(!open.closed().is_open());
        assert_eq!(open.closed().closed(), open.closed());
    }

    #[test]
    fn outside_click_closes_only_open_panel() {
        let open = NavState::default().toggled();
        assert!(closes_on_outside_click(open, false, false));
        assert!(!closes_on_outside_click(NavState::default(), false, false));
    }

    #[test]
    fn clicks_inside_or_on_control_do_not_close() {
        let open = NavState::default().toggled();
        assert!(!closes_on_outside_click(open, true, false));
        assert!(!closes_on_outside_click(open, false, true));
        assert!(!closes_on_outside_click(open, true, true));
    }
}
