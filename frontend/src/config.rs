use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::SetupError;

/// Id of the `<script type="application/json">` element a page can use to
/// override any of the defaults below.
pub const CONFIG_ISLAND_ID: &str = "page-behavior-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Per-event decisions are useful when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// How a failed submit is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notify {
    Inline,
    Alert,
    Both,
}

impl Notify {
    pub fn inline(self) -> bool {
        matches!(self, Notify::Inline | Notify::Both)
    }

    pub fn alert(self) -> bool {
        matches!(self, Notify::Alert | Notify::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub header_selector: String,
    pub nav_menu_selector: String,
    pub toggle_selector: String,
    pub overlay_selector: String,
    pub header_container_selector: String,
    pub form_selector: String,
    pub numeric_fields: Vec<String>,
    pub section_selector: String,
    pub reveal_selector: String,
    pub print_trigger_id: String,
    pub footer_year_selector: String,
    pub currency_selector: String,

    pub active_class: String,
    pub body_lock_class: String,
    pub scrolled_class: String,
    pub invalid_class: String,
    pub error_message_class: String,
    pub shown_class: String,
    pub injected_toggle_class: String,
    /// Set on `<html>` while reveal targets are being observed. Stylesheets
    /// hide `.reveal` only under it, so the page stays readable without wasm.
    pub scripted_class: String,

    pub scrolled_threshold: f64,
    pub section_lookahead: f64,
    pub header_fallback_offset: f64,
    pub reveal_threshold: f64,
    pub scroll_throttle_ms: u32,
    pub mobile_breakpoint: f64,

    pub notify: Notify,
    pub alert_message: String,
    pub year_token: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_selector: ".header".to_string(),
            nav_menu_selector: "#nav-menu, .nav-menu".to_string(),
            toggle_selector: "#mobile-toggle, .mobile-toggle, .menu-toggle".to_string(),
            overlay_selector: ".nav-overlay".to_string(),
            header_container_selector: ".header-container".to_string(),
            form_selector: r#"form[data-validate], form[action*="submit-client"]"#.to_string(),
            numeric_fields: vec!["monthly_revenue".to_string(), "equipment_cost".to_string()],
            section_selector: "section[id]".to_string(),
            reveal_selector: ".reveal".to_string(),
            print_trigger_id: "print-results".to_string(),
            footer_year_selector: ".footer-bottom".to_string(),
            currency_selector: r#"[data-format="currency"]"#.to_string(),

            active_class: "active".to_string(),
            body_lock_class: "menu-open".to_string(),
            scrolled_class: "header-scrolled".to_string(),
            invalid_class: "is-invalid".to_string(),
            error_message_class: "field-error".to_string(),
            shown_class: "shown".to_string(),
            injected_toggle_class: "menu-toggle".to_string(),
            scripted_class: "js".to_string(),

            scrolled_threshold: 50.0,
            section_lookahead: 100.0,
            header_fallback_offset: 100.0,
            reveal_threshold: 0.1,
            scroll_throttle_ms: 16,
            mobile_breakpoint: 768.0,

            notify: Notify::Inline,
            alert_message: "Please fill in all required fields correctly.".to_string(),
            year_token: "{{ now.year }}".to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, SetupError> {
        let config: PageConfig = serde_json::from_str(raw)?;
        config.validated()
    }

    /// Reads the config island if the page has one. A malformed island is
    /// logged and the defaults are used instead.
    pub fn from_document(document: &Document) -> Self {
        let Some(island) = document.get_element_by_id(CONFIG_ISLAND_ID) else {
            return Self::default();
        };
        let raw = island.text_content().unwrap_or_default();
        if raw.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring page behavior config: {}", e);
                Self::default()
            }
        }
    }

    fn validated(self) -> Result<Self, SetupError> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(SetupError::Config(format!(
                "reveal_threshold must be within 0..=1, got {}",
                self.reveal_threshold
            )));
        }
        for (key, value) in [
            ("scrolled_threshold", self.scrolled_threshold),
            ("section_lookahead", self.section_lookahead),
            ("header_fallback_offset", self.header_fallback_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SetupError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
        }
        Ok(self)
    }

    pub fn is_numeric_field(&self, name: &str) -> bool {
        self.numeric_fields.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PageConfig::from_json(
            r#"{ "scrolled_class": "scrolled", "notify": "both", "scroll_throttle_ms": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.scrolled_class, "scrolled");
        assert_eq!(config.notify, Notify::Both);
        assert_eq!(config.scroll_throttle_ms, 0);
        assert_eq!(config.invalid_class, "is-invalid");
        assert_eq!(config.scrolled_threshold, 50.0);
    }

    #[test]
    fn rejects_out_of_range_reveal_threshold() {
        let err = PageConfig::from_json(r#"{ "reveal_threshold": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }

    #[test]
    fn rejects_negative_offsets() {
        let err = PageConfig::from_json(r#"{ "section_lookahead": -1 }"#).unwrap_err();
        assert!(err.to_string().contains("section_lookahead"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            PageConfig::from_json("{ not json"),
            Err(SetupError::ConfigJson(_))
        ));
    }

    #[test]
    fn unknown_notify_strategy_is_an_error() {
        assert!(PageConfig::from_json(r#"{ "notify": "toast" }"#).is_err());
    }

    #[test]
    fn notify_flags() {
        assert!(Notify::Inline.inline() && !Notify::Inline.alert());
        assert!(!Notify::Alert.inline() && Notify::Alert.alert());
        assert!(Notify::Both.inline() && Notify::Both.alert());
    }

    #[test]
    fn numeric_field_lookup() {
        let config = PageConfig::default();
        assert!(config.is_numeric_field("monthly_revenue"));
        assert!(config.is_numeric_field("equipment_cost"));
        assert!(!config.is_numeric_field("company_name"));
    }
}
