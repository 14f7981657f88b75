use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::dom::{self, Listener, PageContext};
use crate::error::SetupError;

/// Why a field failed validation. The message doubles as the inline error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("This field is required.")]
    Missing,
    #[error("Please enter a number greater than zero.")]
    NotPositiveNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInput<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub required: bool,
    pub numeric: bool,
}

/// Parses a finite number strictly greater than zero.
pub fn parse_positive_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

pub fn validate_field(field: &FieldInput<'_>) -> Result<(), FieldIssue> {
    let value = field.value.trim();
    if value.is_empty() {
        return if field.required {
            Err(FieldIssue::Missing)
        } else {
            Ok(())
        };
    }
    if field.numeric && parse_positive_number(value).is_none() {
        return Err(FieldIssue::NotPositiveNumber);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport {
    pub verdicts: Vec<(String, Result<(), FieldIssue>)>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.verdicts.iter().all(|(_, verdict)| verdict.is_ok())
    }

    pub fn invalid(&self) -> impl Iterator<Item = (&str, FieldIssue)> {
        self.verdicts
            .iter()
            .filter_map(|(name, verdict)| verdict.as_ref().err().map(|issue| (name.as_str(), *issue)))
    }
}

pub fn validate_form(fields: &[FieldInput<'_>]) -> FormReport {
    FormReport {
        verdicts: fields
            .iter()
            .map(|field| (field.name.to_string(), validate_field(field)))
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Untouched,
    Valid,
    Invalid,
}

impl FieldState {
    /// Every submit attempt re-evaluates the field from scratch.
    pub fn after_submit(self, verdict: &Result<(), FieldIssue>) -> Self {
        match verdict {
            Ok(()) => FieldState::Valid,
            Err(_) => FieldState::Invalid,
        }
    }

    /// Typing only ever clears an error, and only once the field is non-empty.
    /// A valid field is not re-checked until the next submit.
    pub fn after_input(self, value: &str) -> Self {
        match self {
            FieldState::Invalid if !value.trim().is_empty() => FieldState::Valid,
            state => state,
        }
    }
}

pub fn field_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        Some(select.value())
    } else {
        element.dyn_ref::<HtmlTextAreaElement>().map(|area| area.value())
    }
}

#[derive(Clone)]
struct TrackedField {
    element: Element,
    name: String,
    required: bool,
    numeric: bool,
    state: Rc<Cell<FieldState>>,
}

fn tracked_fields(ctx: &PageContext, form: &Element) -> Vec<TrackedField> {
    let mut elements = dom::query_all(form, "[required]");
    for name in &ctx.config.numeric_fields {
        let selector = format!(r#"[name="{}"]"#, name);
        for element in dom::query_all(form, &selector) {
            if !elements.contains(&element) {
                elements.push(element);
            }
        }
    }
    elements
        .into_iter()
        .filter(|element| field_value(element).is_some())
        .map(|element| {
            let name = element.get_attribute("name").unwrap_or_default();
            TrackedField {
                required: element.has_attribute("required"),
                numeric: ctx.config.is_numeric_field(&name),
                name,
                element,
                state: Rc::new(Cell::new(FieldState::Untouched)),
            }
        })
        .collect()
}

fn error_message(ctx: &PageContext, field: &Element) -> Option<Element> {
    field
        .next_element_sibling()
        .filter(|sibling| sibling.class_list().contains(&ctx.config.error_message_class))
}

fn mark_invalid(ctx: &PageContext, field: &Element, issue: FieldIssue) {
    dom::set_class(field, &ctx.config.invalid_class, true);
    let _ = field.set_attribute("aria-invalid", "true");
    if !ctx.config.notify.inline() {
        return;
    }
    if let Some(message) = error_message(ctx, field) {
        message.set_text_content(Some(&issue.to_string()));
        return;
    }
    let Some(parent) = field.parent_node() else {
        return;
    };
    let Ok(message) = ctx.document.create_element("div") else {
        return;
    };
    message.set_class_name(&ctx.config.error_message_class);
    let _ = message.set_attribute("role", "alert");
    message.set_text_content(Some(&issue.to_string()));
    if let Err(e) = parent.insert_before(&message, field.next_sibling().as_ref()) {
        log::warn!("Could not show error message: {:?}", e);
    }
}

fn clear_invalid(ctx: &PageContext, field: &Element) {
    dom::set_class(field, &ctx.config.invalid_class, false);
    let _ = field.remove_attribute("aria-invalid");
    if let Some(message) = error_message(ctx, field) {
        message.remove();
    }
}

fn on_submit(ctx: &PageContext, fields: &[TrackedField], event: &Event) {
    let values: Vec<String> = fields
        .iter()
        .map(|f| field_value(&f.element).unwrap_or_default())
        .collect();
    let inputs: Vec<FieldInput<'_>> = fields
        .iter()
        .zip(&values)
        .map(|(f, value)| FieldInput {
            name: &f.name,
            value: value.as_str(),
            required: f.required,
            numeric: f.numeric,
        })
        .collect();
    let report = validate_form(&inputs);

    for (field, (_, verdict)) in fields.iter().zip(&report.verdicts) {
        field.state.set(field.state.get().after_submit(verdict));
        match verdict {
            Ok(()) => clear_invalid(ctx, &field.element),
            Err(issue) => mark_invalid(ctx, &field.element, *issue),
        }
    }

    if report.is_valid() {
        return;
    }

    event.prevent_default();
    log::debug!(
        "Blocked submit, invalid fields: {:?}",
        report.invalid().map(|(name, _)| name).collect::<Vec<_>>()
    );
    if let Some(first) = fields
        .iter()
        .find(|f| f.state.get() == FieldState::Invalid)
        .and_then(|f| f.element.dyn_ref::<HtmlElement>())
    {
        let _ = first.focus();
    }
    if ctx.config.notify.alert() {
        let _ = ctx.window.alert_with_message(&ctx.config.alert_message);
    }
}

fn on_input(ctx: &PageContext, field: &TrackedField) {
    let value = field_value(&field.element).unwrap_or_default();
    let before = field.state.get();
    let after = before.after_input(&value);
    if before == FieldState::Invalid && after == FieldState::Valid {
        clear_invalid(ctx, &field.element);
    }
    field.state.set(after);
}

pub fn install(ctx: &Rc<PageContext>) -> Result<Vec<Listener>, SetupError> {
    let forms = dom::query_all(&ctx.document, &ctx.config.form_selector);
    let mut listeners = Vec::new();

    for form in forms {
        let fields = tracked_fields(ctx, &form);
        if fields.is_empty() {
            continue;
        }

        for field in &fields {
            for event in ["input", "change"] {
                let ctx = ctx.clone();
                let tracked = field.clone();
                listeners.push(Listener::new(&field.element, event, move |_: Event| {
                    on_input(&ctx, &tracked);
                })?);
            }
        }

        log::info!("Validating form with {} fields", fields.len());
        let ctx = ctx.clone();
        listeners.push(Listener::new(&form, "submit", move |e: Event| {
            on_submit(&ctx, &fields, &e);
        })?);
    }

    Ok(listeners)
}
