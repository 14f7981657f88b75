use brokerbuddy_frontend::config::PageConfig;
use brokerbuddy_frontend::controller::PageController;
use brokerbuddy_frontend::dom::PageContext;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventInit, HtmlInputElement};

pub const LANDING: &str = r##"
<header class="header">
  <div class="header-container">
    <a class="logo" href="/">BrokerBuddy</a>
    <nav id="nav-menu" class="nav-menu">
      <ul id="nav-list">
        <li><a href="#benefits">Benefits</a></li>
        <li><a href="#plan">Plan</a></li>
        <li><a href="#pricing">Pricing</a></li>
        <li><a href="#missing">Missing</a></li>
        <li><a id="top-link" href="#">Top</a></li>
      </ul>
    </nav>
    <button id="mobile-toggle" class="mobile-toggle">&#9776;</button>
  </div>
</header>
<main>
  <p id="outside">Fast equipment financing for small businesses.</p>
  <section id="benefits" style="height: 800px">Benefits</section>
  <section id="planning" style="height: 800px">Planning</section>
  <section id="pricing" style="height: 800px">Pricing</section>
  <form id="client-form" action="/submit-client" method="post">
    <div><input id="company_name" name="company_name" required></div>
    <div><input id="monthly_revenue" name="monthly_revenue" required></div>
    <div><input id="equipment_cost" name="equipment_cost"></div>
    <button type="submit">Find lenders</button>
  </form>
  <div id="reveal-card" class="reveal">Trusted by brokers</div>
  <span id="amount" data-format="currency">1234.5</span>
  <div style="height: 3000px"></div>
</main>
<footer class="footer"><div class="footer-bottom">&copy; {{ now.year }} BrokerBuddy</div></footer>
"##;

pub fn test_config() -> PageConfig {
    PageConfig {
        scroll_throttle_ms: 0,
        ..PageConfig::default()
    }
}

pub fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Replaces the page body and scrolls back to the top without installing
/// anything.
pub fn set_body(html: &str) {
    let window = web_sys::window().unwrap();
    window.scroll_to_with_x_and_y(0.0, 0.0);
    document().body().unwrap().set_inner_html(html);
}

/// Installs a controller on whatever the body currently holds.
pub fn install(config: PageConfig) -> PageController {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    PageController::install(PageContext::new(window, document, config))
}

pub fn mount(html: &str, config: PageConfig) -> PageController {
    set_body(html);
    install(config)
}

pub fn by_id(id: &str) -> Element {
    document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("fixture has no #{}", id))
}

pub fn query(selector: &str) -> Element {
    document().query_selector(selector).unwrap().unwrap()
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

/// Dispatches a bubbling, cancelable event. Returns `false` if a handler
/// prevented the default action.
pub fn dispatch(element: &Element, kind: &str) -> bool {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict(kind, &init).unwrap();
    element.dispatch_event(&event).unwrap()
}

pub fn click(element: &Element) -> bool {
    dispatch(element, "click")
}

pub fn type_into(id: &str, value: &str) {
    let input = by_id(id).dyn_into::<HtmlInputElement>().unwrap();
    input.set_value(value);
    dispatch(&input, "input");
}

pub fn error_messages() -> u32 {
    document().query_selector_all(".field-error").unwrap().length()
}
