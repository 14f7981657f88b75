use log::info;

use brokerbuddy_frontend::config;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(e) = console_log::init_with_level(config::log_level()) {
        web_sys::console::error_1(&format!("error initializing log: {}", e).into());
    }

    info!("Starting BrokerBuddy page behaviors");
    if let Err(e) = brokerbuddy_frontend::start() {
        log::error!("Page behaviors not installed: {}", e);
    }
}
