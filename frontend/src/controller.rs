use std::rc::Rc;

use crate::behaviors::{nav, page, reveal, scroll_state, smooth_scroll, validation};
use crate::dom::{Listener, PageContext};
use crate::error::SetupError;

/// Everything installed on the page. Dropping it detaches every listener and
/// disconnects the reveal observer.
pub struct PageController {
    ctx: Rc<PageContext>,
    listeners: Vec<Listener>,
    reveal: Option<reveal::RevealObserver>,
}

impl PageController {
    /// Installs each behavior independently; one that fails to register is
    /// logged and the rest still run.
    pub fn install(ctx: Rc<PageContext>) -> Self {
        let mut listeners = Vec::new();
        let behaviors: [(&str, fn(&Rc<PageContext>) -> Result<Vec<Listener>, SetupError>); 5] = [
            ("page utilities", page::install),
            ("navigation toggle", nav::install),
            ("smooth scrolling", smooth_scroll::install),
            ("scroll state", scroll_state::install),
            ("form validation", validation::install),
        ];
        for (name, install) in behaviors {
            match install(&ctx) {
                Ok(installed) => listeners.extend(installed),
                Err(e) => log::error!("Failed to install {}: {}", name, e),
            }
        }

        let reveal = reveal::install(&ctx).unwrap_or_else(|e| {
            log::error!("Failed to install reveal animations: {}", e);
            None
        });

        log::info!("Page behaviors ready ({} listeners)", listeners.len());
        Self {
            ctx,
            listeners,
            reveal,
        }
    }

    pub fn context(&self) -> &Rc<PageContext> {
        &self.ctx
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.iter().filter(|l| l.event() == event).count()
    }

    pub fn is_observing_reveals(&self) -> bool {
        self.reveal.is_some()
    }
}
