//! Page host for a terminal session: notices go to stderr, navigation is printed.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use client_core::PageHost;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct TerminalHost {
    reload_requested: AtomicBool,
    navigated_to: Mutex<Option<String>>,
}

impl TerminalHost {
    pub fn reload_requested(&self) -> bool {
        self.reload_requested.load(Ordering::SeqCst)
    }

    pub fn navigated_to(&self) -> Option<String> {
        self.navigated_to
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PageHost for TerminalHost {
    fn navigate(&self, url: &str) {
        info!(%url, "navigating");
        *self
            .navigated_to
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(url.to_string());
    }

    fn reload(&self) {
        info!("page reload requested");
        self.reload_requested.store(true, Ordering::SeqCst);
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn hide_popup(&self, id: &str) {
        debug!(popup = id, "popup hidden");
    }
}
