//! The page environment the console runs in.

use std::sync::{Mutex, PoisonError};

pub const ADMIN_POPUP_ID: &str = "admin-popup";

/// Page-level side effects the console needs from its embedding environment.
///
/// `alert` is expected to block until the user has seen the notice. `reload` and
/// `navigate` discard every in-memory edit session.
pub trait PageHost: Send + Sync {
    fn navigate(&self, url: &str);
    fn reload(&self);
    fn alert(&self, message: &str);
    fn hide_popup(&self, _id: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    Navigated(String),
    Reloaded,
    Alerted(String),
    PopupHidden(String),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    effects: Mutex<Vec<PageEffect>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, effect: PageEffect) {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }

    pub fn effects(&self) -> Vec<PageEffect> {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                PageEffect::Alerted(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                PageEffect::Navigated(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn reload_count(&self) -> usize {
        self.effects()
            .iter()
            .filter(|effect| matches!(effect, PageEffect::Reloaded))
            .count()
    }
}

impl PageHost for RecordingHost {
    fn navigate(&self, url: &str) {
        self.record(PageEffect::Navigated(url.to_string()));
    }

    fn reload(&self) {
        self.record(PageEffect::Reloaded);
    }

    fn alert(&self, message: &str) {
        self.record(PageEffect::Alerted(message.to_string()));
    }

    fn hide_popup(&self, id: &str) {
        self.record(PageEffect::PopupHidden(id.to_string()));
    }
}
