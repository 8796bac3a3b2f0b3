//! Inline editing of one page field.
//!
//! A field shows a display node until the user activates it. Activation swaps in an
//! [`EditControl`] holding the current text; blurring the control submits the value
//! as a single-key PATCH and either renders a fresh display node from the committed
//! value or, on failure, leaves the field discarded while the page reloads.

use std::{mem, ops::Range};

use shared::protocol::PackUpdate;
use tracing::info;

use crate::{
    console::PackConsole,
    display::{render_heading, render_lines, DisplayNode},
    error::FieldError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Description,
}

impl FieldKind {
    pub fn element_id(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Description => "description",
        }
    }

    pub fn control_kind(self) -> ControlKind {
        match self {
            FieldKind::Title => ControlKind::TextInput,
            FieldKind::Description => ControlKind::TextArea,
        }
    }

    pub fn render(self, value: &str) -> DisplayNode {
        match self {
            FieldKind::Title => render_heading(self.element_id(), value),
            FieldKind::Description => render_lines(self.element_id(), value),
        }
    }

    pub fn update(self, value: String) -> PackUpdate {
        match self {
            FieldKind::Title => PackUpdate::Name(value),
            FieldKind::Description => PackUpdate::Description(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TextInput,
    TextArea,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditControl {
    kind: ControlKind,
    value: String,
    selection: Range<usize>,
    focused: bool,
    rows: usize,
}

impl EditControl {
    fn new(kind: ControlKind, value: String) -> Self {
        let mut control = Self {
            kind,
            selection: 0..value.len(),
            value,
            focused: true,
            rows: 1,
        };
        control.fit_to_content();
        control
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn set_value(&mut self, value: String) {
        self.selection = value.len()..value.len();
        self.value = value;
        self.fit_to_content();
    }

    fn fit_to_content(&mut self) {
        self.rows = match self.kind {
            ControlKind::TextInput => 1,
            ControlKind::TextArea => self.value.split('\n').count().max(1),
        };
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    original_value: String,
    control: EditControl,
    display: DisplayNode,
}

impl EditSession {
    pub fn original_value(&self) -> &str {
        &self.original_value
    }

    pub fn control(&self) -> &EditControl {
        &self.control
    }

    pub fn replaced(&self) -> &DisplayNode {
        &self.display
    }

    /// Trimmed control text, or the original value when that is empty.
    pub fn committed_value(&self) -> String {
        let trimmed = self.control.value.trim();
        if trimmed.is_empty() {
            self.original_value.clone()
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPhase {
    Display,
    Editing,
    Submitting,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Committed,
    Failed,
}

#[derive(Debug, Clone)]
enum FieldState {
    Display(DisplayNode),
    Editing(EditSession),
    Submitting {
        session: EditSession,
        committed: String,
    },
    Discarded,
}

#[derive(Debug, Clone)]
pub struct EditableField {
    kind: FieldKind,
    state: FieldState,
}

impl EditableField {
    pub fn new(kind: FieldKind, value: &str) -> Self {
        Self::from_display(kind, kind.render(value))
    }

    /// Wraps a display node that was rendered elsewhere, e.g. by the server.
    pub fn from_display(kind: FieldKind, display: DisplayNode) -> Self {
        Self {
            kind,
            state: FieldState::Display(display),
        }
    }

    pub fn title(value: &str) -> Self {
        Self::new(FieldKind::Title, value)
    }

    pub fn description(value: &str) -> Self {
        Self::new(FieldKind::Description, value)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn phase(&self) -> FieldPhase {
        match self.state {
            FieldState::Display(_) => FieldPhase::Display,
            FieldState::Editing(_) => FieldPhase::Editing,
            FieldState::Submitting { .. } => FieldPhase::Submitting,
            FieldState::Discarded => FieldPhase::Discarded,
        }
    }

    pub fn display(&self) -> Option<&DisplayNode> {
        match &self.state {
            FieldState::Display(node) => Some(node),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            FieldState::Editing(session) | FieldState::Submitting { session, .. } => {
                Some(session)
            }
            _ => None,
        }
    }

    fn field(&self) -> &'static str {
        self.kind.element_id()
    }

    fn misuse(&self, expected: FieldPhase) -> FieldError {
        let field = self.field();
        match (&self.state, expected) {
            (FieldState::Discarded, _) => FieldError::Discarded { field },
            (_, FieldPhase::Display) => FieldError::NotDisplayed { field },
            (_, FieldPhase::Submitting) => FieldError::NotSubmitting { field },
            _ => FieldError::NotEditing { field },
        }
    }

    /// Activation gesture: swaps the display node for a focused control with the
    /// whole current value selected.
    pub fn activate(&mut self) -> Result<(), FieldError> {
        let FieldState::Display(display) = &self.state else {
            return Err(self.misuse(FieldPhase::Display));
        };

        let display = display.clone();
        let original_value = display.text_content();
        let control = EditControl::new(self.kind.control_kind(), original_value.clone());
        self.state = FieldState::Editing(EditSession {
            original_value,
            control,
            display,
        });
        Ok(())
    }

    pub fn input(&mut self, text: impl Into<String>) -> Result<(), FieldError> {
        if let FieldState::Editing(session) = &mut self.state {
            session.control.set_value(text.into());
            return Ok(());
        }
        Err(self.misuse(FieldPhase::Editing))
    }

    /// Focus loss: computes the committed value and returns the update to send.
    pub fn begin_submit(&mut self) -> Result<PackUpdate, FieldError> {
        let mut session = match mem::replace(&mut self.state, FieldState::Discarded) {
            FieldState::Editing(session) => session,
            other => {
                self.state = other;
                return Err(self.misuse(FieldPhase::Editing));
            }
        };

        session.control.focused = false;
        let committed = session.committed_value();
        let update = self.kind.update(committed.clone());
        self.state = FieldState::Submitting { session, committed };
        Ok(update)
    }

    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> Result<(), FieldError> {
        let committed = match mem::replace(&mut self.state, FieldState::Discarded) {
            FieldState::Submitting { committed, .. } => committed,
            other => {
                self.state = other;
                return Err(self.misuse(FieldPhase::Submitting));
            }
        };

        if outcome == SubmitOutcome::Committed {
            info!(field = self.field(), "field update committed");
            self.state = FieldState::Display(self.kind.render(&committed));
        }
        Ok(())
    }

    pub async fn blur(&mut self, console: &PackConsole) -> Result<(), FieldError> {
        let update = self.begin_submit()?;
        match console.patch_update(&update).await {
            Ok(_) => self.finish_submit(SubmitOutcome::Committed),
            Err(source) => {
                self.finish_submit(SubmitOutcome::Failed)?;
                Err(FieldError::Submit {
                    field: self.field(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/field_tests.rs"]
mod tests;
