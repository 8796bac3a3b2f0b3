//! Inline editing and lifecycle actions for a pack's admin page.
//!
//! Every mutation goes through [`Gateway::call`], which turns the server's JSON
//! envelope into a `Result`. [`EditableField`] and [`VersionRangeEditor`] hold the
//! per-region edit state; [`PackConsole`] binds the gateway to one pack and owns the
//! failure paths (alert, then reload where the page may be stale).

pub mod console;
pub mod display;
pub mod error;
pub mod field;
pub mod gateway;
pub mod host;
pub mod page;
pub mod version_range;

pub use console::{ArchiveUpload, PackConsole, UploadInput};
pub use error::{FieldError, GatewayError, PageError};
pub use field::{EditableField, FieldKind, FieldPhase, SubmitOutcome};
pub use gateway::{Gateway, RequestBody};
pub use host::{PageEffect, PageHost, RecordingHost};
pub use page::PageMetadata;
pub use version_range::{VersionOption, VersionRangeEditor, VersionSelect};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
