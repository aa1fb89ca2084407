//! Recording domain module

mod entity;
mod media;
mod status;

pub use entity::{Recording, RecordingId};
pub use media::{AudioFormat, ALL_FORMATS};
pub use status::{FailureReason, ParseStatusError, TranscriptionStatus, FAILED_PREFIX};
