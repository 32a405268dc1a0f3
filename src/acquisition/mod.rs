//! Deduplicated painting acquisition.
//!
//! Maps each painting slot to a stable local path, fetches only what is not
//! already on disk, and defines the error type shared by the taxonomy walker.

mod deduplicator;
mod error;
mod paths;

pub use deduplicator::{AcquireOutcome, Acquirer};
pub use error::{AcquisitionError, AcquisitionErrorKind};
pub use paths::{
    artist_slug, image_path, local_id, movement_dir_label, movement_display_label, movement_key,
    IMAGE_EXTENSION,
};
