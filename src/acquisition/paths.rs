//! Naming rules shared by acquisition and curation.
//!
//! A painting's local id is `<movement_dir>/<artist_slug>__<index>`; its file
//! lives at `<dataset_dir>/<local_id><extension>`.

use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSION: &str = ".jpg";

const INDEX_SEPARATOR: &str = "__";

/// Canonical artist slug: lower-cased, whitespace runs become `_`, every
/// other non-alphanumeric character is dropped.
pub fn artist_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Directory label of a movement: its name with `(`, `)` and `-` removed.
pub fn movement_dir_label(movement: &str) -> String {
    movement
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '-'))
        .collect()
}

/// Human-readable movement label as stored in the ledger.
pub fn movement_display_label(movement_dir: &str) -> String {
    movement_dir.replace('_', " ")
}

/// Movement key used to group curation buckets, inverse of
/// [`movement_display_label`].
pub fn movement_key(label: &str) -> String {
    label.trim().replace(' ', "_")
}

pub fn local_id(movement_dir: &str, artist_name: &str, index: usize) -> String {
    format!(
        "{}/{}{}{}",
        movement_dir,
        artist_slug(artist_name),
        INDEX_SEPARATOR,
        index
    )
}

/// Path of the image file backing `local_id` under `dataset_dir`.
pub fn image_path(dataset_dir: &Path, local_id: &str, extension: &str) -> PathBuf {
    dataset_dir.join(format!("{}{}", local_id, extension))
}
