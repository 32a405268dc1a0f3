//! Static era -> movement range table.
//!
//! The root listing exposes one flat list of movements and, separately, the
//! era headers. Which movements belong to which era is not recoverable from
//! the markup, so the mapping is kept as a table of inclusive index ranges
//! into the movement list.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::models::CategoryNode;

/// Inclusive range of movement indices belonging to one era.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EraRange {
    pub name: String,
    pub first: usize,
    pub last: usize,
}

impl EraRange {
    pub fn new(name: &str, first: usize, last: usize) -> Self {
        Self {
            name: name.to_string(),
            first,
            last,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EraTableError {
    #[error("era '{name}' has first index {first} after last index {last}")]
    InvertedRange {
        name: String,
        first: usize,
        last: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraTable {
    ranges: Vec<EraRange>,
}

impl EraTable {
    pub fn new(ranges: Vec<EraRange>) -> Result<Self, EraTableError> {
        if let Some(range) = ranges.iter().find(|r| r.first > r.last) {
            return Err(EraTableError::InvertedRange {
                name: range.name.clone(),
                first: range.first,
                last: range.last,
            });
        }
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[EraRange] {
        &self.ranges
    }

    pub fn range_for(&self, era: &str) -> Option<&EraRange> {
        self.ranges.iter().find(|r| r.name == era)
    }

    /// Slice of `movements` belonging to `era`, or `None` for unknown eras.
    ///
    /// A range reaching past the end of the list is truncated to what exists.
    pub fn movements_for<'a>(
        &self,
        era: &str,
        movements: &'a [CategoryNode],
    ) -> Option<&'a [CategoryNode]> {
        let range = self.range_for(era)?;
        if range.first >= movements.len() {
            warn!(
                "Era '{}' starts at movement {} but only {} movements are listed",
                era,
                range.first,
                movements.len()
            );
            return Some(&[]);
        }
        let end = (range.last + 1).min(movements.len());
        if end <= range.last {
            warn!(
                "Era '{}' ends at movement {} but only {} movements are listed",
                era,
                range.last,
                movements.len()
            );
        }
        Some(&movements[range.first..end])
    }
}

impl Default for EraTable {
    fn default() -> Self {
        Self {
            ranges: vec![
                EraRange::new("Ancient Greek Art", 0, 1),
                EraRange::new("Medieval Art", 2, 5),
                EraRange::new("Renaissance Art", 6, 10),
                EraRange::new("Post Renaissance Art", 11, 16),
                EraRange::new("Modern Art", 17, 93),
                EraRange::new("Contemporary Art", 94, 123),
                EraRange::new("Chinese Art", 124, 134),
                EraRange::new("Korean Art", 135, 137),
                EraRange::new("Japanese Art", 138, 144),
                EraRange::new("Islamic Art", 145, 152),
                EraRange::new("Native Art", 153, 153),
                EraRange::new("Ancient Egyptian art", 154, 154),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn movements(count: usize) -> Vec<CategoryNode> {
        (0..count)
            .map(|i| {
                CategoryNode::movement(
                    format!("m{}", i),
                    Url::parse(&format!("https://example.org/m{}", i)).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_default_table_is_contiguous() {
        let table = EraTable::default();
        let mut expected_first = 0;
        for range in table.ranges() {
            assert_eq!(range.first, expected_first, "gap before {}", range.name);
            expected_first = range.last + 1;
        }
        assert_eq!(expected_first, 155);
    }

    #[test]
    fn test_movements_for_inclusive_range() {
        let table = EraTable::default();
        let list = movements(155);

        let medieval = table.movements_for("Medieval Art", &list).unwrap();
        let names: Vec<_> = medieval.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["m2", "m3", "m4", "m5"]);

        let native = table.movements_for("Native Art", &list).unwrap();
        assert_eq!(native.len(), 1);
        assert_eq!(native[0].name, "m153");
    }

    #[test]
    fn test_movements_for_unknown_era() {
        let table = EraTable::default();
        assert!(table.movements_for("Martian Art", &movements(10)).is_none());
    }

    #[test]
    fn test_movements_for_truncates_short_list() {
        let table = EraTable::default();
        let list = movements(20);

        let modern = table.movements_for("Modern Art", &list).unwrap();
        assert_eq!(modern.len(), 3);
        assert!(table
            .movements_for("Contemporary Art", &list)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = EraTable::new(vec![EraRange::new("Broken", 5, 2)]).unwrap_err();
        assert_eq!(
            err,
            EraTableError::InvertedRange {
                name: "Broken".to_string(),
                first: 5,
                last: 2,
            }
        );
        assert!(err.to_string().contains("Broken"));
    }
}
