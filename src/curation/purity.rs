use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use crate::ledger::PaintingRecord;

/// Authors listed under more than one distinct movement label.
pub fn ambiguous_authors(rows: &[PaintingRecord]) -> BTreeSet<String> {
    let mut movements_by_author: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in rows {
        movements_by_author
            .entry(row.author.as_str())
            .or_default()
            .insert(row.movement.as_str());
    }

    movements_by_author
        .into_iter()
        .filter(|(_, movements)| movements.len() > 1)
        .map(|(author, _)| author.to_string())
        .collect()
}

/// Drop every row whose author appears under more than one movement.
///
/// The decision is made over the whole corpus, so an author is either kept
/// with all their rows or removed entirely. Row order is preserved.
pub fn filter_label_purity(rows: Vec<PaintingRecord>) -> Vec<PaintingRecord> {
    let ambiguous = ambiguous_authors(&rows);
    for author in &ambiguous {
        debug!("Author {} spans several movements, dropping", author);
    }

    let before = rows.len();
    let kept: Vec<PaintingRecord> = rows
        .into_iter()
        .filter(|row| !ambiguous.contains(&row.author))
        .collect();

    info!(
        "Lost {} paintings from {} ambiguous authors, {} remain",
        before - kept.len(),
        ambiguous.len(),
        kept.len()
    );
    kept
}
