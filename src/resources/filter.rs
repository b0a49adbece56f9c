//! Local text-search filtering over cached collections
//!
//! Purely client-side: filters the currently cached snapshot, never the
//! server. Case-insensitive substring match across the fields the caller
//! exposes.

/// Filter cached rows by a search string.
///
/// An empty (or whitespace-only) query keeps every row. Matching is a
/// case-insensitive substring test against any of the strings `fields`
/// extracts from a row.
pub fn search<T: Clone, F>(rows: &[T], query: &str, fields: F) -> Vec<T>
where
    F: Fn(&T) -> Vec<String>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| {
            fields(row)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
