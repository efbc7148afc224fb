//! Mention name index.
//!
//! A static lookup structure over a large, fixed set of candidate names that
//! answers case-insensitive substring queries in original index order.
//!
//! All names are case-folded once at build time and packed into a single
//! haystack separated by `\0`. A query folds the needle once and walks
//! `str::find` over the haystack; every hit is mapped back to its entry with a
//! binary search over the start offsets and the scan resumes at the next entry,
//! so each entry is reported at most once and no per-entry allocation happens.

use std::ops::Range;

/// Result cap for inline `@mention` suggestions.
pub const INLINE_SUGGESTION_LIMIT: usize = 5;

/// Result cap for the standalone lookup endpoint.
pub const LOOKUP_LIMIT: usize = 10;

/// Default size of the synthetic candidate set.
pub const DEFAULT_NAME_COUNT: usize = 1_000_000;

const SEPARATOR: char = '\0';

/// Case-insensitive substring index over a fixed list of names
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    /// Names in original order
    names: Vec<String>,
    /// Case-folded names joined by `SEPARATOR`
    folded: String,
    /// Byte offset of each entry inside `folded` (sorted, same order as `names`)
    starts: Vec<usize>,
}

impl NameIndex {
    /// Build an index from names in the order they should be reported.
    ///
    /// Names containing the internal separator cannot be indexed and are skipped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for name in names {
            let name = name.into();
            if name.contains(SEPARATOR) {
                skipped += 1;
                continue;
            }
            if !index.names.is_empty() {
                index.folded.push(SEPARATOR);
            }
            index.starts.push(index.folded.len());
            index.folded.push_str(&name.to_lowercase());
            index.names.push(name);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped names containing a NUL byte");
        }

        index
    }

    /// Build the reference candidate set `User1..User{count}`.
    pub fn synthetic(count: usize) -> Self {
        Self::new((1..=count).map(|i| format!("User{}", i)))
    }

    /// Number of indexed names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the index holds no names
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at a given index position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Return up to `limit` names containing `query`, case-insensitively,
    /// in original index order.
    ///
    /// An empty query yields no results.
    pub fn query(&self, query: &str, limit: usize) -> Vec<&str> {
        if query.is_empty() || limit == 0 || query.contains(SEPARATOR) {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let mut results = Vec::with_capacity(limit.min(self.names.len()));
        let mut cursor = 0;

        while cursor < self.folded.len() {
            let Some(found) = self.folded[cursor..].find(&needle) else {
                break;
            };
            let hit = cursor + found;
            let entry = self.entry_at(hit);

            results.push(self.names[entry].as_str());
            if results.len() == limit {
                break;
            }

            cursor = match self.starts.get(entry + 1) {
                Some(&next) => next,
                None => break,
            };
        }

        results
    }

    /// Owned variant of [`query`](Self::query) for handing results across tasks.
    pub fn query_owned(&self, query: &str, limit: usize) -> Vec<String> {
        self.query(query, limit)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Map a byte offset in the haystack to the entry containing it.
    fn entry_at(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(entry) => entry,
            Err(insert_at) => insert_at - 1,
        }
    }
}

/// Byte range of the first case-insensitive occurrence of `query` in `name`.
///
/// Used to highlight the matched part of a suggestion. Returns `None` when the
/// query is empty or does not occur.
pub fn match_range(name: &str, query: &str) -> Option<Range<usize>> {
    if query.is_empty() {
        return None;
    }
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    for (start, _) in name.char_indices() {
        let mut matched = 0;
        for (offset, ch) in name[start..].char_indices() {
            let folded: Vec<char> = ch.to_lowercase().collect();
            if matched + folded.len() > needle.len()
                || needle[matched..matched + folded.len()] != folded[..]
            {
                break;
            }
            matched += folded.len();
            if matched == needle.len() {
                return Some(start..start + offset + ch.len_utf8());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NameIndex {
        NameIndex::new(["Alice", "bob", "ALBERT", "Carol", "Malia", "zed"])
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(sample().query("", 10).is_empty());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let index = sample();
        assert_eq!(index.query("al", 10), vec!["Alice", "ALBERT", "Malia"]);
        assert_eq!(index.query("AL", 10), vec!["Alice", "ALBERT", "Malia"]);
    }

    #[test]
    fn test_limit_caps_results_in_order() {
        let index = sample();
        assert_eq!(index.query("a", 2), vec!["Alice", "ALBERT"]);
    }

    #[test]
    fn test_no_match() {
        assert!(sample().query("xyz", 10).is_empty());
    }

    #[test]
    fn test_match_does_not_span_entries() {
        // "e" ends "Alice" and "b" starts "bob"; the joined haystack must not match "eb"
        let index = sample();
        assert!(index.query("eb", 10).is_empty());
    }

    #[test]
    fn test_entry_reported_once_with_repeated_hits() {
        let index = NameIndex::new(["aaaa", "ba"]);
        assert_eq!(index.query("a", 10), vec!["aaaa", "ba"]);
    }

    #[test]
    fn test_last_entry_can_match() {
        assert_eq!(sample().query("zed", 10), vec!["zed"]);
    }

    #[test]
    fn test_separator_in_query_returns_nothing() {
        assert!(sample().query("e\0b", 10).is_empty());
    }

    #[test]
    fn test_names_with_separator_skipped() {
        let index = NameIndex::new(["ok", "bad\0name"]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_synthetic_set() {
        let index = NameIndex::synthetic(20);
        assert_eq!(index.len(), 20);
        assert_eq!(index.get(0), Some("User1"));
        assert_eq!(
            index.query("us", INLINE_SUGGESTION_LIMIT),
            vec!["User1", "User2", "User3", "User4", "User5"]
        );
        assert_eq!(index.query("1", 10), vec!["User1", "User10", "User11", "User12", "User13", "User14", "User15", "User16", "User17", "User18"]);
    }

    #[test]
    fn test_every_result_contains_query() {
        let index = NameIndex::synthetic(500);
        for query in ["2", "User4", "r49", "SER1"] {
            let results = index.query(query, LOOKUP_LIMIT);
            assert!(results.len() <= LOOKUP_LIMIT);
            for name in &results {
                assert!(name.to_lowercase().contains(&query.to_lowercase()));
            }
            // Stable original order
            let positions: Vec<usize> = results
                .iter()
                .map(|n| (0..index.len()).find(|&i| index.get(i) == Some(*n)).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_unicode_folding() {
        let index = NameIndex::new(["Ärger", "Zoë"]);
        assert_eq!(index.query("är", 10), vec!["Ärger"]);
        assert_eq!(index.query("ZOË", 10), vec!["Zoë"]);
    }

    #[test]
    fn test_match_range() {
        assert_eq!(match_range("User12", "er1"), Some(2..5));
        assert_eq!(match_range("User12", "USER"), Some(0..4));
        assert_eq!(match_range("User12", "x"), None);
        assert_eq!(match_range("User12", ""), None);
    }

    #[test]
    fn test_match_range_multibyte() {
        let range = match_range("Zoë", "Ë").unwrap();
        assert_eq!(&"Zoë"[range], "ë");
    }
}
