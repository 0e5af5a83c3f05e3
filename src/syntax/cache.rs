//! Per-buffer highlighting cache
//!
//! Entries are keyed by region (a line's stable id) and tagged with the
//! revision they were computed at. The cache never looks at text to decide
//! freshness, so every edit to a region must come with a new revision.
//!
//! A region inside a multi-line token also records its `LineState`; a
//! different state is a miss, the same as a different revision.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::language::LanguageSpec;
use super::multiline::{scan_line, LineState};
use super::tokens::Token;

/// Stable identifier of a cached region
pub type RegionId = u64;

struct CacheEntry {
    revision: u64,
    state: LineState,
    tokens: Vec<Token>,
}

/// Region -> tokens cache, one entry per region
#[derive(Default)]
pub struct HighlightCache {
    entries: HashMap<RegionId, CacheEntry>,
    /// Number of scans performed so far
    scans: usize,
}

impl HighlightCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens for `region` at `revision`, scanning `text` only on a miss
    ///
    /// A stale entry is replaced; older revisions are never kept.
    pub fn get_or_compute(
        &mut self,
        region: RegionId,
        revision: u64,
        text: &str,
        spec: &LanguageSpec,
    ) -> &[Token] {
        self.get_or_compute_in(region, revision, LineState::default(), text, spec)
    }

    /// Like `get_or_compute`, for a region that multi-line tokens may cover
    pub fn get_or_compute_in(
        &mut self,
        region: RegionId,
        revision: u64,
        state: LineState,
        text: &str,
        spec: &LanguageSpec,
    ) -> &[Token] {
        let entry = match self.entries.entry(region) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                if entry.revision != revision || entry.state != state {
                    entry.revision = revision;
                    entry.state = state;
                    entry.tokens = scan_line(text, spec, &state);
                    self.scans += 1;
                }
                entry
            }
            Entry::Vacant(vacant) => {
                self.scans += 1;
                vacant.insert(CacheEntry {
                    revision,
                    state,
                    tokens: scan_line(text, spec, &state),
                })
            }
        };
        &entry.tokens
    }

    /// Drop the entry for one region
    pub fn invalidate(&mut self, region: RegionId) {
        self.entries.remove(&region);
    }

    /// Keep only the regions for which `keep` returns true
    pub fn retain<F: FnMut(RegionId) -> bool>(&mut self, mut keep: F) {
        self.entries.retain(|region, _| keep(*region));
    }

    /// Drop every entry (e.g. after the buffer's language changed)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached regions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times the tokenizer has been run through this cache
    pub fn scan_count(&self) -> usize {
        self.scans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::multiline::Piece;
    use crate::syntax::rules::Rule;
    use crate::syntax::style::Color;
    use crate::syntax::tokens::Category;

    fn spec() -> LanguageSpec {
        let mut spec = LanguageSpec::new("go");
        spec.add_rule(Rule::exact(Category::Keyword, ["func"], Color::from_hex(0xf0a400)));
        spec
    }

    #[test]
    fn test_hit_does_not_rescan() {
        let spec = spec();
        let mut cache = HighlightCache::new();

        let first = cache.get_or_compute(1, 0, "func main()", &spec).to_vec();
        assert_eq!(cache.scan_count(), 1);

        let second = cache.get_or_compute(1, 0, "func main()", &spec).to_vec();
        assert_eq!(cache.scan_count(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_only_revision_decides_freshness() {
        let spec = spec();
        let mut cache = HighlightCache::new();
        cache.get_or_compute(1, 0, "func", &spec);

        // Same revision, different text: still a hit
        let tokens = cache.get_or_compute(1, 0, "main", &spec).to_vec();
        assert_eq!(tokens[0].category, Category::Keyword);
        assert_eq!(cache.scan_count(), 1);

        // New revision: rescanned
        let tokens = cache.get_or_compute(1, 1, "main", &spec).to_vec();
        assert_eq!(tokens[0].category, Category::Plain);
        assert_eq!(cache.scan_count(), 2);
    }

    #[test]
    fn test_single_entry_per_region() {
        let spec = spec();
        let mut cache = HighlightCache::new();
        cache.get_or_compute(1, 0, "a", &spec);
        cache.get_or_compute(1, 1, "b", &spec);
        cache.get_or_compute(2, 0, "c", &spec);
        assert_eq!(cache.len(), 2);

        // Going back to revision 0 is a miss: it was evicted
        cache.get_or_compute(1, 0, "a", &spec);
        assert_eq!(cache.scan_count(), 4);
    }

    #[test]
    fn test_state_change_rescans() {
        let spec = spec();
        let mut cache = HighlightCache::new();
        cache.get_or_compute(1, 0, "main func", &spec);

        let inside = LineState {
            head: Some((
                4,
                Piece {
                    category: Category::Comment,
                    color: None,
                },
            )),
            tail: None,
        };
        let tokens = cache.get_or_compute_in(1, 0, inside, "main func", &spec).to_vec();
        assert_eq!(cache.scan_count(), 2);
        assert_eq!(tokens[0], Token::new(0..4, Category::Comment, None));
        assert_eq!(tokens.last().unwrap().category, Category::Keyword);

        cache.get_or_compute_in(1, 0, inside, "main func", &spec);
        assert_eq!(cache.scan_count(), 2);

        cache.get_or_compute(1, 0, "main func", &spec);
        assert_eq!(cache.scan_count(), 3);
    }

    #[test]
    fn test_invalidate_and_retain() {
        let spec = spec();
        let mut cache = HighlightCache::new();
        for region in 0..5 {
            cache.get_or_compute(region, 0, "func", &spec);
        }
        cache.invalidate(0);
        assert_eq!(cache.len(), 4);

        cache.retain(|region| region % 2 == 0);
        assert_eq!(cache.len(), 2);

        cache.get_or_compute(2, 0, "func", &spec);
        assert_eq!(cache.scan_count(), 5);

        cache.clear();
        assert!(cache.is_empty());
    }
}
