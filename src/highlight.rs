//! Highlight spans inside one message.
//!
//! Candidate spans from token rules, the literal search text and the text
//! selection are merged into an ordered run list the renderer paints left to
//! right. Offsets are character offsets into the tab-expanded message text.

use crate::colors::TextColor;
use crate::filter::{FilterSet, RuleAction};
use regex::{Regex, RegexBuilder};

/// Id of the selection pseudo-span, and of "no highlight" in hit tests.
pub const NO_HIGHLIGHT: u32 = 0;
/// Id of spans produced by the literal search text.
pub const SEARCH_HIGHLIGHT: u32 = 1;
/// Id given to the first enabled token rule; later ones count up from here.
pub const FIRST_TOKEN_ID: u32 = 2;

/// Tab stop width used when normalizing message text for display.
pub const TAB_SIZE: usize = 4;

/// A colored half-open range `[begin, end)` of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub id: u32,
    pub begin: usize,
    pub end: usize,
    pub colors: TextColor,
}

impl Highlight {
    pub fn new(id: u32, begin: usize, end: usize, colors: TextColor) -> Self {
        Self {
            id,
            begin,
            end,
            colors,
        }
    }
}

/// Spans in insertion-merge order.
///
/// Inserting a span keeps every earlier span that starts before it, drops
/// the following spans it fully swallows, and leaves the rest alone. A span
/// that starts earlier and reaches into the new one is not clipped here;
/// [`HighlightSet::spans`] resolves such overlaps in favor of the span that
/// comes later in the list, which is what painting the list in order shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    raw: Vec<Highlight>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, highlight: Highlight) {
        if highlight.begin >= highlight.end {
            return;
        }

        let mut merged = Vec::with_capacity(self.raw.len() + 2);
        let mut rest = self.raw.iter().peekable();

        while let Some(span) = rest.next_if(|span| span.begin < highlight.begin) {
            merged.push(*span);
        }
        while rest.next_if(|span| span.end <= highlight.end).is_some() {}

        merged.push(highlight);
        merged.extend(rest.copied());

        self.raw = merged;
    }

    /// Merge the text selection after every other span.
    pub fn with_selection(mut self, begin: usize, end: usize) -> Self {
        let (begin, end) = if begin <= end { (begin, end) } else { (end, begin) };
        self.insert(Highlight::new(NO_HIGHLIGHT, begin, end, TextColor::selection()));
        self
    }

    /// Sorted, non-overlapping, non-empty spans.
    pub fn spans(&self) -> Vec<Highlight> {
        let mut out: Vec<Highlight> = Vec::with_capacity(self.raw.len());
        for span in &self.raw {
            if let Some(prev) = out.last_mut() {
                prev.end = prev.end.min(span.begin);
                if prev.end <= prev.begin {
                    out.pop();
                }
            }
            out.push(*span);
        }
        out
    }

    /// Id of the span covering `offset`, or [`NO_HIGHLIGHT`].
    pub fn id_at(&self, offset: usize) -> u32 {
        self.spans()
            .iter()
            .find(|span| span.begin <= offset && offset < span.end)
            .map_or(NO_HIGHLIGHT, |span| span.id)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Character offsets of the byte positions in one text.
struct CharIndex {
    starts: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    fn char_offset(&self, byte: usize) -> usize {
        self.starts.partition_point(|&start| start < byte)
    }
}

/// Literal search text, matched case-insensitively with the same Unicode case
/// folding as `Simple` rules.
#[derive(Debug, Clone)]
pub struct SearchText {
    regex: Option<Regex>,
}

impl SearchText {
    pub fn new(text: &str) -> Self {
        let regex = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build();
        if let Err(e) = &regex {
            tracing::warn!(error = %e, "search text too large to match");
        }
        Self { regex: regex.ok() }
    }

    /// True if the text occurs in `haystack`. The empty text occurs everywhere.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(haystack))
    }

    /// Non-empty, non-overlapping occurrences as byte ranges.
    fn find_iter<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.regex
            .iter()
            .flat_map(move |re| re.find_iter(haystack))
            .filter(|m| !m.is_empty())
            .map(|m| (m.start(), m.end()))
    }
}

/// Compute the highlight spans of one message.
///
/// `text` must already be tab-expanded (see [`tabs_to_spaces`]). Token rules
/// are applied first, in rule order, then every case-insensitive occurrence of
/// `highlight_text`.
pub fn index_highlights(filters: &FilterSet, text: &str, highlight_text: &str) -> HighlightSet {
    let mut set = HighlightSet::new();
    let chars = CharIndex::new(text);

    let token_rules = filters
        .message_rules()
        .iter()
        .filter(|rule| rule.is_enabled() && rule.action() == RuleAction::Token);
    for (id, rule) in (FIRST_TOKEN_ID..).zip(token_rules) {
        for m in rule.find_iter(text) {
            let (begin, end) = (chars.char_offset(m.start()), chars.char_offset(m.end()));
            set.insert(Highlight::new(id, begin, end, rule.colors()));
        }
    }

    if !highlight_text.is_empty() {
        let search = SearchText::new(highlight_text);
        for (begin, end) in search.find_iter(text) {
            let (begin, end) = (chars.char_offset(begin), chars.char_offset(end));
            set.insert(Highlight::new(SEARCH_HIGHLIGHT, begin, end, TextColor::search_highlight()));
        }
    }

    set
}

/// Characters `[begin, end)` of `text`, clamped to its length.
pub fn char_slice(text: &str, begin: usize, end: usize) -> &str {
    let byte_at = |n: usize| text.char_indices().nth(n).map_or(text.len(), |(i, _)| i);
    let begin = byte_at(begin);
    let end = byte_at(end).max(begin);
    &text[begin..end]
}

/// Expand tabs to spaces, with stops every `tab_size` characters.
pub fn tabs_to_spaces(text: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut result = String::with_capacity(text.len() + 3 * tab_size);
    let mut column = 0;
    for c in text.chars() {
        if c == '\t' {
            loop {
                result.push(' ');
                column += 1;
                if column % tab_size == 0 {
                    break;
                }
            }
        } else {
            result.push(c);
            column += 1;
        }
    }
    result
}

/// Character range of the word (alphanumerics and `_`) around `offset`.
pub fn word_at(text: &str, offset: usize) -> (usize, usize) {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let chars: Vec<char> = text.chars().collect();
    let offset = offset.min(chars.len());

    let begin = chars[..offset]
        .iter()
        .rposition(|&c| !is_word(c))
        .map_or(0, |i| i + 1);
    let end = chars[offset..]
        .iter()
        .position(|&c| !is_word(c))
        .map_or(chars.len(), |i| offset + i);
    (begin, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgb;
    use crate::filter::{MatchKind, Rule};
    use proptest::prelude::*;

    fn span(id: u32, begin: usize, end: usize) -> Highlight {
        Highlight::new(id, begin, end, TextColor::window())
    }

    fn ranges(set: &HighlightSet) -> Vec<(u32, usize, usize)> {
        set.spans().iter().map(|h| (h.id, h.begin, h.end)).collect()
    }

    fn token_set(pattern: &str) -> FilterSet {
        let mut set = FilterSet::new();
        set.add(
            Rule::message(
                pattern,
                MatchKind::Regex,
                RuleAction::Token,
                TextColor::new(Rgb::WHITE, Rgb(200, 0, 0)),
            )
            .unwrap(),
        );
        set
    }

    #[test]
    fn test_zero_length_span_dropped() {
        let mut set = HighlightSet::new();
        set.insert(span(5, 3, 3));
        assert!(set.is_empty());
    }

    #[test]
    fn test_new_span_swallows_contained_spans() {
        let mut set = HighlightSet::new();
        set.insert(span(2, 4, 6));
        set.insert(span(3, 7, 9));
        set.insert(span(1, 3, 10));
        assert_eq!(ranges(&set), vec![(1, 3, 10)]);
    }

    #[test]
    fn test_preceding_span_clipped_at_new_begin() {
        let mut set = HighlightSet::new();
        set.insert(span(2, 10, 15));
        set.insert(span(1, 12, 20));
        assert_eq!(ranges(&set), vec![(2, 10, 12), (1, 12, 20)]);
    }

    #[test]
    fn test_following_longer_span_wins_overlap() {
        let mut set = HighlightSet::new();
        set.insert(span(2, 12, 20));
        set.insert(span(1, 10, 15));
        assert_eq!(ranges(&set), vec![(1, 10, 12), (2, 12, 20)]);
    }

    #[test]
    fn test_span_inside_longer_one_cuts_it() {
        let mut set = HighlightSet::new();
        set.insert(span(2, 4, 20));
        set.insert(span(1, 10, 12));
        assert_eq!(ranges(&set), vec![(2, 4, 10), (1, 10, 12)]);
    }

    #[test]
    fn test_same_begin_longer_existing_span() {
        let mut set = HighlightSet::new();
        set.insert(span(2, 10, 20));
        set.insert(span(1, 10, 15));
        assert_eq!(ranges(&set), vec![(2, 10, 20)]);
    }

    #[test]
    fn test_quick_brown_fox_regression() {
        let text = "the quick brown fox";
        let filters = token_set("quick|brown");
        let set = index_highlights(&filters, text, "own");
        assert_eq!(
            ranges(&set),
            vec![(FIRST_TOKEN_ID, 4, 9), (FIRST_TOKEN_ID, 10, 12), (SEARCH_HIGHLIGHT, 12, 15)]
        );
        assert_eq!(&text[10..12], "br");
    }

    #[test]
    fn test_token_ids_count_enabled_rules_only() {
        let mut filters = FilterSet::new();
        let colors = TextColor::window();
        filters.add(Rule::message("a", MatchKind::Simple, RuleAction::Token, colors).unwrap().with_enabled(false));
        filters.add(Rule::message("b", MatchKind::Simple, RuleAction::Highlight, colors).unwrap());
        filters.add(Rule::message("c", MatchKind::Simple, RuleAction::Token, colors).unwrap());
        filters.add(Rule::message("d", MatchKind::Simple, RuleAction::Token, colors).unwrap());
        let set = index_highlights(&filters, "a b c d", "");
        assert_eq!(ranges(&set), vec![(2, 4, 5), (3, 6, 7)]);
    }

    #[test]
    fn test_literal_search_is_case_insensitive() {
        let set = index_highlights(&FilterSet::new(), "Error error ERROR", "error");
        assert_eq!(
            ranges(&set),
            vec![(1, 0, 5), (1, 6, 11), (1, 12, 17)]
        );
        assert_eq!(set.spans()[0].colors, TextColor::search_highlight());
    }

    #[test]
    fn test_selection_overrides_highlights() {
        let filters = token_set("quick");
        let set = index_highlights(&filters, "the quick brown fox", "").with_selection(12, 6);
        assert_eq!(ranges(&set), vec![(FIRST_TOKEN_ID, 4, 6), (NO_HIGHLIGHT, 6, 12)]);
        assert_eq!(set.spans()[1].colors, TextColor::selection());
    }

    #[test]
    fn test_id_at() {
        let filters = token_set("quick");
        let set = index_highlights(&filters, "the quick fox", "fox");
        assert_eq!(set.id_at(0), NO_HIGHLIGHT);
        assert_eq!(set.id_at(4), FIRST_TOKEN_ID);
        assert_eq!(set.id_at(9), NO_HIGHLIGHT);
        assert_eq!(set.id_at(11), SEARCH_HIGHLIGHT);
    }

    #[test]
    fn test_empty_search_text_adds_nothing() {
        assert!(index_highlights(&FilterSet::new(), "abc", "").is_empty());
    }

    #[test]
    fn test_search_text_matching() {
        assert!(SearchText::new("wORLD").is_match("Hello World"));
        assert!(!SearchText::new("world").is_match("Hello"));
        assert!(SearchText::new("").is_match("anything"));
        assert!(SearchText::new("a.b").is_match("A.B"));
        assert!(!SearchText::new("a.b").is_match("axb"));
    }

    #[test]
    fn test_search_text_folds_unicode_case() {
        assert!(SearchText::new("É").is_match("café"));
        let set = index_highlights(&FilterSet::new(), "CAFÉ au lait", "é");
        assert_eq!(ranges(&set), vec![(SEARCH_HIGHLIGHT, 3, 4)]);
    }

    #[test]
    fn test_offsets_count_characters() {
        let text = "héllo quick";
        let set = index_highlights(&token_set("quick"), text, "LLO");
        assert_eq!(
            ranges(&set),
            vec![(SEARCH_HIGHLIGHT, 2, 5), (FIRST_TOKEN_ID, 6, 11)]
        );
        assert_eq!(char_slice(text, 6, 11), "quick");
        assert_eq!(char_slice(text, 1, 2), "é");
        assert_eq!(set.id_at(7), FIRST_TOKEN_ID);
    }

    #[test]
    fn test_char_slice_clamps() {
        assert_eq!(char_slice("abc", 1, 10), "bc");
        assert_eq!(char_slice("abc", 5, 9), "");
        assert_eq!(char_slice("abc", 2, 1), "");
    }

    #[test]
    fn test_tabs_to_spaces() {
        assert_eq!(tabs_to_spaces("a\tb", 4), "a   b");
        assert_eq!(tabs_to_spaces("\tx", 4), "    x");
        assert_eq!(tabs_to_spaces("abcd\te", 4), "abcd    e");
        assert_eq!(tabs_to_spaces("no tabs", 4), "no tabs");
    }

    #[test]
    fn test_word_at_non_ascii() {
        let text = "größe: 42";
        assert_eq!(word_at(text, 2), (0, 5));
        assert_eq!(word_at(text, 8), (7, 9));
    }

    #[test]
    fn test_word_at() {
        let text = "call foo_bar(42) now";
        assert_eq!(word_at(text, 7), (5, 12));
        assert_eq!(word_at(text, 5), (5, 12));
        assert_eq!(word_at(text, 14), (13, 15));
        assert_eq!(word_at(text, 100), (17, 20));
        assert_eq!(word_at(text, 4), (0, 4));
    }

    fn arb_span() -> impl Strategy<Value = Highlight> {
        (0u32..4, 0usize..40, 0usize..40)
            .prop_map(|(id, a, b)| Highlight::new(id, a.min(b), a.max(b), TextColor::window()))
    }

    proptest! {
        #[test]
        fn prop_spans_sorted_disjoint_nonempty(spans in prop::collection::vec(arb_span(), 0..24)) {
            let mut set = HighlightSet::new();
            for s in spans {
                set.insert(s);
            }
            let out = set.spans();
            for s in &out {
                prop_assert!(s.begin < s.end);
            }
            for pair in out.windows(2) {
                prop_assert!(pair[0].end <= pair[1].begin);
            }
        }

        #[test]
        fn prop_insert_is_idempotent(
            spans in prop::collection::vec(arb_span(), 0..24),
            extra in arb_span(),
        ) {
            let mut once = HighlightSet::new();
            for s in &spans {
                once.insert(*s);
            }
            let mut twice = once.clone();
            once.insert(extra);
            twice.insert(extra);
            twice.insert(extra);
            prop_assert_eq!(once.spans(), twice.spans());
        }
    }
}
