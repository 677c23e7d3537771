use crate::cache::SuggestionCache;
use crate::surface::Segment;
use log::warn;
use regex::{Regex, RegexBuilder};

/// Splits suggestions around case-insensitive occurrences of the typed query.
pub struct Highlighter {
    patterns: SuggestionCache<Option<Regex>>,
    size_limit: Option<usize>,
}

impl Highlighter {
    pub fn new(capacity: usize) -> Self {
        Self {
            patterns: SuggestionCache::new(capacity),
            size_limit: None,
        }
    }

    /// Caps the compiled size of each pattern; queries over the cap stay unhighlighted.
    pub fn with_size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = Some(bytes);
        self
    }

    pub fn highlight(&mut self, text: &str, query: &str) -> Vec<Segment> {
        let query = query.trim();
        if query.is_empty() {
            return vec![Segment::plain(text)];
        }
        match self.pattern(query) {
            Some(pattern) => split_matches(pattern, text),
            None => vec![Segment::plain(text)],
        }
    }

    fn pattern(&mut self, query: &str) -> Option<&Regex> {
        let key = query.to_lowercase();
        if self.patterns.get(&key).is_none() {
            let mut builder = RegexBuilder::new(&regex::escape(query));
            builder.case_insensitive(true);
            if let Some(limit) = self.size_limit {
                builder.size_limit(limit);
            }
            let compiled = builder.build();
            let compiled = match compiled {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("highlight pattern for {:?} failed to compile: {}", query, e);
                    None
                }
            };
            self.patterns.put(key.clone(), compiled);
        }
        self.patterns.get(&key).and_then(Option::as_ref)
    }

    pub fn cached_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn clear(&mut self) {
        self.patterns.invalidate_all();
    }
}

fn split_matches(pattern: &Regex, text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        segments.push(Segment::emphasized(m.as_str()));
        last = m.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[last..]));
    }
    segments
}
