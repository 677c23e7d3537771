use crate::autocomplete::PrefixIndex;
use crate::cache::SuggestionCache;
use crate::config::AutocompleteConfig;
use crate::debounce::Debouncer;
use crate::error::AutocompleteError;
use crate::highlight::Highlighter;
use crate::perf::PerfTimer;
use crate::surface::{
    EventOutcome, InputSurface, Key, OutputSurface, PointerTarget, Segment, SuggestionItem,
    TextEdit, UiEvent,
};
use log::{debug, warn};
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Displaying,
}

pub struct ControllerBuilder<I, O> {
    input: Option<I>,
    output: Option<O>,
    index: Option<Arc<PrefixIndex>>,
    words: Vec<String>,
    config: AutocompleteConfig,
}

impl<I: InputSurface, O: OutputSurface> Default for ControllerBuilder<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputSurface, O: OutputSurface> ControllerBuilder<I, O> {
    pub fn new() -> Self {
        Self {
            input: None,
            output: None,
            index: None,
            words: Vec::new(),
            config: AutocompleteConfig::default(),
        }
    }

    pub fn input(mut self, input: I) -> Self {
        self.input = Some(input);
        self
    }

    pub fn output(mut self, output: O) -> Self {
        self.output = Some(output);
        self
    }

    pub fn config(mut self, config: AutocompleteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn vocabulary<W, S>(mut self, words: W) -> Self
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Shares an existing index instead of building one from `vocabulary`.
    pub fn index(mut self, index: Arc<PrefixIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn build(self) -> Result<AutocompleteController<I, O>, AutocompleteError> {
        let input = self.input.ok_or(AutocompleteError::MissingInput)?;
        let mut output = self.output.ok_or(AutocompleteError::MissingOutput)?;
        let config = self.config;
        if config.max_suggestions == 0 {
            return Err(AutocompleteError::InvalidConfig(
                "max_suggestions must be at least 1".into(),
            ));
        }

        let index = match self.index {
            Some(_) if !self.words.is_empty() => {
                return Err(AutocompleteError::InvalidConfig(
                    "give either a vocabulary or a shared index, not both".into(),
                ));
            }
            Some(index) if index.fold_case() == config.case_sensitive => {
                return Err(AutocompleteError::InvalidConfig(format!(
                    "shared index folds case = {}, but case_sensitive = {}",
                    index.fold_case(),
                    config.case_sensitive
                )));
            }
            Some(index) => index,
            None => {
                let mut index = PrefixIndex::with_case_folding(!config.case_sensitive);
                index.bulk_insert(&self.words);
                Arc::new(index)
            }
        };
        if index.is_empty() {
            warn!("autocomplete bound with an empty vocabulary; no suggestions will be shown");
        }

        output.clear();
        output.set_visible(false);

        Ok(AutocompleteController {
            input,
            output,
            results: SuggestionCache::new(config.result_cache_capacity),
            highlighter: Highlighter::new(config.pattern_cache_capacity),
            debouncer: Debouncer::new(config.debounce_delay),
            index,
            config,
            phase: Phase::Idle,
            highlighted: None,
            last_query: None,
            queries_executed: 0,
        })
    }
}

/// Drives one input/suggestion-list pair.
///
/// Keystrokes only arm the debouncer; the query runs from [`poll`](Self::poll)
/// once the deadline passes. Navigation and selection act on whatever the
/// output surface currently holds.
pub struct AutocompleteController<I, O> {
    input: I,
    output: O,
    index: Arc<PrefixIndex>,
    results: SuggestionCache<Vec<String>>,
    highlighter: Highlighter,
    debouncer: Debouncer,
    config: AutocompleteConfig,
    phase: Phase,
    highlighted: Option<usize>,
    last_query: Option<String>,
    queries_executed: u64,
}

impl<I: InputSurface, O: OutputSurface> AutocompleteController<I, O> {
    pub fn builder() -> ControllerBuilder<I, O> {
        ControllerBuilder::new()
    }

    pub fn handle_event(&mut self, event: UiEvent, now: Instant) -> EventOutcome {
        match event {
            UiEvent::Edit(edit) => {
                self.input.apply(edit);
                self.arm(now);
                EventOutcome::Ignored
            }
            UiEvent::Paste(text) => {
                self.input.apply(TextEdit::InsertStr(text));
                self.arm(now);
                EventOutcome::Ignored
            }
            UiEvent::Key(key) => self.handle_key(key),
            UiEvent::PointerDown(PointerTarget::Suggestion(index)) => {
                self.commit(index);
                EventOutcome::Handled
            }
            UiEvent::PointerDown(PointerTarget::Outside) => {
                self.dismiss();
                EventOutcome::Ignored
            }
            UiEvent::PointerDown(PointerTarget::Input) => EventOutcome::Ignored,
        }
    }

    fn arm(&mut self, now: Instant) {
        self.debouncer.arm(now);
        if self.phase == Phase::Idle {
            self.phase = Phase::Pending;
        }
    }

    /// Runs the debounced query if its deadline has passed. Returns true when it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debouncer.take_due(now) {
            return false;
        }
        self.run_query();
        true
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn run_query(&mut self) {
        let raw = self.input.value();
        let query = self.index.normalize(&raw);

        if self.output.is_visible() && self.last_query.as_deref() == Some(query.as_str()) {
            self.phase = Phase::Displaying;
            return;
        }

        if query.is_empty() || query.chars().count() < self.config.min_characters {
            self.hide();
            self.last_query = Some(query);
            return;
        }

        let suggestions = self.lookup(&query);
        self.queries_executed += 1;
        debug!("query {:?} -> {} suggestions", query, suggestions.len());

        if suggestions.is_empty() {
            self.hide();
        } else {
            self.render(&suggestions, raw.trim());
        }
        self.last_query = Some(query);
    }

    fn lookup(&mut self, query: &str) -> Vec<String> {
        self.results.sync_generation(self.index.generation());
        if let Some(hit) = self.results.get(query) {
            debug!("suggestion cache hit for {:?}", query);
            return hit.clone();
        }

        let timer = PerfTimer::start("trie suggest");
        let ranked = self.index.suggest(query, self.config.max_suggestions);
        timer.stop();

        self.results.put(query.to_string(), ranked.clone());
        ranked
    }

    fn render(&mut self, suggestions: &[String], typed: &str) {
        self.output.clear();
        for value in suggestions {
            let segments = if self.config.highlight_match {
                self.highlighter.highlight(value, typed)
            } else {
                vec![Segment::plain(value.as_str())]
            };
            self.output.append(SuggestionItem {
                value: value.clone(),
                segments,
            });
        }
        self.output.set_visible(true);
        self.highlighted = None;
        self.phase = Phase::Displaying;
    }

    fn handle_key(&mut self, key: Key) -> EventOutcome {
        if self.phase != Phase::Displaying || !self.output.is_visible() {
            return EventOutcome::Ignored;
        }
        match key {
            Key::ArrowDown => self.move_highlight(true),
            Key::ArrowUp => self.move_highlight(false),
            Key::Enter => match self.highlighted {
                Some(index) => {
                    self.commit(index);
                    EventOutcome::Handled
                }
                None => EventOutcome::Ignored,
            },
            Key::Tab => {
                self.commit(self.highlighted.unwrap_or(0));
                EventOutcome::Handled
            }
            Key::Escape => {
                self.dismiss();
                EventOutcome::Handled
            }
            Key::Other => EventOutcome::Ignored,
        }
    }

    fn move_highlight(&mut self, forward: bool) -> EventOutcome {
        let len = self.output.len();
        if len == 0 {
            return EventOutcome::Ignored;
        }
        let next = match (self.highlighted, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        if let Some(previous) = self.highlighted {
            self.output.set_highlighted(previous, false);
        }
        self.output.set_highlighted(next, true);
        self.highlighted = Some(next);
        EventOutcome::Handled
    }

    fn commit(&mut self, index: usize) {
        let Some(value) = self.output.item(index).map(|item| item.value.clone()) else {
            debug!("ignoring selection of missing suggestion {}", index);
            return;
        };
        self.input.set_value(&value);
        self.input.notify_changed();
        self.debouncer.cancel();
        self.hide();
    }

    pub fn dismiss(&mut self) {
        self.debouncer.cancel();
        self.hide();
    }

    fn hide(&mut self) {
        self.output.clear();
        self.output.set_visible(false);
        self.highlighted = None;
        self.last_query = None;
        self.phase = if self.debouncer.is_pending() {
            Phase::Pending
        } else {
            Phase::Idle
        };
    }

    /// Rebuilds the index from scratch and drops every cached ranking.
    pub fn replace_vocabulary<W, S>(&mut self, words: W)
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = PrefixIndex::with_case_folding(!self.config.case_sensitive);
        index.bulk_insert(words);
        if index.is_empty() {
            warn!("vocabulary replaced with an empty list; no suggestions will be shown");
        }
        self.index = Arc::new(index);
        self.results.invalidate_all();
        self.dismiss();
    }

    /// Adds one word, copying the index first if other controllers share it.
    pub fn insert_word(&mut self, word: &str) -> bool {
        let inserted = Arc::make_mut(&mut self.index).insert(word);
        if inserted {
            self.results.invalidate_all();
        }
        inserted
    }

    /// Cancels any pending query, clears caches and hands the surfaces back.
    pub fn destroy(mut self) -> (I, O) {
        self.debouncer.cancel();
        self.results.invalidate_all();
        self.highlighter.clear();
        self.hide();
        (self.input, self.output)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn queries_executed(&self) -> u64 {
        self.queries_executed
    }

    pub fn index(&self) -> &Arc<PrefixIndex> {
        &self.index
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextInput;
    use crate::palette::SuggestionList;
    use std::time::Duration;

    type Controller = AutocompleteController<TextInput, SuggestionList>;

    fn controller(words: &[&str]) -> Controller {
        ControllerBuilder::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .vocabulary(words.iter().copied())
            .build()
            .unwrap()
    }

    fn hardware() -> Controller {
        controller(&["MARTILLO DE UÑA", "MANGUERA DE JARDÍN", "MANIJA"])
    }

    fn type_text(c: &mut Controller, text: &str, now: Instant) -> Instant {
        for ch in text.chars() {
            c.handle_event(UiEvent::Edit(TextEdit::Insert(ch)), now);
        }
        let fire = now + c.config().debounce_delay;
        assert!(c.poll(fire));
        fire
    }

    #[test]
    fn missing_surfaces_fail_fast() {
        let missing_input = ControllerBuilder::<TextInput, SuggestionList>::new()
            .output(SuggestionList::new())
            .build();
        assert!(matches!(missing_input, Err(AutocompleteError::MissingInput)));

        let missing_output = ControllerBuilder::<TextInput, SuggestionList>::new()
            .input(TextInput::new())
            .build();
        assert!(matches!(missing_output, Err(AutocompleteError::MissingOutput)));
    }

    #[test]
    fn zero_max_suggestions_is_rejected() {
        let result = ControllerBuilder::<TextInput, SuggestionList>::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .config(AutocompleteConfig {
                max_suggestions: 0,
                ..AutocompleteConfig::default()
            })
            .build();
        assert!(matches!(result, Err(AutocompleteError::InvalidConfig(_))));
    }

    #[test]
    fn empty_vocabulary_binds_but_never_suggests() {
        let mut c = controller(&[]);
        type_text(&mut c, "MA", Instant::now());
        assert!(!c.output().is_visible());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn renders_ranked_and_highlighted_suggestions() {
        let mut c = hardware();
        type_text(&mut c, "ma", Instant::now());

        assert_eq!(c.phase(), Phase::Displaying);
        assert!(c.output().is_visible());
        assert_eq!(
            c.output().values(),
            vec!["MANIJA", "MARTILLO DE UÑA", "MANGUERA DE JARDÍN"]
        );
        assert_eq!(c.output().items()[0].markup(), "<strong>MA</strong>NIJA");
    }

    #[test]
    fn highlighting_can_be_turned_off() {
        let mut c = ControllerBuilder::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .vocabulary(["MANIJA"])
            .config(AutocompleteConfig {
                highlight_match: false,
                ..AutocompleteConfig::default()
            })
            .build()
            .unwrap();
        type_text(&mut c, "ma", Instant::now());
        assert_eq!(c.output().items()[0].segments, vec![Segment::plain("MANIJA")]);
    }

    #[test]
    fn short_queries_show_nothing() {
        let mut c = hardware();
        type_text(&mut c, "m", Instant::now());
        assert!(!c.output().is_visible());
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.queries_executed(), 0);
    }

    #[test]
    fn burst_of_keystrokes_runs_one_query_with_last_value() {
        let mut c = hardware();
        let start = Instant::now();
        for (i, ch) in "MAN".chars().enumerate() {
            c.handle_event(
                UiEvent::Edit(TextEdit::Insert(ch)),
                start + Duration::from_millis(50 * i as u64),
            );
            assert_eq!(c.phase(), Phase::Pending);
        }
        assert!(!c.poll(start + Duration::from_millis(200)));
        assert!(c.poll(start + Duration::from_millis(250)));
        assert_eq!(c.queries_executed(), 1);
        assert_eq!(c.output().values(), vec!["MANIJA", "MANGUERA DE JARDÍN"]);
    }

    #[test]
    fn unchanged_query_is_a_noop() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        let rebuilds = c.output().rebuilds();

        c.handle_event(UiEvent::Edit(TextEdit::Insert(' ')), t);
        c.poll(t + c.config().debounce_delay);
        assert_eq!(c.queries_executed(), 1);
        assert_eq!(c.output().rebuilds(), rebuilds);
        assert_eq!(c.phase(), Phase::Displaying);
    }

    #[test]
    fn repeated_queries_are_served_from_cache() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::Edit(TextEdit::Insert('N')), t);
        let t = t + c.config().debounce_delay;
        c.poll(t);
        c.handle_event(UiEvent::Edit(TextEdit::Backspace), t);
        c.poll(t + c.config().debounce_delay);

        assert_eq!(c.queries_executed(), 3);
        assert_eq!(c.index().traversal_count(), 2);
        assert_eq!(
            c.output().values(),
            vec!["MANIJA", "MARTILLO DE UÑA", "MANGUERA DE JARDÍN"]
        );
    }

    #[test]
    fn inserting_a_word_invalidates_cached_rankings() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.dismiss();
        assert!(c.insert_word("MAZO"));

        c.handle_event(UiEvent::Edit(TextEdit::Replace("MA".into())), t);
        c.poll(t + c.config().debounce_delay);
        assert_eq!(c.index().traversal_count(), 2);
        assert_eq!(c.output().values()[0], "MAZO");
    }

    #[test]
    fn shared_index_is_copied_before_insert() {
        let shared = Arc::new(PrefixIndex::from_words(["PALA"]));
        let mut c: Controller = ControllerBuilder::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .index(Arc::clone(&shared))
            .build()
            .unwrap();
        c.insert_word("PALETA");
        assert!(!shared.search("PALETA"));
        assert!(c.index().search("PALETA"));
    }

    #[test]
    fn shared_index_must_agree_on_case_sensitivity() {
        let shared = Arc::new(PrefixIndex::from_words(["Manija"]));
        let result = ControllerBuilder::<TextInput, SuggestionList>::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .index(Arc::clone(&shared))
            .config(AutocompleteConfig {
                case_sensitive: true,
                ..AutocompleteConfig::default()
            })
            .build();
        assert!(matches!(result, Err(AutocompleteError::InvalidConfig(_))));

        let exact = Arc::new({
            let mut index = PrefixIndex::with_case_folding(false);
            index.insert("Manija");
            index
        });
        let mut c: Controller = ControllerBuilder::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .index(exact)
            .config(AutocompleteConfig {
                case_sensitive: true,
                ..AutocompleteConfig::default()
            })
            .build()
            .unwrap();
        type_text(&mut c, "ma", Instant::now());
        assert!(!c.output().is_visible());

        c.handle_event(UiEvent::Edit(TextEdit::Replace("Ma".into())), Instant::now());
        c.poll(Instant::now() + c.config().debounce_delay);
        assert_eq!(c.output().values(), vec!["Manija"]);
    }

    #[test]
    fn vocabulary_and_shared_index_are_exclusive() {
        let result = ControllerBuilder::<TextInput, SuggestionList>::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .index(Arc::new(PrefixIndex::from_words(["PALA"])))
            .vocabulary(["PICO"])
            .build();
        assert!(matches!(result, Err(AutocompleteError::InvalidConfig(_))));
    }

    #[test]
    fn replacing_vocabulary_drops_stale_results() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.replace_vocabulary(["MACHETE"]);
        assert!(!c.output().is_visible());

        c.handle_event(UiEvent::Edit(TextEdit::Replace("ma".into())), t);
        c.poll(t + c.config().debounce_delay);
        assert_eq!(c.output().values(), vec!["MACHETE"]);
    }

    #[test]
    fn arrows_wrap_and_touch_only_two_rows() {
        let mut c = hardware();
        type_text(&mut c, "MA", Instant::now());

        let outcome = c.handle_event(UiEvent::Key(Key::ArrowUp), Instant::now());
        assert_eq!(outcome, EventOutcome::Handled);
        assert_eq!(c.highlighted(), Some(2));

        let updates = c.output().highlight_updates();
        c.handle_event(UiEvent::Key(Key::ArrowDown), Instant::now());
        assert_eq!(c.highlighted(), Some(0));
        assert_eq!(c.output().highlighted_indices(), vec![0]);
        assert_eq!(c.output().highlight_updates(), updates + 2);

        c.handle_event(UiEvent::Key(Key::ArrowUp), Instant::now());
        assert_eq!(c.highlighted(), Some(2));
        assert_eq!(c.output().highlighted_indices(), vec![2]);
        assert_eq!(c.output().rebuilds(), 2);
    }

    #[test]
    fn down_down_enter_selects_second_suggestion() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::Key(Key::ArrowDown), t);
        c.handle_event(UiEvent::Key(Key::ArrowDown), t);
        assert_eq!(c.handle_event(UiEvent::Key(Key::Enter), t), EventOutcome::Handled);

        assert_eq!(c.input().value(), "MARTILLO DE UÑA");
        assert_eq!(c.input().change_events(), 1);
        assert!(!c.output().is_visible());
        assert!(c.output().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn enter_without_highlight_is_left_to_the_host() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        assert_eq!(c.handle_event(UiEvent::Key(Key::Enter), t), EventOutcome::Ignored);
        assert!(c.output().is_visible());
        assert_eq!(c.input().value(), "MA");
    }

    #[test]
    fn tab_takes_the_first_suggestion() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::Key(Key::Tab), t);
        assert_eq!(c.input().value(), "MANIJA");
        assert!(!c.output().is_visible());
    }

    #[test]
    fn click_selects_and_outside_click_dismisses() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::PointerDown(PointerTarget::Input), t);
        assert!(c.output().is_visible());
        c.handle_event(UiEvent::PointerDown(PointerTarget::Suggestion(2)), t);
        assert_eq!(c.input().value(), "MANGUERA DE JARDÍN");

        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::PointerDown(PointerTarget::Outside), t);
        assert!(!c.output().is_visible());
        assert_eq!(c.input().value(), "MA");
        assert_eq!(c.input().change_events(), 0);
    }

    #[test]
    fn escape_dismisses_and_cancels_pending_query() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::Edit(TextEdit::Insert('N')), t);
        c.handle_event(UiEvent::Key(Key::Escape), t);
        assert!(!c.output().is_visible());
        assert_eq!(c.next_deadline(), None);
        assert!(!c.poll(t + Duration::from_secs(1)));
        assert_eq!(c.input().value(), "MAN");
    }

    #[test]
    fn selecting_from_a_stale_list_is_a_noop() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.output_mut().truncate(1);
        c.handle_event(UiEvent::PointerDown(PointerTarget::Suggestion(2)), t);
        assert_eq!(c.input().value(), "MA");
        assert_eq!(c.input().change_events(), 0);
    }

    #[test]
    fn paste_arms_the_debouncer() {
        let mut c = hardware();
        let t = Instant::now();
        c.handle_event(UiEvent::Paste("mang".into()), t);
        assert!(c.poll(t + c.config().debounce_delay));
        assert_eq!(c.output().values(), vec!["MANGUERA DE JARDÍN"]);
    }

    #[test]
    fn destroy_cancels_timer_and_returns_surfaces() {
        let mut c = hardware();
        let t = type_text(&mut c, "MA", Instant::now());
        c.handle_event(UiEvent::Edit(TextEdit::Insert('N')), t);
        let (input, output) = c.destroy();
        assert_eq!(input.value(), "MAN");
        assert!(!output.is_visible());
        assert!(output.is_empty());
    }
}
