use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteConfig {
    pub min_characters: usize,
    pub max_suggestions: usize,
    pub case_sensitive: bool,
    pub highlight_match: bool,
    pub debounce_delay: Duration,
    pub result_cache_capacity: usize,
    pub pattern_cache_capacity: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_characters: 2,
            max_suggestions: 10,
            case_sensitive: false,
            highlight_match: true,
            debounce_delay: Duration::from_millis(150),
            result_cache_capacity: 100,
            pattern_cache_capacity: 50,
        }
    }
}

/// Interactive quotation builder with product autocomplete
#[derive(Debug, Parser)]
#[command(name = "quotekit", version)]
pub struct Args {
    /// Product vocabulary, one name per line (default: built-in list)
    #[arg(value_name = "FILE")]
    pub vocabulary: Option<PathBuf>,

    /// Characters typed before suggestions appear
    #[arg(long, env = "QUOTEKIT_MIN_CHARS", default_value_t = 2)]
    pub min_chars: usize,

    /// Maximum number of suggestions shown
    #[arg(long, env = "QUOTEKIT_MAX_SUGGESTIONS", default_value_t = 10)]
    pub max_suggestions: usize,

    /// Match queries without folding case
    #[arg(long, env = "QUOTEKIT_CASE_SENSITIVE")]
    pub case_sensitive: bool,

    /// Emphasize the typed text inside each suggestion
    #[arg(
        long,
        env = "QUOTEKIT_HIGHLIGHT",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub highlight: bool,

    /// Pause after the last keystroke before querying
    #[arg(long, env = "QUOTEKIT_DEBOUNCE_MS", default_value_t = 150)]
    pub debounce_ms: u64,

    /// Symbol printed in front of amounts
    #[arg(long, env = "QUOTEKIT_CURRENCY", default_value = "$")]
    pub currency: String,
}

impl Args {
    pub fn autocomplete(&self) -> AutocompleteConfig {
        AutocompleteConfig {
            min_characters: self.min_chars,
            max_suggestions: self.max_suggestions,
            case_sensitive: self.case_sensitive,
            highlight_match: self.highlight,
            debounce_delay: Duration::from_millis(self.debounce_ms),
            ..AutocompleteConfig::default()
        }
    }
}
