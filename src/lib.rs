pub mod autocomplete;
pub mod cache;
pub mod config;
pub mod controller;
pub mod controller_daemon;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod palette;
pub mod perf;
pub mod quote;
pub mod surface;
pub mod vocabulary;

pub use autocomplete::PrefixIndex;
pub use cache::SuggestionCache;
pub use config::AutocompleteConfig;
pub use controller::{AutocompleteController, ControllerBuilder, Phase};
pub use error::{AutocompleteError, QuoteError, VocabularyError};
