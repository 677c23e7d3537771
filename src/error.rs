use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutocompleteError {
    #[error("configuration error: no input surface bound")]
    MissingInput,

    #[error("configuration error: no suggestion surface bound")]
    MissingOutput,

    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("client name is empty")]
    EmptyClient,

    #[error("product name is empty")]
    EmptyProduct,

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("amount too large")]
    Overflow,

    #[error("no line item at position {0}")]
    NoSuchItem(usize),
}
