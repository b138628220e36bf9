//! Extractive text summarization.
//!
//! Picks the sentences whose words are most frequent across the document.
//! The stopword and abbreviation tables are built once per process and
//! shared read-only by every call.

mod stopwords;
mod summarizer;
mod tokenize;

pub use stopwords::is_stopword;
pub use summarizer::{summarize, TermFrequency, EMPTY_INPUT_MESSAGE, UNPROCESSABLE_MESSAGE};
pub use tokenize::{split_sentences, words};

/// Builds the shared lookup tables now instead of on the first call.
///
/// Optional; calling it at startup keeps the one-time cost out of the first
/// request.
pub fn init() {
    stopwords::load();
    tokenize::load();
}
