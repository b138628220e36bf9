//! promptscore - encoding and summarization behind a prompt-driven composer.
//!
//! This library provides the two pieces of real work behind a thin web
//! front end: turning an AI-authored note list into a Standard MIDI File,
//! and summarizing a document by word frequency.

pub mod midi;
pub mod summary;

// Re-export commonly used types
pub use midi::{encode, encode_base64, encode_data_uri, Composition, NoteSpec, TICKS_PER_BEAT};
pub use summary::summarize;
