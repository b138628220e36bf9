//! Duration codes.
//!
//! The composer writes durations as the denominator of the note value
//! (`"4"` is a quarter note) with an optional `d` prefix for dotted values.

use super::beats_to_ticks;

/// Beat length used for any duration code outside the vocabulary.
pub const DEFAULT_DURATION_BEATS: f64 = 1.0;

/// The note values a duration code can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteValue {
    Whole,
    DottedHalf,
    Half,
    DottedQuarter,
    Quarter,
    DottedEighth,
    Eighth,
    Sixteenth,
}

impl NoteValue {
    /// Parses a duration code such as `"4"` or `"d8"`.
    ///
    /// Surrounding whitespace is ignored. Returns None for codes outside
    /// the vocabulary, including dotted whole and dotted sixteenth notes.
    pub fn from_code(code: &str) -> Option<Self> {
        let value = match code.trim() {
            "1" => Self::Whole,
            "d2" => Self::DottedHalf,
            "2" => Self::Half,
            "d4" => Self::DottedQuarter,
            "4" => Self::Quarter,
            "d8" => Self::DottedEighth,
            "8" => Self::Eighth,
            "16" => Self::Sixteenth,
            _ => return None,
        };
        Some(value)
    }

    /// Length in beats, where a beat is a quarter note.
    pub fn beats(self) -> f64 {
        match self {
            Self::Whole => 4.0,
            Self::DottedHalf => 3.0,
            Self::Half => 2.0,
            Self::DottedQuarter => 1.5,
            Self::Quarter => 1.0,
            Self::DottedEighth => 0.75,
            Self::Eighth => 0.5,
            Self::Sixteenth => 0.25,
        }
    }

    /// Length in ticks at [`super::TICKS_PER_BEAT`].
    pub fn ticks(self) -> u32 {
        beats_to_ticks(self.beats())
    }
}

/// Resolves a duration code to its length in beats.
///
/// Unknown codes fall back to [`DEFAULT_DURATION_BEATS`] (a quarter note)
/// so the result is always positive.
///
/// # Examples
///
/// ```
/// use promptscore::midi::duration_to_beats;
///
/// assert_eq!(duration_to_beats("d4"), 1.5);
/// assert_eq!(duration_to_beats("unknown"), 1.0);
/// ```
pub fn duration_to_beats(code: &str) -> f64 {
    match NoteValue::from_code(code) {
        Some(value) => value.beats(),
        None => {
            tracing::debug!(
                "Unknown duration code {:?}, using {} beat",
                code,
                DEFAULT_DURATION_BEATS
            );
            DEFAULT_DURATION_BEATS
        }
    }
}
