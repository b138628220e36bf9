//! Symbolic music encoding.
//!
//! This module turns an AI-authored composition (an instrument name plus an
//! ordered list of pitch/duration strings) into a single-track Standard MIDI
//! File. Every malformed field degrades to a fixed default instead of
//! failing, so a composition always produces a playable file.

mod composition;
mod duration;
mod encoder;
mod inspect;
mod instrument;
mod midi_export;

pub use composition::{Composition, CompositionError, NoteSpec, PitchSpec};
pub use duration::{duration_to_beats, NoteValue, DEFAULT_DURATION_BEATS};
pub use encoder::{
    encode, encode_base64, encode_data_uri, encode_with, to_base64, to_data_uri, EncodeOptions,
    Timeline, TimelineEvent, DEFAULT_VELOCITY,
};
pub use inspect::{inspect, InspectError, InspectedNote, TrackSummary};
pub use instrument::{instrument_name, program_for_instrument, DEFAULT_PROGRAM, GM_INSTRUMENTS};

/// Standard MIDI note names for display purposes.
/// Maps MIDI note number (0-127) to note name within an octave.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note number substituted for any pitch that cannot be parsed (middle C).
pub const DEFAULT_NOTE: u8 = 60;

/// Ticks per beat (quarter note) - standard MIDI resolution.
/// Every duration code maps to a whole number of ticks at this resolution.
pub const TICKS_PER_BEAT: u32 = 480;

/// Default tempo in beats per minute.
pub const DEFAULT_TEMPO: u32 = 120;

/// Slowest tempo the tempo meta event can express (24-bit microseconds).
pub const MIN_TEMPO: u32 = 4;

/// Fastest tempo that still leaves at least one microsecond per beat.
pub const MAX_TEMPO: u32 = 60_000_000;

/// Converts a MIDI note number to a human-readable note name with octave.
///
/// # Arguments
///
/// * `note` - MIDI note number (0-127)
///
/// # Returns
///
/// String representation like "C4" or "F#5"
///
/// # Examples
///
/// ```
/// use promptscore::midi::note_to_name;
///
/// let name = note_to_name(60); // Middle C
/// assert_eq!(name, "C4");
/// ```
pub fn note_to_name(note: u8) -> String {
    let octave = (note / 12) as i8 - 1; // MIDI octave convention
    let note_index = (note % 12) as usize;
    format!("{}{}", NOTE_NAMES[note_index], octave)
}

/// Returns the pitch class (0-11) for a note letter and optional accidental.
///
/// Only the seventeen spellings of the chromatic scale are recognized:
/// naturals, sharps on C D F G A, and flats on D E G A B.
fn pitch_class(letter: char, accidental: Option<char>) -> Option<u8> {
    let class = match (letter.to_ascii_uppercase(), accidental) {
        ('C', None) => 0,
        ('C', Some('#')) | ('D', Some('b')) => 1,
        ('D', None) => 2,
        ('D', Some('#')) | ('E', Some('b')) => 3,
        ('E', None) => 4,
        ('F', None) => 5,
        ('F', Some('#')) | ('G', Some('b')) => 6,
        ('G', None) => 7,
        ('G', Some('#')) | ('A', Some('b')) => 8,
        ('A', None) => 9,
        ('A', Some('#')) | ('B', Some('b')) => 10,
        ('B', None) => 11,
        _ => return None,
    };
    Some(class)
}

/// Converts a note name in scientific pitch notation to a MIDI note number.
///
/// The trailing digits (with an optional leading `-`) are the octave, the
/// prefix is a letter and optional accidental.
///
/// # Arguments
///
/// * `name` - Note name like "C4", "F#5" or "Bb3"
///
/// # Returns
///
/// MIDI note number (0-127) or None if invalid
pub fn name_to_note(name: &str) -> Option<u8> {
    let name = name.trim();
    let digits_start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let (mut note_part, octave_part) = name.split_at(digits_start);
    let mut octave: i32 = octave_part.parse().ok()?;
    if let Some(stripped) = note_part.strip_suffix('-') {
        note_part = stripped;
        octave = -octave;
    }

    let mut chars = note_part.chars();
    let letter = chars.next()?;
    let accidental = chars.next();
    if chars.next().is_some() {
        return None;
    }

    let class = pitch_class(letter, accidental)? as i32;
    // MIDI note = (octave + 1) * 12 + pitch class
    let midi_note = octave.checked_add(1)?.checked_mul(12)?.checked_add(class)?;
    u8::try_from(midi_note).ok().filter(|n| *n <= 127)
}

/// Returns true if the token denotes silence rather than a pitch.
pub fn is_rest(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("rest")
}

/// Resolves a pitch token the way the encoder does.
///
/// # Returns
///
/// `None` for a rest (no event is emitted), otherwise the MIDI note number,
/// with [`DEFAULT_NOTE`] substituted for anything unparseable.
///
/// # Examples
///
/// ```
/// use promptscore::midi::pitch_to_number;
///
/// assert_eq!(pitch_to_number("C4"), Some(60));
/// assert_eq!(pitch_to_number("garbage9"), Some(60));
/// assert_eq!(pitch_to_number("rest"), None);
/// ```
pub fn pitch_to_number(token: &str) -> Option<u8> {
    if is_rest(token) {
        return None;
    }
    Some(name_to_note(token).unwrap_or_else(|| {
        tracing::debug!("Unparseable pitch {:?}, using note {}", token, DEFAULT_NOTE);
        DEFAULT_NOTE
    }))
}

/// Converts a beat count to ticks at [`TICKS_PER_BEAT`].
pub fn beats_to_ticks(beats: f64) -> u32 {
    (beats * TICKS_PER_BEAT as f64).round() as u32
}

/// Converts ticks to beats at the given resolution.
pub fn ticks_to_beats(ticks: u32, ticks_per_beat: u32) -> f64 {
    ticks as f64 / ticks_per_beat.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_to_name() {
        assert_eq!(note_to_name(60), "C4");
        assert_eq!(note_to_name(69), "A4");
        assert_eq!(note_to_name(0), "C-1");
        assert_eq!(note_to_name(127), "G9");
    }

    #[test]
    fn test_name_to_note() {
        assert_eq!(name_to_note("C4"), Some(60));
        assert_eq!(name_to_note("A4"), Some(69));
        assert_eq!(name_to_note("C-1"), Some(0));
        assert_eq!(name_to_note("F#5"), Some(78));
        assert_eq!(name_to_note("Db4"), Some(61));
        assert_eq!(name_to_note("bb3"), Some(58));
        assert_eq!(name_to_note("c4"), Some(60));
        assert_eq!(name_to_note("G9"), Some(127));
    }

    #[test]
    fn test_name_to_note_rejects_malformed() {
        assert_eq!(name_to_note("G#9"), None); // 128 is out of range
        assert_eq!(name_to_note("H4"), None);
        assert_eq!(name_to_note("C"), None);
        assert_eq!(name_to_note("4"), None);
        assert_eq!(name_to_note("E#4"), None);
        assert_eq!(name_to_note("C##4"), None);
        assert_eq!(name_to_note(""), None);
        assert_eq!(name_to_note("C99999999999"), None);
    }

    #[test]
    fn test_pitch_to_number_defaults() {
        assert_eq!(pitch_to_number("C4"), Some(60));
        assert_eq!(pitch_to_number("garbage9"), Some(DEFAULT_NOTE));
        assert_eq!(pitch_to_number(""), Some(DEFAULT_NOTE));
        assert_eq!(pitch_to_number("rest"), None);
        assert_eq!(pitch_to_number("REST"), None);
        assert_eq!(pitch_to_number(" Rest "), None);
    }

    #[test]
    fn test_tick_conversions() {
        assert_eq!(beats_to_ticks(1.0), TICKS_PER_BEAT);
        assert_eq!(beats_to_ticks(0.25), 120);
        assert!((ticks_to_beats(720, TICKS_PER_BEAT) - 1.5).abs() < f64::EPSILON);
    }
}
