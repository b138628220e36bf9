//! Composition encoder.
//!
//! Walks the note list once, keeping a cursor of elapsed time, and records a
//! timeline event for every sounding pitch. Rests emit nothing but still
//! advance the cursor, so later notes stay where the composer placed them.

use super::midi_export::{write_smf, TrackSpec};
use super::{
    beats_to_ticks, duration_to_beats, pitch_to_number, program_for_instrument, ticks_to_beats,
    Composition, NoteSpec, DEFAULT_TEMPO, TICKS_PER_BEAT,
};
use base64::Engine;

/// Velocity given to every encoded note.
pub const DEFAULT_VELOCITY: u8 = 100;

/// Prefix of the data URI returned to browser clients.
const DATA_URI_PREFIX: &str = "data:audio/midi;base64,";

/// Settings for a single encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Tempo in beats per minute.
    pub tempo: u32,
    /// Velocity (0-127) for every note.
    pub velocity: u8,
    /// MIDI channel (0-15) for the track.
    pub channel: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            velocity: DEFAULT_VELOCITY,
            channel: 0,
        }
    }
}

/// A sounding note placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    /// MIDI note number (0-127).
    pub pitch: u8,
    /// Start time in ticks from the beginning of the track.
    pub start_tick: u32,
    /// Duration in ticks.
    pub duration_ticks: u32,
    /// Note velocity (0-127).
    pub velocity: u8,
}

impl TimelineEvent {
    /// Returns the end tick of this note (start + duration).
    pub fn end_tick(&self) -> u32 {
        self.start_tick.saturating_add(self.duration_ticks)
    }
}

/// The event timeline built from one composition.
///
/// Events are appended in cursor order, so start ticks never decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    program: u8,
    velocity: u8,
    cursor_ticks: u32,
    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Lays out a composition on a fresh timeline.
    ///
    /// # Arguments
    ///
    /// * `composition` - Instrument and notes from the composer
    /// * `options` - Velocity for the notes (tempo and channel apply at
    ///   serialization)
    pub fn from_composition(composition: &Composition, options: &EncodeOptions) -> Self {
        let mut timeline = Self {
            program: program_for_instrument(&composition.instrument),
            velocity: options.velocity.min(127),
            cursor_ticks: 0,
            events: Vec::with_capacity(composition.notes.len()),
        };
        for note in &composition.notes {
            timeline.push(note);
        }
        tracing::debug!(
            "Laid out {} notes as {} events over {} beats (program {})",
            composition.notes.len(),
            timeline.events.len(),
            timeline.cursor_beats(),
            timeline.program
        );
        timeline
    }

    /// Places one note (or chord, or rest) at the cursor and advances it.
    fn push(&mut self, note: &NoteSpec) {
        let duration_ticks = beats_to_ticks(duration_to_beats(&note.duration));
        for token in note.pitch.tokens() {
            if let Some(pitch) = pitch_to_number(token) {
                self.events.push(TimelineEvent {
                    pitch,
                    start_tick: self.cursor_ticks,
                    duration_ticks,
                    velocity: self.velocity,
                });
            }
        }
        self.cursor_ticks = self.cursor_ticks.saturating_add(duration_ticks);
    }

    /// Resolved General MIDI program.
    pub fn program(&self) -> u8 {
        self.program
    }

    /// Elapsed time in ticks after the last note.
    pub fn cursor_ticks(&self) -> u32 {
        self.cursor_ticks
    }

    /// Elapsed time in beats after the last note.
    pub fn cursor_beats(&self) -> f64 {
        ticks_to_beats(self.cursor_ticks, TICKS_PER_BEAT)
    }

    /// The sounding notes in start order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Serializes the timeline as a Standard MIDI File.
    pub fn to_smf(&self, options: &EncodeOptions) -> Vec<u8> {
        write_smf(&TrackSpec {
            tempo: options.tempo,
            channel: options.channel.min(15),
            program: self.program,
            events: &self.events,
            end_tick: self.cursor_ticks,
        })
    }
}

/// Encodes a composition as a Standard MIDI File at 120 BPM.
///
/// Never fails: malformed pitches, durations and instruments take their
/// defaults, and an empty note list yields a valid silent file.
///
/// # Examples
///
/// ```
/// use promptscore::midi::{encode, Composition, NoteSpec};
///
/// let composition = Composition::new("music_box", vec![NoteSpec::new("C4", "4")]);
/// let bytes = encode(&composition);
/// assert_eq!(&bytes[..4], b"MThd");
/// ```
pub fn encode(composition: &Composition) -> Vec<u8> {
    encode_with(composition, &EncodeOptions::default())
}

/// Encodes a composition with explicit options.
pub fn encode_with(composition: &Composition, options: &EncodeOptions) -> Vec<u8> {
    Timeline::from_composition(composition, options).to_smf(options)
}

/// Encodes a composition and returns the file as standard base64.
pub fn encode_base64(composition: &Composition) -> String {
    to_base64(&encode(composition))
}

/// Encodes a composition as a `data:audio/midi;base64,` URI.
pub fn encode_data_uri(composition: &Composition) -> String {
    to_data_uri(&encode(composition))
}

/// Renders MIDI file bytes as standard (padded) base64.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Renders MIDI file bytes as a `data:audio/midi;base64,` URI.
pub fn to_data_uri(bytes: &[u8]) -> String {
    format!("{}{}", DATA_URI_PREFIX, to_base64(bytes))
}
