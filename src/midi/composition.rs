//! Composition descriptions as produced by the AI composer.
//!
//! The provider is asked for `{"instrument": ..., "notes": [{"pitch": ...,
//! "duration": ...}]}` but its output is not guaranteed to follow that shape.
//! Deserialization here never fails on a field: each note entry is read from
//! a raw JSON value and missing or mistyped fields take their defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Pitch used when a note entry has no `pitch` field.
const MISSING_PITCH: &str = "rest";

/// Duration code used when a note entry has no `duration` field.
const MISSING_DURATION: &str = "4";

/// Errors for provider output that is not a composition at all.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// The text is not JSON.
    #[error("composition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON is valid but its top level is not an object.
    #[error("composition must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// The pitch of one note: a single pitch token or a chord of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PitchSpec {
    /// A single pitch in scientific notation, or "rest".
    Single(String),
    /// Several pitches sounding together for the same duration.
    Chord(Vec<String>),
}

impl PitchSpec {
    /// Reads a pitch field.
    ///
    /// Strings that look like a JSON array (`"[\"C4\", \"E4\"]"`) are read
    /// as chords; the composer sometimes stringifies chord arrays.
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Single(MISSING_PITCH.to_string()),
            Some(Value::String(text)) => {
                if text.trim_start().starts_with('[') {
                    if let Ok(members) = serde_json::from_str::<Vec<Value>>(text) {
                        return Self::Chord(members.iter().map(value_to_text).collect());
                    }
                }
                Self::Single(text.clone())
            }
            Some(Value::Array(members)) => Self::Chord(members.iter().map(value_to_text).collect()),
            Some(other) => Self::Single(value_to_text(other)),
        }
    }

    /// Iterates over the pitch tokens (one for a single pitch).
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        let tokens: &[String] = match self {
            Self::Single(token) => std::slice::from_ref(token),
            Self::Chord(tokens) => tokens,
        };
        tokens.iter().map(String::as_str)
    }
}

/// One entry of the note list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct NoteSpec {
    /// Pitch token(s); see [`PitchSpec`].
    pub pitch: PitchSpec,
    /// Duration code such as "4" or "d8".
    pub duration: String,
}

impl NoteSpec {
    /// Creates a single-pitch note.
    pub fn new(pitch: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            pitch: PitchSpec::Single(pitch.into()),
            duration: duration.into(),
        }
    }

    /// Creates a rest of the given duration.
    pub fn rest(duration: impl Into<String>) -> Self {
        Self::new(MISSING_PITCH, duration)
    }

    /// Creates a chord: every pitch starts together and lasts `duration`.
    pub fn chord<I, S>(pitches: I, duration: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pitch: PitchSpec::Chord(pitches.into_iter().map(Into::into).collect()),
            duration: duration.into(),
        }
    }
}

impl From<Value> for NoteSpec {
    fn from(value: Value) -> Self {
        let pitch = PitchSpec::from_value(value.get("pitch"));
        let duration = match value.get("duration") {
            None | Some(Value::Null) => MISSING_DURATION.to_string(),
            Some(other) => value_to_text(other),
        };
        Self { pitch, duration }
    }
}

/// An instrument and an ordered list of notes for a single track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Composition {
    /// Free-form instrument label, ideally a General MIDI name.
    pub instrument: String,
    /// Notes in playing order.
    pub notes: Vec<NoteSpec>,
}

impl Composition {
    /// Creates a composition from its parts.
    pub fn new(instrument: impl Into<String>, notes: Vec<NoteSpec>) -> Self {
        Self {
            instrument: instrument.into(),
            notes,
        }
    }

    /// Parses provider output.
    ///
    /// # Arguments
    ///
    /// * `json` - Raw text returned by the composer
    ///
    /// # Errors
    ///
    /// Returns an error only when the text is not JSON or is not an object.
    /// Everything inside the object is read leniently.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptscore::midi::Composition;
    ///
    /// let composition = Composition::from_json(
    ///     r#"{"instrument": "music_box", "notes": [{"pitch": "C4", "duration": "4"}]}"#,
    /// ).unwrap();
    /// assert_eq!(composition.notes.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CompositionError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(CompositionError::NotAnObject(json_type_name(&value)));
        }
        Ok(Self::from(value))
    }

    /// Returns true if the composition has no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl From<Value> for Composition {
    fn from(value: Value) -> Self {
        let instrument = match value.get("instrument") {
            Some(Value::String(name)) => name.clone(),
            _ => String::new(),
        };
        let notes = match value.get("notes") {
            Some(Value::Array(entries)) => entries.iter().cloned().map(NoteSpec::from).collect(),
            _ => Vec::new(),
        };
        Self { instrument, notes }
    }
}

/// Renders a scalar JSON value as the text the encoder expects.
/// Numbers keep their JSON spelling, so a duration of `4` reads as "4".
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_composition() {
        let composition = Composition::from_json(
            r#"{"instrument": "music_box", "notes": [
                {"pitch": "C4", "duration": "4"},
                {"pitch": "rest", "duration": "8"},
                {"pitch": "G4", "duration": "d4"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(composition.instrument, "music_box");
        assert_eq!(
            composition.notes,
            vec![
                NoteSpec::new("C4", "4"),
                NoteSpec::rest("8"),
                NoteSpec::new("G4", "d4"),
            ]
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let composition = Composition::from_json(r#"{"notes": [{}, {"pitch": "E4"}]}"#).unwrap();
        assert_eq!(composition.instrument, "");
        assert_eq!(
            composition.notes,
            vec![NoteSpec::rest("4"), NoteSpec::new("E4", "4")]
        );

        let empty = Composition::from_json(r#"{"instrument": "violin"}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_mistyped_fields() {
        let composition = Composition::from_json(
            r#"{"instrument": 42, "notes": [{"pitch": 61, "duration": 8}, "C4", null]}"#,
        )
        .unwrap();
        assert_eq!(composition.instrument, "");
        assert_eq!(composition.notes[0], NoteSpec::new("61", "8"));
        // Entries that are not objects read as quarter-note rests.
        assert_eq!(composition.notes[1], NoteSpec::rest("4"));
        assert_eq!(composition.notes[2], NoteSpec::rest("4"));
    }

    #[test]
    fn test_chords() {
        let composition = Composition::from_json(
            r#"{"instrument": "piano", "notes": [
                {"pitch": ["C4", "E4", "G4"], "duration": "2"},
                {"pitch": "[\"D4\", \"F4\"]", "duration": "4"},
                {"pitch": "[not json", "duration": "4"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            composition.notes[0],
            NoteSpec::chord(["C4", "E4", "G4"], "2")
        );
        assert_eq!(composition.notes[1], NoteSpec::chord(["D4", "F4"], "4"));
        assert_eq!(composition.notes[2], NoteSpec::new("[not json", "4"));
        assert_eq!(
            composition.notes[0].pitch.tokens().collect::<Vec<_>>(),
            vec!["C4", "E4", "G4"]
        );
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            Composition::from_json("not json"),
            Err(CompositionError::Json(_))
        ));
        assert!(matches!(
            Composition::from_json("[1, 2]"),
            Err(CompositionError::NotAnObject("an array"))
        ));
    }

    #[test]
    fn test_serde_round_trip_through_value() {
        let composition = Composition::new(
            "flute",
            vec![NoteSpec::new("A4", "8"), NoteSpec::chord(["C5", "E5"], "4")],
        );
        let json = serde_json::to_string(&composition).unwrap();
        let parsed: Composition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, composition);
    }
}
