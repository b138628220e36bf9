//! Reading Standard MIDI Files back for display and verification.
//!
//! Flattens every track of a file into one note list with beat-based timing.
//! Tempo and program are taken from their first occurrence.

use super::{note_to_name, ticks_to_beats};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while inspecting a MIDI file.
#[derive(Debug, Error)]
pub enum InspectError {
    /// MIDI parsing failed
    #[error("MIDI parse error: {0}")]
    Parse(#[from] midly::Error),
    /// SMPTE timecode files have no beat grid to report against
    #[error("Unsupported format: SMPTE timecode timing")]
    TimecodeTiming,
}

/// A note recovered from a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectedNote {
    /// Note name like "C4".
    pub name: String,
    /// MIDI note number.
    pub pitch: u8,
    /// Start position in beats.
    pub start_beat: f64,
    /// Length in beats.
    pub duration_beats: f64,
    /// Note-on velocity.
    pub velocity: u8,
}

/// What a MIDI file contains, in beat terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    /// Number of track chunks.
    pub track_count: usize,
    /// Header resolution.
    pub ticks_per_beat: u16,
    /// First tempo found, in beats per minute.
    pub tempo: Option<u32>,
    /// First program change found.
    pub program: Option<u8>,
    /// Length of the longest track in beats.
    pub length_beats: f64,
    /// Notes sorted by start, then pitch.
    pub notes: Vec<InspectedNote>,
}

/// State for tracking active notes while reading.
/// Key is (channel, pitch), value is (start_tick, velocity).
type ActiveNotes = HashMap<(u8, u8), (u32, u8)>;

/// Parses a MIDI file and summarizes its contents.
///
/// # Arguments
///
/// * `bytes` - Contents of a .mid file
///
/// # Errors
///
/// Returns error if the bytes are not a Standard MIDI File or use SMPTE
/// timing.
pub fn inspect(bytes: &[u8]) -> Result<TrackSummary, InspectError> {
    let smf = Smf::parse(bytes)?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => tpb.as_int(),
        Timing::Timecode(_, _) => return Err(InspectError::TimecodeTiming),
    };
    let tpb = u32::from(ticks_per_beat);

    let mut tempo = None;
    let mut program = None;
    let mut notes = Vec::new();
    let mut length_ticks = 0u32;

    for track in &smf.tracks {
        let mut active_notes: ActiveNotes = HashMap::new();
        let mut current_tick = 0u32;

        for event in track {
            current_tick = current_tick.saturating_add(event.delta.as_int());

            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(usec_per_beat)) => {
                    let usec_per_beat = usec_per_beat.as_int();
                    if tempo.is_none() && usec_per_beat > 0 {
                        tempo = Some(60_000_000 / usec_per_beat);
                    }
                }
                TrackEventKind::Midi { channel, message } => {
                    let ch = channel.as_int();
                    match message {
                        MidiMessage::ProgramChange { program: p } => {
                            program.get_or_insert(p.as_int());
                        }
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            active_notes.insert((ch, key.as_int()), (current_tick, vel.as_int()));
                        }
                        // Note on with velocity 0 = note off
                        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                            let pitch = key.as_int();
                            if let Some((start_tick, velocity)) = active_notes.remove(&(ch, pitch)) {
                                notes.push(InspectedNote {
                                    name: note_to_name(pitch),
                                    pitch,
                                    start_beat: ticks_to_beats(start_tick, tpb),
                                    duration_beats: ticks_to_beats(
                                        current_tick.saturating_sub(start_tick),
                                        tpb,
                                    ),
                                    velocity,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        if !active_notes.is_empty() {
            tracing::warn!("{} notes never released", active_notes.len());
        }
        length_ticks = length_ticks.max(current_tick);
    }

    notes.sort_by(|a, b| {
        a.start_beat
            .total_cmp(&b.start_beat)
            .then(a.pitch.cmp(&b.pitch))
    });

    Ok(TrackSummary {
        track_count: smf.tracks.len(),
        ticks_per_beat,
        tempo,
        program,
        length_beats: ticks_to_beats(length_ticks, tpb),
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{encode, Composition, NoteSpec};

    #[test]
    fn test_inspect_encoded_composition() {
        let composition = Composition::new(
            "flute",
            vec![
                NoteSpec::new("A4", "8"),
                NoteSpec::rest("8"),
                NoteSpec::chord(["C5", "E5"], "d4"),
            ],
        );
        let summary = inspect(&encode(&composition)).unwrap();

        assert_eq!(summary.track_count, 1);
        assert_eq!(summary.ticks_per_beat, 480);
        assert_eq!(summary.tempo, Some(120));
        assert_eq!(summary.program, Some(73));
        assert_eq!(summary.length_beats, 2.5);

        let notes: Vec<(&str, f64, f64)> = summary
            .notes
            .iter()
            .map(|n| (n.name.as_str(), n.start_beat, n.duration_beats))
            .collect();
        assert_eq!(
            notes,
            vec![("A4", 0.0, 0.5), ("C5", 1.0, 1.5), ("E5", 1.0, 1.5)]
        );
        assert!(summary.notes.iter().all(|n| n.velocity == 100));
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(matches!(
            inspect(b"definitely not midi"),
            Err(InspectError::Parse(_))
        ));
    }
}
