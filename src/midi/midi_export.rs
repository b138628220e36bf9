//! Standard MIDI File (SMF) serialization.
//!
//! Writes a timeline as an SMF Format 0 file: a single track holding the
//! tempo, the program change and every note, followed by end of track.
//!
//! # Format Details
//!
//! - Header: format 0, one track, [`TICKS_PER_BEAT`] ticks per quarter note
//! - Tick 0: set tempo meta event, then program change
//! - One note-on / note-off pair per timeline event
//! - End of track at the timeline cursor, so trailing rests keep their length

use super::{TimelineEvent, MAX_TEMPO, MIN_TEMPO, TICKS_PER_BEAT};

/// Largest delta time a four-byte variable-length quantity can carry.
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Appends a delta time as a variable-length quantity, most significant
/// 7-bit group first with the high bit set on every byte but the last.
///
/// Deltas above [`MAX_DELTA`] are clamped, which moves every later event
/// earlier; a warning is logged when that happens.
fn write_vlq(value: u32, out: &mut Vec<u8>) {
    let value = if value > MAX_DELTA {
        tracing::warn!(
            "Delta of {} ticks exceeds the MIDI limit, clamping to {}",
            value,
            MAX_DELTA
        );
        MAX_DELTA
    } else {
        value
    };

    let mut shift = 21;
    while shift > 0 && value >> shift == 0 {
        shift -= 7;
    }
    while shift > 0 {
        out.push(((value >> shift) & 0x7F) as u8 | 0x80);
        shift -= 7;
    }
    out.push((value & 0x7F) as u8);
}

/// The five kinds of event an encoded track contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackEvent {
    Tempo { usec_per_beat: u32 },
    Program(u8),
    NoteOff(u8),
    NoteOn { pitch: u8, velocity: u8 },
    EndOfTrack,
}

impl TrackEvent {
    /// Order among events sharing a tick. Note offs come before note ons so
    /// a repeated pitch is released and then struck again.
    fn rank(&self) -> u8 {
        match self {
            TrackEvent::Tempo { .. } => 0,
            TrackEvent::Program(_) => 1,
            TrackEvent::NoteOff(_) => 2,
            TrackEvent::NoteOn { .. } => 3,
            TrackEvent::EndOfTrack => 4,
        }
    }

    /// Appends the event bytes (no delta time) on the given channel.
    fn write(&self, channel: u8, out: &mut Vec<u8>) {
        let channel = channel & 0x0F;
        match *self {
            TrackEvent::Tempo { usec_per_beat } => {
                out.extend_from_slice(&[0xFF, 0x51, 0x03]);
                out.extend_from_slice(&usec_per_beat.to_be_bytes()[1..]);
            }
            TrackEvent::Program(program) => out.extend_from_slice(&[0xC0 | channel, program & 0x7F]),
            TrackEvent::NoteOff(pitch) => out.extend_from_slice(&[0x80 | channel, pitch & 0x7F, 0]),
            TrackEvent::NoteOn { pitch, velocity } => {
                out.extend_from_slice(&[0x90 | channel, pitch & 0x7F, velocity & 0x7F])
            }
            TrackEvent::EndOfTrack => out.extend_from_slice(&[0xFF, 0x2F, 0x00]),
        }
    }
}

/// Converts a tempo in BPM to the microseconds-per-beat the tempo meta event
/// carries. The tempo is clamped to [`MIN_TEMPO`]..=[`MAX_TEMPO`] so the
/// value fits in 24 bits and is never zero.
fn tempo_to_microseconds(tempo: u32) -> u32 {
    60_000_000 / tempo.clamp(MIN_TEMPO, MAX_TEMPO)
}

/// Everything needed to serialize one track.
pub(super) struct TrackSpec<'a> {
    pub tempo: u32,
    pub channel: u8,
    pub program: u8,
    pub events: &'a [TimelineEvent],
    pub end_tick: u32,
}

/// Serializes a single track as a complete Standard MIDI File.
///
/// # Returns
///
/// The file contents. An empty event list still produces a valid file
/// holding only the tempo, program change and end of track.
pub(super) fn write_smf(track: &TrackSpec<'_>) -> Vec<u8> {
    let mut events: Vec<(u32, TrackEvent)> = Vec::with_capacity(track.events.len() * 2 + 3);
    events.push((
        0,
        TrackEvent::Tempo {
            usec_per_beat: tempo_to_microseconds(track.tempo),
        },
    ));
    events.push((0, TrackEvent::Program(track.program)));

    let mut end = track.end_tick;
    for note in track.events {
        events.push((
            note.start_tick,
            TrackEvent::NoteOn {
                pitch: note.pitch,
                velocity: note.velocity,
            },
        ));
        events.push((note.end_tick(), TrackEvent::NoteOff(note.pitch)));
        end = end.max(note.end_tick());
    }
    events.push((end, TrackEvent::EndOfTrack));

    // Stable, so chord notes keep their listed order.
    events.sort_by_key(|(tick, event)| (*tick, event.rank()));

    let mut data = Vec::with_capacity(events.len() * 4);
    let mut last_tick = 0;
    for (tick, event) in &events {
        write_vlq(tick - last_tick, &mut data);
        event.write(track.channel, &mut data);
        last_tick = *tick;
    }

    let mut out = Vec::with_capacity(22 + data.len());
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // format 0
    out.extend_from_slice(&1u16.to_be_bytes()); // one track
    out.extend_from_slice(&(TICKS_PER_BEAT as u16).to_be_bytes());
    out.extend_from_slice(b"MTrk");
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        write_vlq(value, &mut out);
        out
    }

    #[test]
    fn test_delta_times() {
        assert_eq!(vlq(0), [0x00]);
        assert_eq!(vlq(0x7F), [0x7F]);
        assert_eq!(vlq(480), [0x83, 0x60]);
        assert_eq!(vlq(0x4000), [0x81, 0x80, 0x00]);
        assert_eq!(vlq(MAX_DELTA), [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_oversized_delta_is_clamped() {
        assert_eq!(vlq(u32::MAX), vlq(MAX_DELTA));
        assert_eq!(vlq(MAX_DELTA + 1).len(), 4);
    }

    #[test]
    fn test_tempo_conversion() {
        assert_eq!(tempo_to_microseconds(120), 500_000);
        assert_eq!(tempo_to_microseconds(60), 1_000_000);
        assert_eq!(tempo_to_microseconds(0), 15_000_000);
        assert_eq!(tempo_to_microseconds(MAX_TEMPO), 1);
        assert_eq!(tempo_to_microseconds(100_000_000), 1);
        assert_eq!(tempo_to_microseconds(u32::MAX), 1);
    }

    #[test]
    fn test_empty_track_layout() {
        let bytes = write_smf(&TrackSpec {
            tempo: 120,
            channel: 0,
            program: 0,
            events: &[],
            end_tick: 0,
        });

        let expected: Vec<u8> = [
            &b"MThd"[..],
            &[0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0],
            b"MTrk",
            &[0, 0, 0, 14],
            &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20], // tempo 500000
            &[0x00, 0xC0, 0x00],                         // program 0
            &[0x00, 0xFF, 0x2F, 0x00],                   // end of track
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_repeated_pitch_releases_before_restrike() {
        let events = [
            TimelineEvent {
                pitch: 60,
                start_tick: 0,
                duration_ticks: 480,
                velocity: 100,
            },
            TimelineEvent {
                pitch: 60,
                start_tick: 480,
                duration_ticks: 480,
                velocity: 100,
            },
        ];
        let bytes = write_smf(&TrackSpec {
            tempo: 120,
            channel: 0,
            program: 0,
            events: &events,
            end_tick: 960,
        });

        // Skip header (14), track header (8), tempo (7) and program (3).
        let body = &bytes[14 + 8 + 7 + 3..];
        assert_eq!(
            body,
            &[
                0x00, 0x90, 60, 100, // on at 0
                0x83, 0x60, 0x80, 60, 0, // off at 480
                0x00, 0x90, 60, 100, // on at 480
                0x83, 0x60, 0x80, 60, 0, // off at 960
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }
}
