//! General MIDI instrument lookup.

/// Program used when an instrument name cannot be resolved
/// (acoustic grand piano).
pub const DEFAULT_PROGRAM: u8 = 0;

/// The 128 General MIDI Level 1 melodic instruments in program order,
/// in the snake_case form the composer is asked to produce.
pub const GM_INSTRUMENTS: [&str; 128] = [
    // Piano
    "acoustic_grand_piano",
    "bright_acoustic_piano",
    "electric_grand_piano",
    "honky_tonk_piano",
    "electric_piano_1",
    "electric_piano_2",
    "harpsichord",
    "clavi",
    // Chromatic percussion
    "celesta",
    "glockenspiel",
    "music_box",
    "vibraphone",
    "marimba",
    "xylophone",
    "tubular_bells",
    "dulcimer",
    // Organ
    "drawbar_organ",
    "percussive_organ",
    "rock_organ",
    "church_organ",
    "reed_organ",
    "accordion",
    "harmonica",
    "tango_accordion",
    // Guitar
    "acoustic_guitar_nylon",
    "acoustic_guitar_steel",
    "electric_guitar_jazz",
    "electric_guitar_clean",
    "electric_guitar_muted",
    "overdriven_guitar",
    "distortion_guitar",
    "guitar_harmonics",
    // Bass
    "acoustic_bass",
    "electric_bass_finger",
    "electric_bass_pick",
    "fretless_bass",
    "slap_bass_1",
    "slap_bass_2",
    "synth_bass_1",
    "synth_bass_2",
    // Strings
    "violin",
    "viola",
    "cello",
    "contrabass",
    "tremolo_strings",
    "pizzicato_strings",
    "orchestral_harp",
    "timpani",
    // Ensemble
    "string_ensemble_1",
    "string_ensemble_2",
    "synth_strings_1",
    "synth_strings_2",
    "choir_aahs",
    "voice_oohs",
    "synth_voice",
    "orchestra_hit",
    // Brass
    "trumpet",
    "trombone",
    "tuba",
    "muted_trumpet",
    "french_horn",
    "brass_section",
    "synth_brass_1",
    "synth_brass_2",
    // Reed
    "soprano_sax",
    "alto_sax",
    "tenor_sax",
    "baritone_sax",
    "oboe",
    "english_horn",
    "bassoon",
    "clarinet",
    // Pipe
    "piccolo",
    "flute",
    "recorder",
    "pan_flute",
    "blown_bottle",
    "shakuhachi",
    "whistle",
    "ocarina",
    // Synth lead
    "lead_1_square",
    "lead_2_sawtooth",
    "lead_3_calliope",
    "lead_4_chiff",
    "lead_5_charang",
    "lead_6_voice",
    "lead_7_fifths",
    "lead_8_bass_lead",
    // Synth pad
    "pad_1_new_age",
    "pad_2_warm",
    "pad_3_polysynth",
    "pad_4_choir",
    "pad_5_bowed",
    "pad_6_metallic",
    "pad_7_halo",
    "pad_8_sweep",
    // Synth effects
    "fx_1_rain",
    "fx_2_soundtrack",
    "fx_3_crystal",
    "fx_4_atmosphere",
    "fx_5_brightness",
    "fx_6_goblins",
    "fx_7_echoes",
    "fx_8_sci_fi",
    // Ethnic
    "sitar",
    "banjo",
    "shamisen",
    "koto",
    "kalimba",
    "bagpipe",
    "fiddle",
    "shanai",
    // Percussive
    "tinkle_bell",
    "agogo",
    "steel_drums",
    "woodblock",
    "taiko_drum",
    "melodic_tom",
    "synth_drum",
    "reverse_cymbal",
    // Sound effects
    "guitar_fret_noise",
    "breath_noise",
    "seashore",
    "bird_tweet",
    "telephone_ring",
    "helicopter",
    "applause",
    "gunshot",
];

/// Common shorthand names mapped to a representative program.
const ALIASES: [(&str, u8); 12] = [
    ("piano", 0),
    ("grand_piano", 0),
    ("electric_piano", 4),
    ("clavinet", 7),
    ("organ", 16),
    ("guitar", 24),
    ("electric_guitar", 27),
    ("bass", 32),
    ("strings", 48),
    ("choir", 52),
    ("saxophone", 65),
    ("harp", 46),
];

/// Folds an instrument label to the snake_case key form.
///
/// Lowercases the label and collapses every run of non-alphanumeric
/// characters to a single underscore, so "Electric Guitar (jazz)",
/// "electric-guitar-jazz" and "electric_guitar_jazz" all fold alike.
fn normalize(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            key.extend(c.to_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    while key.ends_with('_') {
        key.pop();
    }
    key
}

/// Resolves an instrument label to a General MIDI program number (0-127).
///
/// Accepts GM names in any case or separator style, a handful of generic
/// names ("piano", "guitar"), or a bare program number. Anything else
/// resolves to [`DEFAULT_PROGRAM`].
///
/// # Examples
///
/// ```
/// use promptscore::midi::program_for_instrument;
///
/// assert_eq!(program_for_instrument("music_box"), 10);
/// assert_eq!(program_for_instrument("Acoustic Grand Piano"), 0);
/// assert_eq!(program_for_instrument("kazoo"), 0);
/// ```
pub fn program_for_instrument(name: &str) -> u8 {
    let key = normalize(name);

    if let Some(program) = GM_INSTRUMENTS.iter().position(|&n| n == key) {
        return program as u8;
    }
    if let Some(&(_, program)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
        return program;
    }
    if let Some(program) = key.parse::<u8>().ok().filter(|p| *p <= 127) {
        return program;
    }

    tracing::debug!(
        "Unknown instrument {:?}, using program {}",
        name,
        DEFAULT_PROGRAM
    );
    DEFAULT_PROGRAM
}

/// Returns the snake_case GM name for a program number.
pub fn instrument_name(program: u8) -> &'static str {
    GM_INSTRUMENTS[(program & 0x7F) as usize]
}
