//! promptscore - command-line front end.
//!
//! Stands in for the web layer: reads composer or document output from
//! files, runs it through the library, and writes the result.
//!
//! # Usage
//!
//! ```bash
//! promptscore compose song.json -o song.mid   # Write a MIDI file
//! promptscore compose song.json --data-uri    # Print a data URI
//! promptscore summarize article.txt -n 3      # Print a 3-sentence summary
//! promptscore inspect song.mid                # List the notes in a file
//! promptscore batch a.json b.json c.json      # Encode many files in parallel
//! ```
//!
//! Set `RUST_LOG=promptscore=debug` to see every default the encoder
//! substitutes for a malformed field.

use anyhow::{bail, Context, Result};
use promptscore::midi::{self, Composition, EncodeOptions, DEFAULT_TEMPO, MAX_TEMPO};
use promptscore::summary;
use rayon::prelude::*;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Sentences kept by `summarize` when `-n` is not given.
const DEFAULT_SUMMARY_SENTENCES: usize = 3;

/// How `compose` should emit the encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComposeOutput {
    File,
    Base64,
    DataUri,
}

/// The selected subcommand and its arguments.
#[derive(Debug)]
enum Command {
    Compose {
        input: PathBuf,
        output: Option<PathBuf>,
        format: ComposeOutput,
    },
    Summarize {
        input: PathBuf,
        sentences: usize,
    },
    Inspect {
        input: PathBuf,
        json: bool,
    },
    Batch {
        inputs: Vec<PathBuf>,
    },
}

/// Command-line options for the application.
#[derive(Debug)]
struct CliOptions {
    command: Command,
    /// Tempo for `compose` and `batch`.
    tempo: u32,
}

fn print_help(program: &str) {
    eprintln!("promptscore - MIDI encoding and extractive summaries");
    eprintln!();
    eprintln!("Usage: {} <COMMAND> [OPTIONS]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  compose <FILE.json>     Encode a composition as a MIDI file");
    eprintln!("  summarize <FILE.txt>    Summarize a document ('-' reads stdin)");
    eprintln!("  inspect <FILE.mid>      List the notes in a MIDI file");
    eprintln!("  batch <FILE.json>...    Encode several compositions in parallel");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output PATH       Output path for compose (default: <stem>.mid)");
    eprintln!("      --base64            Print the MIDI file as base64 instead");
    eprintln!("      --data-uri          Print the MIDI file as a data URI instead");
    eprintln!("  -t, --tempo BPM         Tempo for compose and batch (default: {})", DEFAULT_TEMPO);
    eprintln!(
        "  -n, --sentences N       Sentences to keep when summarizing (default: {})",
        DEFAULT_SUMMARY_SENTENCES
    );
    eprintln!("      --json              Print inspect output as JSON");
    eprintln!("  -h, --help              Print this help message");
}

impl CliOptions {
    /// Parses command-line arguments.
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let program = args.first().map(String::as_str).unwrap_or("promptscore");
        Self::parse_from(program, &args[1.min(args.len())..])
    }

    fn parse_from(program: &str, args: &[String]) -> Result<Self> {
        let mut positional: Vec<PathBuf> = Vec::new();
        let mut output: Option<PathBuf> = None;
        let mut format = ComposeOutput::File;
        let mut tempo = DEFAULT_TEMPO;
        let mut sentences = DEFAULT_SUMMARY_SENTENCES;
        let mut json = false;

        let mut iter = args.iter();
        let command_name = match iter.next() {
            Some(name) if name == "--help" || name == "-h" => {
                print_help(program);
                std::process::exit(0);
            }
            Some(name) => name.clone(),
            None => {
                print_help(program);
                bail!("no command given");
            }
        };

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--output" | "-o" => {
                    let path = iter.next().context("--output requires a path argument")?;
                    output = Some(PathBuf::from(path));
                }
                "--tempo" | "-t" => {
                    let value = iter.next().context("--tempo requires a BPM argument")?;
                    tempo = value
                        .parse()
                        .with_context(|| format!("invalid tempo: {}", value))?;
                    if tempo == 0 || tempo > MAX_TEMPO {
                        bail!("tempo must be between 1 and {} BPM", MAX_TEMPO);
                    }
                }
                "--sentences" | "-n" => {
                    let value = iter.next().context("--sentences requires a count")?;
                    sentences = value
                        .parse()
                        .with_context(|| format!("invalid sentence count: {}", value))?;
                }
                "--base64" => format = ComposeOutput::Base64,
                "--data-uri" => format = ComposeOutput::DataUri,
                "--json" => json = true,
                "--help" | "-h" => {
                    print_help(program);
                    std::process::exit(0);
                }
                other if other.starts_with('-') && other != "-" => {
                    bail!("unknown option: {} (use --help for usage)", other);
                }
                other => positional.push(PathBuf::from(other)),
            }
        }

        let single_input = |positional: &mut Vec<PathBuf>| -> Result<PathBuf> {
            match positional.len() {
                1 => Ok(positional.remove(0)),
                0 => bail!("{} requires an input file", command_name),
                _ => bail!("{} takes exactly one input file", command_name),
            }
        };

        let command = match command_name.as_str() {
            "compose" => Command::Compose {
                input: single_input(&mut positional)?,
                output,
                format,
            },
            "summarize" => Command::Summarize {
                input: single_input(&mut positional)?,
                sentences,
            },
            "inspect" => Command::Inspect {
                input: single_input(&mut positional)?,
                json,
            },
            "batch" => {
                if positional.is_empty() {
                    bail!("batch requires at least one input file");
                }
                Command::Batch { inputs: positional }
            }
            other => bail!("unknown command: {} (use --help for usage)", other),
        };

        Ok(Self { command, tempo })
    }
}

/// Reads a whole input file, or stdin for "-".
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        io::stdin()
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
        return Ok(data);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    String::from_utf8(read_input(path)?)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))
}

fn load_composition(path: &Path) -> Result<Composition> {
    let text = read_text(path)?;
    Composition::from_json(&text)
        .with_context(|| format!("Failed to parse composition from {}", path.display()))
}

/// Default output path: the input's file stem with a .mid extension.
fn default_midi_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "-")
        .unwrap_or("composition");
    match input.parent() {
        Some(dir) if input != Path::new("-") => dir.join(format!("{}.mid", stem)),
        _ => PathBuf::from(format!("{}.mid", stem)),
    }
}

/// Encodes one composition file to a MIDI file and returns the output path.
fn compose_to_file(input: &Path, output: Option<&Path>, options: &EncodeOptions) -> Result<PathBuf> {
    let composition = load_composition(input)?;
    let bytes = midi::encode_with(&composition, options);
    let output_path = output.map_or_else(|| default_midi_path(input), Path::to_path_buf);
    std::fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    tracing::info!(
        "Encoded {} notes from {} to {}",
        composition.notes.len(),
        input.display(),
        output_path.display()
    );
    Ok(output_path)
}

fn run_compose(
    input: &Path,
    output: Option<&Path>,
    format: ComposeOutput,
    options: &EncodeOptions,
) -> Result<()> {
    match format {
        ComposeOutput::File => {
            let path = compose_to_file(input, output, options)?;
            println!("{}", path.display());
        }
        ComposeOutput::Base64 | ComposeOutput::DataUri => {
            let composition = load_composition(input)?;
            let bytes = midi::encode_with(&composition, options);
            if format == ComposeOutput::DataUri {
                println!("{}", midi::to_data_uri(&bytes));
            } else {
                println!("{}", midi::to_base64(&bytes));
            }
        }
    }
    Ok(())
}

fn run_summarize(input: &Path, sentences: usize) -> Result<()> {
    let text = read_text(input)?;
    println!("{}", summary::summarize(&text, sentences));
    Ok(())
}

fn run_inspect(input: &Path, json: bool) -> Result<()> {
    let bytes = read_input(input)?;
    let report = midi::inspect(&bytes)
        .with_context(|| format!("Failed to read MIDI from {}", input.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "tracks:         {}", report.track_count)?;
    writeln!(out, "ticks per beat: {}", report.ticks_per_beat)?;
    if let Some(tempo) = report.tempo {
        writeln!(out, "tempo:          {} BPM", tempo)?;
    }
    if let Some(program) = report.program {
        writeln!(
            out,
            "program:        {} ({})",
            program,
            midi::instrument_name(program)
        )?;
    }
    writeln!(out, "length:         {} beats", report.length_beats)?;
    writeln!(out, "notes:          {}", report.notes.len())?;
    for note in &report.notes {
        writeln!(
            out,
            "  {:>7.2}  {:<4} {:>5.2} beats  vel {}",
            note.start_beat, note.name, note.duration_beats, note.velocity
        )?;
    }
    Ok(())
}

/// Encodes every input in parallel. Failures are logged and counted; the
/// remaining files are still encoded.
fn run_batch(inputs: &[PathBuf], options: &EncodeOptions) -> Result<()> {
    let failures: usize = inputs
        .par_iter()
        .map(|input| match compose_to_file(input, None, options) {
            Ok(path) => {
                println!("{}", path.display());
                0
            }
            Err(e) => {
                tracing::error!("Encoding {} failed: {:?}", input.display(), e);
                1
            }
        })
        .sum();

    if failures > 0 {
        bail!("{} of {} compositions failed", failures, inputs.len());
    }
    Ok(())
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = EncodeOptions {
        tempo: cli.tempo,
        ..EncodeOptions::default()
    };

    match &cli.command {
        Command::Compose {
            input,
            output,
            format,
        } => run_compose(input, output.as_deref(), *format, &options),
        Command::Summarize { input, sentences } => {
            summary::init();
            run_summarize(input, *sentences)
        }
        Command::Inspect { input, json } => run_inspect(input, *json),
        Command::Batch { inputs } => run_batch(inputs, &options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        CliOptions::parse_from("promptscore", &args)
    }

    #[test]
    fn test_parse_compose() {
        let cli = parse(&["compose", "song.json", "-o", "out.mid", "--tempo", "90"]).unwrap();
        assert_eq!(cli.tempo, 90);
        match cli.command {
            Command::Compose {
                input,
                output,
                format,
            } => {
                assert_eq!(input, PathBuf::from("song.json"));
                assert_eq!(output, Some(PathBuf::from("out.mid")));
                assert_eq!(format, ComposeOutput::File);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_summarize_from_stdin() {
        let cli = parse(&["summarize", "-", "-n", "2"]).unwrap();
        match cli.command {
            Command::Summarize { input, sentences } => {
                assert_eq!(input, PathBuf::from("-"));
                assert_eq!(sentences, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["compose"]).is_err());
        assert!(parse(&["compose", "a.json", "b.json"]).is_err());
        assert!(parse(&["compose", "a.json", "--tempo", "0"]).is_err());
        assert!(parse(&["compose", "a.json", "--tempo", "100000000"]).is_err());
        assert!(parse(&["compose", "a.json", "--tempo", "60000000"]).is_ok());
        assert!(parse(&["compose", "a.json", "--bogus"]).is_err());
        assert!(parse(&["batch"]).is_err());
        assert!(parse(&["dance"]).is_err());
    }

    #[test]
    fn test_default_midi_path() {
        assert_eq!(
            default_midi_path(Path::new("songs/lullaby.json")),
            PathBuf::from("songs/lullaby.mid")
        );
        assert_eq!(default_midi_path(Path::new("-")), PathBuf::from("composition.mid"));
    }
}
