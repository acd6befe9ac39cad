use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use serde::Serialize;
use std::io::Write;
use thiserror::*;

use fretwise::engine::{Engine, EngineConfig, EngineError, FretboardRequest, FretboardView, Selection};
use fretwise::fretboard::{Highlight, DEFAULT_MAX_FRET};
use fretwise::notation::{parse_chart, parse_fingers};
use fretwise::voicing::{Difficulty, StringStatus, Voicing, VoicingError};
use fretwise::{Catalog, CatalogError, Spelling};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Voicing(#[from] VoicingError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "fretwise", about = "Scales, chords and fingerings across guitar tunings")]
struct Cli {
    /// Highest fret shown on fretboard grids.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FRET)]
    max_fret: u8,
    /// Spell accidentals as flats instead of sharps.
    #[arg(long, global = true)]
    flats: bool,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Notes of a scale, root first.
    Scale { root: String, name: String },
    /// Notes of a chord, root first.
    Chord { root: String, chord_type: String },
    /// Chords from the catalog that fit inside a scale.
    Diatonic { root: String, scale: String },
    /// Annotated string-by-fret grid.
    Fretboard(FretboardCmd),
    /// Check a chord-chart fingering such as `x32010`.
    Validate(ValidateCmd),
    /// List the built-in tunings, scales and chord types.
    Catalog,
}

#[derive(Debug, Args)]
struct FretboardCmd {
    #[arg(long, default_value = "Standard")]
    tuning: String,
    /// ROOT NAME, e.g. `--scale C Major`.
    #[arg(long, num_args = 2, value_names = ["ROOT", "NAME"])]
    scale: Option<Vec<String>>,
    /// ROOT TYPE, e.g. `--chord A Minor`.
    #[arg(long, num_args = 2, value_names = ["ROOT", "TYPE"])]
    chord: Option<Vec<String>>,
}

#[derive(Debug, Args)]
struct ValidateCmd {
    #[arg(long, default_value = "Standard")]
    tuning: String,
    root: String,
    chord_type: String,
    /// Frets from the lowest string: `x` muted, digits, `(10)` for two-digit frets.
    chart: String,
    /// Fingers aligned with the chart: 0-4, `x` or `-` for none.
    #[arg(long)]
    fingers: Option<String>,
    #[arg(long, default_value = "beginner")]
    difficulty: String,
    #[arg(long, default_value = "Unnamed")]
    name: String,
}

#[derive(Serialize)]
struct CatalogListing {
    tunings: Vec<(String, Vec<String>)>,
    scales: Vec<(String, Vec<u8>)>,
    chord_types: Vec<(String, Vec<u8>)>,
}

fn selection(pair: Option<Vec<String>>) -> Option<Selection> {
    pair.and_then(|parts| match parts.as_slice() {
        [root, name] => Some(Selection::new(root.as_str(), name.as_str())),
        _ => None,
    })
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&mut dyn Write) -> std::io::Result<()>,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Text => text(&mut out)?,
    }
    Ok(())
}

fn draw_fretboard(out: &mut dyn Write, view: &FretboardView) -> std::io::Result<()> {
    writeln!(out, "{} (frets 0-{})", view.tuning, view.max_fret)?;
    for (string, cells) in view.strings.iter().rev() {
        write!(out, "{:>2} |", string)?;
        for cell in cells {
            let mark = match (cell.highlight, cell.is_root) {
                (_, true) => format!("[{}]", cell.note),
                (Highlight::None, false) => "-".to_owned(),
                (_, false) => cell.note.clone(),
            };
            write!(out, "{:^5}|", mark)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn describe_status(status: &StringStatus) -> String {
    match status {
        StringStatus::Muted => "muted".to_owned(),
        StringStatus::OpenRoot => "open (root)".to_owned(),
        StringStatus::Open => "open".to_owned(),
        StringStatus::Fretted { fret, finger } => {
            format!("fret {} finger {}", fret, finger.as_u8())
        }
    }
}

fn run(cli: Cli, catalog: &Catalog) -> Result<(), CliError> {
    let config = EngineConfig {
        max_fret: cli.max_fret,
        spelling: if cli.flats {
            Spelling::Flats
        } else {
            Spelling::Sharps
        },
    };
    debug!("Engine config: {:?}", config);
    let engine = Engine::new(catalog, config);
    let format = cli.format;

    match cli.command {
        Commands::Scale { root, name } => {
            let notes = engine.scale_notes(&root, &name)?;
            emit(format, &notes, |out| writeln!(out, "{}", notes.join(" ")))
        }
        Commands::Chord { root, chord_type } => {
            let notes = engine.chord_notes(&root, &chord_type)?;
            emit(format, &notes, |out| writeln!(out, "{}", notes.join(" ")))
        }
        Commands::Diatonic { root, scale } => {
            let names = engine.diatonic_chord_names(&root, &scale)?;
            emit(format, &names, |out| {
                names.iter().try_for_each(|name| writeln!(out, "{}", name))
            })
        }
        Commands::Fretboard(cmd) => {
            let request = FretboardRequest {
                tuning: cmd.tuning,
                scale: selection(cmd.scale),
                chord: selection(cmd.chord),
            };
            let view = engine.fretboard(&request)?;
            emit(format, &view, |out| draw_fretboard(out, &view))
        }
        Commands::Validate(cmd) => {
            let frets = parse_chart(&cmd.chart)?;
            let fingers = cmd.fingers.as_deref().map(parse_fingers).transpose()?;
            let difficulty: Difficulty = cmd.difficulty.parse()?;
            let voicing = Voicing::from_chart(cmd.name, difficulty, &frets, fingers.as_deref())?;
            info!("Validating {:?} ({})", voicing.name, voicing.difficulty);
            let chord = Selection::new(cmd.root, cmd.chord_type);
            let statuses = engine.validate_voicing(&cmd.tuning, &chord, &voicing)?;
            emit(format, &statuses, |out| {
                statuses
                    .iter()
                    .enumerate()
                    .try_for_each(|(string, status)| {
                        writeln!(out, "string {}: {}", string, describe_status(status))
                    })
            })
        }
        Commands::Catalog => {
            let spelling = config.spelling;
            let listing = CatalogListing {
                tunings: catalog
                    .tunings()
                    .iter()
                    .map(|t| {
                        let notes = t.open_strings().iter().map(|n| n.spell(spelling).to_owned());
                        (t.name().to_owned(), notes.collect())
                    })
                    .collect(),
                scales: catalog
                    .scales()
                    .iter()
                    .map(|s| (s.name.clone(), s.intervals.semitones()))
                    .collect(),
                chord_types: catalog
                    .chord_types()
                    .iter()
                    .map(|c| (c.name.clone(), c.intervals.semitones()))
                    .collect(),
            };
            emit(format, &listing, |out| {
                for (name, notes) in &listing.tunings {
                    writeln!(out, "tuning  {:<16} {}", name, notes.join(" "))?;
                }
                for (name, steps) in listing.scales.iter().chain(&listing.chord_types) {
                    writeln!(out, "set     {:<16} {:?}", name, steps)?;
                }
                Ok(())
            })
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let outcome = Catalog::factory_defaults()
        .map_err(CliError::from)
        .and_then(|catalog| run(cli, &catalog));
    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
