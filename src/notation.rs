//! Text notation for notes, interval lists, tunings and chord charts.
//!
//! Every entry point requires the whole input to be consumed; leftovers are
//! reported as the matching typed error rather than silently ignored.

use crate::model::{IntervalSet, PitchClass, TheoryError};
use crate::voicing::VoicingError;
use nom::error::convert_error;
use nom::Err as NomErr;

mod utils;
pub use utils::*;

mod values;
pub use values::*;

pub type ParseError<'a> = nom::error::VerboseError<&'a str>;

pub type ParseResult<'a, T> = nom::IResult<&'a str, T, ParseError<'a>>;

fn describe(input: &str, err: NomErr<ParseError>) -> String {
    match err {
        NomErr::Error(e) | NomErr::Failure(e) => convert_error(input, e),
        NomErr::Incomplete(ic) => format!("Incomplete: {:?}", ic),
    }
}

fn run_complete<'a, T>(
    input: &'a str,
    parser: impl Fn(&'a str) -> ParseResult<'a, T>,
) -> Result<T, String> {
    let (rest, res) = parser(input).map_err(|e| describe(input, e))?;
    if !rest.is_empty() {
        return Err(format!("Could not parse full input. Rest: {:?}", rest));
    }
    Ok(res)
}

/// Parses one of the canonical note spellings (`C#` or `Db` style), ignoring case.
pub fn parse_note(name: &str) -> Result<PitchClass, TheoryError> {
    run_complete(name, parse_noteclass).map_err(|_| TheoryError::InvalidNoteName(name.to_owned()))
}

pub fn parse_intervals(input: &str) -> Result<IntervalSet, TheoryError> {
    let raw = run_complete(input.trim(), parse_semitone_list).map_err(|reason| {
        log::debug!("Rejected interval list {:?}: {}", input, reason);
        TheoryError::MalformedIntervals(input.to_owned())
    })?;
    IntervalSet::new(&raw)
}

/// Open-string notes separated by whitespace or commas.
pub fn parse_tuning_notes(input: &str) -> Result<Vec<PitchClass>, TheoryError> {
    let trimmed = input.trim();
    run_complete(trimmed, parse_noteclass_list)
        .map_err(|_| TheoryError::InvalidNoteName(input.to_owned()))
}

pub fn parse_chart(input: &str) -> Result<Vec<Option<u8>>, VoicingError> {
    run_complete(input.trim(), parse_chart_positions).map_err(VoicingError::BadChart)
}

pub fn parse_fingers(input: &str) -> Result<Vec<u8>, VoicingError> {
    run_complete(input.trim(), parse_finger_positions).map_err(VoicingError::BadChart)
}
