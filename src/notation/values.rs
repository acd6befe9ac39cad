use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    combinator::{map, map_res},
    error::context,
    multi::{many1, separated_nonempty_list},
    sequence::{delimited, preceded},
    character::complete::space0,
};

use super::{list_separator, rawdigit, smallu8, ParseResult};
use crate::model::PitchClass;
use std::str::FromStr;

pub fn parse_noteclass(input: &str) -> ParseResult<PitchClass> {
    context(
        "Note name",
        alt((
            alt((
                map(tag_no_case("Ab"), |_| PitchClass::Gs),
                map(tag_no_case("A#"), |_| PitchClass::As),
                map(tag_no_case("A"), |_| PitchClass::A),
                map(tag_no_case("Bb"), |_| PitchClass::As),
                map(tag_no_case("B"), |_| PitchClass::B),
                map(tag_no_case("C#"), |_| PitchClass::Cs),
                map(tag_no_case("C"), |_| PitchClass::C),
            )),
            alt((
                map(tag_no_case("D#"), |_| PitchClass::Ds),
                map(tag_no_case("Db"), |_| PitchClass::Cs),
                map(tag_no_case("D"), |_| PitchClass::D),
                map(tag_no_case("Eb"), |_| PitchClass::Ds),
                map(tag_no_case("E"), |_| PitchClass::E),
            )),
            alt((
                map(tag_no_case("F#"), |_| PitchClass::Fs),
                map(tag_no_case("F"), |_| PitchClass::F),
                map(tag_no_case("Gb"), |_| PitchClass::Fs),
                map(tag_no_case("G#"), |_| PitchClass::Gs),
                map(tag_no_case("G"), |_| PitchClass::G),
            )),
        )),
    )(input)
}

pub fn parse_noteclass_list(input: &str) -> ParseResult<Vec<PitchClass>> {
    context(
        "Note list",
        separated_nonempty_list(list_separator, parse_noteclass),
    )(input)
}

pub fn parse_semitone_list(input: &str) -> ParseResult<Vec<u8>> {
    context(
        "Interval list",
        separated_nonempty_list(list_separator, smallu8),
    )(input)
}

fn chart_position(input: &str) -> ParseResult<Option<u8>> {
    let muted = map(tag_no_case("x"), |_| None);
    let wide = map(delimited(tag("("), smallu8, tag(")")), Some);
    let narrow = map(map_res(rawdigit, u8::from_str), Some);
    alt((muted, wide, narrow))(input)
}

/// Chord-chart frets, lowest string first: `None` is a muted string.
pub fn parse_chart_positions(input: &str) -> ParseResult<Vec<Option<u8>>> {
    context("Chord chart", many1(preceded(space0, chart_position)))(input)
}

fn finger_position(input: &str) -> ParseResult<u8> {
    let unused = map(alt((tag_no_case("x"), tag("-"))), |_| 0);
    let digit = map_res(rawdigit, u8::from_str);
    alt((unused, digit))(input)
}

pub fn parse_finger_positions(input: &str) -> ParseResult<Vec<u8>> {
    context("Finger chart", many1(preceded(space0, finger_position)))(input)
}
