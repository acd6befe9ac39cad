use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::{space0, space1},
    combinator::map_res,
    sequence::delimited,
};

use super::ParseResult;
use std::str::FromStr;

pub fn rawuint(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_digit(10))(input)
}

pub fn rawdigit(input: &str) -> ParseResult<&str> {
    take_while_m_n(1, 1, |c: char| c.is_digit(10))(input)
}

pub fn smallu8(input: &str) -> ParseResult<u8> {
    map_res(rawuint, u8::from_str)(input)
}

/// Either a comma with optional padding or plain whitespace.
pub fn list_separator(input: &str) -> ParseResult<&str> {
    alt((delimited(space0, tag(","), space0), space1))(input)
}
