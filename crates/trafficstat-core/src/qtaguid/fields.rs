//! Per-token parsers shared by both tables, written with `nom`.
//!
//! A table line is split on whitespace first, then each token must be
//! consumed completely by its field parser. Partial matches such as
//! `123abc` are rejected.

use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{hex_digit1, u32 as dec_u32, u64 as dec_u64},
    combinator::{all_consuming, map_res},
    sequence::preceded,
};
use trafficstat_common::constants::MAX_IFACE_NAME_LEN;

fn decimal_u64(input: &str) -> IResult<&str, u64> {
    dec_u64(input)
}

fn decimal_u32(input: &str) -> IResult<&str, u32> {
    dec_u32(input)
}

/// Parses `0x` followed by hex digits that fit in 64 bits.
fn hex_tag(input: &str) -> IResult<&str, u64> {
    map_res(preceded(tag("0x"), hex_digit1), |digits: &str| {
        u64::from_str_radix(digits, 16)
    })
    .parse(input)
}

/// Parses a whole token as an unsigned decimal 64-bit counter.
#[must_use]
pub fn counter(token: &str) -> Option<u64> {
    all_consuming(decimal_u64).parse(token).ok().map(|(_, v)| v)
}

/// Parses a whole token as an unsigned decimal 32-bit id.
#[must_use]
pub fn id(token: &str) -> Option<u32> {
    all_consuming(decimal_u32).parse(token).ok().map(|(_, v)| v)
}

/// Parses a whole token as a `0x`-prefixed hexadecimal tag.
#[must_use]
pub fn tag_hex(token: &str) -> Option<u64> {
    all_consuming(hex_tag).parse(token).ok().map(|(_, v)| v)
}

/// Accepts an interface name token if it fits the table's name column.
#[must_use]
pub fn iface_name(token: &str) -> Option<&str> {
    (!token.is_empty() && token.len() <= MAX_IFACE_NAME_LEN).then_some(token)
}
