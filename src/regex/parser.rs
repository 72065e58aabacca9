//! Combinator-based parser producing a [`super::RegexTree`] from the surface
//! regex syntax: literal characters, backslash escapes, bracketed character
//! ranges `[a-c]`, grouping, alternation `|`, and the `*`/`+`/`?` quantifiers.
//!
//! `nom::Err::Failure` is used after consuming an opening `(` or `[` so a
//! missing closing delimiter is reported as a positioned error rather than
//! silently backtracked into "unexpected character".

use super::RegexTree;
use crate::error::SyntaxError;
use nom::character::complete::{anychar, char, one_of};
use nom::combinator::{all_consuming, opt, verify};
use nom::multi::{many0, many1};
use nom::sequence::preceded;
use nom::{Err as NomErr, IResult};

const FORBIDDEN: &str = "+*?|()[]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseErr<'a> {
    input: &'a str,
    message: String,
}

impl<'a> ParseErr<'a> {
    fn new(input: &'a str, message: impl Into<String>) -> Self {
        ParseErr {
            input,
            message: message.into(),
        }
    }
}

impl<'a> nom::error::ParseError<&'a str> for ParseErr<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        ParseErr::new(input, "unexpected character")
    }

    fn append(_input: &'a str, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

pub(crate) fn parse_regex_tree(input: &str) -> Result<RegexTree, SyntaxError> {
    match all_consuming(regexp)(input) {
        Ok((_, tree)) => Ok(tree),
        Err(NomErr::Error(e)) | Err(NomErr::Failure(e)) => {
            let consumed = input.len() - e.input.len();
            let position = input[..consumed].chars().count();
            Err(SyntaxError::new(e.message, position))
        }
        Err(NomErr::Incomplete(_)) => unreachable!("complete parsers never return Incomplete"),
    }
}

fn regexp(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    let (rest, first) = sequence(input)?;
    match preceded(char::<_, ParseErr<'_>>('|'), regexp)(rest) {
        Ok((rest2, next)) => {
            let mut branches = vec![first];
            match next {
                RegexTree::Alt(mut more) => branches.append(&mut more),
                other => branches.push(other),
            }
            Ok((rest2, RegexTree::Alt(branches)))
        }
        Err(NomErr::Error(_)) => Ok((rest, first)),
        Err(e) => Err(e),
    }
}

fn sequence(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    let (rest, items) = many0(repeating)(input)?;
    Ok((rest, RegexTree::Sequence(items)))
}

fn repeating(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    let (rest, base) = simple(input)?;
    let (rest, quant) = opt(one_of("*+?"))(rest)?;
    let tree = match quant {
        Some('*') => RegexTree::Star(Box::new(base)),
        Some('+') => RegexTree::Plus(Box::new(base)),
        Some('?') => RegexTree::Opt(Box::new(base)),
        None => base,
        Some(_) => unreachable!("one_of only yields '*', '+' or '?'"),
    };
    Ok((rest, tree))
}

fn simple(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    nom::branch::alt((group, range, char_atom))(input)
}

fn group(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    let (rest, _) = char('(')(input)?;
    let (rest, tree) = regexp(rest)?;
    match char::<_, ParseErr<'_>>(')')(rest) {
        Ok((rest2, _)) => Ok((rest2, tree)),
        Err(_) => Err(NomErr::Failure(ParseErr::new(rest, "missing closing ')'"))),
    }
}

fn range(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    let (rest, _) = char('[')(input)?;
    let (rest, items) = many1(range_item)(rest)?;
    match char::<_, ParseErr<'_>>(']')(rest) {
        Ok((rest2, _)) => Ok((rest2, RegexTree::Range(items))),
        Err(_) => Err(NomErr::Failure(ParseErr::new(rest, "missing closing ']'"))),
    }
}

fn range_item(input: &str) -> IResult<&str, (char, char), ParseErr<'_>> {
    let (rest, lo) = regex_char(input)?;
    match char::<_, ParseErr<'_>>('-')(rest) {
        Ok((rest2, _)) => match regex_char(rest2) {
            Ok((rest3, hi)) => Ok((rest3, (lo, hi))),
            Err(NomErr::Error(e)) => Err(NomErr::Failure(ParseErr::new(
                e.input,
                "expected a character after '-' in a range",
            ))),
            Err(e) => Err(e),
        },
        // Only a bare char, not a range: only backtrack here, since '-'
        // itself was never consumed.
        Err(NomErr::Error(_)) => Ok((rest, (lo, lo))),
        Err(e) => Err(e),
    }
}

fn char_atom(input: &str) -> IResult<&str, RegexTree, ParseErr<'_>> {
    let (rest, c) = regex_char(input)?;
    Ok((rest, RegexTree::Char(c)))
}

fn regex_char(input: &str) -> IResult<&str, char, ParseErr<'_>> {
    nom::branch::alt((escaped_char, normal_char))(input)
}

fn normal_char(input: &str) -> IResult<&str, char, ParseErr<'_>> {
    verify(anychar, |c: &char| !FORBIDDEN.contains(*c))(input)
}

/// `\c` yields `c`, except `\n` and `\r` both map to carriage return and `\v`
/// maps to vertical tab. Deliberate, not a typo: `\n` is not "corrected" to
/// map to line feed.
fn escaped_char(input: &str) -> IResult<&str, char, ParseErr<'_>> {
    let (rest, _) = char('\\')(input)?;
    match anychar::<_, ParseErr<'_>>(rest) {
        Ok((rest2, c)) => {
            let mapped = match c {
                'n' => '\r',
                'r' => '\r',
                'v' => '\u{000B}',
                other => other,
            };
            Ok((rest2, mapped))
        }
        Err(_) => Err(NomErr::Failure(ParseErr::new(
            rest,
            "expected a character after '\\'",
        ))),
    }
}
