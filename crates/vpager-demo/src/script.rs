//! Script line parser using nom
//!
//! One command per line:
//! ```text
//! set 5
//! scroll 2 animated   # comment
//! move 1 0.25
//! remove id 3
//! ```

use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{alpha1, char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

/// Script argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Signed integer
    Int(i64),
    /// Decimal number
    Float(f64),
    /// Bare word
    Word(String),
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Lower-cased command name
    pub name: String,
    /// Arguments in order
    pub args: Vec<Arg>,
}

fn signed(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(char('-')), digit1))(input)
}

fn float(input: &str) -> IResult<&str, Arg> {
    map_res(recognize(tuple((signed, char('.'), digit1))), |s: &str| {
        s.parse().map(Arg::Float)
    })(input)
}

fn int(input: &str) -> IResult<&str, Arg> {
    map_res(signed, |s: &str| s.parse().map(Arg::Int))(input)
}

fn word(input: &str) -> IResult<&str, Arg> {
    map(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        |s: &str| Arg::Word(s.to_string()),
    )(input)
}

fn arg(input: &str) -> IResult<&str, Arg> {
    alt((float, int, word))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), opt(is_not("\n")))(input).map(|(rest, text)| (rest, text.unwrap_or("")))
}

fn command(input: &str) -> IResult<&str, Command> {
    map(
        pair(alpha1, opt(preceded(space1, separated_list0(space1, arg)))),
        |(name, args): (&str, Option<Vec<Arg>>)| Command {
            name: name.to_ascii_lowercase(),
            args: args.unwrap_or_default(),
        },
    )(input)
}

/// Parse one line
///
/// # Returns
/// * `Ok(None)` - Blank or comment-only line
/// * `Ok(Some(cmd))` - A command
/// * `Err(msg)` - Unparseable line
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let parsed = all_consuming(terminated(
        opt(command),
        preceded(space0, opt(comment)),
    ))(line);

    match parsed {
        Ok((_, cmd)) => Ok(cmd),
        Err(e) => Err(format!("cannot parse {:?}: {:?}", line, e)),
    }
}
