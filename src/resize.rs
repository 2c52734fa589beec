use std::collections::HashMap;

use crate::automaton::Automaton;
use crate::error::Error;

/// One of the four mutually exclusive resize behaviors understood by
/// ImageMagick's `-resize` flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeSpec {
    /// `Wx` — scale to a fixed width, height follows the aspect ratio.
    Width(u64),
    /// `xH` — scale to a fixed height, width follows the aspect ratio.
    Height(u64),
    /// `WxH` — scale to exact dimensions.
    Both { width: u64, height: u64 },
    /// A bare percentage of the original dimensions.
    Percentage(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ParseState {
    Start,
    HaveLeft,
    NoLeft,
    LeftOnlyAccept,
    RightOnlyAccept,
    BothAccept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ParseInput {
    LeftPresent,
    LeftAbsent,
    RightPresent,
    RightAbsent,
}

/// Build the automaton that classifies an optionally-empty `WxH` pair.
///
/// `NoLeft` has no transition on `RightAbsent`: both sides empty (`"x"`) is
/// invalid and lands in the absorbing error condition. The machine exists to
/// make the four-way ambiguity of the pair explicit and exhaustively checked
/// instead of hiding it in nested conditionals.
fn resize_automaton() -> Automaton<ParseState, ParseInput> {
    use ParseInput::*;
    use ParseState::*;

    let transitions = HashMap::from([
        ((Start, LeftPresent), HaveLeft),
        ((Start, LeftAbsent), NoLeft),
        ((HaveLeft, RightPresent), BothAccept),
        ((HaveLeft, RightAbsent), LeftOnlyAccept),
        ((NoLeft, RightPresent), RightOnlyAccept),
    ]);
    Automaton::new(
        transitions,
        Start,
        [LeftOnlyAccept, RightOnlyAccept, BothAccept],
    )
}

/// Parse the argument of a resize option.
///
/// With an `x` separator the two sides select one of the dimension modes via
/// the grammar automaton; without one the whole argument is a percentage.
pub fn parse_resize(arg: &str) -> Result<ResizeSpec, Error> {
    if !arg.contains('x') {
        let percentage = arg
            .parse::<f64>()
            .map_err(|_| Error::InvalidNumber(arg.to_string()))?;
        return Ok(ResizeSpec::Percentage(percentage));
    }

    let sides: Vec<&str> = arg.split('x').collect();
    if sides.len() != 2 {
        return Err(Error::MalformedResize(arg.to_string()));
    }

    let mut machine = resize_automaton();
    let mut width = 0u64;
    let mut height = 0u64;

    if sides[0].is_empty() {
        machine.advance(ParseInput::LeftAbsent);
    } else {
        width = sides[0]
            .parse()
            .map_err(|_| Error::InvalidNumber(sides[0].to_string()))?;
        machine.advance(ParseInput::LeftPresent);
    }

    if sides[1].is_empty() {
        machine.advance(ParseInput::RightAbsent);
    } else {
        height = sides[1]
            .parse()
            .map_err(|_| Error::InvalidNumber(sides[1].to_string()))?;
        machine.advance(ParseInput::RightPresent);
    }

    let (state, verdict) = machine.finalize();
    if !verdict.is_accepted() {
        return Err(Error::InvalidResize(arg.to_string()));
    }

    match state {
        ParseState::LeftOnlyAccept => Ok(ResizeSpec::Width(width)),
        ParseState::RightOnlyAccept => Ok(ResizeSpec::Height(height)),
        ParseState::BothAccept => Ok(ResizeSpec::Both { width, height }),
        // Accepted verdicts only ever name the three accepting states.
        _ => Err(Error::InvalidResize(arg.to_string())),
    }
}
