//! Line parser for the whitespace-delimited timing log.
//!
//! Recognised shapes:
//! - `--> function thread timestamp [tokens...]`
//! - `<-- function thread timestamp [tokens...]`
//! - `* [event name] thread timestamp` (converter only)
//!
//! Lines starting with anything else are ignored, not rejected.

use super::event::{Event, EventKind, LogLine, Marker};
use crate::utils::config::{
    ENTER_MARKER, EVENT_MARKER, EXIT_MARKER, MIN_EVENT_FIELDS, MIN_MARKER_FIELDS,
};
use crate::utils::error::ParseError;
use log::trace;

/// Parse one line into an entry/exit event
///
/// **Public** - entry point used by the analyzer
///
/// # Returns
/// * `Ok(Some(event))` for a well-formed `-->` or `<--` line
/// * `Ok(None)` for blank lines and any other leading token
///
/// # Errors
/// * `ParseError::TooFewFields` - fewer than four fields
/// * `ParseError::InvalidThreadId` / `ParseError::InvalidTimestamp` - non-integer field
pub fn parse_line(line: &str) -> Result<Option<Event>, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let kind = match words.first() {
        Some(&ENTER_MARKER) => EventKind::Enter,
        Some(&EXIT_MARKER) => EventKind::Exit,
        Some(other) => {
            trace!("Ignoring line with leading token '{}'", other);
            return Ok(None);
        }
        None => return Ok(None),
    };

    parse_event(kind, &words).map(Some)
}

/// Parse one line into any record the log may contain
///
/// **Public** - entry point used by the converter, which also keeps
/// bracketed event markers
pub fn parse_record(line: &str) -> Result<LogLine, ParseError> {
    let mut words = line.split_whitespace();
    if words.next() == Some(EVENT_MARKER) {
        let words: Vec<&str> = line.split_whitespace().collect();
        return parse_marker(&words).map(LogLine::Marker);
    }

    Ok(match parse_line(line)? {
        Some(event) => LogLine::Event(event),
        None => LogLine::Ignored,
    })
}

/// Build an event from the split words of a `-->`/`<--` line
///
/// **Private** - internal helper for parse_line
fn parse_event(kind: EventKind, words: &[&str]) -> Result<Event, ParseError> {
    if words.len() < MIN_EVENT_FIELDS {
        return Err(ParseError::TooFewFields {
            expected: MIN_EVENT_FIELDS,
            found: words.len(),
        });
    }

    let thread_id = parse_thread_id(words[2])?;
    let timestamp = parse_timestamp(words[3])?;

    Ok(Event::new(kind, words[1], thread_id, timestamp)
        .with_extra_tokens(words[MIN_EVENT_FIELDS..].iter().copied()))
}

/// Build a marker from `* [name words...] thread timestamp`
///
/// **Private** - internal helper for parse_record
fn parse_marker(words: &[&str]) -> Result<Marker, ParseError> {
    if words.len() < MIN_MARKER_FIELDS {
        return Err(ParseError::TooFewFields {
            expected: MIN_MARKER_FIELDS,
            found: words.len(),
        });
    }

    if !words[1].starts_with('[') {
        return Err(ParseError::MalformedMarker(format!(
            "event name must start with '[', found '{}'",
            words[1]
        )));
    }

    // The name runs up to and including the first token that closes the bracket
    let close = words[1..]
        .iter()
        .position(|w| w.ends_with(']'))
        .map(|offset| offset + 1)
        .ok_or_else(|| ParseError::MalformedMarker("event name is never closed".to_string()))?;

    let thread_word = words
        .get(close + 1)
        .ok_or_else(|| ParseError::MalformedMarker("missing thread id".to_string()))?;
    let time_word = words
        .get(close + 2)
        .ok_or_else(|| ParseError::MalformedMarker("missing timestamp".to_string()))?;

    Ok(Marker {
        name: words[1..=close].join(" "),
        thread_id: parse_thread_id(thread_word)?,
        timestamp: parse_timestamp(time_word)?,
    })
}

fn parse_thread_id(word: &str) -> Result<u64, ParseError> {
    word.parse::<u64>()
        .map_err(|_| ParseError::InvalidThreadId(word.to_string()))
}

fn parse_timestamp(word: &str) -> Result<u64, ParseError> {
    word.parse::<u64>()
        .map_err(|_| ParseError::InvalidTimestamp(word.to_string()))
}
