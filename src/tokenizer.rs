//! Field-level tokenizer
//!
//! A four-state machine that carves one field at a time out of the codepoint
//! stream. The transition table is a pure function so every state/codepoint
//! pair can be checked directly.

use crate::error::Result;
use crate::source::CodepointSource;
use std::io::Read;

/// Field separator, semicolon
pub(crate) const FIELD_SEP: char = ';';
/// Primary row separator, carriage return
pub(crate) const RECORD_SEP: char = '\r';
/// Secondary row separator, line feed
pub(crate) const RECORD_SEP2: char = '\n';
/// Quote mark
pub(crate) const QUOTE: char = '"';
/// Byte order mark, dropped wherever it appears outside quotes
pub(crate) const BOM: char = '\u{FEFF}';

/// Tokenizer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldState {
    /// Start of a field, nothing appended yet
    UnquotedStart,
    /// Inside an unquoted field
    UnquotedContinue,
    /// Inside a quoted field
    Quoted,
    /// Just saw a quote while inside a quoted field
    QuoteSeen,
}

/// Outcome of feeding one codepoint to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Append the codepoint and move to the given state
    Append(FieldState),
    /// Drop the codepoint and move to the given state
    Skip(FieldState),
    /// Field is complete; the codepoint was consumed as its terminator
    End,
    /// Field is complete; the codepoint starts the next token and must be
    /// un-read
    EndPushBack,
}

/// Transition table of the field state machine.
///
/// End of stream is handled by the caller: it completes the field in every
/// state. The match on `FieldState` is exhaustive, so there is no
/// unknown-state arm to guard against.
pub(crate) fn transition(state: FieldState, c: char) -> Action {
    match state {
        FieldState::UnquotedStart => match c {
            FIELD_SEP => Action::End,
            RECORD_SEP | RECORD_SEP2 => Action::EndPushBack,
            BOM => Action::Skip(FieldState::UnquotedStart),
            QUOTE => Action::Skip(FieldState::Quoted),
            _ => Action::Append(FieldState::UnquotedContinue),
        },
        FieldState::UnquotedContinue => match c {
            FIELD_SEP => Action::End,
            RECORD_SEP | RECORD_SEP2 => Action::EndPushBack,
            BOM => Action::Skip(FieldState::UnquotedContinue),
            _ => Action::Append(FieldState::UnquotedContinue),
        },
        FieldState::Quoted => match c {
            QUOTE => Action::Skip(FieldState::QuoteSeen),
            // Separators, terminators and BOM are all literal inside quotes
            _ => Action::Append(FieldState::Quoted),
        },
        FieldState::QuoteSeen => match c {
            // Doubled quote escapes one literal quote
            QUOTE => Action::Append(FieldState::Quoted),
            FIELD_SEP => Action::End,
            // The previous quote closed the field; this codepoint belongs to
            // the next token
            _ => Action::EndPushBack,
        },
    }
}

/// Read one field from the source, leaving it positioned at the first
/// codepoint that was not consumed as part of this field.
///
/// Returns the accumulated text, possibly empty. An unterminated quote is
/// tolerated: end of stream completes the field in every state.
pub(crate) fn read_field<R: Read>(source: &mut CodepointSource<R>) -> Result<String> {
    let mut text = String::new();
    let mut state = FieldState::UnquotedStart;
    loop {
        let c = match source.next_codepoint()? {
            Some(c) => c,
            None => break,
        };
        match transition(state, c) {
            Action::Append(next) => {
                text.push(c);
                state = next;
            }
            Action::Skip(next) => state = next,
            Action::End => break,
            Action::EndPushBack => {
                source.push_back(c);
                break;
            }
        }
    }
    Ok(text)
}
