//! Parser: token stream to typed inclusion/exclusion clauses.

use crate::expression::lexer::{Token, TokenKind, lex};
use crate::foundation::core::FrameValue;
use crate::foundation::error::{FramespanError, FramespanResult};

/// Whether a clause adds frames to the result or removes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseKind {
    /// Plain clause: contributes its frames.
    Include,
    /// Marker-prefixed clause (`^` / `!`): removes its frames.
    Exclude,
}

/// The frames a single clause denotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseBody {
    /// One frame.
    Single(FrameValue),
    /// An inclusive stepped range. Invariant: `start <= end` (reversed input
    /// bounds are swapped during parsing). The step defaults to 1 and is
    /// validated at expansion time.
    Range {
        /// Lower bound, inclusive.
        start: FrameValue,
        /// Upper bound, inclusive.
        end: FrameValue,
        /// Increment between produced values.
        step: FrameValue,
    },
}

/// One parsed unit of a frame-range expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clause {
    /// Include or exclude.
    pub kind: ClauseKind,
    /// Index of occurrence in the expression, left to right. Positional
    /// resolution replays clauses in this order.
    pub position: usize,
    /// The denoted frames.
    pub body: ClauseBody,
}

/// Parse an expression into its ordered clause sequence.
///
/// Fails fast on malformed grammar; no partial clause list is returned.
/// An expression denoting nothing (for example the empty string) parses to
/// an empty sequence; rejecting that is the resolver's job.
pub fn parse(expression: &str) -> FramespanResult<Vec<Clause>> {
    let mut cursor = Cursor {
        tokens: lex(expression),
        pos: 0,
    };
    let mut clauses = Vec::new();

    while let Some(kind) = cursor.peek() {
        match kind {
            TokenKind::Sep => {
                cursor.bump();
            }
            TokenKind::Exclude => {
                let marker = cursor.pos;
                cursor.bump();
                if !matches!(cursor.peek(), Some(TokenKind::Number(_))) {
                    return Err(FramespanError::parse(
                        "exclusion marker must be followed by a frame number",
                        marker,
                    ));
                }
                let body = cursor.body()?;
                clauses.push(Clause {
                    kind: ClauseKind::Exclude,
                    position: clauses.len(),
                    body,
                });
            }
            TokenKind::Number(_) => {
                let body = cursor.body()?;
                clauses.push(Clause {
                    kind: ClauseKind::Include,
                    position: clauses.len(),
                    body,
                });
            }
            TokenKind::Dash => {
                return Err(FramespanError::parse(
                    "range separator without a preceding frame number",
                    cursor.pos,
                ));
            }
            TokenKind::Step => {
                return Err(FramespanError::parse(
                    "step marker without a preceding frame number",
                    cursor.pos,
                ));
            }
        }
    }

    Ok(clauses)
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> FramespanResult<FrameValue> {
        let idx = self.pos;
        match self.peek() {
            Some(TokenKind::Number(text)) => {
                let value = FrameValue::parse_decimal(text)
                    .map_err(|reason| FramespanError::parse(reason, idx))?;
                self.bump();
                Ok(value)
            }
            _ => Err(FramespanError::parse("expected a frame number", idx)),
        }
    }

    /// `number ("-" number)? ("x" number)?`, current token is a number.
    fn body(&mut self) -> FramespanResult<ClauseBody> {
        let first = self.number()?;

        let end = if self.consume(&TokenKind::Dash) {
            if !matches!(self.peek(), Some(TokenKind::Number(_))) {
                return Err(FramespanError::parse(
                    "range is missing its end frame",
                    self.pos,
                ));
            }
            Some(self.number()?)
        } else {
            None
        };

        let step = if self.consume(&TokenKind::Step) {
            // The lexer only emits a step marker with a number attached.
            self.number()?
        } else {
            FrameValue::ONE
        };

        Ok(match end {
            Some(end) => {
                let (start, end) = if first <= end { (first, end) } else { (end, first) };
                ClauseBody::Range { start, end, step }
            }
            None if step == FrameValue::ONE => ClauseBody::Single(first),
            // "5x2" per the grammar: a degenerate range, start == end.
            None => ClauseBody::Range {
                start: first,
                end: first,
                step,
            },
        })
    }
}
