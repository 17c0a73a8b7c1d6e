//! Total tokenizer for frame-range expressions.
//!
//! Lexing never fails: unrecognized characters act as clause separators and
//! strictness is enforced by the parser. The only context kept while
//! scanning is the pending separator run, which decides whether a `-` is a
//! range dash or the sign of a number, and lets ranges, steps and exclusion
//! markers reach across plain whitespace (`"1 - 5"`, `"^ 3"`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Raw number text, greedily matched: optional sign, digits, at most one
    /// decimal point.
    Number(String),
    /// Range separator between two numbers.
    Dash,
    /// Step marker: `x` (or `%`) followed by a number, at most one space
    /// apart.
    Step,
    /// Exclusion marker `^` or `!`.
    Exclude,
    /// One or more separators (comma, semicolon, whitespace, anything
    /// unrecognized), collapsed.
    Sep,
}

#[derive(Clone, Copy, PartialEq)]
enum Pending {
    None,
    /// Whitespace only; suppressed where a range or marker continues.
    Soft(Span),
    /// Contains a comma/semicolon/unrecognized character; always separates.
    Hard(Span),
}

pub(crate) fn lex(input: &str) -> Vec<Token> {
    Lexer {
        input,
        bytes: input.as_bytes(),
        i: 0,
        out: Vec::new(),
        pending: Pending::None,
    }
    .run()
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    i: usize,
    out: Vec<Token>,
    pending: Pending,
}

impl Lexer<'_> {
    fn run(mut self) -> Vec<Token> {
        while self.i < self.bytes.len() {
            let c = self.bytes[self.i] as char;
            let start = self.i;

            if c.is_whitespace() {
                self.i += 1;
                self.note_sep(start, false);
                continue;
            }
            if c == ',' || c == ';' {
                self.i += 1;
                self.note_sep(start, true);
                continue;
            }
            if c == '^' || c == '!' {
                self.i += 1;
                self.push(TokenKind::Exclude, start, false);
                continue;
            }
            if c == 'x' || c == '%' {
                // A step marker only when a number follows, at most one
                // space away; otherwise the character is noise.
                let gap = matches!(self.bytes.get(self.i + 1), Some(b) if b.is_ascii_whitespace())
                    && self.number_starts(self.i + 2, true);
                if self.number_starts(self.i + 1, true) || gap {
                    self.i += 1;
                    self.push(TokenKind::Step, start, true);
                    if gap {
                        self.i += 1;
                    }
                } else {
                    self.i += 1;
                    self.note_sep(start, true);
                }
                continue;
            }
            if c == '-' {
                let after_number = matches!(
                    self.out.last().map(|t| &t.kind),
                    Some(TokenKind::Number(_))
                );
                if after_number && !matches!(self.pending, Pending::Hard(_)) {
                    self.i += 1;
                    self.push(TokenKind::Dash, start, true);
                } else if self.number_starts(self.i + 1, false) {
                    self.lex_number();
                } else {
                    // Dangling dash; the parser reports it.
                    self.i += 1;
                    self.push(TokenKind::Dash, start, false);
                }
                continue;
            }
            if c == '+' {
                if self.number_starts(self.i + 1, false) {
                    self.lex_number();
                } else {
                    self.i += 1;
                    self.note_sep(start, true);
                }
                continue;
            }
            if self.number_starts(self.i, false) {
                self.lex_number();
                continue;
            }

            // Anything else separates clauses.
            self.i += 1;
            self.note_sep(start, true);
        }
        self.out
    }

    /// Whether a number begins at byte `pos`: a digit, or a point followed
    /// by a digit, optionally after a sign when `allow_sign` is set.
    fn number_starts(&self, mut pos: usize, allow_sign: bool) -> bool {
        if allow_sign && matches!(self.bytes.get(pos), Some(b'-') | Some(b'+')) {
            pos += 1;
        }
        match self.bytes.get(pos) {
            Some(b) if b.is_ascii_digit() => true,
            Some(b'.') => matches!(self.bytes.get(pos + 1), Some(b) if b.is_ascii_digit()),
            _ => false,
        }
    }

    fn lex_number(&mut self) {
        let start = self.i;
        if matches!(self.bytes.get(self.i), Some(b'-') | Some(b'+')) {
            self.i += 1;
        }
        while matches!(self.bytes.get(self.i), Some(b) if b.is_ascii_digit()) {
            self.i += 1;
        }
        if matches!(self.bytes.get(self.i), Some(b'.'))
            && matches!(self.bytes.get(self.i + 1), Some(b) if b.is_ascii_digit())
        {
            self.i += 1;
            while matches!(self.bytes.get(self.i), Some(b) if b.is_ascii_digit()) {
                self.i += 1;
            }
        }
        let text = self.input[start..self.i].to_owned();
        self.push(TokenKind::Number(text), start, false);
    }

    fn note_sep(&mut self, at: usize, hard: bool) {
        let span = match self.pending {
            Pending::None => Span {
                start: at,
                end: at + 1,
            },
            Pending::Soft(s) | Pending::Hard(s) => Span {
                start: s.start,
                end: at + 1,
            },
        };
        self.pending = if hard || matches!(self.pending, Pending::Hard(_)) {
            Pending::Hard(span)
        } else {
            Pending::Soft(span)
        };
    }

    /// Emit a token, first flushing any pending separator. A soft
    /// (whitespace-only) separator is dropped when the stream glues across
    /// it: before a dash or step marker, or after a dash or exclusion
    /// marker.
    fn push(&mut self, kind: TokenKind, start: usize, glues_left: bool) {
        match self.pending {
            Pending::None => {}
            Pending::Soft(span) => {
                let after_glue = matches!(
                    self.out.last().map(|t| &t.kind),
                    Some(TokenKind::Dash) | Some(TokenKind::Exclude)
                );
                if !glues_left && !after_glue && !self.out.is_empty() {
                    self.out.push(Token {
                        kind: TokenKind::Sep,
                        span,
                    });
                }
            }
            Pending::Hard(span) => {
                if !self.out.is_empty() {
                    self.out.push(Token {
                        kind: TokenKind::Sep,
                        span,
                    });
                }
            }
        }
        self.pending = Pending::None;
        self.out.push(Token {
            kind,
            span: Span {
                start,
                end: self.i,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    fn num(s: &str) -> TokenKind {
        TokenKind::Number(s.to_owned())
    }

    #[test]
    fn singles_and_separators() {
        assert_eq!(
            kinds("1, 2;3 4"),
            vec![
                num("1"),
                TokenKind::Sep,
                num("2"),
                TokenKind::Sep,
                num("3"),
                TokenKind::Sep,
                num("4"),
            ]
        );
    }

    #[test]
    fn dash_after_number_is_a_range() {
        assert_eq!(kinds("1-5"), vec![num("1"), TokenKind::Dash, num("5")]);
        assert_eq!(kinds("1 - 5"), vec![num("1"), TokenKind::Dash, num("5")]);
    }

    #[test]
    fn dash_after_hard_separator_is_a_sign() {
        assert_eq!(kinds("1,-5"), vec![num("1"), TokenKind::Sep, num("-5")]);
    }

    #[test]
    fn negative_range_keeps_signs() {
        assert_eq!(
            kinds("-3--1"),
            vec![num("-3"), TokenKind::Dash, num("-1")]
        );
    }

    #[test]
    fn step_marker_requires_adjacent_number() {
        assert_eq!(
            kinds("1-10x2"),
            vec![num("1"), TokenKind::Dash, num("10"), TokenKind::Step, num("2")]
        );
        assert_eq!(
            kinds("1-10 x2"),
            vec![num("1"), TokenKind::Dash, num("10"), TokenKind::Step, num("2")]
        );
        // One space between marker and number is tolerated.
        assert_eq!(
            kinds("1-10 x 2"),
            vec![num("1"), TokenKind::Dash, num("10"), TokenKind::Step, num("2")]
        );
        // More than one is not; the x degrades to a separator.
        assert_eq!(
            kinds("1-10 x  2"),
            vec![num("1"), TokenKind::Dash, num("10"), TokenKind::Sep, num("2")]
        );
        // Percent is the legacy spelling.
        assert_eq!(
            kinds("1-10%2"),
            vec![num("1"), TokenKind::Dash, num("10"), TokenKind::Step, num("2")]
        );
    }

    #[test]
    fn exclusion_marker_reaches_across_whitespace() {
        assert_eq!(kinds("^3"), vec![TokenKind::Exclude, num("3")]);
        assert_eq!(kinds("! 3"), vec![TokenKind::Exclude, num("3")]);
        assert_eq!(
            kinds("^, 3"),
            vec![TokenKind::Exclude, TokenKind::Sep, num("3")]
        );
    }

    #[test]
    fn unrecognized_characters_separate() {
        assert_eq!(kinds("1 and 2"), vec![num("1"), TokenKind::Sep, num("2")]);
        assert_eq!(kinds("  7  "), vec![num("7")]);
        assert_eq!(kinds(""), Vec::<TokenKind>::new());
    }

    #[test]
    fn numbers_are_greedy() {
        assert_eq!(kinds("1.25"), vec![num("1.25")]);
        assert_eq!(kinds(".5"), vec![num(".5")]);
        assert_eq!(kinds("1..5"), vec![num("1"), TokenKind::Sep, num(".5")]);
    }

    #[test]
    fn dangling_markers_still_tokenize() {
        assert_eq!(kinds("-"), vec![TokenKind::Dash]);
        assert_eq!(kinds("^"), vec![TokenKind::Exclude]);
        assert_eq!(kinds("1-"), vec![num("1"), TokenKind::Dash]);
    }
}
