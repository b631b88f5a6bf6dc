//! Whitespace-delimited integer tokens with line-scoped and flat access.
//!
//! Blank lines are dropped before tokenisation. A reader either takes a whole
//! [`Line`] at a time, or pulls single integers across line boundaries with the
//! flat methods on [`TokenStream`]. Mixing both is allowed as long as flat reads
//! leave the stream on a line boundary before the next line-scoped read.

use std::str::FromStr;

use log::trace;

use crate::error::{Location, Mismatch, PspLibError, Record, Result};

#[derive(Debug)]
struct SourceLine<'a> {
    number: usize,
    tokens: Vec<&'a str>,
}

#[derive(Debug)]
pub struct TokenStream<'a> {
    lines: Vec<SourceLine<'a>>,
    line: usize,
    column: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(content: &'a str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(number, line)| SourceLine {
                number,
                tokens: line.split_whitespace().collect(),
            })
            .collect();

        Self {
            lines,
            line: 0,
            column: 0,
        }
    }

    #[cfg(test)]
    fn is_exhausted(&self) -> bool {
        self.line >= self.lines.len()
    }

    fn location(&self, record: Record, field: &'static str) -> Location {
        let at = Location::new(record, field);
        match self.lines.get(self.line).or_else(|| self.lines.last()) {
            Some(line) => at.on_line(line.number),
            None => at,
        }
    }

    /// Hands out the next whole line.
    pub fn next_line(&mut self, record: Record, field: &'static str) -> Result<Line<'a>> {
        if self.column > 0 {
            let count = self.lines[self.line].tokens.len() - self.column;
            return Err(PspLibError::mismatch(
                self.location(record, field),
                Mismatch::TrailingTokens { count },
            ));
        }

        let Some(line) = self.lines.get(self.line) else {
            return Err(PspLibError::UnexpectedEndOfInput {
                at: self.location(record, field),
            });
        };
        self.line += 1;

        trace!("{record} ({field}): line {} {:?}", line.number, line.tokens);

        Ok(Line {
            number: line.number,
            tokens: line.tokens.clone(),
            position: 0,
            record,
            field,
        })
    }

    /// Reads the next integer regardless of line boundaries.
    pub fn next_int<T: FromStr>(&mut self, record: Record, field: &'static str) -> Result<T> {
        self.next_int_or_end(record, field)?
            .ok_or_else(|| PspLibError::UnexpectedEndOfInput {
                at: self.location(record, field),
            })
    }

    /// Like [`TokenStream::next_int`], but returns `None` once the input is exhausted.
    pub fn next_int_or_end<T: FromStr>(
        &mut self,
        record: Record,
        field: &'static str,
    ) -> Result<Option<T>> {
        let Some(line) = self.lines.get(self.line) else {
            return Ok(None);
        };

        let token = line.tokens[self.column];
        let at = Location::new(record, field).on_line(line.number);
        let value = parse_int(token, at)?;

        self.column += 1;
        if self.column == line.tokens.len() {
            self.line += 1;
            self.column = 0;
        }

        Ok(Some(value))
    }

    pub fn next_ints<T: FromStr>(
        &mut self,
        count: usize,
        record: Record,
        field: &'static str,
    ) -> Result<Vec<T>> {
        (0..count).map(|_| self.next_int(record, field)).collect()
    }

    /// Fails if anything is left after the last record of a grammar.
    pub fn expect_end(&mut self, record: Record) -> Result<()> {
        match self.lines.get(self.line) {
            None => Ok(()),
            Some(line) => Err(PspLibError::mismatch(
                Location::new(record, "end of input").on_line(line.number),
                Mismatch::TrailingInput {
                    token: line.tokens[self.column].to_owned(),
                },
            )),
        }
    }
}

/// A single source line handed out by [`TokenStream::next_line`].
#[derive(Debug)]
pub struct Line<'a> {
    number: usize,
    tokens: Vec<&'a str>,
    position: usize,
    record: Record,
    field: &'static str,
}

impl<'a> Line<'a> {
    #[cfg(test)]
    fn number(&self) -> usize {
        self.number
    }

    /// Total number of tokens on the line, consumed or not.
    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    pub fn location(&self) -> Location {
        Location::new(self.record, self.field).on_line(self.number)
    }

    /// Raw access for tokens that are not plain integers.
    pub fn next_token(&mut self) -> Result<&'a str> {
        let token = self
            .tokens
            .get(self.position)
            .copied()
            .ok_or_else(|| PspLibError::UnexpectedEndOfInput {
                at: self.location(),
            })?;
        self.position += 1;

        Ok(token)
    }

    pub fn next_int<T: FromStr>(&mut self) -> Result<T> {
        let token = self.next_token()?;
        parse_int(token, self.location())
    }

    pub fn next_ints<T: FromStr>(&mut self, count: usize) -> Result<Vec<T>> {
        (0..count).map(|_| self.next_int()).collect()
    }

    /// Consumes whatever is left on the line.
    pub fn rest_ints<T: FromStr>(&mut self) -> Result<Vec<T>> {
        self.next_ints(self.remaining())
    }

    /// Fails if the line has unread tokens.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(PspLibError::mismatch(
                self.location(),
                Mismatch::TrailingTokens { count },
            )),
        }
    }
}

fn parse_int<T: FromStr>(token: &str, at: Location) -> Result<T> {
    token.parse().map_err(|_| PspLibError::MalformedToken {
        token: token.to_owned(),
        at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: Record = Record::Header;

    #[test]
    fn blank_lines_are_dropped() {
        let mut tokens = TokenStream::new("\n  1 2\n\n   \n3\n");

        let mut first = tokens.next_line(RECORD, "first").unwrap();
        assert_eq!(first.number(), 2);
        assert_eq!(first.rest_ints::<u32>().unwrap(), vec![1, 2]);

        let second = tokens.next_line(RECORD, "second").unwrap();
        assert_eq!(second.number(), 5);
        assert!(tokens.is_exhausted());
    }

    #[test]
    fn flat_reads_cross_line_boundaries() {
        let mut tokens = TokenStream::new("1 2\n3\n4 5");

        assert_eq!(
            tokens.next_ints::<u32>(4, RECORD, "values").unwrap(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(tokens.next_int_or_end::<u32>(RECORD, "values").unwrap(), Some(5));
        assert_eq!(tokens.next_int_or_end::<u32>(RECORD, "values").unwrap(), None);
    }

    #[test]
    fn flat_then_line_scoped() {
        let mut tokens = TokenStream::new("2 1 7 1 8\n1 9");

        assert_eq!(
            tokens.next_ints::<u32>(5, RECORD, "groups").unwrap(),
            vec![2, 1, 7, 1, 8]
        );

        let mut line = tokens.next_line(RECORD, "successors").unwrap();
        assert_eq!(line.next_int::<usize>().unwrap(), 1);
        assert_eq!(line.next_int::<usize>().unwrap(), 9);
        line.finish().unwrap();
    }

    #[test]
    fn line_after_partial_flat_read_is_misaligned() {
        let mut tokens = TokenStream::new("1 2 3\n4");
        tokens.next_int::<u32>(RECORD, "value").unwrap();

        let err = tokens.next_line(Record::Activity(2), "successors").unwrap_err();

        assert!(matches!(
            err,
            PspLibError::StructuralMismatch {
                reason: Mismatch::TrailingTokens { count: 2 },
                ..
            }
        ));
    }

    #[test]
    fn missing_line_is_end_of_input() {
        let mut tokens = TokenStream::new("1");
        tokens.next_line(RECORD, "first").unwrap();

        let err = tokens.next_line(Record::Activity(4), "mode").unwrap_err();

        match err {
            PspLibError::UnexpectedEndOfInput { at } => {
                assert_eq!(at.record, Record::Activity(4));
                assert_eq!(at.field, "mode");
                assert_eq!(at.line, Some(1));
            }
            other => panic!("expected end of input, got {other:?}"),
        }
    }

    #[test]
    fn malformed_token_is_reported_with_line() {
        let mut tokens = TokenStream::new("\n3 x");
        let mut line = tokens.next_line(Record::Resource(0), "capacity").unwrap();
        line.next_int::<u32>().unwrap();

        match line.next_int::<u32>().unwrap_err() {
            PspLibError::MalformedToken { token, at } => {
                assert_eq!(token, "x");
                assert_eq!(at.line, Some(2));
            }
            other => panic!("expected a malformed token, got {other:?}"),
        }
    }

    #[test]
    fn negative_value_for_unsigned_field_is_malformed() {
        let mut tokens = TokenStream::new("-1");

        assert!(matches!(
            tokens.next_int::<u32>(RECORD, "capacity"),
            Err(PspLibError::MalformedToken { .. })
        ));
    }

    #[test]
    fn short_line_is_end_of_input() {
        let mut tokens = TokenStream::new("3 1");
        let mut line = tokens.next_line(Record::Activity(1), "successors").unwrap();
        let count: usize = line.next_int().unwrap();

        assert!(matches!(
            line.next_ints::<usize>(count),
            Err(PspLibError::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn finish_rejects_unread_tokens() {
        let mut tokens = TokenStream::new("1 2 3");
        let mut line = tokens.next_line(RECORD, "values").unwrap();
        line.next_int::<u32>().unwrap();

        assert!(matches!(
            line.finish(),
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::TrailingTokens { count: 2 },
                ..
            })
        ));
    }

    #[test]
    fn expect_end_reports_leftovers() {
        let mut tokens = TokenStream::new("1\n2");
        tokens.next_line(RECORD, "first").unwrap();

        assert!(matches!(
            tokens.expect_end(Record::Instance),
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::TrailingInput { .. },
                ..
            })
        ));
        tokens.next_line(RECORD, "second").unwrap();
        assert!(tokens.expect_end(Record::Instance).is_ok());
    }
}
