//! Keyword=Value Notation (KVN) line handling.
//!
//! Splits raw message text into physical lines and lexes each line into a [Token].
//!
//! Reference: [Orbit Data Messages](https://public.ccsds.org/Pubs/502x0b3e1.pdf), section 7.
use crate::prelude::*;

/// Key used for free-text comment lines.
pub const COMMENT: &str = "COMMENT";

/// Line ending convention used by a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    CrLf,
    LfCr,
    Cr,
    Lf,
}

impl LineEnding {
    /// Detect the line ending used by `raw`, checking CRLF, LFCR and CR in that order and
    /// defaulting to LF.
    #[must_use]
    pub fn detect(raw: &str) -> Self {
        if raw.contains("\r\n") {
            LineEnding::CrLf
        } else if raw.contains("\n\r") {
            LineEnding::LfCr
        } else if raw.contains('\r') {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::LfCr => "\n\r",
            LineEnding::Cr => "\r",
            LineEnding::Lf => "\n",
        }
    }
}

/// Split `raw` into its non-blank physical lines.
///
/// The text is trimmed before splitting. Each line is returned trimmed, along with its
/// 1-based line number in the trimmed text.
pub fn lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    let ending = LineEnding::detect(raw);
    raw.trim()
        .split(ending.as_str())
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// A single key/value pair lexed from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub key: String,
    pub value: String,
    /// 1-based line number the token was read from
    pub line: usize,
}

impl Token {
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.key == COMMENT
    }
}

/// Lex a single trimmed, non-empty line.
///
/// Comment lines produce a [COMMENT] token with the rest of the line as the value. Other
/// lines are split on the first `=`. A trailing unit annotation, e.g., `[km/s]`, is removed
/// from the value.
///
/// # Errors
/// [Error::MalformedLine] if a non-comment line does not contain `=`.
pub fn lex_line(line: &str, lineno: usize) -> Result<Token> {
    if let Some(rest) = line.strip_prefix(COMMENT) {
        return Ok(Token {
            key: COMMENT.to_string(),
            value: rest.trim().to_string(),
            line: lineno,
        });
    }

    let Some((key, value)) = line.split_once('=') else {
        return Err(Error::MalformedLine {
            line: lineno,
            text: line.to_string(),
        });
    };

    Ok(Token {
        key: key.trim().to_string(),
        value: strip_units(value.trim()).to_string(),
        line: lineno,
    })
}

/// Remove a trailing `[unit]` annotation from `value`.
fn strip_units(value: &str) -> &str {
    if value.ends_with(']') {
        if let Some(idx) = value.rfind('[') {
            return value[..idx].trim();
        }
    }
    value
}

/// Lex all lines of `raw` into tokens, in document order.
///
/// # Errors
/// [Error::MalformedLine] for the first line that cannot be lexed.
pub fn tokenize(raw: &str) -> Result<Vec<Token>> {
    let tokens = lines(raw)
        .map(|(lineno, line)| lex_line(line, lineno))
        .collect::<Result<Vec<Token>>>()?;
    trace!(count = tokens.len(), "tokenized message");
    Ok(tokens)
}

#[cfg(test)]
mod test {
    use super::*;

    fn kv(line: &str) -> (String, String) {
        let token = lex_line(line, 1).unwrap();
        (token.key, token.value)
    }

    #[test]
    fn detect_line_endings() {
        assert_eq!(LineEnding::detect("A=1\r\nB=2"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("A=1\n\rB=2"), LineEnding::LfCr);
        assert_eq!(LineEnding::detect("A=1\rB=2"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("A=1\nB=2"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("A=1"), LineEnding::Lf);
    }

    #[test]
    fn lines_skips_blanks_and_keeps_line_numbers() {
        let got: Vec<(usize, &str)> = lines("\n  A = 1\r\n\r\n  \r\nB = 2  \r\n").collect();
        assert_eq!(got, vec![(1, "A = 1"), (4, "B = 2")]);
    }

    #[test]
    fn lex_without_units() {
        assert_eq!(kv("KEY=VALUE"), ("KEY".into(), "VALUE".into()));
        assert_eq!(kv(" KEY =          VALUE "), ("KEY".into(), "VALUE".into()));
        assert_eq!(
            kv("MESSAGE_ID = OPM 201113719185"),
            ("MESSAGE_ID".into(), "OPM 201113719185".into())
        );
    }

    #[test]
    fn lex_strips_units() {
        assert_eq!(kv("KEY=VALUE [ms]"), ("KEY".into(), "VALUE".into()));
        assert_eq!(
            kv("GM = 398600.4415 [km**3/s**2]"),
            ("GM".into(), "398600.4415".into())
        );
    }

    #[test]
    fn lex_keeps_brackets_not_at_end() {
        assert_eq!(kv("KEY = [a] b"), ("KEY".into(), "[a] b".into()));
    }

    #[test]
    fn lex_splits_on_first_equals() {
        assert_eq!(kv("KEY = a=b"), ("KEY".into(), "a=b".into()));
    }

    #[test]
    fn lex_comment() {
        assert_eq!(
            kv("COMMENT      1996-01-01 00:00:00.000"),
            ("COMMENT".into(), "1996-01-01 00:00:00.000".into())
        );
        assert_eq!(kv("COMMENT"), ("COMMENT".into(), String::new()));
        assert_eq!(kv("COMMENT a = b"), ("COMMENT".into(), "a = b".into()));
    }

    #[test]
    fn lex_malformed_line() {
        let zult = lex_line("NOT A KVN LINE", 7);
        match zult {
            Err(Error::MalformedLine { line, text }) => {
                assert_eq!(line, 7);
                assert_eq!(text, "NOT A KVN LINE");
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn tokenize_multiple() {
        let tokens = tokenize("KEY=VALUE\nKEY=VALUE2\nCOMMENT note").unwrap();
        let got: Vec<(&str, &str, usize)> = tokens
            .iter()
            .map(|t| (t.key.as_str(), t.value.as_str(), t.line))
            .collect();
        assert_eq!(
            got,
            vec![
                ("KEY", "VALUE", 1),
                ("KEY", "VALUE2", 2),
                ("COMMENT", "note", 3)
            ]
        );
    }

    #[test]
    fn tokenize_reports_malformed_line_number() {
        let zult = tokenize("A = 1\n\nbogus\nB = 2");
        assert!(
            matches!(zult, Err(Error::MalformedLine { line: 3, .. })),
            "got {zult:?}"
        );
    }
}
