//! Ordered, single-pass matching of tokens against a field directory.
//!
//! Fields are visited once, in directory order, while a cursor moves forward through the
//! tokens. A field either matches the token under the cursor or, if it is optional, is
//! skipped without consuming anything. There is no searching ahead and no backtracking.
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::epoch;
use crate::kvn::Token;
use crate::prelude::*;
use crate::schema::{Field, Kind};

/// Prefix of keys captured into the extension map rather than decoded structurally.
pub const USER_DEFINED_PREFIX: &str = "USER_DEFINED_";

/// Vendor specific `USER_DEFINED_*` keys and their values.
pub type Extensions = HashMap<String, String>;

/// A decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Real(f64),
    Integer(u64),
    Epoch(DateTime<Utc>),
    Comments(Vec<String>),
    Record(Record),
    List(Vec<Record>),
}

/// Decoded values of one section, keyed by field name.
///
/// Fields that were optional and not present in the message have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: Vec<(&'static str, Value)>,
}

impl Record {
    fn insert(&mut self, name: &'static str, value: Value) {
        self.values.push((name, value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    fn take(&mut self, name: &str) -> Option<Value> {
        let idx = self.values.iter().position(|(key, _)| *key == name)?;
        Some(self.values.remove(idx).1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn text(&mut self, name: &str) -> Option<String> {
        match self.take(name) {
            Some(Value::Text(v)) => Some(v),
            _ => None,
        }
    }

    pub fn real(&mut self, name: &str) -> Option<f64> {
        match self.take(name) {
            Some(Value::Real(v)) => Some(v),
            _ => None,
        }
    }

    pub fn integer(&mut self, name: &str) -> Option<u64> {
        match self.take(name) {
            Some(Value::Integer(v)) => Some(v),
            _ => None,
        }
    }

    pub fn epoch(&mut self, name: &str) -> Option<DateTime<Utc>> {
        match self.take(name) {
            Some(Value::Epoch(v)) => Some(v),
            _ => None,
        }
    }

    /// Comments for this section; empty if there were none.
    pub fn comments(&mut self) -> Vec<String> {
        match self.take(crate::kvn::COMMENT) {
            Some(Value::Comments(v)) => v,
            _ => Vec::default(),
        }
    }

    /// Nested section `name`; empty if the directory has no such group.
    pub fn record(&mut self, name: &str) -> Record {
        match self.take(name) {
            Some(Value::Record(v)) => v,
            _ => Record::default(),
        }
    }

    pub fn list(&mut self, name: &str) -> Vec<Record> {
        match self.take(name) {
            Some(Value::List(v)) => v,
            _ => Vec::default(),
        }
    }
}

/// Read position in a token sequence. Only ever moves forward.
struct Cursor<'a> {
    tokens: &'a [&'a Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn remaining(&self) -> &'a [&'a Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }
}

/// Result of matching a directory against a message's tokens.
#[derive(Debug)]
pub struct Decoded {
    pub record: Record,
    pub extensions: Extensions,
    /// Tokens left over after every field was visited
    pub unconsumed: Vec<Token>,
}

/// Match `tokens` against the directory `fields`.
///
/// Tokens with keys starting with [USER_DEFINED_PREFIX] are moved to the extension map
/// before matching and never take part in structural decoding.
///
/// # Errors
/// The first structural or value error encountered. See [Error].
pub fn decode(fields: &'static [Field], tokens: &[Token]) -> Result<Decoded> {
    let (user, structural): (Vec<&Token>, Vec<&Token>) = tokens
        .iter()
        .partition(|t| t.key.starts_with(USER_DEFINED_PREFIX));

    let extensions: Extensions = user
        .into_iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect();
    if !extensions.is_empty() {
        debug!(count = extensions.len(), "captured user defined parameters");
    }

    let mut cursor = Cursor {
        tokens: &structural,
        pos: 0,
    };
    let mut record = Record::default();
    decode_fields(fields, &mut cursor, &mut record)?;

    Ok(Decoded {
        record,
        extensions,
        unconsumed: cursor.remaining().iter().map(|t| (*t).clone()).collect(),
    })
}

fn decode_fields(fields: &'static [Field], cursor: &mut Cursor, out: &mut Record) -> Result<()> {
    for field in fields {
        decode_field(field, cursor, out)?;
    }
    Ok(())
}

fn decode_field(field: &'static Field, cursor: &mut Cursor, out: &mut Record) -> Result<()> {
    match field.kind {
        Kind::Group(children) => {
            let mut record = Record::default();
            decode_fields(children, cursor, &mut record)?;
            out.insert(field.name, Value::Record(record));
            return Ok(());
        }
        Kind::List(template) => {
            let items = decode_list(field.name, template, cursor)?;
            out.insert(field.name, Value::List(items));
            return Ok(());
        }
        _ => {}
    }

    let Some(token) = cursor.peek() else {
        if field.required {
            return Err(Error::UnexpectedEndOfInput {
                expected: field.name,
            });
        }
        trace!(key = field.name, "skipping optional field at end of input");
        return Ok(());
    };

    if token.key != field.name {
        if field.required {
            return Err(Error::KeyMismatch {
                expected: field.name,
                actual: token.key.clone(),
                line: token.line,
            });
        }
        trace!(key = field.name, next = %token.key, "skipping optional field");
        return Ok(());
    }

    let value = match field.kind {
        Kind::Comments => {
            let mut values = Vec::new();
            while let Some(token) = cursor.peek().filter(|t| t.key == field.name) {
                values.push(token.value.clone());
                cursor.advance();
            }
            Value::Comments(values)
        }
        _ => {
            let value = parse_value(field, token)?;
            cursor.advance();
            value
        }
    };
    trace!(key = field.name, line = token.line, "matched");
    out.insert(field.name, value);
    Ok(())
}

/// Decode repetitions of `template` until its leading key is not next.
///
/// Comments ahead of the leading key are consumed with the repetition being attempted and are
/// dropped along with it if the repetition does not start.
fn decode_list(
    name: &'static str,
    template: &'static [Field],
    cursor: &mut Cursor,
) -> Result<Vec<Record>> {
    let mut items = Vec::new();
    let Some(lead) = template.iter().position(Field::is_scalar) else {
        return Ok(items);
    };

    loop {
        let mut record = Record::default();
        for (idx, field) in template.iter().enumerate() {
            if idx == lead && cursor.peek().map_or(true, |t| t.key != field.name) {
                debug!(list = name, count = items.len(), "end of repeated section");
                if !record.is_empty() {
                    trace!(list = name, "dropping partially decoded section");
                }
                return Ok(items);
            }
            decode_field(field, cursor, &mut record)?;
        }
        items.push(record);
    }
}

fn parse_value(field: &'static Field, token: &Token) -> Result<Value> {
    let number_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::NumberParse {
        key: field.name,
        value: token.value.clone(),
        line: token.line,
        source,
    };

    Ok(match field.kind {
        Kind::Real => Value::Real(
            token
                .value
                .parse::<f64>()
                .map_err(|err| number_err(Box::new(err)))?,
        ),
        Kind::Integer => Value::Integer(
            token
                .value
                .parse::<u64>()
                .map_err(|err| number_err(Box::new(err)))?,
        ),
        Kind::Epoch => Value::Epoch(epoch::parse(&token.value).map_err(|source| {
            Error::TimeParse {
                key: field.name,
                value: token.value.clone(),
                line: token.line,
                source,
            }
        })?),
        _ => Value::Text(token.value.clone()),
    })
}
