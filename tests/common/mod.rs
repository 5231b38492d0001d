#![allow(dead_code)]
use std::path::PathBuf;

use odm::schema::{Field, Kind};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

pub fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("reading {path:?}: {err}"))
}

/// Required keys outside of repeated sections, in document order.
pub fn required_keys(fields: &[Field]) -> Vec<&'static str> {
    let mut keys = Vec::new();
    for field in fields {
        match field.kind {
            Kind::Group(children) => keys.extend(required_keys(children)),
            Kind::List(_) => {}
            _ if field.required => keys.push(field.name),
            _ => {}
        }
    }
    keys
}

/// `text` with every line for `key` removed.
pub fn without_key(text: &str, key: &str) -> String {
    text.lines()
        .filter(|line| line.split('=').next().map(str::trim) != Some(key))
        .collect::<Vec<_>>()
        .join("\n")
}
