//! # Key Casing
//!
//! Word-splitting conversions between camelCase and snake_case.
//!
//! A key is split into words at separators (`_`, `-`, space, `.`), at every
//! lower-to-upper transition (`userGuid` → `user`, `Guid`) and before the
//! last capital of an acronym run (`GUIDValue` → `GUID`, `Value`). Digits
//! stay attached to the word they follow. Leading underscores are kept
//! verbatim so keys such as `_id` survive a conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target casing for object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    /// `userGuid`, the casing models are addressed in.
    #[default]
    Camel,
    /// `user_guid`, the casing of row/column stores.
    Snake,
}

impl KeyCase {
    /// Rename a single key into this casing.
    pub fn apply(&self, key: &str) -> String {
        match self {
            Self::Camel => to_camel_case(key),
            Self::Snake => to_snake_case(key),
        }
    }

    /// The casing that undoes this one.
    pub fn inverse(&self) -> KeyCase {
        match self {
            Self::Camel => Self::Snake,
            Self::Snake => Self::Camel,
        }
    }
}

impl fmt::Display for KeyCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camel => f.write_str("camel"),
            Self::Snake => f.write_str("snake"),
        }
    }
}

/// A casing name that is neither `camel` nor `snake`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key case '{0}': expected 'camel' or 'snake'")]
pub struct UnknownKeyCase(pub String);

impl FromStr for KeyCase {
    type Err = UnknownKeyCase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "camel" | "camelcase" | "camel_case" => Ok(Self::Camel),
            "snake" | "snakecase" | "snake_case" => Ok(Self::Snake),
            _ => Err(UnknownKeyCase(s.to_string())),
        }
    }
}

/// Convert a key to snake_case: `authorId` → `author_id`.
pub fn to_snake_case(key: &str) -> String {
    let (prefix, body) = split_leading_underscores(key);
    let words = split_words(body);

    let mut out = String::with_capacity(key.len() + words.len());
    out.push_str(prefix);
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push('_');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Convert a key to camelCase: `author_id` → `authorId`.
pub fn to_camel_case(key: &str) -> String {
    let (prefix, body) = split_leading_underscores(key);
    let words = split_words(body);

    let mut out = String::with_capacity(key.len());
    out.push_str(prefix);
    for (i, word) in words.iter().enumerate() {
        let mut chars = word.chars();
        if i == 0 {
            out.extend(chars.flat_map(char::to_lowercase));
        } else if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

fn split_leading_underscores(key: &str) -> (&str, &str) {
    let body = key.trim_start_matches('_');
    (&key[..key.len() - body.len()], body)
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '_' | '-' | ' ' | '.')
}

fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if is_separator(ch) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
