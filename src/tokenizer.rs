use compact_str::{CompactString, ToCompactString};
use thiserror::Error;

use crate::expression::Operator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Digit(CompactString),
    Operator(Operator),
    Equals,
    Clear,
}

impl Key {
    pub fn from_char(c: char) -> Result<Option<Key>, KeyError> {
        match c {
            '0'..='9' | '.' => Ok(Some(Key::Digit(c.to_compact_string()))),
            '=' => Ok(Some(Key::Equals)),
            'c' | 'C' => Ok(Some(Key::Clear)),
            _ if c.is_whitespace() => Ok(None),
            _ => Operator::from_char(c)
                .map(|op| Some(Key::Operator(op)))
                .ok_or(KeyError::UnexpectedKey(c)),
        }
    }
}

pub fn keys(input: &str) -> impl Iterator<Item = Result<Key, KeyError>> + '_ {
    input.chars().filter_map(|c| Key::from_char(c).transpose())
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("Unexpected key {0:?}")]
    UnexpectedKey(char),
}
