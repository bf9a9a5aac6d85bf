//! NBT Module
//!
//! Tag-tree values stored inside region records, plus the binary codec and
//! a JSON bridge used for override text and printing.
//!
//! ## Binary Format (big-endian)
//! ```text
//! ┌──────────┬──────────────────────┬─────────────────────┐
//! │ Tag (1)  │ Name: u16 len + UTF-8│ Payload (by tag)    │
//! └──────────┴──────────────────────┴─────────────────────┘
//! Compound payload: named tags ... terminated by Tag 0 (End)
//! List payload:     element Tag (1) + count i32 + unnamed payloads
//! ```

mod codec;
mod json;

use std::collections::BTreeMap;

use serde::Serialize;

pub use codec::{decode, encode, MAX_DEPTH};
pub use json::{compound_from_json, from_json, parse_compound};

/// A compound tag: string keys mapped to values
pub type Compound = BTreeMap<String, Value>;

/// Tag identifiers
pub mod tag {
    pub const END: u8 = 0;
    pub const BYTE: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const INT: u8 = 3;
    pub const LONG: u8 = 4;
    pub const FLOAT: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const BYTE_ARRAY: u8 = 7;
    pub const STRING: u8 = 8;
    pub const LIST: u8 = 9;
    pub const COMPOUND: u8 = 10;
    pub const INT_ARRAY: u8 = 11;
    pub const LONG_ARRAY: u8 = 12;
}

/// A single tag-tree value
///
/// Integer widths are kept distinct so that re-encoding preserves the
/// original tag types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Value>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// Tag identifier of this value
    pub fn tag_id(&self) -> u8 {
        match self {
            Value::Byte(_) => tag::BYTE,
            Value::Short(_) => tag::SHORT,
            Value::Int(_) => tag::INT,
            Value::Long(_) => tag::LONG,
            Value::Float(_) => tag::FLOAT,
            Value::Double(_) => tag::DOUBLE,
            Value::ByteArray(_) => tag::BYTE_ARRAY,
            Value::String(_) => tag::STRING,
            Value::List(_) => tag::LIST,
            Value::Compound(_) => tag::COMPOUND,
            Value::IntArray(_) => tag::INT_ARRAY,
            Value::LongArray(_) => tag::LONG_ARRAY,
        }
    }

    /// Normalize a numeric value to `i64`
    ///
    /// Integers of every width widen losslessly. Floating values convert
    /// only when finite, integral and within `i64` range; anything else
    /// is `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(i64::from(v)),
            Value::Short(v) => Some(i64::from(v)),
            Value::Int(v) => Some(i64::from(v)),
            Value::Long(v) => Some(v),
            Value::Float(v) => exact_i64(f64::from(v)),
            Value::Double(v) => exact_i64(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

// 2^63 as f64; i64::MAX itself is not representable
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn exact_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v) {
        Some(v as i64)
    } else {
        None
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<Compound> for Value {
    fn from(c: Compound) -> Self {
        Value::Compound(c)
    }
}
