//! The dynamically typed values stored in libs.

use std::fmt;

use indexmap::IndexMap;

use crate::error::LibError;

/// An ordered mapping of string keys to [`Value`]s.
///
/// Equality ignores key order.
pub type Dictionary = IndexMap<String, Value>;

/// A property list value.
///
/// This is the tagged union used for all open-ended lib data. Every value
/// a lib can hold maps onto exactly one variant, so unknown keys survive a
/// decode → encode round trip untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<true/>` or `<false/>`.
    Boolean(bool),
    /// `<integer>`, signed or unsigned 64-bit.
    Integer(plist::Integer),
    /// `<real>`.
    Real(f64),
    /// `<string>`.
    String(String),
    /// `<data>`, base64 in XML.
    Data(Vec<u8>),
    /// `<date>`.
    Date(plist::Date),
    /// `<array>`; element order is significant.
    Array(Vec<Value>),
    /// `<dict>`.
    Dictionary(Dictionary),
}

/// The type tag of a [`Value`], used in error messages and key rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A boolean.
    Boolean,
    /// An integer.
    Integer,
    /// A real number.
    Real,
    /// A string.
    String,
    /// A byte blob.
    Data,
    /// A date.
    Date,
    /// An array.
    Array,
    /// A dictionary.
    Dictionary,
}

impl Value {
    /// The type tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::String(_) => ValueKind::String,
            Value::Data(_) => ValueKind::Data,
            Value::Date(_) => ValueKind::Date,
            Value::Array(_) => ValueKind::Array,
            Value::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value if it is an integer that fits in an `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => i.as_signed(),
            _ => None,
        }
    }

    /// Returns the value if it is a non-negative integer.
    pub fn as_unsigned_integer(&self) -> Option<u64> {
        match self {
            Value::Integer(i) => i.as_unsigned(),
            _ => None,
        }
    }

    /// Returns the value as a float if it is a real *or* an integer.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => match i.as_signed() {
                Some(i) => Some(i as f64),
                None => i.as_unsigned().map(|u| u as f64),
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Value::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Converts a parsed plist value, naming `key` in any error.
    pub(crate) fn from_plist(value: plist::Value, key: &str) -> Result<Value, LibError> {
        Ok(match value {
            plist::Value::Boolean(b) => Value::Boolean(b),
            plist::Value::Integer(i) => Value::Integer(i),
            plist::Value::Real(r) => Value::Real(r),
            plist::Value::String(s) => Value::String(s),
            plist::Value::Data(d) => Value::Data(d),
            plist::Value::Date(d) => Value::Date(d),
            plist::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| Value::from_plist(item, &format!("{key}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            plist::Value::Dictionary(dict) => {
                Value::Dictionary(dictionary_from_plist(dict, Some(key))?)
            }
            plist::Value::Uid(_) => {
                return Err(LibError::UnsupportedValue {
                    key: key.into(),
                    reason: "keyed archiver UIDs are not lib data",
                })
            }
            _ => {
                return Err(LibError::UnsupportedValue {
                    key: key.into(),
                    reason: "unknown property list type",
                })
            }
        })
    }

    pub(crate) fn into_plist(self) -> plist::Value {
        match self {
            Value::Boolean(b) => plist::Value::Boolean(b),
            Value::Integer(i) => plist::Value::Integer(i),
            Value::Real(r) => plist::Value::Real(r),
            Value::String(s) => plist::Value::String(s),
            Value::Data(d) => plist::Value::Data(d),
            Value::Date(d) => plist::Value::Date(d),
            Value::Array(items) => {
                plist::Value::Array(items.into_iter().map(Value::into_plist).collect())
            }
            Value::Dictionary(dict) => plist::Value::Dictionary(dictionary_into_plist(dict)),
        }
    }
}

/// Converts every entry of a plist dictionary, prefixing nested keys with `parent`.
pub(crate) fn dictionary_from_plist(
    dict: plist::Dictionary,
    parent: Option<&str>,
) -> Result<Dictionary, LibError> {
    dict.into_iter()
        .map(|(k, v)| {
            let path = match parent {
                Some(parent) => format!("{parent}.{k}"),
                None => k.clone(),
            };
            Value::from_plist(v, &path).map(|v| (k, v))
        })
        .collect()
}

/// Converts a dictionary to a plist dictionary, sorting keys at every level.
pub(crate) fn dictionary_into_plist(mut dict: Dictionary) -> plist::Dictionary {
    dict.sort_keys();
    dict.into_iter().map(|(k, v)| (k, v.into_plist())).collect()
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "a boolean",
            ValueKind::Integer => "an integer",
            ValueKind::Real => "a real",
            ValueKind::String => "a string",
            ValueKind::Data => "data",
            ValueKind::Date => "a date",
            ValueKind::Array => "an array",
            ValueKind::Dictionary => "a dictionary",
        };
        f.write_str(name)
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Boolean(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Value {
        Value::Integer(src.into())
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Value {
        Value::Integer(i64::from(src).into())
    }
}

impl From<u64> for Value {
    fn from(src: u64) -> Value {
        Value::Integer(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::Real(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_owned())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Value {
        Value::Array(src)
    }
}

impl From<Dictionary> for Value {
    fn from(src: Dictionary) -> Value {
        Value::Dictionary(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_name_the_path() {
        let mut inner = plist::Dictionary::new();
        inner.insert("uid".into(), plist::Value::Uid(plist::Uid::new(3)));
        let outer = plist::Value::Array(vec![plist::Value::Dictionary(inner)]);
        let err = Value::from_plist(outer, "com.example.archive").unwrap_err();
        match err {
            LibError::UnsupportedValue { key, .. } => assert_eq!(key, "com.example.archive[0].uid"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn into_plist_sorts_nested_keys() {
        let mut inner = Dictionary::new();
        inner.insert("z".into(), 1.into());
        inner.insert("a".into(), 2.into());
        let mut outer = Dictionary::new();
        outer.insert("nested".into(), inner.into());
        let plist = dictionary_into_plist(outer);
        let nested = plist.get("nested").and_then(plist::Value::as_dictionary).unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["a", "z"]);
    }

    #[test]
    fn unsigned_integers_are_kept() {
        let value = Value::from_plist(plist::Value::Integer(u64::MAX.into()), "big").unwrap();
        assert_eq!(value.as_unsigned_integer(), Some(u64::MAX));
        assert_eq!(value.as_integer(), None);
        assert_eq!(value.into_plist(), plist::Value::Integer(u64::MAX.into()));
        assert_eq!(Value::from(-1).as_unsigned_integer(), None);
    }

    #[test]
    fn numbers_widen() {
        assert_eq!(Value::from(3).as_number(), Some(3.0));
        assert_eq!(Value::Real(0.5).as_number(), Some(0.5));
        assert_eq!(Value::from("3").as_number(), None);
    }
}
