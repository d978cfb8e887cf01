//! Validated string names: glyph and layer [`Name`]s.

use std::sync::Arc;

use crate::error::NamingError;

/// Implements the string-like traits shared by validated name types.
///
/// The type must be a newtype over `Arc<str>` implementing `Validated`;
/// `$error` builds an `$error_ty` from the rejected string.
macro_rules! str_newtype {
    ($name:ident, $error_ty:ty, $error:expr) => {
        impl $name {
            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                &*self.0 == other
            }
        }

        impl<'a> PartialEq<&'a str> for $name {
            fn eq(&self, other: &&'a str) -> bool {
                &*self.0 == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == &*other.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = <$name as TryFrom<String>>::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::try_from(s.to_string())
            }
        }

        impl TryFrom<String> for $name {
            type Error = $error_ty;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if <$name as crate::name::Validated>::is_valid(&value) {
                    Ok($name(value.into()))
                } else {
                    Err($error(value))
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                $name::try_from(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use str_newtype;

/// The validation rule of a name type.
pub(crate) trait Validated {
    fn is_valid(s: &str) -> bool;
}

/// A name used to identify a glyph or a layer.
///
/// Names must be at least one character long, and cannot contain control
/// characters (`0x00..=0x1F`, `0x7F`, and `0x80..=0x9F`).
///
/// Cloning is a pointer copy; a `Name` always derefs to `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Validated for Name {
    fn is_valid(name: &str) -> bool {
        !name.is_empty()
            && !name.chars().any(|c| {
                let c = c as u32;
                c <= 0x1f || (0x7f..=0x9f).contains(&c)
            })
    }
}

str_newtype!(Name, NamingError, NamingError::Invalid);

impl Name {
    /// Creates a new `Name` if the given value isn't empty and contains no control characters.
    pub fn new(name: &str) -> Result<Name, NamingError> {
        Name::try_from(name.to_string())
    }

    /// Creates a `Name` from a string known at compile time.
    pub(crate) fn new_raw(name: &str) -> Name {
        assert!(Name::is_valid(name), "invalid static name '{name}'");
        Name(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_with_str() {
        assert_eq!(Name::new_raw(".notdef"), ".notdef");
        assert_eq!("A.alt", Name::new_raw("A.alt"));
        assert_eq!(vec![Name::new_raw("a"), Name::new_raw("b")], vec!["a", "b"]);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(Name::new("").is_err());
        assert!(Name::new("a\u{7}b").is_err());
        assert!(Name::new("tab\there").is_err());
        assert!(Name::new("\u{85}").is_err());
        assert!(Name::new("hi 💖").is_ok());
        assert!("sketch".parse::<Name>().is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let name: Name = plist::from_value(&plist::Value::String("A".into())).unwrap();
        assert_eq!(name, "A");
        assert!(plist::from_value::<Name>(&plist::Value::String(String::new())).is_err());
    }
}
