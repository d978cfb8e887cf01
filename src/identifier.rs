use std::sync::Arc;

use crate::name::{str_newtype, Validated};

/// A [UFO Object Identifier][identifier].
///
/// Identifiers are optional attributes of contours, points, components,
/// anchors and guidelines. They are between one and 100 characters long,
/// and every character is in the printable ASCII range, 0x20 to 0x7E.
///
/// [identifier]: https://unifiedfontobject.org/versions/ufo3/conventions/#identifiers
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Identifier(Arc<str>);

/// The error returned for a malformed identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{0}'")]
pub struct InvalidIdentifier(pub String);

impl Validated for Identifier {
    fn is_valid(s: &str) -> bool {
        (1..=100).contains(&s.len()) && s.bytes().all(|b| (0x20..=0x7E).contains(&b))
    }
}

str_newtype!(Identifier, InvalidIdentifier, InvalidIdentifier);

impl Identifier {
    pub fn new(s: &str) -> Result<Self, InvalidIdentifier> {
        Identifier::try_from(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_parsing() {
        let printable: String = (0x20u8..=0x7E).map(char::from).collect();
        assert!(Identifier::new(&printable).is_ok());
        assert!(Identifier::new("0aAä").is_err());
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new(&"a".repeat(100)).is_ok());
        assert!(matches!(Identifier::new(&"a".repeat(101)), Err(InvalidIdentifier(s)) if s.len() == 101));
    }
}
