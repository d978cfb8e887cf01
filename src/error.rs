//! Error types.

use std::io::Error as IoError;
use std::path::{Path, PathBuf};

use crate::glif::{GlifLoadError, GlifWriteError};
use crate::value::ValueKind;
use crate::Name;

/// Errors that occur while reading or writing a UFO package.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The path is not an existing UFO package directory.
    #[error("'{}' is not a UFO package directory", .0.display())]
    NotDirectory(PathBuf),
    /// A property list, glif file or manifest is structurally malformed.
    #[error("'{}' is malformed", .path.display())]
    Format {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        source: FormatError,
    },
    /// The requested glyph is not listed in the layer's `contents.plist`.
    #[error("glyph '{glyph}' not found in layer '{layer}'")]
    NotFound {
        /// The layer that was searched.
        layer: Name,
        /// The missing glyph name.
        glyph: String,
    },
    /// The underlying filesystem operation failed.
    #[error("failed to access '{}'", .path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying error.
        source: IoError,
    },
    /// A glyph could not be serialized.
    #[error("failed to write glyph '{name}'")]
    GlifWrite {
        /// The glyph being written.
        name: Name,
        /// The underlying error.
        source: GlifWriteError,
    },
    /// A font info value failed validation before writing.
    #[error("invalid font info: {0}")]
    InvalidFontInfo(String),
    /// A lib could not be encoded.
    #[error("failed to encode lib data")]
    LibEncode(#[source] LibError),
    /// A glyph or layer name is not valid.
    #[error(transparent)]
    InvalidName(#[from] NamingError),
    /// Tried to create a layer that already exists.
    #[error("layer '{0}' already exists")]
    DuplicateLayer(String),
    /// Tried to use a layer that does not exist.
    #[error("layer '{0}' does not exist")]
    MissingLayer(String),
    /// Tried to rename a glyph onto a name that is already taken.
    #[error("glyph '{glyph}' already exists in layer '{layer}'")]
    DuplicateGlyph {
        /// The layer name.
        layer: Name,
        /// The glyph name.
        glyph: String,
    },
}

/// The reason a file was rejected as malformed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    /// A required file does not exist.
    #[error("required file is missing")]
    MissingFile,
    /// The file is not a readable property list, or does not match its schema.
    #[error("failed to parse property list")]
    Plist(#[source] plist::Error),
    /// The file holds invalid lib data.
    #[error("invalid lib data")]
    Lib(#[source] LibError),
    /// The file holds invalid glif data.
    #[error("invalid glif data")]
    Glif(#[source] GlifLoadError),
    /// The file parsed, but its contents break a structural rule.
    #[error("{0}")]
    Invalid(String),
}

/// An error that occurs while decoding or encoding a property bag.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LibError {
    /// The bytes are not a valid XML or binary property list.
    #[error("failed to parse property list data")]
    Parse(#[source] plist::Error),
    /// The property list could not be serialized.
    #[error("failed to serialize property list data")]
    Write(#[source] plist::Error),
    /// The top-level value is not a dictionary.
    #[error("the lib must be a dictionary")]
    NotADictionary,
    /// A known key holds a value of the wrong type, and no compatibility rule applies.
    #[error("key '{key}' must hold {expected}, found {found}")]
    TypeMismatch {
        /// The offending key, with a path for nested values.
        key: String,
        /// A description of the expected shape.
        expected: String,
        /// The kind of value found.
        found: ValueKind,
    },
    /// A value has a type that cannot be represented.
    #[error("key '{key}' holds an unsupported value: {reason}")]
    UnsupportedValue {
        /// The offending key.
        key: String,
        /// Why the value is unsupported.
        reason: &'static str,
    },
}

/// An error that occurs when an invalid name is given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// The name is empty or contains control characters.
    #[error("'{0}' is not a valid glyph or layer name")]
    Invalid(String),
}

impl Error {
    pub(crate) fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Error::Format { path: path.into(), source }
    }

    pub(crate) fn missing_file(path: impl Into<PathBuf>) -> Self {
        Error::format(path, FormatError::MissingFile)
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::format(path, FormatError::Invalid(reason.into()))
    }

    /// Returns a closure wrapping an [`IoError`] with the given path, for `map_err`.
    pub(crate) fn io(path: &Path) -> impl FnOnce(IoError) -> Error + '_ {
        move |source| Error::Io { path: path.to_owned(), source }
    }
}
