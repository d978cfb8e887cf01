//! Reading and writing `.glif` files through point pens.
//!
//! [`read_glyph`] streams the outline of a glif file into a caller-supplied
//! [`PointPen`] and returns the rest of the glyph data. [`write_glyph`] does
//! the reverse: the caller draws into a pen, and the calls are serialized.
//!
//! Format 1 and 2 files can be read; files are always written as format 2.

mod parse;
mod serialize;

use std::num::ParseFloatError;

use crate::error::{LibError, NamingError};
use crate::guideline::InvalidGuideline;
use crate::pen::{PenError, PointPen};
use crate::write::WriteOptions;
use crate::Glyph;

/// Parses glif `xml`, streaming the outline into `pen`.
///
/// Each contour produces a `begin_path`, one `add_point` per point and an
/// `end_path`; each component produces an `add_component`. Calls are made in
/// file order, and only once the whole file has parsed and every contour
/// has been checked: on error, `pen` receives no calls at all.
///
/// In format 1 files, a contour made of a single named `move` point is an
/// anchor: it is returned in [`Glyph::anchors`] and not drawn.
pub fn read_glyph(xml: &[u8], pen: &mut dyn PointPen) -> Result<Glyph, GlifLoadError> {
    parse::GlifParser::from_xml(xml, pen)
}

/// Serializes `glyph` as format 2 glif XML, with the outline drawn by `draw`.
///
/// The calls made by `draw` are checked like those of a parsed file, so
/// the output can always be read back.
pub fn write_glyph<F>(glyph: &Glyph, draw: F) -> Result<Vec<u8>, GlifWriteError>
where
    F: FnOnce(&mut dyn PointPen) -> Result<(), PenError>,
{
    write_glyph_with_options(glyph, &WriteOptions::default(), draw)
}

/// Like [`write_glyph`], with custom indentation and quoting.
pub fn write_glyph_with_options<F>(
    glyph: &Glyph,
    options: &WriteOptions,
    draw: F,
) -> Result<Vec<u8>, GlifWriteError>
where
    F: FnOnce(&mut dyn PointPen) -> Result<(), PenError>,
{
    serialize::encode(glyph, options, draw)
}

/// An error that occurs while attempting to read a .glif file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GlifLoadError {
    #[error("failed to parse hexadecimal Unicode code point value '{0}'")]
    BadUnicodeValue(String),
    #[error("a 'component' element has an empty 'base' attribute")]
    ComponentEmptyBase,
    #[error("a 'component' element is missing a 'base' attribute")]
    ComponentMissingBase,
    /// The pen rejected the outline.
    #[error("failed to draw glyph")]
    Pen(#[source] PenError),
    #[error("there must be only one '{0}' element")]
    DuplicateElement(&'static str),
    #[error("duplicate identifier '{0}'")]
    DuplicateIdentifier(String),
    #[error("the 'image' element is missing a 'fileName' attribute")]
    ImageMissingFilename,
    #[error("invalid advance '{0}'")]
    InvalidAdvance(String, #[source] ParseFloatError),
    #[error("an anchor needs at least an 'x' and 'y' attribute")]
    InvalidAnchor,
    #[error("failed to parse angle '{0}'")]
    InvalidAngle(String, #[source] ParseFloatError),
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    #[error("failed to parse transformation value '{0}'")]
    InvalidTransformation(String, #[source] ParseFloatError),
    #[error("failed to parse coordinate '{0}'")]
    InvalidCoordinate(String, #[source] ParseFloatError),
    #[error("invalid guideline")]
    InvalidGuideline(#[source] InvalidGuideline),
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    /// The glyph name is empty or contains control characters.
    #[error("invalid glyph name")]
    InvalidName(#[source] NamingError),
    #[error("a point needs at least an 'x' and 'y' attribute")]
    InvalidPoint,
    /// The `<lib>` element is not a valid glyph lib.
    #[error("invalid glyph lib")]
    Lib(#[source] LibError),
    #[error("missing the closing tag for element '{0}'")]
    MissingCloseTag(&'static str),
    #[error("unexpected '{0}' element attribute '{1}'")]
    UnexpectedAttribute(&'static str, String),
    #[error("unrecognized element '{1}' inside '{0}' parent element")]
    UnexpectedElement(&'static str, String),
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("format 1 does not support attributes for element '{0}'")]
    UnexpectedV1Attributes(&'static str),
    #[error("format 1 does not support the '{0}' element")]
    UnexpectedV1Element(&'static str),
    #[error("format 1 does not support identifiers")]
    UnexpectedV1Identifier,
    #[error("unrecognized point type '{0}'")]
    UnknownPointType(String),
    #[error("unsupported glif format version '{0}'")]
    UnsupportedGlifVersion(String),
    #[error("the first element must be a 'glyph' with at least a 'name' and 'format' attribute")]
    WrongFirstElement,
    /// Attribute values must be UTF-8.
    #[error("attribute value is not valid UTF-8")]
    Utf8(#[source] std::str::Utf8Error),
    #[error("failed to unescape attribute value")]
    Escape(#[source] quick_xml::escape::EscapeError),
    #[error("malformed attribute")]
    Attr(#[source] quick_xml::events::attributes::AttrError),
    /// A [`quick_xml::Error`].
    #[error("failed to read or parse XML structure")]
    Xml(#[source] quick_xml::Error),
}

/// An error that occurs while attempting to write a .glif file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GlifWriteError {
    /// The drawing callback, or the checks on its calls, failed.
    #[error("invalid outline")]
    Pen(#[from] PenError),
    /// A contour, point, component, anchor or guideline has an invalid identifier.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("duplicate identifier '{0}'")]
    DuplicateIdentifier(String),
    /// A guideline angle outside of `0..=360`.
    #[error("invalid guideline")]
    InvalidGuideline(#[source] InvalidGuideline),
    /// XML serialization error.
    #[error("failed to write XML")]
    Xml(#[from] quick_xml::Error),
    /// Generic write error.
    #[error("failed to write XML")]
    Io(#[from] std::io::Error),
}
