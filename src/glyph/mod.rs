//! Glyph metadata carried alongside a streamed outline.

mod codepoints;

pub use codepoints::Codepoints;

use crate::pen::AffineTransform;
use crate::{Color, Guideline, Identifier, Lib, Name};

/// The non-outline data of a glyph, read from or written to a [`.glif` file][glif].
///
/// The outline itself is never stored here: it is streamed through a
/// [`PointPen`](crate::PointPen) when reading and writing.
///
/// [glif]: http://unifiedfontobject.org/versions/ufo3/glyphs/glif/
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// The name of the glyph.
    pub name: Name,
    /// The glif format the glyph was read from. Glyphs are always written as format 2.
    pub format: GlifVersion,
    /// Advance width.
    pub width: Option<f64>,
    /// Advance height.
    pub height: Option<f64>,
    /// Unicode code points; the first is the primary value.
    pub codepoints: Codepoints,
    /// Arbitrary glyph note.
    pub note: Option<String>,
    pub anchors: Vec<Anchor>,
    pub guidelines: Vec<Guideline>,
    /// A background image reference.
    pub image: Option<Image>,
    /// Glyph library data; not written when empty.
    pub lib: Lib,
}

/// A version of the glif file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GlifVersion {
    /// Glif file format version 1. Saving this version is not supported.
    V1 = 1,
    /// Glif file format version 2.
    V2 = 2,
}

/// An anchor point, used to attach marks.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    /// An arbitrary name for the anchor.
    pub name: Option<String>,
    pub color: Option<Color>,
    /// Unique identifier for the anchor within the glyph.
    pub identifier: Option<Identifier>,
}

/// A reference to a background image in the package's `images` directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Not a path, but the name of the image file.
    pub file_name: String,
    pub color: Option<Color>,
    pub transform: AffineTransform,
}

impl Glyph {
    /// Returns a new, empty glyph.
    pub fn new(name: Name) -> Self {
        Glyph {
            name,
            format: GlifVersion::V2,
            width: None,
            height: None,
            codepoints: Codepoints::default(),
            note: None,
            anchors: Vec::new(),
            guidelines: Vec::new(),
            image: None,
            lib: Lib::new(),
        }
    }

    /// Returns a new, empty glyph, validating `name`.
    pub fn try_new(name: &str) -> Result<Self, crate::error::NamingError> {
        Name::new(name).map(Glyph::new)
    }
}

impl Anchor {
    pub fn new(x: f64, y: f64, name: Option<String>) -> Self {
        Anchor { x, y, name, color: None, identifier: None }
    }
}

impl GlifVersion {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            GlifVersion::V1 => "1",
            GlifVersion::V2 => "2",
        }
    }
}
