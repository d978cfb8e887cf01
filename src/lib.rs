//! Reading and writing [Unified Font Object][ufo] packages, with outlines
//! streamed through point pens.
//!
//! [ufo]: http://unifiedfontobject.org/versions/ufo3
//!
//! # Basic usage:
//!
//! ```no_run
//! use ufokit::{RecordingPointPen, UfoReader};
//!
//! let mut reader = UfoReader::open("RoflsSansLight.ufo").expect("failed to open font");
//! let glyphs = reader.glyph_set().expect("missing default layer");
//! let mut pen = RecordingPointPen::new();
//! let glyph_a = glyphs.read_glyph("A", &mut pen).expect("missing glyph");
//! assert_eq!(glyph_a.name.as_str(), "A");
//! ```
//!
//! [`Font`] loads a whole package into memory on top of the same pieces.

#![deny(rustdoc::broken_intra_doc_links)]

mod color;
pub mod error;
mod filenames;
mod font;
pub mod fontinfo;
pub mod glif;
mod glyph;
mod glyph_set;
mod guideline;
mod identifier;
mod lib_plist;
mod migration;
mod name;
pub mod pen;
mod reader;
mod value;
mod write;
mod writer;

pub use color::{Color, InvalidColorString};
pub use error::{Error, FormatError, LibError, NamingError};
pub use font::{Font, FormatVersion, GlyphRecord, Layer, MetaInfo};
pub use fontinfo::FontInfo;
pub use glif::{GlifLoadError, GlifWriteError};
pub use glyph::{Anchor, Codepoints, GlifVersion, Glyph, Image};
pub use glyph_set::GlyphSet;
pub use guideline::{Guideline, InvalidGuideline, Line};
pub use identifier::{Identifier, InvalidIdentifier};
pub use lib_plist::{Lib, PlistFormat};
pub use name::Name;
#[cfg(feature = "kurbo")]
pub use pen::BezPathPen;
pub use pen::{
    AffineTransform, InvalidPointType, PenCall, PenError, PointPen, PointType, RecordingPointPen, TransformPointPen,
    ValidatingPointPen,
};
pub use reader::UfoReader;
pub use value::{Dictionary, Value, ValueKind};
pub use write::{QuoteChar, WriteOptions};
pub use writer::UfoWriter;
