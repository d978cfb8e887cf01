//! A whole font held in memory, built on the package reader and writer.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::fontinfo::FontInfo;
use crate::pen::RecordingPointPen;
use crate::reader::UfoReader;
use crate::value::Dictionary;
use crate::write::WriteOptions;
use crate::writer::UfoWriter;
use crate::{Color, Error, Glyph, Lib, Name, PlistFormat};

pub(crate) static METAINFO_FILE: &str = "metainfo.plist";
pub(crate) static FONTINFO_FILE: &str = "fontinfo.plist";
pub(crate) static LIB_FILE: &str = "lib.plist";
pub(crate) static GROUPS_FILE: &str = "groups.plist";
pub(crate) static KERNING_FILE: &str = "kerning.plist";
pub(crate) static FEATURES_FILE: &str = "features.fea";
pub(crate) static LAYER_CONTENTS_FILE: &str = "layercontents.plist";
pub(crate) static DEFAULT_LAYER_NAME: &str = "public.default";
pub(crate) static DEFAULT_GLYPHS_DIRNAME: &str = "glyphs";
static DEFAULT_METAINFO_CREATOR: &str = "org.linebender.ufokit";

/// A version of the [UFO spec].
///
/// [UFO spec]: http://unifiedfontobject.org
#[derive(Debug, Clone, Copy, Serialize_repr, Deserialize_repr, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum FormatVersion {
    /// UFO specification major version 1. Only reading is supported.
    V1 = 1,
    /// UFO specification major version 2. Only reading is supported.
    V2 = 2,
    /// UFO specification major version 3.
    V3 = 3,
}

/// The contents of the [`metainfo.plist`] file.
///
/// [`metainfo.plist`]: http://unifiedfontobject.org/versions/ufo3/metainfo.plist/
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetaInfo {
    /// The application or library that wrote the package.
    pub creator: Option<String>,
    /// Major format version.
    pub format_version: FormatVersion,
    /// Minor format version.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub format_version_minor: u32,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl Default for MetaInfo {
    fn default() -> Self {
        MetaInfo {
            creator: Some(DEFAULT_METAINFO_CREATOR.to_string()),
            format_version: FormatVersion::V3,
            format_version_minor: 0,
        }
    }
}

/// A Unified Font Object, fully loaded.
///
/// Outlines are kept as recorded pen calls, so they can be replayed into any
/// [`PointPen`](crate::PointPen).
///
/// ```no_run
/// use ufokit::Font;
///
/// let font = Font::open("path/to/font.ufo").expect("failed to load");
/// font.save("path/to/copy.ufo").expect("failed to save");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    /// `metainfo.plist`, as read.
    pub meta: MetaInfo,
    pub font_info: FontInfo,
    pub lib: Lib,
    /// `groups.plist`, uninterpreted.
    pub groups: Dictionary,
    /// `kerning.plist`, uninterpreted.
    pub kerning: Dictionary,
    pub features: String,
    /// The layers; the first is the default layer.
    pub layers: Vec<Layer>,
}

/// One layer of a [`Font`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: Name,
    pub color: Option<Color>,
    pub lib: Lib,
    glyphs: IndexMap<Name, GlyphRecord>,
}

/// A glyph together with its recorded outline.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRecord {
    pub glyph: Glyph,
    pub outline: RecordingPointPen,
}

impl Font {
    /// Returns a new font with an empty default layer.
    pub fn new() -> Self {
        Font { layers: vec![Layer::new(Name::new_raw(DEFAULT_LAYER_NAME))], ..Default::default() }
    }

    /// Reads the package at `path`, with every glyph of every layer.
    pub fn open(path: impl AsRef<Path>) -> Result<Font, Error> {
        let mut reader = UfoReader::open(path)?;
        let mut font = Font {
            meta: reader.read_meta().clone(),
            font_info: reader.read_info().clone(),
            lib: reader.read_lib()?,
            groups: reader.read_groups()?,
            kerning: reader.read_kerning()?,
            features: reader.read_features()?,
            layers: Vec::new(),
        };

        let default_layer = reader.default_layer_name().clone();
        let names: Vec<Name> = reader.layer_names().cloned().collect();
        for name in names {
            let glyph_set = reader.glyph_set_named(&name)?;
            let mut layer = Layer::new(name.clone());
            layer.color = glyph_set.color().cloned();
            layer.lib = glyph_set.lib().clone();
            for glyph_name in glyph_set.glyph_names() {
                let mut outline = RecordingPointPen::new();
                let glyph = glyph_set.read_glyph(&glyph_name, &mut outline)?;
                layer.glyphs.insert(glyph_name, GlyphRecord { glyph, outline });
            }
            if name == default_layer {
                font.layers.insert(0, layer);
            } else {
                font.layers.push(layer);
            }
        }
        log::debug!("loaded {} layers", font.layers.len());
        Ok(font)
    }

    /// Writes the font as a format 3 package at `path`.
    ///
    /// Files are replaced one by one; files of an existing package that the
    /// font does not write are left in place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.save_with_options(path, &WriteOptions::default())
    }

    /// Like [`Font::save`], with custom indentation and quoting.
    pub fn save_with_options(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<(), Error> {
        let mut writer = UfoWriter::open_with_options(path, options.clone())?;
        writer.write_info(&self.font_info)?;
        if !self.lib.is_empty() {
            writer.write_lib(&self.lib, PlistFormat::Xml)?;
        }
        if !self.groups.is_empty() {
            writer.write_groups(&self.groups)?;
        }
        if !self.kerning.is_empty() {
            writer.write_kerning(&self.kerning)?;
        }
        if !self.features.is_empty() {
            writer.write_features(&self.features)?;
        }

        for (i, layer) in self.layers.iter().enumerate() {
            let glyph_set = if i == 0 {
                writer.rename_default_layer(&layer.name)?;
                writer.glyph_set()?
            } else {
                writer.glyph_set_named(&layer.name)?
            };
            glyph_set.set_color(layer.color.clone());
            *glyph_set.lib_mut() = layer.lib.clone();
            for record in layer.glyphs.values() {
                glyph_set.write_glyph(&record.glyph, |pen| record.outline.replay(pen))?;
            }
        }
        writer.finish()
    }

    /// The default layer, if the font has any layers.
    pub fn default_layer(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn default_layer_mut(&mut self) -> Option<&mut Layer> {
        self.layers.first_mut()
    }

    /// Returns the layer with this name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}

impl Layer {
    pub fn new(name: Name) -> Self {
        Layer { name, color: None, lib: Lib::new(), glyphs: IndexMap::new() }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&GlyphRecord> {
        self.glyphs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut GlyphRecord> {
        self.glyphs.get_mut(name)
    }

    /// Adds or replaces a glyph, keyed by its name.
    pub fn insert(&mut self, glyph: Glyph, outline: RecordingPointPen) -> Option<GlyphRecord> {
        self.glyphs.insert(glyph.name.clone(), GlyphRecord { glyph, outline })
    }

    pub fn remove(&mut self, name: &str) -> Option<GlyphRecord> {
        self.glyphs.shift_remove(name)
    }

    /// Glyph names, in read or insertion order.
    pub fn glyph_names(&self) -> impl Iterator<Item = &Name> {
        self.glyphs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphRecord> {
        self.glyphs.values()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pen::{PointPen, PointType};
    use crate::Value;

    fn sample_font() -> Font {
        let mut font = Font::new();
        font.font_info.family_name = Some("Sample".into());
        font.lib.insert("public.glyphOrder", vec![Value::from("b"), Value::from("a")]);
        font.groups.insert("public.kern1.A".into(), vec![Value::from("A")].into());
        font.features = "feature liga {\r\n} liga;\r\n".into();

        let layer = font.default_layer_mut().unwrap();
        for name in ["a", "b"] {
            let mut outline = RecordingPointPen::new();
            outline.begin_path(None).unwrap();
            outline.add_point((0.0, 0.0), PointType::Move, false, None, None).unwrap();
            outline.add_point((10.0, 0.0), PointType::Line, false, None, None).unwrap();
            outline.end_path().unwrap();
            layer.insert(Glyph::try_new(name).unwrap(), outline);
        }

        let mut background = Layer::new(Name::new_raw("background"));
        background.color = Some("0,0,1,1".parse().unwrap());
        background.insert(Glyph::try_new("a").unwrap(), RecordingPointPen::new());
        font.layers.push(background);
        font
    }

    #[test]
    fn save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sample.ufo");
        let font = sample_font();
        font.save(&path).unwrap();

        let loaded = Font::open(&path).unwrap();
        assert_eq!(loaded.meta, MetaInfo::default());
        assert_eq!(loaded.font_info, font.font_info);
        assert_eq!(loaded.lib, font.lib);
        assert_eq!(loaded.groups, font.groups);
        assert_eq!(loaded.features, "feature liga {\n} liga;\n");
        assert_eq!(loaded.layers.len(), 2);

        let default = loaded.default_layer().unwrap();
        assert_eq!(default.name, DEFAULT_LAYER_NAME);
        // glyph order from the lib
        assert_eq!(default.glyph_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(default.get("a"), font.default_layer().unwrap().get("a"));

        let background = loaded.layer("background").unwrap();
        assert_eq!(background.color, Some("0,0,1,1".parse().unwrap()));
        assert!(background.get("a").unwrap().outline.is_empty());
        assert!(path.join("glyphs.background").join("a.glif").exists());
    }

    #[test]
    fn custom_default_layer_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Named.ufo");
        let mut font = Font::new();
        font.layers[0].name = Name::new_raw("foreground");
        font.save(&path).unwrap();

        let loaded = Font::open(&path).unwrap();
        assert_eq!(loaded.layers[0].name, "foreground");
        assert!(path.join("glyphs").join("contents.plist").exists());
    }
}
