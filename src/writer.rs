//! Writing a UFO package.

use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::filenames;
use crate::font::{
    MetaInfo, DEFAULT_GLYPHS_DIRNAME, DEFAULT_LAYER_NAME, FEATURES_FILE, FONTINFO_FILE, GROUPS_FILE,
    KERNING_FILE, LAYER_CONTENTS_FILE, LIB_FILE, METAINFO_FILE,
};
use crate::fontinfo::FontInfo;
use crate::glyph_set::GlyphSet;
use crate::value::{dictionary_into_plist, Dictionary};
use crate::write::{self, WriteOptions};
use crate::{Lib, Name, PlistFormat};

/// A write session on a UFO package, always in format 3.
///
/// Files are written as each method is called; an existing package is
/// replaced file by file. Glyph set manifests and `layercontents.plist` are
/// written by [`UfoWriter::finish`], along with an empty `fontinfo.plist`
/// if [`UfoWriter::write_info`] was never called.
///
/// ```no_run
/// # fn main() -> Result<(), ufokit::Error> {
/// use ufokit::{Glyph, PointPen, PointType, UfoWriter};
///
/// let mut writer = UfoWriter::open("New.ufo")?;
/// let glyph = Glyph::try_new(".notdef")?;
/// writer.glyph_set()?.write_glyph(&glyph, |pen| {
///     pen.begin_path(None)?;
///     pen.add_point((0.0, 0.0), PointType::Move, false, None, None)?;
///     pen.add_point((500.0, 0.0), PointType::Line, false, None, None)?;
///     pen.end_path()
/// })?;
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UfoWriter {
    path: PathBuf,
    options: WriteOptions,
    /// (layer name, directory name); the default layer is first.
    layers: Vec<(Name, String)>,
    // lowercased directory names, for case-insensitive collision checks
    dirs: HashSet<String>,
    glyph_sets: HashMap<Name, GlyphSet>,
    wrote_info: bool,
}

impl UfoWriter {
    /// Opens a write session at `path`, with default [`WriteOptions`].
    pub fn open(path: impl AsRef<Path>) -> Result<UfoWriter, Error> {
        UfoWriter::open_with_options(path, WriteOptions::default())
    }

    /// Opens a write session at `path`.
    ///
    /// Creates the directory if needed and writes `metainfo.plist`.
    pub fn open_with_options(path: impl AsRef<Path>, options: WriteOptions) -> Result<UfoWriter, Error> {
        let path = path.as_ref();
        if path.exists() && !path.is_dir() {
            return Err(Error::NotDirectory(path.to_owned()));
        }
        fs::create_dir_all(path).map_err(Error::io(path))?;
        write::write_xml(&path.join(METAINFO_FILE), &MetaInfo::default(), &options)?;

        Ok(UfoWriter {
            path: path.to_owned(),
            options,
            layers: vec![(Name::new_raw(DEFAULT_LAYER_NAME), DEFAULT_GLYPHS_DIRNAME.to_string())],
            dirs: HashSet::from([DEFAULT_GLYPHS_DIRNAME.to_string()]),
            glyph_sets: HashMap::new(),
            wrote_info: false,
        })
    }

    /// The package directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and writes `fontinfo.plist`.
    pub fn write_info(&mut self, info: &FontInfo) -> Result<(), Error> {
        info.validate()?;
        write::write_xml(&self.path.join(FONTINFO_FILE), info, &self.options)?;
        self.wrote_info = true;
        Ok(())
    }

    /// Writes `lib.plist` in the given format.
    pub fn write_lib(&mut self, lib: &Lib, format: PlistFormat) -> Result<(), Error> {
        let bytes = lib.encode_with_options(format, &self.options).map_err(Error::LibEncode)?;
        write::write_bytes(&self.path.join(LIB_FILE), &bytes)
    }

    pub fn write_groups(&mut self, groups: &Dictionary) -> Result<(), Error> {
        self.write_dictionary(GROUPS_FILE, groups)
    }

    pub fn write_kerning(&mut self, kerning: &Dictionary) -> Result<(), Error> {
        self.write_dictionary(KERNING_FILE, kerning)
    }

    /// Writes `features.fea`, with line endings normalized to `\n`.
    pub fn write_features(&mut self, features: &str) -> Result<(), Error> {
        let features = features.replace("\r\n", "\n");
        write::write_bytes(&self.path.join(FEATURES_FILE), features.as_bytes())
    }

    fn write_dictionary(&self, file: &str, dict: &Dictionary) -> Result<(), Error> {
        let value = plist::Value::Dictionary(dictionary_into_plist(dict.clone()));
        write::write_plist_value(&self.path.join(file), &value, &self.options)
    }

    /// Renames the default layer; its directory stays `glyphs`.
    ///
    /// Fails with [`Error::DuplicateLayer`] if another layer has the name.
    pub fn rename_default_layer(&mut self, name: &str) -> Result<(), Error> {
        let name = Name::new(name)?;
        if self.layers.iter().skip(1).any(|(existing, _)| *existing == name) {
            return Err(Error::DuplicateLayer(name.to_string()));
        }
        let old = std::mem::replace(&mut self.layers[0].0, name.clone());
        if let Some(mut glyph_set) = self.glyph_sets.remove(&old) {
            glyph_set.set_layer_name(name.clone());
            self.glyph_sets.insert(name, glyph_set);
        }
        Ok(())
    }

    /// The glyph set of the default layer.
    pub fn glyph_set(&mut self) -> Result<&mut GlyphSet, Error> {
        let name = self.layers[0].0.clone();
        self.glyph_set_named(&name)
    }

    /// The glyph set of `layer`, creating the layer on first use.
    ///
    /// New layers get a directory named after the layer, and are listed in
    /// `layercontents.plist` in creation order.
    pub fn glyph_set_named(&mut self, layer: &str) -> Result<&mut GlyphSet, Error> {
        let (name, dir) = match self.layers.iter().find(|(name, _)| name == layer) {
            Some(entry) => entry.clone(),
            None => {
                let name = Name::new(layer)?;
                let dir = filenames::layer_dir_name(layer, &self.dirs);
                self.dirs.insert(dir.to_lowercase());
                self.layers.push((name.clone(), dir.clone()));
                log::debug!("new layer '{layer}' in '{dir}'");
                (name, dir)
            }
        };
        match self.glyph_sets.entry(name) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let glyph_set = GlyphSet::create(&self.path.join(dir), entry.key().clone(), self.options.clone())?;
                Ok(entry.insert(glyph_set))
            }
        }
    }

    /// Writes `layercontents.plist`.
    pub fn write_layer_contents(&self) -> Result<(), Error> {
        let contents: Vec<(&str, &str)> =
            self.layers.iter().map(|(name, dir)| (name.as_str(), dir.as_str())).collect();
        write::write_xml(&self.path.join(LAYER_CONTENTS_FILE), &contents, &self.options)
    }

    /// Writes every glyph set manifest and `layercontents.plist`, ending the session.
    ///
    /// The default layer's directory and `fontinfo.plist` are written even
    /// if nothing was put in them, since readers require both.
    pub fn finish(mut self) -> Result<(), Error> {
        if !self.wrote_info {
            self.write_info(&FontInfo::default())?;
        }
        self.glyph_set()?;
        for (name, _) in &self.layers {
            if let Some(glyph_set) = self.glyph_sets.get(name) {
                glyph_set.write_contents()?;
            }
        }
        self.write_layer_contents()
    }
}
