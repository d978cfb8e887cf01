//! A single glyph directory: `contents.plist`, `layerinfo.plist` and the glif files.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::{Error, FormatError};
use crate::filenames;
use crate::glif;
use crate::pen::{PenError, PointPen, RecordingPointPen};
use crate::value::dictionary_from_plist;
use crate::write::{self, WriteOptions};
use crate::{Color, Glyph, Lib, Name};

pub(crate) static CONTENTS_FILE: &str = "contents.plist";
static LAYER_INFO_FILE: &str = "layerinfo.plist";

/// The glyphs of one layer, stored in one directory.
///
/// A `GlyphSet` maps glyph names to file names. Glyphs are read on demand
/// and streamed through a [`PointPen`]; writes go to disk immediately, but
/// the name mapping is only persisted by [`GlyphSet::write_contents`].
#[derive(Debug)]
pub struct GlyphSet {
    layer: Name,
    dir: PathBuf,
    contents: IndexMap<Name, String>,
    // lowercased file names, for case-insensitive collision checks
    existing: HashSet<String>,
    glyph_order: Vec<Name>,
    color: Option<Color>,
    lib: Lib,
    options: WriteOptions,
}

impl GlyphSet {
    /// Opens the glyph directory at `dir`, belonging to the layer `layer`.
    ///
    /// Fails with [`Error::Format`] if `contents.plist` is missing or malformed.
    pub fn open(dir: impl AsRef<Path>, layer: Name) -> Result<GlyphSet, Error> {
        let dir = dir.as_ref();
        let contents = read_contents(&dir.join(CONTENTS_FILE))?;
        let existing = contents.values().map(|file| file.to_lowercase()).collect();
        let mut glyph_set = GlyphSet {
            layer,
            dir: dir.to_owned(),
            contents,
            existing,
            glyph_order: Vec::new(),
            color: None,
            lib: Lib::new(),
            options: WriteOptions::default(),
        };

        let layerinfo_path = dir.join(LAYER_INFO_FILE);
        if layerinfo_path.exists() {
            glyph_set.read_layerinfo(&layerinfo_path)?;
        }
        Ok(glyph_set)
    }

    /// Creates an empty glyph set, creating `dir` if needed.
    pub(crate) fn create(dir: &Path, layer: Name, options: WriteOptions) -> Result<GlyphSet, Error> {
        fs::create_dir_all(dir).map_err(Error::io(dir))?;
        Ok(GlyphSet {
            layer,
            dir: dir.to_owned(),
            contents: IndexMap::new(),
            existing: HashSet::new(),
            glyph_order: Vec::new(),
            color: None,
            lib: Lib::new(),
            options,
        })
    }

    /// The name of the layer this glyph set belongs to.
    pub fn layer_name(&self) -> &Name {
        &self.layer
    }

    pub(crate) fn set_layer_name(&mut self, layer: Name) {
        self.layer = layer;
    }

    /// The glyph directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Sets the preferred glyph order, usually the font's `public.glyphOrder`.
    pub fn set_glyph_order<I, S>(&mut self, order: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.glyph_order = order.into_iter().filter_map(|name| Name::new(name.as_ref()).ok()).collect();
    }

    /// Returns the names of all glyphs in the set.
    ///
    /// Names in the glyph order come first, in that order; the rest follow in
    /// `contents.plist` order. Names in the glyph order that are not in the
    /// set are skipped.
    pub fn glyph_names(&self) -> Vec<Name> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(self.contents.len());
        for name in &self.glyph_order {
            if !self.contents.contains_key(name) {
                log::warn!("glyph order names '{name}', which is not in layer '{}'", self.layer);
                continue;
            }
            if seen.insert(name.clone()) {
                names.push(name.clone());
            }
        }
        names.extend(self.contents.keys().filter(|name| !seen.contains(*name)).cloned());
        names
    }

    /// Returns `true` if the set contains a glyph with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.contents.contains_key(name)
    }

    /// The number of glyphs in the set.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// The file name of a glyph, relative to the glyph directory.
    pub fn file_name_for(&self, name: &str) -> Option<&str> {
        self.contents.get(name).map(String::as_str)
    }

    /// The layer color, from `layerinfo.plist`.
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// The layer lib, from `layerinfo.plist`.
    pub fn lib(&self) -> &Lib {
        &self.lib
    }

    pub fn lib_mut(&mut self) -> &mut Lib {
        &mut self.lib
    }

    /// Reads the glyph `name`, streaming its outline into `pen`.
    ///
    /// Fails with [`Error::NotFound`] if the glyph is not in the set.
    pub fn read_glyph(&self, name: &str, pen: &mut dyn PointPen) -> Result<Glyph, Error> {
        let (name, file) = self.contents.get_key_value(name).ok_or_else(|| Error::NotFound {
            layer: self.layer.clone(),
            glyph: name.into(),
        })?;
        let path = self.dir.join(file);
        let bytes = fs::read(&path).map_err(Error::io(&path))?;
        let mut glyph = glif::read_glyph(&bytes, pen).map_err(|e| Error::format(&path, FormatError::Glif(e)))?;
        // contents.plist is authoritative
        glyph.name = name.clone();
        Ok(glyph)
    }

    /// Writes `glyph`, with the outline drawn by `draw`.
    ///
    /// A glyph that is new to the set is assigned a file name that does not
    /// collide, case-insensitively, with any other file in the set.
    pub fn write_glyph<F>(&mut self, glyph: &Glyph, draw: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn PointPen) -> Result<(), PenError>,
    {
        let data = glif::write_glyph_with_options(glyph, &self.options, draw)
            .map_err(|source| Error::GlifWrite { name: glyph.name.clone(), source })?;
        let (file, is_new) = match self.contents.get(&glyph.name) {
            Some(file) => (file.clone(), false),
            None => (filenames::glyph_file_name(&glyph.name, &self.existing), true),
        };
        write::write_bytes(&self.dir.join(&file), &data)?;
        // only a file that made it to disk is listed
        if is_new {
            self.existing.insert(file.to_lowercase());
            self.contents.insert(glyph.name.clone(), file);
        }
        Ok(())
    }

    /// Removes a glyph from the set and deletes its file.
    pub fn delete_glyph(&mut self, name: &str) -> Result<(), Error> {
        let file = self.contents.shift_remove(name).ok_or_else(|| Error::NotFound {
            layer: self.layer.clone(),
            glyph: name.into(),
        })?;
        self.existing.remove(&file.to_lowercase());
        let path = self.dir.join(&file);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(Error::io(&path)(e)),
            _ => log::debug!("deleted '{}'", path.display()),
        }
        Ok(())
    }

    /// Renames a glyph, rewriting it under a new file name.
    ///
    /// The glyph keeps its position in the set and in the glyph order.
    pub fn rename_glyph(&mut self, old: &str, new: &str) -> Result<(), Error> {
        let new_name = Name::new(new)?;
        if self.contents.contains_key(new) {
            return Err(Error::DuplicateGlyph { layer: self.layer.clone(), glyph: new.into() });
        }
        let mut outline = RecordingPointPen::new();
        let mut glyph = self.read_glyph(old, &mut outline)?;
        glyph.name = new_name.clone();

        let data = glif::write_glyph_with_options(&glyph, &self.options, |pen| outline.replay(pen))
            .map_err(|source| Error::GlifWrite { name: new_name.clone(), source })?;

        let (index, _, old_file) = self.contents.get_full(old).ok_or_else(|| Error::NotFound {
            layer: self.layer.clone(),
            glyph: old.into(),
        })?;
        let old_file = old_file.clone();
        // the new name may reuse the old file name
        let old_key = old_file.to_lowercase();
        self.existing.remove(&old_key);
        let new_file = filenames::glyph_file_name(new, &self.existing);
        if let Err(e) = write::write_bytes(&self.dir.join(&new_file), &data) {
            self.existing.insert(old_key);
            return Err(e);
        }

        self.existing.insert(new_file.to_lowercase());
        self.contents.shift_remove_index(index);
        self.contents.shift_insert(index, new_name.clone(), new_file.clone());
        for name in self.glyph_order.iter_mut().filter(|name| *name == old) {
            *name = new_name.clone();
        }
        if !old_file.eq_ignore_ascii_case(&new_file) {
            let old_path = self.dir.join(&old_file);
            fs::remove_file(&old_path).map_err(Error::io(&old_path))?;
        }
        Ok(())
    }

    /// Writes `contents.plist`, and `layerinfo.plist` if the layer has a color or lib.
    ///
    /// Call after all glyphs have been written.
    pub fn write_contents(&self) -> Result<(), Error> {
        let mut contents: plist::Dictionary = self
            .contents
            .iter()
            .map(|(name, file)| (name.to_string(), plist::Value::String(file.clone())))
            .collect();
        contents.sort_keys();
        write::write_plist_value(
            &self.dir.join(CONTENTS_FILE),
            &plist::Value::Dictionary(contents),
            &self.options,
        )?;

        let layerinfo_path = self.dir.join(LAYER_INFO_FILE);
        if self.color.is_none() && self.lib.is_empty() {
            return match fs::remove_file(&layerinfo_path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(Error::io(&layerinfo_path)(e)),
                _ => Ok(()),
            };
        }
        let mut info = plist::Dictionary::new();
        if let Some(color) = &self.color {
            info.insert("color".into(), plist::Value::String(color.to_rgba_string()));
        }
        if !self.lib.is_empty() {
            info.insert("lib".into(), self.lib.to_plist_value());
        }
        write::write_plist_value(&layerinfo_path, &plist::Value::Dictionary(info), &self.options)
    }

    fn read_layerinfo(&mut self, path: &Path) -> Result<(), Error> {
        let bytes = fs::read(path).map_err(Error::io(path))?;
        let info = plist::Value::from_reader(Cursor::new(bytes))
            .map_err(|e| Error::format(path, FormatError::Plist(e)))?
            .into_dictionary()
            .ok_or_else(|| Error::invalid(path, "layerinfo must be a dictionary"))?;

        for (key, value) in info {
            match (key.as_str(), value) {
                ("color", plist::Value::String(s)) => {
                    let color = s.parse().map_err(|_| Error::invalid(path, format!("invalid color '{s}'")))?;
                    self.color = Some(color);
                }
                ("lib", plist::Value::Dictionary(dict)) => {
                    let dict = dictionary_from_plist(dict, Some("lib"))
                        .map_err(|e| Error::format(path, FormatError::Lib(e)))?;
                    self.lib = Lib::from(dict);
                }
                ("color", _) => return Err(Error::invalid(path, "color must be a string")),
                ("lib", _) => return Err(Error::invalid(path, "lib must be a dictionary")),
                (other, _) => return Err(Error::invalid(path, format!("unknown key '{other}'"))),
            }
        }
        Ok(())
    }
}

fn read_contents(path: &Path) -> Result<IndexMap<Name, String>, Error> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::missing_file(path)),
        Err(e) => return Err(Error::io(path)(e)),
    };
    let entries: ContentsEntries =
        plist::from_bytes(&bytes).map_err(|e| Error::format(path, FormatError::Plist(e)))?;

    let mut contents = IndexMap::with_capacity(entries.0.len());
    for (name, file) in entries.0 {
        let name = Name::try_from(name).map_err(|e| Error::invalid(path, e.to_string()))?;
        if file.contains(['/', '\\']) {
            return Err(Error::invalid(path, format!("'{file}' is not a plain file name")));
        }
        if let Some(previous) = contents.insert(name.clone(), file) {
            log::warn!("'{}' lists glyph '{name}' twice; ignoring '{previous}'", path.display());
        }
    }
    Ok(contents)
}

/// The entries of `contents.plist`, in file order and including duplicates.
struct ContentsEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for ContentsEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ContentsEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a dictionary of glyph names to file names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(ContentsEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pen::{AffineTransform, PointType};

    fn draw_line(pen: &mut dyn PointPen) -> Result<(), PenError> {
        pen.begin_path(None)?;
        pen.add_point((0.0, 0.0), PointType::Move, false, None, None)?;
        pen.add_point((100.0, 0.0), PointType::Line, false, None, None)?;
        pen.end_path()
    }

    fn scratch() -> (tempfile::TempDir, GlyphSet) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphs");
        let set = GlyphSet::create(&path, Name::new_raw("public.default"), WriteOptions::default()).unwrap();
        (dir, set)
    }

    #[test]
    fn missing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlyphSet::open(dir.path(), Name::new_raw("public.default")).unwrap_err();
        match err {
            Error::Format { path, source: FormatError::MissingFile } => assert!(path.ends_with(CONTENTS_FILE)),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn write_then_reopen() {
        let (_dir, mut set) = scratch();
        set.write_glyph(&Glyph::try_new("a").unwrap(), draw_line).unwrap();
        set.write_glyph(&Glyph::try_new("A").unwrap(), draw_line).unwrap();
        set.set_color(Some("1,0,0,1".parse().unwrap()));
        set.lib_mut().insert("com.example.flag", true);
        set.write_contents().unwrap();

        let reopened = GlyphSet::open(set.path(), Name::new_raw("public.default")).unwrap();
        assert_eq!(reopened.file_name_for("a"), Some("a.glif"));
        assert_eq!(reopened.file_name_for("A"), Some("A_.glif"));
        assert_eq!(reopened.color(), set.color());
        assert_eq!(reopened.lib().get_bool("com.example.flag"), Some(true));

        let mut pen = RecordingPointPen::new();
        let glyph = reopened.read_glyph("A", &mut pen).unwrap();
        assert_eq!(glyph.name, "A");
        assert_eq!(pen.calls().len(), 4);
    }

    #[test]
    fn glyph_order_comes_first() {
        let (_dir, mut set) = scratch();
        for name in ["a", "b", "c"] {
            set.write_glyph(&Glyph::try_new(name).unwrap(), |_| Ok(())).unwrap();
        }
        set.set_glyph_order(["c", "missing", "a"]);
        assert_eq!(set.glyph_names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn not_found() {
        let (_dir, set) = scratch();
        let err = set.read_glyph("nope", &mut RecordingPointPen::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound { glyph, .. } if glyph == "nope"));
    }

    #[test]
    fn rename_and_delete() {
        let (_dir, mut set) = scratch();
        set.write_glyph(&Glyph::try_new("a").unwrap(), draw_line).unwrap();
        set.write_glyph(&Glyph::try_new("b").unwrap(), |pen| {
            pen.add_component("a", AffineTransform::identity(), None)
        })
        .unwrap();

        set.rename_glyph("a", "A").unwrap();
        assert_eq!(set.glyph_names(), vec!["A", "b"]);
        assert_eq!(set.file_name_for("A"), Some("A_.glif"));
        assert!(!set.path().join("a.glif").exists());
        let mut pen = RecordingPointPen::new();
        assert_eq!(set.read_glyph("A", &mut pen).unwrap().name, "A");
        assert_eq!(pen.calls().len(), 4);

        assert!(matches!(set.rename_glyph("A", "b"), Err(Error::DuplicateGlyph { .. })));

        set.delete_glyph("b").unwrap();
        assert!(!set.contains("b"));
        assert!(!set.path().join("b.glif").exists());
        assert!(matches!(set.delete_glyph("b"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn failed_rename_keeps_old_entry() {
        let (_dir, mut set) = scratch();
        set.write_glyph(&Glyph::try_new("a").unwrap(), draw_line).unwrap();
        // a directory where the renamed glyph's file would go
        fs::create_dir(set.path().join("b.glif")).unwrap();

        assert!(matches!(set.rename_glyph("a", "b"), Err(Error::Io { .. })));
        assert_eq!(set.glyph_names(), vec!["a"]);
        assert_eq!(set.file_name_for("a"), Some("a.glif"));
        let mut pen = RecordingPointPen::new();
        assert_eq!(set.read_glyph("a", &mut pen).unwrap().name, "a");
        assert_eq!(pen.calls().len(), 4);

        let err = set.write_glyph(&Glyph::try_new("b").unwrap(), draw_line).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!set.contains("b"));
    }

    #[test]
    fn failed_write_assigns_no_file() {
        let (_dir, mut set) = scratch();
        let err = set
            .write_glyph(&Glyph::try_new("a").unwrap(), |pen| pen.begin_path(None))
            .unwrap_err();
        assert!(matches!(err, Error::GlifWrite { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn duplicate_contents_entries_last_wins() {
        let dir = tempfile::tempdir().unwrap();
        let contents = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>a</key>
	<string>a.glif</string>
	<key>b</key>
	<string>b.glif</string>
	<key>a</key>
	<string>a_copy.glif</string>
</dict>
</plist>
"#;
        fs::write(dir.path().join(CONTENTS_FILE), contents).unwrap();
        let set = GlyphSet::open(dir.path(), Name::new_raw("public.default")).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.file_name_for("a"), Some("a_copy.glif"));
        assert_eq!(set.glyph_names(), vec!["a", "b"]);
    }
}
