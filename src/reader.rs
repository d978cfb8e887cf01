//! Reading a UFO package.

use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{Error, FormatError};
use crate::font::{
    FormatVersion, MetaInfo, DEFAULT_GLYPHS_DIRNAME, DEFAULT_LAYER_NAME, FEATURES_FILE,
    FONTINFO_FILE, GROUPS_FILE, KERNING_FILE, LAYER_CONTENTS_FILE, LIB_FILE, METAINFO_FILE,
};
use crate::fontinfo::FontInfo;
use crate::glyph_set::GlyphSet;
use crate::value::{dictionary_from_plist, Dictionary};
use crate::{Lib, Name};

/// A read session on a UFO package.
///
/// Opening validates the package layout and parses `metainfo.plist`,
/// `layercontents.plist` and `fontinfo.plist`. Everything else is read on
/// request. Glyph sets are opened once and kept for the session.
///
/// ```no_run
/// # fn main() -> Result<(), ufokit::Error> {
/// use ufokit::{RecordingPointPen, UfoReader};
///
/// let mut reader = UfoReader::open("MyFont.ufo")?;
/// let glyphs = reader.glyph_set()?;
/// for name in glyphs.glyph_names() {
///     let mut pen = RecordingPointPen::new();
///     let glyph = glyphs.read_glyph(&name, &mut pen)?;
///     println!("{}: {} pen calls", glyph.name, pen.calls().len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UfoReader {
    path: PathBuf,
    meta: MetaInfo,
    info: FontInfo,
    /// (layer name, directory name), in `layercontents.plist` order.
    layers: Vec<(Name, String)>,
    default_layer: Name,
    glyph_order: Option<Vec<String>>,
    glyph_sets: HashMap<Name, GlyphSet>,
}

impl UfoReader {
    /// Opens the package at `path`.
    ///
    /// Fails with [`Error::NotDirectory`] if `path` is not a directory, and
    /// with [`Error::Format`] if a required file is missing or malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<UfoReader, Error> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::NotDirectory(path.to_owned()));
        }

        let meta_path = path.join(METAINFO_FILE);
        let meta: MetaInfo = match read_optional(&meta_path)? {
            Some(bytes) => plist::from_bytes(&bytes).map_err(|e| Error::format(&meta_path, FormatError::Plist(e)))?,
            None => return Err(Error::missing_file(meta_path)),
        };

        let layers = match meta.format_version {
            FormatVersion::V3 => read_layer_contents(&path.join(LAYER_CONTENTS_FILE))?,
            FormatVersion::V1 | FormatVersion::V2 => {
                vec![(Name::new_raw(DEFAULT_LAYER_NAME), DEFAULT_GLYPHS_DIRNAME.to_string())]
            }
        };
        let default_layer = layers
            .iter()
            .find(|(_, dir)| dir == DEFAULT_GLYPHS_DIRNAME)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| {
                Error::invalid(path.join(LAYER_CONTENTS_FILE), "no layer is stored in 'glyphs'")
            })?;

        let info_path = path.join(FONTINFO_FILE);
        let info = match read_optional(&info_path)? {
            Some(bytes) => {
                let dict = plist::Value::from_reader(Cursor::new(bytes))
                    .map_err(|e| Error::format(&info_path, FormatError::Plist(e)))?
                    .into_dictionary()
                    .ok_or_else(|| Error::invalid(&info_path, "fontinfo must be a dictionary"))?;
                FontInfo::from_plist(dict, meta.format_version)
                    .map_err(|e| Error::format(&info_path, FormatError::Plist(e)))?
            }
            None => return Err(Error::missing_file(info_path)),
        };

        log::debug!("opened '{}', format {:?}, {} layers", path.display(), meta.format_version, layers.len());
        Ok(UfoReader {
            path: path.to_owned(),
            meta,
            info,
            layers,
            default_layer,
            glyph_order: None,
            glyph_sets: HashMap::new(),
        })
    }

    /// The package directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_meta(&self) -> &MetaInfo {
        &self.meta
    }

    /// The font info, parsed from `fontinfo.plist` when the package was opened.
    pub fn read_info(&self) -> &FontInfo {
        &self.info
    }

    /// Reads `lib.plist`; an absent file yields an empty lib.
    pub fn read_lib(&self) -> Result<Lib, Error> {
        let path = self.path.join(LIB_FILE);
        match read_optional(&path)? {
            Some(bytes) => Lib::decode(&bytes).map_err(|e| Error::format(&path, FormatError::Lib(e))),
            None => Ok(Lib::new()),
        }
    }

    /// Reads `groups.plist`, checking that every group is a list of glyph names.
    pub fn read_groups(&self) -> Result<Dictionary, Error> {
        let path = self.path.join(GROUPS_FILE);
        let groups = read_dictionary(&path)?;
        for (name, members) in &groups {
            let valid = members.as_array().is_some_and(|items| items.iter().all(|item| item.as_str().is_some()));
            if !valid {
                return Err(Error::invalid(&path, format!("group '{name}' must be an array of strings")));
            }
        }
        Ok(groups)
    }

    /// Reads `kerning.plist`, checking that it maps pairs to numbers.
    pub fn read_kerning(&self) -> Result<Dictionary, Error> {
        let path = self.path.join(KERNING_FILE);
        let kerning = read_dictionary(&path)?;
        for (first, seconds) in &kerning {
            let valid = seconds
                .as_dictionary()
                .is_some_and(|seconds| seconds.values().all(|value| value.as_number().is_some()));
            if !valid {
                return Err(Error::invalid(&path, format!("kerning for '{first}' must map names to numbers")));
            }
        }
        Ok(kerning)
    }

    /// Reads `features.fea`; an absent file yields an empty string.
    pub fn read_features(&self) -> Result<String, Error> {
        let path = self.path.join(FEATURES_FILE);
        match fs::read_to_string(&path) {
            Ok(features) => Ok(features),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(Error::io(&path)(e)),
        }
    }

    /// The layer names, in `layercontents.plist` order.
    pub fn layer_names(&self) -> impl Iterator<Item = &Name> {
        self.layers.iter().map(|(name, _)| name)
    }

    /// The name of the layer stored in the `glyphs` directory.
    pub fn default_layer_name(&self) -> &Name {
        &self.default_layer
    }

    /// The glyph set of the default layer.
    pub fn glyph_set(&mut self) -> Result<&GlyphSet, Error> {
        let name = self.default_layer.clone();
        self.glyph_set_named(&name)
    }

    /// The glyph set of the layer `layer`.
    ///
    /// Glyphs are listed in the font's `public.glyphOrder` first.
    pub fn glyph_set_named(&mut self, layer: &str) -> Result<&GlyphSet, Error> {
        let (name, dir) = self
            .layers
            .iter()
            .find(|(name, _)| name == layer)
            .cloned()
            .ok_or_else(|| Error::MissingLayer(layer.into()))?;
        if self.glyph_order.is_none() {
            let lib = self.read_lib()?;
            let order = lib.glyph_order().unwrap_or_default();
            self.glyph_order = Some(order.into_iter().map(String::from).collect());
        }

        match self.glyph_sets.entry(name) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut glyph_set = GlyphSet::open(self.path.join(dir), entry.key().clone())?;
                if let Some(order) = &self.glyph_order {
                    glyph_set.set_glyph_order(order);
                }
                Ok(entry.insert(glyph_set))
            }
        }
    }
}

/// Reads a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, Error> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path)(e)),
    }
}

/// Reads a plist dictionary without key rules; absent files are empty.
fn read_dictionary(path: &Path) -> Result<Dictionary, Error> {
    let Some(bytes) = read_optional(path)? else {
        return Ok(Dictionary::new());
    };
    let dict = plist::Value::from_reader(Cursor::new(bytes))
        .map_err(|e| Error::format(path, FormatError::Plist(e)))?
        .into_dictionary()
        .ok_or_else(|| Error::invalid(path, "top level must be a dictionary"))?;
    dictionary_from_plist(dict, None).map_err(|e| Error::format(path, FormatError::Lib(e)))
}

fn read_layer_contents(path: &Path) -> Result<Vec<(Name, String)>, Error> {
    let Some(bytes) = read_optional(path)? else {
        return Err(Error::missing_file(path));
    };
    let entries: Vec<(String, String)> =
        plist::from_bytes(&bytes).map_err(|e| Error::format(path, FormatError::Plist(e)))?;

    let mut names = HashSet::new();
    let mut dirs = HashSet::new();
    let mut layers = Vec::with_capacity(entries.len());
    for (name, dir) in entries {
        let name = Name::try_from(name).map_err(|e| Error::invalid(path, e.to_string()))?;
        if dir.contains(['/', '\\']) || dir.starts_with("..") {
            return Err(Error::invalid(path, format!("'{dir}' is not a plain directory name")));
        }
        if !names.insert(name.clone()) {
            return Err(Error::invalid(path, format!("layer '{name}' is listed twice")));
        }
        if !dirs.insert(dir.clone()) {
            return Err(Error::invalid(path, format!("directory '{dir}' is used by two layers")));
        }
        layers.push((name, dir));
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    fn metainfo(version: u8) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>creator</key>
  <string>com.example.tool</string>
  <key>formatVersion</key>
  <integer>{version}</integer>
</dict>
</plist>"#
        )
    }

    static EMPTY_DICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict/>
</plist>"#;

    #[test]
    fn not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.ufo");
        write(&file, "hello");
        assert!(matches!(UfoReader::open(&file), Err(Error::NotDirectory(p)) if p == file));
        assert!(matches!(UfoReader::open(dir.path().join("nope.ufo")), Err(Error::NotDirectory(_))));
    }

    #[test]
    fn missing_or_corrupt_metainfo() {
        let dir = tempfile::tempdir().unwrap();
        let err = UfoReader::open(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Format { path, source: FormatError::MissingFile } if path.ends_with(METAINFO_FILE)
        ));

        write(&dir.path().join(METAINFO_FILE), "not a plist");
        let err = UfoReader::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Format { source: FormatError::Plist(_), .. }));

        write(&dir.path().join(METAINFO_FILE), &metainfo(9));
        assert!(matches!(UfoReader::open(dir.path()), Err(Error::Format { .. })));
    }

    #[test]
    fn format_3_requires_layer_contents() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join(METAINFO_FILE), &metainfo(3));
        let err = UfoReader::open(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Format { path, source: FormatError::MissingFile } if path.ends_with(LAYER_CONTENTS_FILE)
        ));
    }

    #[test]
    fn format_2_has_one_layer() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join(METAINFO_FILE), &metainfo(2));
        write(&dir.path().join(FONTINFO_FILE), EMPTY_DICT);
        fs::create_dir(dir.path().join("glyphs")).unwrap();
        write(&dir.path().join("glyphs").join("contents.plist"), EMPTY_DICT);

        let mut reader = UfoReader::open(dir.path()).unwrap();
        assert_eq!(reader.read_meta().format_version, FormatVersion::V2);
        assert_eq!(reader.read_meta().creator.as_deref(), Some("com.example.tool"));
        assert_eq!(reader.layer_names().collect::<Vec<_>>(), vec![DEFAULT_LAYER_NAME]);
        assert_eq!(reader.read_info(), &FontInfo::default());
        assert!(reader.read_lib().unwrap().is_empty());
        assert!(reader.read_groups().unwrap().is_empty());
        assert_eq!(reader.read_features().unwrap(), "");
        assert!(reader.glyph_set().unwrap().is_empty());
        assert!(matches!(reader.glyph_set_named("sketch"), Err(Error::MissingLayer(l)) if l == "sketch"));
    }

    #[test]
    fn layer_contents_rules() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join(METAINFO_FILE), &metainfo(3));
        write(&dir.path().join(FONTINFO_FILE), EMPTY_DICT);
        let layercontents = dir.path().join(LAYER_CONTENTS_FILE);
        let entries = |pairs: &[(&str, &str)]| {
            let items = pairs
                .iter()
                .map(|(n, d)| format!("<array><string>{n}</string><string>{d}</string></array>"))
                .collect::<String>();
            format!(r#"<?xml version="1.0" encoding="UTF-8"?><plist version="1.0"><array>{items}</array></plist>"#)
        };

        write(&layercontents, &entries(&[("foreground", "glyphs"), ("foreground", "glyphs.b")]));
        assert!(matches!(UfoReader::open(dir.path()), Err(Error::Format { source: FormatError::Invalid(_), .. })));

        write(&layercontents, &entries(&[("background", "glyphs.background")]));
        assert!(matches!(UfoReader::open(dir.path()), Err(Error::Format { source: FormatError::Invalid(_), .. })));

        write(&layercontents, &entries(&[("evil", "../glyphs")]));
        assert!(matches!(UfoReader::open(dir.path()), Err(Error::Format { .. })));

        write(&layercontents, &entries(&[("background", "glyphs.background"), ("foreground", "glyphs")]));
        let reader = UfoReader::open(dir.path()).unwrap();
        assert_eq!(reader.default_layer_name(), &"foreground");
        assert_eq!(reader.layer_names().collect::<Vec<_>>(), vec!["background", "foreground"]);
    }

    #[test]
    fn corrupt_fontinfo() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join(METAINFO_FILE), &metainfo(2));
        write(
            &dir.path().join(FONTINFO_FILE),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
  <key>unitsPerEm</key>
  <string>a thousand</string>
</dict>
</plist>"#,
        );
        let err = UfoReader::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Format { path, .. } if path.ends_with(FONTINFO_FILE)));
    }

    #[test]
    fn missing_fontinfo() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join(METAINFO_FILE), &metainfo(2));
        let err = UfoReader::open(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Format { path, source: FormatError::MissingFile } if path.ends_with(FONTINFO_FILE)
        ));
    }

    #[test]
    fn groups_and_kerning_shape() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join(METAINFO_FILE), &metainfo(2));
        write(&dir.path().join(FONTINFO_FILE), EMPTY_DICT);
        write(
            &dir.path().join(GROUPS_FILE),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
  <key>public.kern1.O</key>
  <array><string>O</string><string>D</string></array>
</dict>
</plist>"#,
        );
        write(
            &dir.path().join(KERNING_FILE),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
  <key>public.kern1.O</key>
  <dict><key>A</key><integer>-20</integer></dict>
</dict>
</plist>"#,
        );
        let reader = UfoReader::open(dir.path()).unwrap();
        let groups = reader.read_groups().unwrap();
        assert_eq!(groups["public.kern1.O"].as_array().unwrap().len(), 2);
        let kerning = reader.read_kerning().unwrap();
        let pair = kerning["public.kern1.O"].as_dictionary().unwrap();
        assert_eq!(pair["A"].as_number(), Some(-20.0));

        write(
            &dir.path().join(GROUPS_FILE),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict><key>bad</key><string>O</string></dict>
</plist>"#,
        );
        assert!(matches!(reader.read_groups(), Err(Error::Format { source: FormatError::Invalid(_), .. })));
    }
}
