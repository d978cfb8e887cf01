//! Library property bags: `lib.plist` and glyph `<lib>` data.

use std::io::Cursor;

use crate::error::LibError;
use crate::migration::{self, LibScope, GLYPH_ORDER_KEY, POSTSCRIPT_NAMES_KEY};
use crate::value::{dictionary_from_plist, dictionary_into_plist, Dictionary, Value};
use crate::write::{self, WriteOptions};

/// The on-disk encoding of a property list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlistFormat {
    /// Apple XML property list.
    #[default]
    Xml,
    /// Apple binary property list (`bplist00`).
    Binary,
}

/// An open-ended mapping of namespaced keys to [`Value`]s.
///
/// Keys are never checked against a closed set; anything unknown is kept
/// as-is. Keys whose meaning is defined by the UFO specification or by
/// widely used tools are checked for shape on decode, after legacy forms
/// have been normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lib {
    entries: Dictionary,
}

impl Lib {
    /// Creates an empty lib.
    pub fn new() -> Self {
        Lib::default()
    }

    /// Decodes a font lib from XML or binary property list bytes.
    ///
    /// The encoding is detected automatically.
    pub fn decode(bytes: &[u8]) -> Result<Lib, LibError> {
        Lib::decode_scoped(bytes, LibScope::Font)
    }

    /// Decodes a glyph lib from XML or binary property list bytes.
    pub fn decode_glyph_lib(bytes: &[u8]) -> Result<Lib, LibError> {
        Lib::decode_scoped(bytes, LibScope::Glyph)
    }

    fn decode_scoped(bytes: &[u8], scope: LibScope) -> Result<Lib, LibError> {
        let value = plist::Value::from_reader(Cursor::new(bytes)).map_err(LibError::Parse)?;
        let dict = value.into_dictionary().ok_or(LibError::NotADictionary)?;
        Lib::from_plist_dictionary(dict, scope)
    }

    /// Converts, migrates and validates an already parsed dictionary.
    pub(crate) fn from_plist_dictionary(
        dict: plist::Dictionary,
        scope: LibScope,
    ) -> Result<Lib, LibError> {
        let mut entries = dictionary_from_plist(dict, None)?;
        migration::migrate(&mut entries, scope);
        migration::validate(&entries, scope)?;
        Ok(Lib { entries })
    }

    /// Encodes the lib in the requested format, with default XML options.
    ///
    /// Keys are sorted at every nesting level.
    pub fn encode(&self, format: PlistFormat) -> Result<Vec<u8>, LibError> {
        self.encode_with_options(format, &WriteOptions::default())
    }

    /// Encodes the lib, using `options` for XML indentation and quoting.
    pub fn encode_with_options(
        &self,
        format: PlistFormat,
        options: &WriteOptions,
    ) -> Result<Vec<u8>, LibError> {
        let value = self.to_plist_value();
        let mut buf = Vec::new();
        match format {
            PlistFormat::Xml => {
                value
                    .to_writer_xml_with_options(&mut buf, options.xml_options())
                    .map_err(LibError::Write)?;
                write::finish_xml(&mut buf, options);
            }
            PlistFormat::Binary => value.to_writer_binary(&mut buf).map_err(LibError::Write)?,
        }
        Ok(buf)
    }

    pub(crate) fn to_plist_value(&self) -> plist::Value {
        plist::Value::Dictionary(dictionary_into_plist(self.entries.clone()))
    }

    /// The `public.glyphOrder` entry.
    pub fn glyph_order(&self) -> Option<Vec<&str>> {
        let items = self.get_array(GLYPH_ORDER_KEY)?;
        items.iter().map(Value::as_str).collect()
    }

    /// The `public.postscriptNames` entry, as (glyph name, production name) pairs.
    pub fn postscript_names(&self) -> Option<Vec<(&str, &str)>> {
        let names = self.get_dict(POSTSCRIPT_NAMES_KEY)?;
        names.iter().map(|(k, v)| v.as_str().map(|v| (k.as_str(), v))).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    /// Returns a real, or an integer widened to a real.
    pub fn get_real(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_data(&self, key: &str) -> Option<&[u8]> {
        self.get(key).and_then(Value::as_data)
    }

    pub fn get_array(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Value::as_dictionary)
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying dictionary.
    pub fn as_dictionary(&self) -> &Dictionary {
        &self.entries
    }
}

impl From<Dictionary> for Lib {
    fn from(entries: Dictionary) -> Lib {
        Lib { entries }
    }
}

impl From<Lib> for Dictionary {
    fn from(lib: Lib) -> Dictionary {
        lib.entries
    }
}

impl FromIterator<(String, Value)> for Lib {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Lib { entries: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Lib {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
