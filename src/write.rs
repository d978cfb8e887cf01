//! Customize serialization behaviour

use std::borrow::Cow;
use std::path::Path;

use plist::XmlWriteOptions;

use crate::error::{Error, FormatError};

const DOUBLE_QUOTE_DECL: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SINGLE_QUOTE_DECL: &[u8] = b"<?xml version='1.0' encoding='UTF-8'?>";

/// Options that can be set when writing a UFO package.
///
/// These apply to every XML file written: property lists and glif files.
///
/// You construct `WriteOptions` using builder semantics:
///
/// ```
/// # use ufokit::{QuoteChar, WriteOptions};
/// let single_tab = WriteOptions::default();
///
/// let two_spaces = WriteOptions::default()
///     .whitespace("  ");
///
/// let spaces_and_singlequotes = WriteOptions::default()
///     .whitespace("  ")
///     .quote_char(QuoteChar::Single);
/// ```
#[derive(Debug, Clone)]
pub struct WriteOptions {
    // quick-xml wants a char and a count, plist wants the string.
    pub(crate) indent_str: Cow<'static, str>,
    xml_opts: XmlWriteOptions,
    pub(crate) whitespace_char: u8,
    pub(crate) whitespace_count: usize,
    pub(crate) quote_style: QuoteChar,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent_str: "\t".into(),
            xml_opts: Default::default(),
            whitespace_char: b'\t',
            whitespace_count: 1,
            quote_style: QuoteChar::Double,
        }
    }
}

impl WriteOptions {
    /// Builder-style method to customize the whitespace.
    ///
    /// By default, we indent with a single tab ("\t").
    ///
    /// The string can contain any number of *a single ASCII character*, but must
    /// not contain multiple different characters. "\t\t" is fine, "\t  \t" is not.
    ///
    /// # Panics
    ///
    /// Panics if the provided string is empty, or if it contains multiple
    /// different characters.
    pub fn whitespace(mut self, indent_str: impl Into<Cow<'static, str>>) -> Self {
        let indent_str = indent_str.into();
        self.whitespace_char = indent_str.bytes().next().expect("whitespace str must not be empty");
        assert!(indent_str.bytes().all(|c| c == self.whitespace_char), "invalid whitespace");
        self.whitespace_count = indent_str.len();
        self.xml_opts = XmlWriteOptions::default().indent_string(indent_str.clone());
        self.indent_str = indent_str;
        self
    }

    /// Builder-style method to customize the quote character of the XML declaration.
    ///
    /// By default, we use double quotes.
    pub fn quote_char(mut self, quote_style: QuoteChar) -> Self {
        self.quote_style = quote_style;
        self
    }

    /// Return a reference to [`XmlWriteOptions`] for use with the `plist` crate.
    pub fn xml_options(&self) -> &XmlWriteOptions {
        &self.xml_opts
    }

    /// Rewrites the XML declaration at the start of `buf` to use the configured quotes.
    pub(crate) fn apply_quote_style(&self, buf: &mut [u8]) {
        if self.quote_style == QuoteChar::Single && buf.starts_with(DOUBLE_QUOTE_DECL) {
            buf[..SINGLE_QUOTE_DECL.len()].copy_from_slice(SINGLE_QUOTE_DECL);
        }
    }
}

/// The quote character used to write the XML declaration.
///
/// This is exposed to allow the user to match the output of other tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteChar {
    /// Single quotes: 'UTF-8'.
    Single,
    /// Double quotes: "UTF-8".
    Double,
}

/// Writes `bytes` to `path`, replacing any existing file.
pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    close_already::fs::write(path, bytes).map_err(Error::io(path))?;
    log::debug!("wrote '{}'", path.display());
    Ok(())
}

/// Writes a `plist::Value` to `path` as XML.
pub(crate) fn write_plist_value(
    path: &Path,
    value: &plist::Value,
    options: &WriteOptions,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    value
        .to_writer_xml_with_options(&mut buf, options.xml_options())
        .map_err(|e| Error::format(path, FormatError::Plist(e)))?;
    finish_xml(&mut buf, options);
    write_bytes(path, &buf)
}

/// Writes any `Serialize` to `path` as an XML property list.
pub(crate) fn write_xml(
    path: &Path,
    value: &impl serde::Serialize,
    options: &WriteOptions,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    plist::to_writer_xml_with_options(&mut buf, value, options.xml_options())
        .map_err(|e| Error::format(path, FormatError::Plist(e)))?;
    finish_xml(&mut buf, options);
    write_bytes(path, &buf)
}

pub(crate) fn finish_xml(buf: &mut Vec<u8>, options: &WriteOptions) {
    options.apply_quote_style(buf);
    if buf.last() != Some(&b'\n') {
        buf.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quotes() {
        let options = WriteOptions::default().quote_char(QuoteChar::Single);
        let mut buf = Vec::new();
        plist::Value::Boolean(true).to_writer_xml_with_options(&mut buf, options.xml_options()).unwrap();
        options.apply_quote_style(&mut buf);
        assert!(buf.starts_with(SINGLE_QUOTE_DECL));
    }

    #[test]
    fn whitespace() {
        let options = WriteOptions::default().whitespace("  ");
        assert_eq!(options.whitespace_char, b' ');
        assert_eq!(options.whitespace_count, 2);
        assert_eq!(options.indent_str, "  ");
    }

    #[test]
    #[should_panic(expected = "invalid whitespace")]
    fn mixed_whitespace() {
        let _ = WriteOptions::default().whitespace("\t ");
    }
}
