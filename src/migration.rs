//! Compatibility rules for historical and vendor-specific lib data.
//!
//! Libs in the wild carry values that predate the current conventions:
//! booleans written as `0`/`1`, autohint blobs stored as strings, and the
//! pre-`public.markColor` mark key. [`migrate`] rewrites these into their
//! canonical form once, right after decoding, and [`validate`] then checks
//! the keys whose shape is known.

use crate::error::LibError;
use crate::value::{Dictionary, Value, ValueKind};

/// Where a lib was found, which decides the rules that apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LibScope {
    /// `lib.plist` at the package root.
    Font,
    /// The `<lib>` element of a glif file.
    Glyph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Boolean,
    Integer,
    /// Integer or real.
    Number,
    String,
    Data,
    Array,
    Dictionary,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Scalar(Expect),
    ArrayOf(Expect),
    DictOf(Expect),
}

/// The expected shape of a well-known key.
#[derive(Debug, Clone, Copy)]
struct KeyRule {
    key: &'static str,
    shape: Shape,
}

const fn rule(key: &'static str, shape: Shape) -> KeyRule {
    KeyRule { key, shape }
}

pub(crate) const GLYPH_ORDER_KEY: &str = "public.glyphOrder";
pub(crate) const POSTSCRIPT_NAMES_KEY: &str = "public.postscriptNames";
pub(crate) const MARK_COLOR_KEY: &str = "public.markColor";
const ROBOFONT_MARK_KEY: &str = "com.typemytype.robofont.mark";
const ROBOFONT_GUIDES_KEY: &str = "com.typemytype.robofont.guides";
const AUTOHINT_KEY: &str = "com.adobe.type.autohint";

/// RoboFont compile settings that older versions wrote as integers.
const INTEGER_BOOLEANS: &[&str] = &[
    "com.typemytype.robofont.compileSettings.autohint",
    "com.typemytype.robofont.compileSettings.checkOutlines",
    "com.typemytype.robofont.compileSettings.decompose",
    "com.typemytype.robofont.compileSettings.releaseMode",
];

const FONT_RULES: &[KeyRule] = &[
    rule(GLYPH_ORDER_KEY, Shape::ArrayOf(Expect::String)),
    rule(POSTSCRIPT_NAMES_KEY, Shape::DictOf(Expect::String)),
    rule("public.skipExportGlyphs", Shape::ArrayOf(Expect::String)),
    rule("public.openTypeCategories", Shape::DictOf(Expect::String)),
    rule("com.typemytype.robofont.compileSettings.autohint", Shape::Scalar(Expect::Boolean)),
    rule("com.typemytype.robofont.compileSettings.checkOutlines", Shape::Scalar(Expect::Boolean)),
    rule("com.typemytype.robofont.compileSettings.decompose", Shape::Scalar(Expect::Boolean)),
    rule("com.typemytype.robofont.compileSettings.releaseMode", Shape::Scalar(Expect::Boolean)),
    rule("com.typemytype.robofont.compileSettings.generateFormat", Shape::Scalar(Expect::Integer)),
    rule(ROBOFONT_GUIDES_KEY, Shape::ArrayOf(Expect::Dictionary)),
    rule("com.typemytype.robofont.italicSlantOffset", Shape::Scalar(Expect::Number)),
    rule("com.typemytype.robofont.layerOrder", Shape::ArrayOf(Expect::String)),
    rule("com.typemytype.robofont.segmentType", Shape::Scalar(Expect::String)),
    rule("com.typemytype.robofont.shouldAddPointsInSplineConversion", Shape::Scalar(Expect::Integer)),
    rule("com.typemytype.robofont.sort", Shape::ArrayOf(Expect::Dictionary)),
    rule("com.typesupply.MetricsMachine4.groupColors", Shape::DictOf(Expect::Array)),
];

const GLYPH_RULES: &[KeyRule] = &[
    rule(ROBOFONT_MARK_KEY, Shape::ArrayOf(Expect::Number)),
    rule(AUTOHINT_KEY, Shape::Scalar(Expect::Data)),
    rule(MARK_COLOR_KEY, Shape::Scalar(Expect::String)),
    rule("public.verticalOrigin", Shape::Scalar(Expect::Number)),
    rule("public.objectLibs", Shape::DictOf(Expect::Dictionary)),
];

/// Rewrites legacy encodings in `lib` into their canonical form.
pub(crate) fn migrate(lib: &mut Dictionary, scope: LibScope) {
    match scope {
        LibScope::Font => {
            for key in INTEGER_BOOLEANS {
                if let Some(value) = lib.get_mut(*key) {
                    if integer_to_bool(value) {
                        log::debug!("converted integer flag '{key}' to a boolean");
                    }
                }
            }
            if let Some(Value::Array(guides)) = lib.get_mut(ROBOFONT_GUIDES_KEY) {
                for guide in guides.iter_mut().filter_map(Value::as_dictionary_mut) {
                    if let Some(value) = guide.get_mut("isGlobal") {
                        if integer_to_bool(value) {
                            log::debug!("converted integer 'isGlobal' in '{ROBOFONT_GUIDES_KEY}'");
                        }
                    }
                }
            }
        }
        LibScope::Glyph => {
            if let Some(value) = lib.get_mut(AUTOHINT_KEY) {
                if let Value::String(s) = value {
                    *value = Value::Data(std::mem::take(s).into_bytes());
                    log::debug!("converted string '{AUTOHINT_KEY}' to data");
                }
            }
            if !lib.contains_key(MARK_COLOR_KEY) {
                if let Some(color) = lib.get(ROBOFONT_MARK_KEY).and_then(mark_to_color_string) {
                    log::debug!("copied '{ROBOFONT_MARK_KEY}' to '{MARK_COLOR_KEY}'");
                    lib.insert(MARK_COLOR_KEY.into(), Value::String(color));
                }
            }
        }
    }
}

/// Replaces an integer `0` or `1` with the matching boolean.
///
/// Returns `true` if a replacement happened. Other integers are left for
/// validation to reject.
fn integer_to_bool(value: &mut Value) -> bool {
    match value.as_integer() {
        Some(i @ (0 | 1)) => {
            *value = Value::Boolean(i == 1);
            true
        }
        _ => false,
    }
}

fn mark_to_color_string(value: &Value) -> Option<String> {
    let channels = value.as_array()?;
    if channels.len() != 4 {
        return None;
    }
    let channels = channels
        .iter()
        .map(|v| v.as_number().filter(|n| (0.0..=1.0).contains(n)))
        .collect::<Option<Vec<_>>>()?;
    Some(format!("{},{},{},{}", channels[0], channels[1], channels[2], channels[3]))
}

/// Checks every well-known key in `lib` against its expected shape.
pub(crate) fn validate(lib: &Dictionary, scope: LibScope) -> Result<(), LibError> {
    let rules = match scope {
        LibScope::Font => FONT_RULES,
        LibScope::Glyph => GLYPH_RULES,
    };
    for rule in rules {
        if let Some(value) = lib.get(rule.key) {
            check_shape(rule.key, rule.shape, value)?;
        }
    }
    if scope == LibScope::Font {
        if let Some(Value::Array(guides)) = lib.get(ROBOFONT_GUIDES_KEY) {
            for (i, guide) in guides.iter().enumerate() {
                if let Some(flag) = guide.as_dictionary().and_then(|d| d.get("isGlobal")) {
                    let key = format!("{ROBOFONT_GUIDES_KEY}[{i}].isGlobal");
                    check_shape(&key, Shape::Scalar(Expect::Boolean), flag)?;
                }
            }
        }
    }
    Ok(())
}

fn check_shape(key: &str, shape: Shape, value: &Value) -> Result<(), LibError> {
    let mismatch = |found: ValueKind| LibError::TypeMismatch {
        key: key.to_owned(),
        expected: shape.to_string(),
        found,
    };
    match shape {
        Shape::Scalar(expect) if expect.matches(value) => Ok(()),
        Shape::Scalar(_) => Err(mismatch(value.kind())),
        Shape::ArrayOf(expect) => {
            let items = value.as_array().ok_or_else(|| mismatch(value.kind()))?;
            match items.iter().find(|item| !expect.matches(item)) {
                Some(bad) => Err(mismatch(bad.kind())),
                None => Ok(()),
            }
        }
        Shape::DictOf(expect) => {
            let dict = value.as_dictionary().ok_or_else(|| mismatch(value.kind()))?;
            match dict.values().find(|item| !expect.matches(item)) {
                Some(bad) => Err(mismatch(bad.kind())),
                None => Ok(()),
            }
        }
    }
}

impl Expect {
    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Expect::Boolean, Value::Boolean(_))
                | (Expect::Integer, Value::Integer(_))
                | (Expect::Number, Value::Integer(_) | Value::Real(_))
                | (Expect::String, Value::String(_))
                | (Expect::Data, Value::Data(_))
                | (Expect::Array, Value::Array(_))
                | (Expect::Dictionary, Value::Dictionary(_))
        )
    }

    fn describe(self, plural: bool) -> &'static str {
        match (self, plural) {
            (Expect::Boolean, false) => "a boolean",
            (Expect::Boolean, true) => "booleans",
            (Expect::Integer, false) => "an integer",
            (Expect::Integer, true) => "integers",
            (Expect::Number, false) => "a number",
            (Expect::Number, true) => "numbers",
            (Expect::String, false) => "a string",
            (Expect::String, true) => "strings",
            (Expect::Data, _) => "data",
            (Expect::Array, false) => "an array",
            (Expect::Array, true) => "arrays",
            (Expect::Dictionary, false) => "a dictionary",
            (Expect::Dictionary, true) => "dictionaries",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Shape::Scalar(expect) => f.write_str(expect.describe(false)),
            Shape::ArrayOf(expect) => write!(f, "an array of {}", expect.describe(true)),
            Shape::DictOf(expect) => write!(f, "a dictionary of {}", expect.describe(true)),
        }
    }
}

/// `fontinfo.plist` keys renamed between format versions 1 and 2.
const FONTINFO_V1_RENAMES: &[(&str, &str)] = &[
    ("menuName", "styleMapFamilyName"),
    ("designer", "openTypeNameDesigner"),
    ("designerURL", "openTypeNameDesignerURL"),
    ("createdBy", "openTypeNameManufacturer"),
    ("vendorURL", "openTypeNameManufacturerURL"),
    ("license", "openTypeNameLicense"),
    ("licenseURL", "openTypeNameLicenseURL"),
    ("ttVersion", "openTypeNameVersion"),
    ("ttUniqueID", "openTypeNameUniqueID"),
    ("notice", "openTypeNameDescription"),
    ("ttVendor", "openTypeOS2VendorID"),
    ("weightValue", "openTypeOS2WeightClass"),
    ("fondID", "macintoshFONDFamilyID"),
    ("fondName", "macintoshFONDName"),
    ("uniqueID", "postscriptUniqueID"),
    ("fontName", "postscriptFontName"),
    ("fullName", "postscriptFullName"),
    ("slantAngle", "postscriptSlantAngle"),
    ("defaultWidth", "postscriptDefaultWidthX"),
    ("nominalWidth", "postscriptNominalWidthX"),
];

/// Format 1 keys with no unambiguous format 2 equivalent.
const FONTINFO_V1_DROPPED: &[&str] = &["msCharSet", "widthName"];

/// Renames format 1 `fontinfo.plist` keys in place.
pub(crate) fn upgrade_fontinfo_v1(info: &mut plist::Dictionary) {
    for (old, new) in FONTINFO_V1_RENAMES {
        if let Some(value) = info.remove(old) {
            log::debug!("renamed fontinfo key '{old}' to '{new}'");
            info.insert((*new).into(), value);
        }
    }
    if let Some(style) = info.remove("fontStyle") {
        let name = match style.as_signed_integer() {
            Some(64) => Some("regular"),
            Some(1) => Some("italic"),
            Some(32) => Some("bold"),
            Some(33) => Some("bold italic"),
            _ => None,
        };
        match name {
            Some(name) => {
                info.insert("styleMapStyleName".into(), plist::Value::String(name.into()));
            }
            None => log::warn!("dropping unrecognized fontinfo 'fontStyle' value {style:?}"),
        }
    }
    for key in FONTINFO_V1_DROPPED {
        if info.remove(key).is_some() {
            log::warn!("dropping format 1 fontinfo key '{key}'");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: Vec<(&str, Value)>) -> Dictionary {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn integer_flags_become_booleans() {
        let mut lib = dict(vec![
            ("com.typemytype.robofont.compileSettings.autohint", 1.into()),
            ("com.typemytype.robofont.compileSettings.decompose", 0.into()),
            ("com.typemytype.robofont.compileSettings.releaseMode", true.into()),
        ]);
        migrate(&mut lib, LibScope::Font);
        validate(&lib, LibScope::Font).unwrap();
        assert_eq!(lib["com.typemytype.robofont.compileSettings.autohint"], Value::Boolean(true));
        assert_eq!(lib["com.typemytype.robofont.compileSettings.decompose"], Value::Boolean(false));
        assert_eq!(lib["com.typemytype.robofont.compileSettings.releaseMode"], Value::Boolean(true));
    }

    #[test]
    fn other_integers_are_rejected() {
        let mut lib = dict(vec![("com.typemytype.robofont.compileSettings.checkOutlines", 2.into())]);
        migrate(&mut lib, LibScope::Font);
        let err = validate(&lib, LibScope::Font).unwrap_err();
        match err {
            LibError::TypeMismatch { key, found, .. } => {
                assert_eq!(key, "com.typemytype.robofont.compileSettings.checkOutlines");
                assert_eq!(found, ValueKind::Integer);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn guide_flags_become_booleans() {
        let guide = dict(vec![("isGlobal", 1.into()), ("x", 10.into())]);
        let mut lib = dict(vec![(ROBOFONT_GUIDES_KEY, vec![Value::from(guide)].into())]);
        migrate(&mut lib, LibScope::Font);
        validate(&lib, LibScope::Font).unwrap();
        let guides = lib[ROBOFONT_GUIDES_KEY].as_array().unwrap();
        assert_eq!(guides[0].as_dictionary().unwrap()["isGlobal"], Value::Boolean(true));
    }

    #[test]
    fn autohint_string_becomes_data() {
        let mut lib = dict(vec![(AUTOHINT_KEY, "hintset".into())]);
        migrate(&mut lib, LibScope::Glyph);
        validate(&lib, LibScope::Glyph).unwrap();
        assert_eq!(lib[AUTOHINT_KEY], Value::Data(b"hintset".to_vec()));
    }

    #[test]
    fn mark_is_copied_to_mark_color() {
        let mark: Vec<Value> = vec![1.into(), 0.5.into(), 0.into(), 1.into()];
        let mut lib = dict(vec![(ROBOFONT_MARK_KEY, mark.into())]);
        migrate(&mut lib, LibScope::Glyph);
        assert_eq!(lib[MARK_COLOR_KEY], Value::from("1,0.5,0,1"));
        assert!(lib.contains_key(ROBOFONT_MARK_KEY));

        let mark: Vec<Value> = vec![1.into(), 0.5.into(), 0.into(), 1.into()];
        let mut lib = dict(vec![(ROBOFONT_MARK_KEY, mark.into()), (MARK_COLOR_KEY, "0,0,0,1".into())]);
        migrate(&mut lib, LibScope::Glyph);
        assert_eq!(lib[MARK_COLOR_KEY], Value::from("0,0,0,1"));
    }

    #[test]
    fn glyph_order_must_hold_strings() {
        let lib = dict(vec![(GLYPH_ORDER_KEY, vec![Value::from("a"), Value::from(3)].into())]);
        let err = validate(&lib, LibScope::Font).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key 'public.glyphOrder' must hold an array of strings, found an integer"
        );
        // scopes don't leak into each other
        validate(&lib, LibScope::Glyph).unwrap();
    }

    #[test]
    fn fontinfo_v1_keys_are_renamed() {
        let mut info = plist::Dictionary::new();
        info.insert("menuName".into(), "Rofls".into());
        info.insert("fontStyle".into(), plist::Value::Integer(33.into()));
        info.insert("widthName".into(), "Medium (normal)".into());
        upgrade_fontinfo_v1(&mut info);
        assert_eq!(info.get("styleMapFamilyName").and_then(|v| v.as_string()), Some("Rofls"));
        assert_eq!(info.get("styleMapStyleName").and_then(|v| v.as_string()), Some("bold italic"));
        assert!(info.get("widthName").is_none());
        assert!(info.get("menuName").is_none());
    }
}
