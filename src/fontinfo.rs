//! The typed contents of `fontinfo.plist`.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::font::FormatVersion;
use crate::guideline::Guideline;
use crate::migration;
use crate::Error;

/// A signed integer field.
pub type Integer = i32;
/// An unsigned integer field.
pub type NonNegativeInteger = u32;
/// A list of bit numbers.
pub type Bitlist = Vec<u8>;

/// The contents of the [`fontinfo.plist`][] file, as defined by UFO version 3.
///
/// Every field is optional. Unknown keys are rejected on read.
///
/// [`fontinfo.plist`]: http://unifiedfontobject.org/versions/ufo3/fontinfo.plist/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FontInfo {
    // Sorted by key; serde writes fields in declaration order.
    pub ascender: Option<IntegerOrFloat>,
    pub cap_height: Option<IntegerOrFloat>,
    pub copyright: Option<String>,
    pub descender: Option<IntegerOrFloat>,
    pub family_name: Option<String>,
    pub guidelines: Option<Vec<Guideline>>,
    pub italic_angle: Option<IntegerOrFloat>,
    #[serde(rename = "macintoshFONDFamilyID")]
    pub macintosh_fond_family_id: Option<Integer>,
    #[serde(rename = "macintoshFONDName")]
    pub macintosh_fond_name: Option<String>,
    pub note: Option<String>,
    pub open_type_gasp_range_records: Option<Vec<GaspRangeRecord>>,
    pub open_type_head_created: Option<String>,
    pub open_type_head_flags: Option<Bitlist>,
    #[serde(rename = "openTypeHeadLowestRecPPEM")]
    pub open_type_head_lowest_rec_ppem: Option<NonNegativeInteger>,
    pub open_type_hhea_ascender: Option<Integer>,
    pub open_type_hhea_caret_offset: Option<Integer>,
    pub open_type_hhea_caret_slope_rise: Option<Integer>,
    pub open_type_hhea_caret_slope_run: Option<Integer>,
    pub open_type_hhea_descender: Option<Integer>,
    pub open_type_hhea_line_gap: Option<Integer>,
    pub open_type_name_compatible_full_name: Option<String>,
    pub open_type_name_description: Option<String>,
    #[serde(rename = "openTypeNameDesignerURL")]
    pub open_type_name_designer_url: Option<String>,
    pub open_type_name_designer: Option<String>,
    #[serde(rename = "openTypeNameLicenseURL")]
    pub open_type_name_license_url: Option<String>,
    pub open_type_name_license: Option<String>,
    #[serde(rename = "openTypeNameManufacturerURL")]
    pub open_type_name_manufacturer_url: Option<String>,
    pub open_type_name_manufacturer: Option<String>,
    pub open_type_name_preferred_family_name: Option<String>,
    pub open_type_name_preferred_subfamily_name: Option<String>,
    pub open_type_name_records: Option<Vec<NameRecord>>,
    pub open_type_name_sample_text: Option<String>,
    #[serde(rename = "openTypeNameUniqueID")]
    pub open_type_name_unique_id: Option<String>,
    pub open_type_name_version: Option<String>,
    #[serde(rename = "openTypeNameWWSFamilyName")]
    pub open_type_name_wws_family_name: Option<String>,
    #[serde(rename = "openTypeNameWWSSubfamilyName")]
    pub open_type_name_wws_subfamily_name: Option<String>,
    #[serde(rename = "openTypeOS2CodePageRanges")]
    pub open_type_os2_code_page_ranges: Option<Bitlist>,
    #[serde(rename = "openTypeOS2FamilyClass")]
    pub open_type_os2_family_class: Option<Os2FamilyClass>,
    #[serde(rename = "openTypeOS2Panose")]
    pub open_type_os2_panose: Option<Os2Panose>,
    #[serde(rename = "openTypeOS2Selection")]
    pub open_type_os2_selection: Option<Bitlist>,
    #[serde(rename = "openTypeOS2StrikeoutPosition")]
    pub open_type_os2_strikeout_position: Option<Integer>,
    #[serde(rename = "openTypeOS2StrikeoutSize")]
    pub open_type_os2_strikeout_size: Option<Integer>,
    #[serde(rename = "openTypeOS2SubscriptXOffset")]
    pub open_type_os2_subscript_x_offset: Option<Integer>,
    #[serde(rename = "openTypeOS2SubscriptXSize")]
    pub open_type_os2_subscript_x_size: Option<Integer>,
    #[serde(rename = "openTypeOS2SubscriptYOffset")]
    pub open_type_os2_subscript_y_offset: Option<Integer>,
    #[serde(rename = "openTypeOS2SubscriptYSize")]
    pub open_type_os2_subscript_y_size: Option<Integer>,
    #[serde(rename = "openTypeOS2SuperscriptXOffset")]
    pub open_type_os2_superscript_x_offset: Option<Integer>,
    #[serde(rename = "openTypeOS2SuperscriptXSize")]
    pub open_type_os2_superscript_x_size: Option<Integer>,
    #[serde(rename = "openTypeOS2SuperscriptYOffset")]
    pub open_type_os2_superscript_y_offset: Option<Integer>,
    #[serde(rename = "openTypeOS2SuperscriptYSize")]
    pub open_type_os2_superscript_y_size: Option<Integer>,
    #[serde(rename = "openTypeOS2Type")]
    pub open_type_os2_type: Option<Bitlist>,
    #[serde(rename = "openTypeOS2TypoAscender")]
    pub open_type_os2_typo_ascender: Option<Integer>,
    #[serde(rename = "openTypeOS2TypoDescender")]
    pub open_type_os2_typo_descender: Option<Integer>,
    #[serde(rename = "openTypeOS2TypoLineGap")]
    pub open_type_os2_typo_line_gap: Option<Integer>,
    #[serde(rename = "openTypeOS2UnicodeRanges")]
    pub open_type_os2_unicode_ranges: Option<Bitlist>,
    #[serde(rename = "openTypeOS2VendorID")]
    pub open_type_os2_vendor_id: Option<String>,
    #[serde(rename = "openTypeOS2WeightClass")]
    pub open_type_os2_weight_class: Option<NonNegativeInteger>,
    #[serde(rename = "openTypeOS2WidthClass")]
    pub open_type_os2_width_class: Option<Os2WidthClass>,
    #[serde(rename = "openTypeOS2WinAscent")]
    pub open_type_os2_win_ascent: Option<NonNegativeInteger>,
    #[serde(rename = "openTypeOS2WinDescent")]
    pub open_type_os2_win_descent: Option<NonNegativeInteger>,
    pub open_type_vhea_caret_offset: Option<Integer>,
    pub open_type_vhea_caret_slope_rise: Option<Integer>,
    pub open_type_vhea_caret_slope_run: Option<Integer>,
    pub open_type_vhea_vert_typo_ascender: Option<Integer>,
    pub open_type_vhea_vert_typo_descender: Option<Integer>,
    pub open_type_vhea_vert_typo_line_gap: Option<Integer>,
    pub postscript_blue_fuzz: Option<IntegerOrFloat>,
    pub postscript_blue_scale: Option<f64>,
    pub postscript_blue_shift: Option<IntegerOrFloat>,
    pub postscript_blue_values: Option<Vec<IntegerOrFloat>>,
    pub postscript_default_character: Option<String>,
    pub postscript_default_width_x: Option<IntegerOrFloat>,
    pub postscript_family_blues: Option<Vec<IntegerOrFloat>>,
    pub postscript_family_other_blues: Option<Vec<IntegerOrFloat>>,
    pub postscript_font_name: Option<String>,
    pub postscript_force_bold: Option<bool>,
    pub postscript_full_name: Option<String>,
    pub postscript_is_fixed_pitch: Option<bool>,
    pub postscript_nominal_width_x: Option<IntegerOrFloat>,
    pub postscript_other_blues: Option<Vec<IntegerOrFloat>>,
    pub postscript_slant_angle: Option<IntegerOrFloat>,
    pub postscript_stem_snap_h: Option<Vec<IntegerOrFloat>>,
    pub postscript_stem_snap_v: Option<Vec<IntegerOrFloat>>,
    pub postscript_underline_position: Option<IntegerOrFloat>,
    pub postscript_underline_thickness: Option<IntegerOrFloat>,
    #[serde(rename = "postscriptUniqueID")]
    pub postscript_unique_id: Option<Integer>,
    pub postscript_weight_name: Option<String>,
    pub postscript_windows_character_set: Option<PostscriptWindowsCharacterSet>,
    pub style_map_family_name: Option<String>,
    pub style_map_style_name: Option<StyleMapStyle>,
    pub style_name: Option<String>,
    pub trademark: Option<String>,
    pub units_per_em: Option<NonNegativeIntegerOrFloat>,
    pub version_major: Option<Integer>,
    pub version_minor: Option<NonNegativeInteger>,
    pub woff_major_version: Option<NonNegativeInteger>,
    pub woff_metadata_copyright: Option<WoffTextBlock>,
    pub woff_metadata_credits: Option<WoffMetadataCredits>,
    pub woff_metadata_description: Option<WoffTextBlock>,
    pub woff_metadata_extensions: Option<Vec<WoffMetadataExtension>>,
    pub woff_metadata_license: Option<WoffTextBlock>,
    pub woff_metadata_licensee: Option<WoffMetadataLicensee>,
    pub woff_metadata_trademark: Option<WoffTextBlock>,
    #[serde(rename = "woffMetadataUniqueID")]
    pub woff_metadata_unique_id: Option<WoffMetadataUniqueId>,
    pub woff_metadata_vendor: Option<WoffMetadataVendor>,
    pub woff_minor_version: Option<NonNegativeInteger>,
    pub x_height: Option<IntegerOrFloat>,
    pub year: Option<Integer>,
}

impl FontInfo {
    /// Builds font info from a parsed `fontinfo.plist`, upgrading format 1 keys.
    pub(crate) fn from_plist(mut dict: plist::Dictionary, format: FormatVersion) -> Result<FontInfo, plist::Error> {
        if format == FormatVersion::V1 {
            migration::upgrade_fontinfo_v1(&mut dict);
        }
        plist::from_value(&plist::Value::Dictionary(dict))
    }

    /// Checks the constraints that the type system does not express.
    ///
    /// Called before writing; see the [fontinfo specification][spec].
    ///
    /// [spec]: http://unifiedfontobject.org/versions/ufo3/fontinfo.plist/
    pub fn validate(&self) -> Result<(), Error> {
        fn fail(msg: impl Into<String>) -> Result<(), Error> {
            Err(Error::InvalidFontInfo(msg.into()))
        }

        if let Some(created) = &self.open_type_head_created {
            if !is_valid_head_created(created) {
                return fail(format!("openTypeHeadCreated '{created}' is not 'YYYY/MM/DD HH:MM:SS'"));
            }
        }

        if let Some(records) = &self.open_type_gasp_range_records {
            if records.windows(2).any(|pair| pair[0].range_max_ppem > pair[1].range_max_ppem) {
                return fail("openTypeGaspRangeRecords must be sorted by rangeMaxPPEM");
            }
        }

        if let Some(selection) = &self.open_type_os2_selection {
            if selection.iter().any(|bit| matches!(bit, 0 | 5 | 6)) {
                return fail("openTypeOS2Selection must not contain bits 0, 5 or 6");
            }
        }

        if let Some(class) = &self.open_type_os2_family_class {
            if class.class_id > 14 || class.subclass_id > 15 {
                return fail("openTypeOS2FamilyClass is out of range");
            }
        }

        let limits: [(&str, &Option<Vec<IntegerOrFloat>>, usize); 6] = [
            ("postscriptBlueValues", &self.postscript_blue_values, 14),
            ("postscriptOtherBlues", &self.postscript_other_blues, 10),
            ("postscriptFamilyBlues", &self.postscript_family_blues, 14),
            ("postscriptFamilyOtherBlues", &self.postscript_family_other_blues, 10),
            ("postscriptStemSnapH", &self.postscript_stem_snap_h, 12),
            ("postscriptStemSnapV", &self.postscript_stem_snap_v, 12),
        ];
        for (key, values, max) in limits {
            if values.as_ref().is_some_and(|v| v.len() > max) {
                return fail(format!("{key} holds more than {max} values"));
            }
        }

        if let Some(extensions) = &self.woff_metadata_extensions {
            if extensions.is_empty() {
                return fail("woffMetadataExtensions must not be empty");
            }
            let empty_item = extensions.iter().any(|ext| {
                ext.items.is_empty() || ext.items.iter().any(|item| item.names.is_empty() || item.values.is_empty())
            });
            if empty_item {
                return fail("woffMetadataExtensions items need names and values");
            }
        }
        if self.woff_metadata_credits.as_ref().is_some_and(|c| c.credits.is_empty()) {
            return fail("woffMetadataCredits must not be empty");
        }
        let blocks = [
            ("woffMetadataCopyright", &self.woff_metadata_copyright),
            ("woffMetadataDescription", &self.woff_metadata_description),
            ("woffMetadataTrademark", &self.woff_metadata_trademark),
        ];
        for (key, block) in blocks {
            if block.as_ref().is_some_and(|b| b.text.is_empty()) {
                return fail(format!("{key} must contain text"));
            }
        }

        Ok(())
    }
}

/// `YYYY/MM/DD HH:MM:SS`, without checking days against the month.
fn is_valid_head_created(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 19 {
        return false;
    }
    let separators = [(4, b'/'), (7, b'/'), (10, b' '), (13, b':'), (16, b':')];
    if separators.iter().any(|&(i, sep)| bytes[i] != sep) {
        return false;
    }
    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        let s = value.get(range)?;
        s.bytes().all(|b| b.is_ascii_digit()).then(|| s.parse().ok())?
    };
    matches!(
        (field(0..4), field(5..7), field(8..10), field(11..13), field(14..16), field(17..19)),
        (Some(_), Some(1..=12), Some(1..=31), Some(0..=23), Some(0..=59), Some(0..=59))
    )
}

/// A number that is written as an integer when it has no fractional part.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct IntegerOrFloat(f64);

impl IntegerOrFloat {
    pub fn new(value: f64) -> Self {
        IntegerOrFloat(value)
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn is_integer(&self) -> bool {
        self.0.fract() == 0.0
    }
}

impl From<i32> for IntegerOrFloat {
    fn from(value: i32) -> Self {
        IntegerOrFloat(value.into())
    }
}

impl From<f64> for IntegerOrFloat {
    fn from(value: f64) -> Self {
        IntegerOrFloat(value)
    }
}

impl Serialize for IntegerOrFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integer() && self.0.abs() < i64::MAX as f64 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for IntegerOrFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(IntegerOrFloat)
    }
}

/// An [`IntegerOrFloat`] that is never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NonNegativeIntegerOrFloat(IntegerOrFloat);

impl NonNegativeIntegerOrFloat {
    /// Returns `None` for negative values.
    pub fn new(value: f64) -> Option<Self> {
        (value >= 0.0).then_some(NonNegativeIntegerOrFloat(IntegerOrFloat(value)))
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }
}

impl<'de> Deserialize<'de> for NonNegativeIntegerOrFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        NonNegativeIntegerOrFloat::new(value)
            .ok_or_else(|| de::Error::custom(format!("expected a non-negative number, found {value}")))
    }
}

/// A [gasp range record](http://unifiedfontobject.org/versions/ufo3/fontinfo.plist/#gasp-range-record-format).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GaspRangeRecord {
    #[serde(rename = "rangeMaxPPEM")]
    pub range_max_ppem: NonNegativeInteger,
    pub range_gasp_behavior: Vec<GaspBehavior>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum GaspBehavior {
    Gridfit = 0,
    DoGray = 1,
    SymmetricGridfit = 2,
    SymmetricSmoothing = 3,
}

/// An entry of `openTypeNameRecords`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameRecord {
    #[serde(rename = "nameID")]
    pub name_id: NonNegativeInteger,
    #[serde(rename = "platformID")]
    pub platform_id: NonNegativeInteger,
    #[serde(rename = "encodingID")]
    pub encoding_id: NonNegativeInteger,
    #[serde(rename = "languageID")]
    pub language_id: NonNegativeInteger,
    pub string: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Os2WidthClass {
    UltraCondensed = 1,
    ExtraCondensed = 2,
    Condensed = 3,
    SemiCondensed = 4,
    Normal = 5,
    SemiExpanded = 6,
    Expanded = 7,
    ExtraExpanded = 8,
    UltraExpanded = 9,
}

/// `openTypeOS2FamilyClass`: a class and subclass ID, stored as a two-element array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct Os2FamilyClass {
    /// `0..=14`.
    pub class_id: u8,
    /// `0..=15`.
    pub subclass_id: u8,
}

impl From<[u8; 2]> for Os2FamilyClass {
    fn from([class_id, subclass_id]: [u8; 2]) -> Self {
        Os2FamilyClass { class_id, subclass_id }
    }
}

impl From<Os2FamilyClass> for [u8; 2] {
    fn from(class: Os2FamilyClass) -> Self {
        [class.class_id, class.subclass_id]
    }
}

/// `openTypeOS2Panose`, stored as a ten-element array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[NonNegativeInteger; 10]", into = "[NonNegativeInteger; 10]")]
pub struct Os2Panose {
    pub family_type: NonNegativeInteger,
    pub serif_style: NonNegativeInteger,
    pub weight: NonNegativeInteger,
    pub proportion: NonNegativeInteger,
    pub contrast: NonNegativeInteger,
    pub stroke_variation: NonNegativeInteger,
    pub arm_style: NonNegativeInteger,
    pub letterform: NonNegativeInteger,
    pub midline: NonNegativeInteger,
    pub x_height: NonNegativeInteger,
}

impl From<[NonNegativeInteger; 10]> for Os2Panose {
    fn from(v: [NonNegativeInteger; 10]) -> Self {
        Os2Panose {
            family_type: v[0],
            serif_style: v[1],
            weight: v[2],
            proportion: v[3],
            contrast: v[4],
            stroke_variation: v[5],
            arm_style: v[6],
            letterform: v[7],
            midline: v[8],
            x_height: v[9],
        }
    }
}

impl From<Os2Panose> for [NonNegativeInteger; 10] {
    fn from(p: Os2Panose) -> Self {
        [
            p.family_type,
            p.serif_style,
            p.weight,
            p.proportion,
            p.contrast,
            p.stroke_variation,
            p.arm_style,
            p.letterform,
            p.midline,
            p.x_height,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum PostscriptWindowsCharacterSet {
    Ansi = 1,
    Default = 2,
    Symbol = 3,
    Macintosh = 4,
    ShiftJis = 5,
    Hangul = 6,
    HangulJohab = 7,
    Gb2312 = 8,
    ChineseBig5 = 9,
    Greek = 10,
    Turkish = 11,
    Vietnamese = 12,
    Hebrew = 13,
    Arabic = 14,
    Baltic = 15,
    Bitstream = 16,
    Cyrillic = 17,
    Thai = 18,
    EasternEuropean = 19,
    Oem = 20,
}

/// `styleMapStyleName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleMapStyle {
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "bold italic")]
    BoldItalic,
}

/// Text direction of WOFF metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WoffDirection {
    Ltr,
    Rtl,
}

/// A localized piece of WOFF metadata text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<WoffDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// The copyright, description, license and trademark WOFF records.
///
/// Only the license uses `id`; only the description and license use `url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffTextBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: Vec<WoffText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataCredits {
    pub credits: Vec<WoffMetadataCredit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataCredit {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<WoffDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataExtension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub names: Vec<WoffText>,
    pub items: Vec<WoffMetadataExtensionItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataExtensionItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub names: Vec<WoffText>,
    pub values: Vec<WoffText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataLicensee {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<WoffDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataUniqueId {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WoffMetadataVendor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<WoffDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}
