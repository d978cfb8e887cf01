//! Writing out .glif files

use std::collections::HashSet;
use std::io::Write;

use base64::{engine::general_purpose::STANDARD as base64_standard, Engine};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::GlifWriteError;
use crate::glyph::{Anchor, GlifVersion, Glyph, Image};
use crate::guideline::{Guideline, Line};
use crate::pen::{AffineTransform, PenCall, PenError, PointPen, PointType, RecordingPointPen, ValidatingPointPen};
use crate::write::{finish_xml, WriteOptions};
use crate::{Color, Dictionary, Identifier, Lib, Value};

pub(crate) fn encode<F>(glyph: &Glyph, options: &WriteOptions, draw: F) -> Result<Vec<u8>, GlifWriteError>
where
    F: FnOnce(&mut dyn PointPen) -> Result<(), PenError>,
{
    let mut pen = ValidatingPointPen::new(RecordingPointPen::new());
    draw(&mut pen)?;
    let outline = pen.finish()?.into_calls();

    let mut ids = IdentifierSet::default();
    let mut writer = Writer::new_with_indent(Vec::new(), options.whitespace_char, options.whitespace_count);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut start = BytesStart::new("glyph");
    start.push_attribute(("name", glyph.name.as_str()));
    // Always written as format 2.
    start.push_attribute(("format", GlifVersion::V2.as_str()));
    writer.write_event(Event::Start(start))?;

    if glyph.width.is_some() || glyph.height.is_some() {
        let mut start = BytesStart::new("advance");
        if let Some(width) = glyph.width {
            start.push_attribute(("width", fmt_num(width).as_str()));
        }
        if let Some(height) = glyph.height {
            start.push_attribute(("height", fmt_num(height).as_str()));
        }
        writer.write_event(Event::Empty(start))?;
    }

    for codepoint in glyph.codepoints.iter() {
        let mut start = BytesStart::new("unicode");
        start.push_attribute(("hex", format!("{:04X}", codepoint as u32).as_str()));
        writer.write_event(Event::Empty(start))?;
    }

    if let Some(note) = &glyph.note {
        writer.write_event(Event::Start(BytesStart::new("note")))?;
        writer.write_event(Event::Text(BytesText::new(note)))?;
        writer.write_event(Event::End(BytesEnd::new("note")))?;
    }

    if let Some(image) = &glyph.image {
        writer.write_event(Event::Empty(image_start(image)))?;
    }

    for guideline in &glyph.guidelines {
        writer.write_event(Event::Empty(guideline_start(guideline, &mut ids)?))?;
    }

    for anchor in &glyph.anchors {
        writer.write_event(Event::Empty(anchor_start(anchor, &mut ids)?))?;
    }

    if !outline.is_empty() {
        write_outline(&mut writer, &outline, &mut ids)?;
    }

    if !glyph.lib.is_empty() {
        write_lib(&mut writer, &glyph.lib)?;
    }

    writer.write_event(Event::End(BytesEnd::new("glyph")))?;

    let mut buf = writer.into_inner();
    finish_xml(&mut buf, options);
    Ok(buf)
}

/// Tracks the identifiers already written, which must be unique within a glyph.
#[derive(Default)]
struct IdentifierSet(HashSet<String>);

impl IdentifierSet {
    fn check<'a>(&mut self, id: &'a str) -> Result<&'a str, GlifWriteError> {
        Identifier::new(id).map_err(|_| GlifWriteError::InvalidIdentifier(id.into()))?;
        if !self.0.insert(id.to_owned()) {
            return Err(GlifWriteError::DuplicateIdentifier(id.into()));
        }
        Ok(id)
    }

    fn push(&mut self, start: &mut BytesStart, id: Option<&str>) -> Result<(), GlifWriteError> {
        if let Some(id) = id {
            start.push_attribute(("identifier", self.check(id)?));
        }
        Ok(())
    }
}

fn write_outline<W: Write>(
    writer: &mut Writer<W>,
    calls: &[PenCall],
    ids: &mut IdentifierSet,
) -> Result<(), GlifWriteError> {
    writer.write_event(Event::Start(BytesStart::new("outline")))?;
    let mut calls = calls.iter().peekable();
    while let Some(call) = calls.next() {
        match call {
            PenCall::BeginPath { identifier } => {
                let mut start = BytesStart::new("contour");
                ids.push(&mut start, identifier.as_deref())?;
                if matches!(calls.peek(), Some(PenCall::EndPath)) {
                    calls.next();
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                }
            }
            PenCall::AddPoint { pt, segment_type, smooth, name, identifier } => {
                let mut start = BytesStart::new("point");
                start.push_attribute(("x", fmt_num(pt.0).as_str()));
                start.push_attribute(("y", fmt_num(pt.1).as_str()));
                if *segment_type != PointType::OffCurve {
                    start.push_attribute(("type", segment_type.as_str()));
                }
                if *smooth {
                    start.push_attribute(("smooth", "yes"));
                }
                if let Some(name) = name {
                    start.push_attribute(("name", name.as_str()));
                }
                ids.push(&mut start, identifier.as_deref())?;
                writer.write_event(Event::Empty(start))?;
            }
            PenCall::EndPath => writer.write_event(Event::End(BytesEnd::new("contour")))?,
            PenCall::AddComponent { base, transform, identifier } => {
                let mut start = BytesStart::new("component");
                start.push_attribute(("base", base.as_str()));
                push_transform(&mut start, transform);
                ids.push(&mut start, identifier.as_deref())?;
                writer.write_event(Event::Empty(start))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new("outline")))?;
    Ok(())
}

/// Writes the lib as a plist `<dict>` inside `<lib>`, through the same indenting writer.
fn write_lib<W: Write>(writer: &mut Writer<W>, lib: &Lib) -> Result<(), GlifWriteError> {
    writer.write_event(Event::Start(BytesStart::new("lib")))?;
    write_dict(writer, lib.as_dictionary())?;
    writer.write_event(Event::End(BytesEnd::new("lib")))?;
    Ok(())
}

/// Writes a dictionary with its keys sorted, as property list writers do.
fn write_dict<W: Write>(writer: &mut Writer<W>, dict: &Dictionary) -> Result<(), GlifWriteError> {
    let mut entries: Vec<_> = dict.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    writer.write_event(Event::Start(BytesStart::new("dict")))?;
    for (key, value) in entries {
        write_text_element(writer, "key", key)?;
        write_value(writer, value)?;
    }
    writer.write_event(Event::End(BytesEnd::new("dict")))?;
    Ok(())
}

fn write_value<W: Write>(writer: &mut Writer<W>, value: &Value) -> Result<(), GlifWriteError> {
    match value {
        Value::Boolean(true) => writer.write_event(Event::Empty(BytesStart::new("true")))?,
        Value::Boolean(false) => writer.write_event(Event::Empty(BytesStart::new("false")))?,
        Value::Integer(i) => write_text_element(writer, "integer", &i.to_string())?,
        Value::Real(r) => write_text_element(writer, "real", &r.to_string())?,
        Value::String(s) => write_text_element(writer, "string", s)?,
        Value::Data(d) => write_text_element(writer, "data", &base64_standard.encode(d))?,
        Value::Date(d) => write_text_element(writer, "date", &d.to_xml_format())?,
        Value::Array(items) => {
            writer.write_event(Event::Start(BytesStart::new("array")))?;
            for item in items {
                write_value(writer, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new("array")))?;
        }
        Value::Dictionary(dict) => write_dict(writer, dict)?,
    }
    Ok(())
}

/// Writes `<tag>text</tag>` on one line; the text is escaped but otherwise untouched.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<(), GlifWriteError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn guideline_start(guideline: &Guideline, ids: &mut IdentifierSet) -> Result<BytesStart<'static>, GlifWriteError> {
    let (x, y, angle) = guideline.line.to_parts();
    Line::from_parts(x, y, angle).map_err(GlifWriteError::InvalidGuideline)?;

    let mut start = BytesStart::new("guideline");
    if let Some(x) = x {
        start.push_attribute(("x", fmt_num(x).as_str()));
    }
    if let Some(y) = y {
        start.push_attribute(("y", fmt_num(y).as_str()));
    }
    if let Some(angle) = angle {
        start.push_attribute(("angle", fmt_num(angle).as_str()));
    }
    if let Some(name) = &guideline.name {
        start.push_attribute(("name", name.as_str()));
    }
    push_color(&mut start, guideline.color.as_ref());
    ids.push(&mut start, guideline.identifier.as_deref())?;
    Ok(start)
}

fn anchor_start(anchor: &Anchor, ids: &mut IdentifierSet) -> Result<BytesStart<'static>, GlifWriteError> {
    let mut start = BytesStart::new("anchor");
    start.push_attribute(("x", fmt_num(anchor.x).as_str()));
    start.push_attribute(("y", fmt_num(anchor.y).as_str()));
    if let Some(name) = &anchor.name {
        start.push_attribute(("name", name.as_str()));
    }
    push_color(&mut start, anchor.color.as_ref());
    ids.push(&mut start, anchor.identifier.as_deref())?;
    Ok(start)
}

fn image_start(image: &Image) -> BytesStart<'static> {
    let mut start = BytesStart::new("image");
    start.push_attribute(("fileName", image.file_name.as_str()));
    push_transform(&mut start, &image.transform);
    push_color(&mut start, image.color.as_ref());
    start
}

fn push_color(start: &mut BytesStart, color: Option<&Color>) {
    if let Some(color) = color {
        start.push_attribute(("color", color.to_rgba_string().as_str()));
    }
}

/// Pushes only the fields that differ from the identity transform.
fn push_transform(start: &mut BytesStart, transform: &AffineTransform) {
    let identity = AffineTransform::identity();
    let fields = [
        ("xScale", transform.x_scale, identity.x_scale),
        ("xyScale", transform.xy_scale, identity.xy_scale),
        ("yxScale", transform.yx_scale, identity.yx_scale),
        ("yScale", transform.y_scale, identity.y_scale),
        ("xOffset", transform.x_offset, identity.x_offset),
        ("yOffset", transform.y_offset, identity.y_offset),
    ];
    for (key, value, default) in fields {
        if value != default {
            start.push_attribute((key, fmt_num(value).as_str()));
        }
    }
}

/// Formats a number with the shortest representation, integral values without a fraction.
fn fmt_num(value: f64) -> String {
    // no negative zero
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::glif::{read_glyph, write_glyph, write_glyph_with_options};
    use crate::Name;

    fn draw_square(pen: &mut dyn PointPen) -> Result<(), PenError> {
        pen.begin_path(Some("contour0"))?;
        pen.add_point((0.0, 0.0), PointType::Line, false, None, None)?;
        pen.add_point((0.0, 700.0), PointType::Line, false, None, None)?;
        pen.add_point((500.0, 700.0), PointType::Line, false, Some("corner"), None)?;
        pen.add_point((500.0, 0.0), PointType::Line, false, None, None)?;
        pen.end_path()
    }

    #[test]
    fn serialize_full_glyph() {
        let mut glyph = Glyph::new(Name::new_raw("a"));
        glyph.width = Some(500.0);
        glyph.codepoints.insert('a');
        glyph.note = Some("draft & review".into());
        glyph.anchors.push(Anchor::new(250.0, -0.0, Some("top".into())));
        glyph.lib.insert("public.markColor", "1,0,0,1");

        let options = WriteOptions::default().whitespace("  ");
        let bytes = write_glyph_with_options(&glyph, &options, |pen| {
            draw_square(pen)?;
            pen.add_component("acute", AffineTransform::translate(100.0, 0.0), None)
        })
        .unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        expect![[r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <glyph name="a" format="2">
              <advance width="500"/>
              <unicode hex="0061"/>
              <note>draft &amp; review</note>
              <anchor x="250" y="0" name="top"/>
              <outline>
                <contour identifier="contour0">
                  <point x="0" y="0" type="line"/>
                  <point x="0" y="700" type="line"/>
                  <point x="500" y="700" type="line" name="corner"/>
                  <point x="500" y="0" type="line"/>
                </contour>
                <component base="acute" xOffset="100"/>
              </outline>
              <lib>
                <dict>
                  <key>public.markColor</key>
                  <string>1,0,0,1</string>
                </dict>
              </lib>
            </glyph>
        "#]]
        .assert_eq(&xml);
    }

    #[test]
    fn round_trip_through_pens() {
        let mut glyph = Glyph::new(Name::new_raw("b"));
        glyph.height = Some(1000.0);
        let bytes = write_glyph(&glyph, |pen| {
            draw_square(pen)?;
            pen.begin_path(None)?;
            pen.add_point((10.0, 10.0), PointType::OffCurve, false, None, None)?;
            pen.add_point((20.0, 20.0), PointType::Curve, true, None, Some("pt1"))?;
            pen.end_path()
        })
        .unwrap();

        let mut first = RecordingPointPen::new();
        let parsed = read_glyph(&bytes, &mut first).unwrap();
        assert_eq!(parsed.height, Some(1000.0));
        assert_eq!(parsed.width, None);

        let again = write_glyph(&parsed, |pen| first.replay(pen)).unwrap();
        assert_eq!(String::from_utf8_lossy(&bytes), String::from_utf8_lossy(&again));
    }

    #[test]
    fn glyph_lib_text_is_preserved() {
        let mut nested = crate::Dictionary::new();
        nested.insert("z".into(), Value::from(u64::MAX));
        nested.insert("a".into(), Value::Array(vec![Value::from(""), Value::from("  padded  ")]));
        nested.insert("empty".into(), Value::Dictionary(crate::Dictionary::new()));

        let mut glyph = Glyph::new(Name::new_raw("a"));
        glyph.lib.insert("com.example.note", "line one\nline two\n\tindented & <escaped>");
        glyph.lib.insert("com.example.nested", nested);
        glyph.lib.insert("com.example.blob", Value::Data(vec![0, 1, 2, 255]));
        glyph.lib.insert("com.example.flag", false);

        for options in [WriteOptions::default(), WriteOptions::default().whitespace("    ")] {
            let bytes = write_glyph_with_options(&glyph, &options, |_| Ok(())).unwrap();
            let parsed = read_glyph(&bytes, &mut RecordingPointPen::new()).unwrap();
            assert_eq!(parsed.lib, glyph.lib);
        }
    }

    #[test]
    fn empty_contour_is_self_closing() {
        let glyph = Glyph::new(Name::new_raw("empty"));
        let bytes = write_glyph(&glyph, |pen| {
            pen.begin_path(None)?;
            pen.end_path()
        })
        .unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.contains("<contour/>"), "{xml}");
    }

    #[test]
    fn no_outline_without_calls() {
        let glyph = Glyph::new(Name::new_raw("space"));
        let xml = String::from_utf8(write_glyph(&glyph, |_| Ok(())).unwrap()).unwrap();
        assert!(!xml.contains("outline"));
        assert!(!xml.contains("lib"));
    }

    #[test]
    fn rejects_bad_identifiers() {
        let glyph = Glyph::new(Name::new_raw("a"));
        let err = write_glyph(&glyph, |pen| {
            pen.add_component("b", AffineTransform::identity(), Some("same"))?;
            pen.add_component("c", AffineTransform::identity(), Some("same"))
        })
        .unwrap_err();
        assert!(matches!(err, GlifWriteError::DuplicateIdentifier(id) if id == "same"));

        let err = write_glyph(&glyph, |pen| pen.add_component("b", AffineTransform::identity(), Some("")))
            .unwrap_err();
        assert!(matches!(err, GlifWriteError::InvalidIdentifier(_)));
    }

    #[test]
    fn rejects_invalid_outline() {
        let glyph = Glyph::new(Name::new_raw("a"));
        let err = write_glyph(&glyph, |pen| {
            pen.begin_path(None)?;
            pen.add_point((0.0, 0.0), PointType::Line, false, None, None)
        })
        .unwrap_err();
        assert!(matches!(err, GlifWriteError::Pen(PenError::UnfinishedDrawing)));
    }

    #[test]
    fn callback_errors_propagate() {
        let glyph = Glyph::new(Name::new_raw("a"));
        let err = write_glyph(&glyph, |_| Err(PenError::Rejected("no".into()))).unwrap_err();
        assert!(matches!(err, GlifWriteError::Pen(PenError::Rejected(_))));
    }

    #[test]
    fn single_quote_declaration() {
        let glyph = Glyph::new(Name::new_raw("a"));
        let options = WriteOptions::default().quote_char(crate::QuoteChar::Single);
        let bytes = write_glyph_with_options(&glyph, &options, |_| Ok(())).unwrap();
        assert!(bytes.starts_with(b"<?xml version='1.0' encoding='UTF-8'?>"));
    }
}
