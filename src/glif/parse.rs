use std::collections::HashSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::GlifLoadError;
use crate::glyph::{Anchor, GlifVersion, Glyph, Image};
use crate::guideline::{Guideline, Line};
use crate::migration::LibScope;
use crate::pen::{AffineTransform, PointPen, PointType, RecordingPointPen, ValidatingPointPen};
use crate::{Color, Identifier, Lib, Name};

pub(crate) struct GlifParser<'a> {
    glyph: Glyph,
    seen_identifiers: HashSet<Identifier>,
    /// The outline is held back until the whole file has parsed.
    pen: ValidatingPointPen<RecordingPointPen>,
    raw_xml: &'a [u8],
}

/// A point, buffered until its contour is complete.
struct RawPoint {
    pt: (f64, f64),
    typ: PointType,
    smooth: bool,
    name: Option<String>,
    identifier: Option<Identifier>,
}

impl<'a> GlifParser<'a> {
    pub(crate) fn from_xml(xml: &'a [u8], pen: &mut dyn PointPen) -> Result<Glyph, GlifLoadError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let glyph = parse_first_element(&mut reader)?;
        let mut parser = GlifParser {
            glyph,
            seen_identifiers: HashSet::new(),
            pen: ValidatingPointPen::new(RecordingPointPen::new()),
            raw_xml: xml,
        };
        parser.parse_body(&mut reader)?;
        let outline = parser.pen.finish().map_err(GlifLoadError::Pen)?;
        outline.replay(pen).map_err(GlifLoadError::Pen)?;
        Ok(parser.glyph)
    }

    fn is_v1(&self) -> bool {
        self.glyph.format == GlifVersion::V1
    }

    fn parse_body(&mut self, reader: &mut Reader<&'a [u8]>) -> Result<(), GlifLoadError> {
        let mut seen_advance = false;
        let mut seen_image = false;
        let mut seen_lib = false;
        let mut seen_note = false;
        let mut seen_outline = false;

        loop {
            match reader.read_event().map_err(GlifLoadError::Xml)? {
                // outline, lib and note are expected to be start element tags.
                Event::Start(start) => match start.name().as_ref() {
                    b"outline" => {
                        once(&mut seen_outline, "outline")?;
                        no_attributes("outline", &start)?;
                        self.parse_outline(reader)?;
                    }
                    b"lib" => {
                        once(&mut seen_lib, "lib")?;
                        self.parse_lib(reader)?;
                    }
                    b"note" => {
                        if self.is_v1() {
                            return Err(GlifLoadError::UnexpectedV1Element("note"));
                        }
                        once(&mut seen_note, "note")?;
                        self.parse_note(reader)?;
                    }
                    other => return Err(GlifLoadError::UnexpectedElement("glyph", b2s(other))),
                },
                // The rest are expected to be empty element tags, with attributes.
                Event::Empty(start) => match start.name().as_ref() {
                    b"outline" => {
                        once(&mut seen_outline, "outline")?;
                        no_attributes("outline", &start)?;
                    }
                    b"lib" => once(&mut seen_lib, "lib")?,
                    b"note" => {
                        if self.is_v1() {
                            return Err(GlifLoadError::UnexpectedV1Element("note"));
                        }
                        once(&mut seen_note, "note")?;
                    }
                    b"advance" => {
                        once(&mut seen_advance, "advance")?;
                        self.parse_advance(&start)?;
                    }
                    b"unicode" => self.parse_unicode(&start)?,
                    b"anchor" => {
                        if self.is_v1() {
                            return Err(GlifLoadError::UnexpectedV1Element("anchor"));
                        }
                        self.parse_anchor(&start)?;
                    }
                    b"guideline" => {
                        if self.is_v1() {
                            return Err(GlifLoadError::UnexpectedV1Element("guideline"));
                        }
                        self.parse_guideline(&start)?;
                    }
                    b"image" => {
                        if self.is_v1() {
                            return Err(GlifLoadError::UnexpectedV1Element("image"));
                        }
                        once(&mut seen_image, "image")?;
                        self.parse_image(&start)?;
                    }
                    other => return Err(GlifLoadError::UnexpectedElement("glyph", b2s(other))),
                },
                Event::End(end) if end.name().as_ref() == b"glyph" => break,
                Event::Comment(_) => (),
                Event::Eof => return Err(GlifLoadError::UnexpectedEof),
                _ => return Err(GlifLoadError::MissingCloseTag("glyph")),
            }
        }
        Ok(())
    }

    fn parse_outline(&mut self, reader: &mut Reader<&'a [u8]>) -> Result<(), GlifLoadError> {
        loop {
            match reader.read_event().map_err(GlifLoadError::Xml)? {
                Event::Start(start) => match start.name().as_ref() {
                    b"contour" => {
                        let identifier = self.parse_contour_attributes(&start)?;
                        let points = self.parse_points(reader)?;
                        self.draw_contour(identifier, points)?;
                    }
                    other => return Err(GlifLoadError::UnexpectedElement("outline", b2s(other))),
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"contour" => {
                        let identifier = self.parse_contour_attributes(&start)?;
                        self.draw_contour(identifier, Vec::new())?;
                    }
                    b"component" => self.parse_component(&start)?,
                    other => return Err(GlifLoadError::UnexpectedElement("outline", b2s(other))),
                },
                Event::End(end) if end.name().as_ref() == b"outline" => break,
                Event::Comment(_) => (),
                Event::Eof => return Err(GlifLoadError::UnexpectedEof),
                _ => return Err(GlifLoadError::MissingCloseTag("outline")),
            }
        }
        Ok(())
    }

    fn parse_contour_attributes(&mut self, start: &BytesStart) -> Result<Option<Identifier>, GlifLoadError> {
        let mut identifier = None;
        for_each_attr(start, |key, value| {
            if self.is_v1() {
                return Err(GlifLoadError::UnexpectedV1Attributes("contour"));
            }
            match key {
                b"identifier" => identifier = Some(self.parse_identifier(value)?),
                _ => return Err(GlifLoadError::UnexpectedAttribute("contour", b2s(key))),
            }
            Ok(())
        })?;
        Ok(identifier)
    }

    fn parse_points(&mut self, reader: &mut Reader<&'a [u8]>) -> Result<Vec<RawPoint>, GlifLoadError> {
        let mut points = Vec::new();
        loop {
            match reader.read_event().map_err(GlifLoadError::Xml)? {
                Event::End(end) if end.name().as_ref() == b"contour" => break,
                Event::Empty(start) if start.name().as_ref() == b"point" => {
                    points.push(self.parse_point(&start)?);
                }
                Event::Empty(start) | Event::Start(start) => {
                    return Err(GlifLoadError::UnexpectedElement("contour", b2s(start.name().as_ref())))
                }
                Event::Comment(_) => (),
                Event::Eof => return Err(GlifLoadError::UnexpectedEof),
                _ => return Err(GlifLoadError::MissingCloseTag("contour")),
            }
        }
        Ok(points)
    }

    /// Sends a complete contour to the pen, or turns it into an anchor.
    fn draw_contour(&mut self, identifier: Option<Identifier>, points: Vec<RawPoint>) -> Result<(), GlifLoadError> {
        // Format 1 stores anchors as single-point contours.
        if self.is_v1() {
            if let [RawPoint { pt: (x, y), typ: PointType::Move, name: Some(name), .. }] = points.as_slice() {
                self.glyph.anchors.push(Anchor::new(*x, *y, Some(name.clone())));
                return Ok(());
            }
        }
        let pen = &mut self.pen;
        pen.begin_path(identifier.as_deref()).map_err(GlifLoadError::Pen)?;
        for point in &points {
            pen.add_point(
                point.pt,
                point.typ,
                point.smooth,
                point.name.as_deref(),
                point.identifier.as_deref(),
            )
            .map_err(GlifLoadError::Pen)?;
        }
        pen.end_path().map_err(GlifLoadError::Pen)
    }

    fn parse_identifier(&mut self, value: &str) -> Result<Identifier, GlifLoadError> {
        if self.is_v1() {
            return Err(GlifLoadError::UnexpectedV1Identifier);
        }
        let id = Identifier::new(value).map_err(|_| GlifLoadError::InvalidIdentifier(value.into()))?;
        if !self.seen_identifiers.insert(id.clone()) {
            return Err(GlifLoadError::DuplicateIdentifier(value.into()));
        }
        Ok(id)
    }

    fn parse_component(&mut self, start: &BytesStart) -> Result<(), GlifLoadError> {
        let mut base: Option<String> = None;
        let mut identifier: Option<Identifier> = None;
        let mut transform = AffineTransform::default();

        for_each_attr(start, |key, value| {
            match key {
                b"base" => {
                    if value.is_empty() {
                        return Err(GlifLoadError::ComponentEmptyBase);
                    }
                    base = Some(value.to_owned());
                }
                b"identifier" => identifier = Some(self.parse_identifier(value)?),
                _ => {
                    if !set_transform_field(&mut transform, key, value)? {
                        return Err(GlifLoadError::UnexpectedAttribute("component", b2s(key)));
                    }
                }
            }
            Ok(())
        })?;

        let base = base.ok_or(GlifLoadError::ComponentMissingBase)?;
        self.pen
            .add_component(&base, transform, identifier.as_deref())
            .map_err(GlifLoadError::Pen)
    }

    fn parse_lib(&mut self, reader: &mut Reader<&'a [u8]>) -> Result<(), GlifLoadError> {
        // The plist crate uses its own XML parser, so hand it the precise
        // slice of the raw buffer holding the dict.
        let (start, end) = skip_to_end(reader, b"lib", "lib")?;
        let plist_slice = &self.raw_xml[start..end];
        let dict = plist::Value::from_reader_xml(plist_slice)
            .map_err(|e| GlifLoadError::Lib(crate::error::LibError::Parse(e)))?
            .into_dictionary()
            .ok_or(GlifLoadError::Lib(crate::error::LibError::NotADictionary))?;
        self.glyph.lib = Lib::from_plist_dictionary(dict, LibScope::Glyph).map_err(GlifLoadError::Lib)?;
        Ok(())
    }

    fn parse_note(&mut self, reader: &mut Reader<&'a [u8]>) -> Result<(), GlifLoadError> {
        let (start, end) = skip_to_end(reader, b"note", "note")?;
        let raw = std::str::from_utf8(&self.raw_xml[start..end]).map_err(GlifLoadError::Utf8)?;
        let text = quick_xml::escape::unescape(raw).map_err(GlifLoadError::Escape)?;
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        self.glyph.note = Some(lines.join("\n"));
        Ok(())
    }

    fn parse_point(&mut self, start: &BytesStart) -> Result<RawPoint, GlifLoadError> {
        let mut name: Option<String> = None;
        let mut x: Option<f64> = None;
        let mut y: Option<f64> = None;
        let mut typ = PointType::OffCurve;
        let mut identifier: Option<Identifier> = None;
        let mut smooth = false;

        for_each_attr(start, |key, value| {
            match key {
                b"x" => x = Some(parse_coordinate(value)?),
                b"y" => y = Some(parse_coordinate(value)?),
                b"name" => name = Some(value.to_owned()),
                b"type" => {
                    typ = value.parse().map_err(|_| GlifLoadError::UnknownPointType(value.into()))?;
                }
                b"smooth" => smooth = value == "yes",
                b"identifier" => identifier = Some(self.parse_identifier(value)?),
                _ => return Err(GlifLoadError::UnexpectedAttribute("point", b2s(key))),
            }
            Ok(())
        })?;

        match (x, y) {
            (Some(x), Some(y)) => Ok(RawPoint { pt: (x, y), typ, smooth, name, identifier }),
            _ => Err(GlifLoadError::InvalidPoint),
        }
    }

    fn parse_advance(&mut self, start: &BytesStart) -> Result<(), GlifLoadError> {
        let glyph = &mut self.glyph;
        for_each_attr(start, |key, value| {
            let parsed = || value.parse::<f64>().map_err(|e| GlifLoadError::InvalidAdvance(value.into(), e));
            match key {
                b"width" => glyph.width = Some(parsed()?),
                b"height" => glyph.height = Some(parsed()?),
                _ => return Err(GlifLoadError::UnexpectedAttribute("advance", b2s(key))),
            }
            Ok(())
        })
    }

    fn parse_unicode(&mut self, start: &BytesStart) -> Result<(), GlifLoadError> {
        let codepoints = &mut self.glyph.codepoints;
        for_each_attr(start, |key, value| {
            match key {
                b"hex" => {
                    let chr = u32::from_str_radix(value, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| GlifLoadError::BadUnicodeValue(value.into()))?;
                    codepoints.insert(chr);
                }
                _ => return Err(GlifLoadError::UnexpectedAttribute("unicode", b2s(key))),
            }
            Ok(())
        })
    }

    fn parse_anchor(&mut self, start: &BytesStart) -> Result<(), GlifLoadError> {
        let mut x: Option<f64> = None;
        let mut y: Option<f64> = None;
        let mut name: Option<String> = None;
        let mut color: Option<Color> = None;
        let mut identifier: Option<Identifier> = None;

        for_each_attr(start, |key, value| {
            match key {
                b"x" => x = Some(parse_coordinate(value)?),
                b"y" => y = Some(parse_coordinate(value)?),
                b"name" => name = Some(value.to_owned()),
                b"color" => color = Some(parse_color(value)?),
                b"identifier" => identifier = Some(self.parse_identifier(value)?),
                _ => return Err(GlifLoadError::UnexpectedAttribute("anchor", b2s(key))),
            }
            Ok(())
        })?;

        match (x, y) {
            (Some(x), Some(y)) => {
                self.glyph.anchors.push(Anchor { x, y, name, color, identifier });
                Ok(())
            }
            _ => Err(GlifLoadError::InvalidAnchor),
        }
    }

    fn parse_guideline(&mut self, start: &BytesStart) -> Result<(), GlifLoadError> {
        let mut x: Option<f64> = None;
        let mut y: Option<f64> = None;
        let mut angle: Option<f64> = None;
        let mut name: Option<String> = None;
        let mut color: Option<Color> = None;
        let mut identifier: Option<Identifier> = None;

        for_each_attr(start, |key, value| {
            match key {
                b"x" => x = Some(parse_coordinate(value)?),
                b"y" => y = Some(parse_coordinate(value)?),
                b"angle" => {
                    angle = Some(value.parse().map_err(|e| GlifLoadError::InvalidAngle(value.into(), e))?)
                }
                b"name" => name = Some(value.to_owned()),
                b"color" => color = Some(parse_color(value)?),
                b"identifier" => identifier = Some(self.parse_identifier(value)?),
                _ => return Err(GlifLoadError::UnexpectedAttribute("guideline", b2s(key))),
            }
            Ok(())
        })?;

        let line = Line::from_parts(x, y, angle).map_err(GlifLoadError::InvalidGuideline)?;
        self.glyph.guidelines.push(Guideline::new(line, name, color, identifier));
        Ok(())
    }

    fn parse_image(&mut self, start: &BytesStart) -> Result<(), GlifLoadError> {
        let mut file_name: Option<String> = None;
        let mut color: Option<Color> = None;
        let mut transform = AffineTransform::default();

        for_each_attr(start, |key, value| {
            match key {
                b"fileName" => file_name = Some(value.to_owned()),
                b"color" => color = Some(parse_color(value)?),
                _ => {
                    if !set_transform_field(&mut transform, key, value)? {
                        return Err(GlifLoadError::UnexpectedAttribute("image", b2s(key)));
                    }
                }
            }
            Ok(())
        })?;

        let file_name = file_name.ok_or(GlifLoadError::ImageMissingFilename)?;
        self.glyph.image = Some(Image { file_name, color, transform });
        Ok(())
    }
}

fn parse_first_element(reader: &mut Reader<&[u8]>) -> Result<Glyph, GlifLoadError> {
    loop {
        match reader.read_event().map_err(GlifLoadError::Xml)? {
            Event::Comment(_) | Event::Decl(_) | Event::DocType(_) | Event::PI(_) => (),
            Event::Start(start) if start.name().as_ref() == b"glyph" => {
                let mut name: Option<String> = None;
                let mut format: Option<GlifVersion> = None;
                for_each_attr(&start, |key, value| {
                    match key {
                        b"name" => name = Some(value.to_owned()),
                        b"format" => format = Some(parse_format(value)?),
                        b"formatMinor" => (),
                        _ => return Err(GlifLoadError::UnexpectedAttribute("glyph", b2s(key))),
                    }
                    Ok(())
                })?;
                return match (name, format) {
                    (Some(name), Some(format)) => {
                        let name = Name::try_from(name).map_err(GlifLoadError::InvalidName)?;
                        let mut glyph = Glyph::new(name);
                        glyph.format = format;
                        Ok(glyph)
                    }
                    _ => Err(GlifLoadError::WrongFirstElement),
                };
            }
            Event::Eof => return Err(GlifLoadError::UnexpectedEof),
            _ => return Err(GlifLoadError::WrongFirstElement),
        }
    }
}

/// Consumes events up to the closing `tag`, returning the byte range of the content.
fn skip_to_end(
    reader: &mut Reader<&[u8]>,
    tag: &[u8],
    name: &'static str,
) -> Result<(usize, usize), GlifLoadError> {
    let start = reader.buffer_position() as usize;
    let mut end = start;
    loop {
        match reader.read_event().map_err(GlifLoadError::Xml)? {
            Event::End(e) if e.name().as_ref() == tag => break,
            Event::Eof => return Err(GlifLoadError::MissingCloseTag(name)),
            _ => end = reader.buffer_position() as usize,
        }
    }
    Ok((start, end))
}

fn once(seen: &mut bool, name: &'static str) -> Result<(), GlifLoadError> {
    if std::mem::replace(seen, true) {
        Err(GlifLoadError::DuplicateElement(name))
    } else {
        Ok(())
    }
}

fn parse_format(value: &str) -> Result<GlifVersion, GlifLoadError> {
    match value.trim() {
        "1" => Ok(GlifVersion::V1),
        "2" => Ok(GlifVersion::V2),
        _ => Err(GlifLoadError::UnsupportedGlifVersion(value.into())),
    }
}

/// Calls `f` with the key and unescaped value of every attribute.
fn for_each_attr(
    start: &BytesStart,
    mut f: impl FnMut(&[u8], &str) -> Result<(), GlifLoadError>,
) -> Result<(), GlifLoadError> {
    for attr in start.attributes() {
        let attr = attr.map_err(GlifLoadError::Attr)?;
        let raw = std::str::from_utf8(&attr.value).map_err(GlifLoadError::Utf8)?;
        let value = quick_xml::escape::unescape(raw).map_err(GlifLoadError::Escape)?;
        f(attr.key.as_ref(), &value)?;
    }
    Ok(())
}

fn no_attributes(element: &'static str, start: &BytesStart) -> Result<(), GlifLoadError> {
    for_each_attr(start, |key, _| Err(GlifLoadError::UnexpectedAttribute(element, b2s(key))))
}

/// Sets the matching field of `transform`, returning `false` for keys that are not transform fields.
fn set_transform_field(transform: &mut AffineTransform, key: &[u8], value: &str) -> Result<bool, GlifLoadError> {
    let field = match key {
        b"xScale" => &mut transform.x_scale,
        b"xyScale" => &mut transform.xy_scale,
        b"yxScale" => &mut transform.yx_scale,
        b"yScale" => &mut transform.y_scale,
        b"xOffset" => &mut transform.x_offset,
        b"yOffset" => &mut transform.y_offset,
        _ => return Ok(false),
    };
    *field = value.parse().map_err(|e| GlifLoadError::InvalidTransformation(value.into(), e))?;
    Ok(true)
}

fn parse_coordinate(value: &str) -> Result<f64, GlifLoadError> {
    value.parse().map_err(|e| GlifLoadError::InvalidCoordinate(value.into(), e))
}

fn parse_color(value: &str) -> Result<Color, GlifLoadError> {
    value.parse().map_err(|_| GlifLoadError::InvalidColor(value.into()))
}

fn b2s(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}
