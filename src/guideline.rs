use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, SerializeMap, Serializer};

use crate::{Color, Identifier};

/// A guideline, in a glyph or in font info.
#[derive(Debug, Clone, PartialEq)]
pub struct Guideline {
    /// The line itself.
    pub line: Line,
    /// An arbitrary name for the guideline.
    pub name: Option<String>,
    /// The color of the line.
    pub color: Option<Color>,
    /// Unique identifier for the guideline.
    pub identifier: Option<Identifier>,
}

/// An infinite line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line {
    /// A vertical line, passing through a given `x` coordinate.
    Vertical(f64),
    /// A horizontal line, passing through a given `y` coordinate.
    Horizontal(f64),
    /// An angled line passing through `(x, y)` at `degrees` degrees counter-clockwise
    /// to the horizontal.
    Angle {
        /// x coordinate.
        x: f64,
        /// y coordinate.
        y: f64,
        /// angle degrees, `0..=360`.
        degrees: f64,
    },
}

/// Why a combination of guideline coordinates is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidGuideline {
    #[error("x or y must be present in a guideline")]
    MissingCoordinate,
    #[error("angle must be specified exactly when both x and y are specified")]
    AngleMismatch,
    #[error("angle must be between 0 and 360 degrees")]
    AngleOutOfRange,
}

impl Guideline {
    pub fn new(line: Line, name: Option<String>, color: Option<Color>, identifier: Option<Identifier>) -> Self {
        Guideline { line, name, color, identifier }
    }
}

impl Line {
    /// Builds a line from the optional `x`, `y` and `angle` attributes.
    pub fn from_parts(x: Option<f64>, y: Option<f64>, angle: Option<f64>) -> Result<Line, InvalidGuideline> {
        match (x, y, angle) {
            (Some(x), None, None) => Ok(Line::Vertical(x)),
            (None, Some(y), None) => Ok(Line::Horizontal(y)),
            (Some(x), Some(y), Some(degrees)) => {
                if !(0.0..=360.0).contains(&degrees) {
                    return Err(InvalidGuideline::AngleOutOfRange);
                }
                Ok(Line::Angle { x, y, degrees })
            }
            (None, None, _) => Err(InvalidGuideline::MissingCoordinate),
            _ => Err(InvalidGuideline::AngleMismatch),
        }
    }

    /// The `x`, `y` and `angle` attributes of the line.
    pub fn to_parts(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        match *self {
            Line::Vertical(x) => (Some(x), None, None),
            Line::Horizontal(y) => (None, Some(y), None),
            Line::Angle { x, y, degrees } => (Some(x), Some(y), Some(degrees)),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGuideline {
    x: Option<f64>,
    y: Option<f64>,
    angle: Option<f64>,
    name: Option<String>,
    color: Option<Color>,
    identifier: Option<Identifier>,
}

impl Serialize for Guideline {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Line::Angle { degrees, .. } = self.line {
            if !(0.0..=360.0).contains(&degrees) {
                return Err(ser::Error::custom(InvalidGuideline::AngleOutOfRange));
            }
        }
        let (x, y, angle) = self.line.to_parts();
        let mut map = serializer.serialize_map(None)?;
        if let Some(x) = x {
            map.serialize_entry("x", &x)?;
        }
        if let Some(y) = y {
            map.serialize_entry("y", &y)?;
        }
        if let Some(angle) = angle {
            map.serialize_entry("angle", &angle)?;
        }
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        if let Some(color) = &self.color {
            map.serialize_entry("color", color)?;
        }
        if let Some(identifier) = &self.identifier {
            map.serialize_entry("identifier", identifier)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Guideline {
    fn deserialize<D>(deserializer: D) -> Result<Guideline, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawGuideline::deserialize(deserializer)?;
        let line = Line::from_parts(raw.x, raw.y, raw.angle).map_err(de::Error::custom)?;
        Ok(Guideline::new(line, raw.name, raw.color, raw.identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_from_parts() {
        assert_eq!(Line::from_parts(Some(1.0), None, None), Ok(Line::Vertical(1.0)));
        assert_eq!(Line::from_parts(None, Some(2.0), None), Ok(Line::Horizontal(2.0)));
        assert_eq!(
            Line::from_parts(Some(1.0), Some(2.0), Some(45.0)),
            Ok(Line::Angle { x: 1.0, y: 2.0, degrees: 45.0 })
        );
        assert_eq!(Line::from_parts(None, None, Some(1.0)), Err(InvalidGuideline::MissingCoordinate));
        assert_eq!(Line::from_parts(Some(1.0), Some(2.0), None), Err(InvalidGuideline::AngleMismatch));
        assert_eq!(Line::from_parts(Some(1.0), None, Some(2.0)), Err(InvalidGuideline::AngleMismatch));
        assert_eq!(
            Line::from_parts(Some(1.0), Some(2.0), Some(361.0)),
            Err(InvalidGuideline::AngleOutOfRange)
        );
    }

    #[test]
    fn plist_round_trip() {
        let guide = Guideline::new(
            Line::Angle { x: 10.0, y: 20.0, degrees: 30.0 },
            Some("diagonal".into()),
            Some("1,0,0,1".parse().unwrap()),
            None,
        );
        let mut buf = Vec::new();
        plist::to_writer_xml(&mut buf, &guide).unwrap();
        let xml = String::from_utf8(buf.clone()).unwrap();
        assert!(!xml.contains("identifier"));
        let back: Guideline = plist::from_bytes(&buf).unwrap();
        assert_eq!(back, guide);
    }
}
