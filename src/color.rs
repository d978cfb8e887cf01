use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGBA color, as written in glif attributes and lib values.
///
/// Each channel is in the range `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

/// The error returned for a malformed `"r,g,b,a"` color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color string '{0}'")]
pub struct InvalidColorString(pub String);

impl Color {
    /// Creates a color, returning `None` if any channel is out of range.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Option<Self> {
        [red, green, blue, alpha]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
            .then_some(Color { red, green, blue, alpha })
    }

    /// The `"r,g,b,a"` form.
    pub fn to_rgba_string(&self) -> String {
        format!("{},{},{},{}", self.red, self.green, self.blue, self.alpha)
    }
}

impl FromStr for Color {
    type Err = InvalidColorString;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || InvalidColorString(s.to_owned());
        let channels = s
            .split(',')
            .map(|v| v.trim().parse::<f64>().map_err(|_| bad()))
            .collect::<Result<Vec<_>, _>>()?;
        match channels.as_slice() {
            [r, g, b, a] => Color::new(*r, *g, *b, *a).ok_or_else(bad),
            _ => Err(bad()),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rgba_string())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rgba_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Color::from_str(&string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let color: Color = "1,0.5,0,0.25".parse().unwrap();
        assert_eq!(color, Color { red: 1.0, green: 0.5, blue: 0.0, alpha: 0.25 });
        assert_eq!(color.to_rgba_string(), "1,0.5,0,0.25");
        assert!("1,0,0".parse::<Color>().is_err());
        assert!("1,0,0,2".parse::<Color>().is_err());
        assert!("1,0,0,1,1".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
    }

    #[test]
    fn serde() {
        use serde_test::{assert_tokens, Token};
        let color = Color::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert_tokens(&color, &[Token::Str("0,0,1,1")]);
    }
}
