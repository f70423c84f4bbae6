//! Series colors accepted in configuration files.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const GREEN: Rgba = Rgba::opaque(0, 128, 0);
    pub const BLUE: Rgba = Rgba::opaque(0, 0, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Rendered as a CSS `rgba()` string so exported series can be fed to web charting.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = f64::from(self.a) / 255.0;
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Rgba {
    type Err = ();

    /// Accepts a handful of names, `#rrggbb`, and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        let named = match value.as_str() {
            "red" => Some(Rgba::RED),
            "green" => Some(Rgba::GREEN),
            "blue" => Some(Rgba::BLUE),
            "black" => Some(Rgba::BLACK),
            "orange" => Some(Rgba::opaque(255, 165, 0)),
            "purple" => Some(Rgba::opaque(128, 0, 128)),
            "gray" | "grey" => Some(Rgba::opaque(128, 128, 128)),
            "transparent" => Some(Rgba::TRANSPARENT),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        let hex = value.strip_prefix('#').ok_or(())?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(());
        }
        let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).map_err(|_| ());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_hex() {
        assert_eq!("Red".parse::<Rgba>(), Ok(Rgba::RED));
        assert_eq!("#00ff0080".parse::<Rgba>(), Ok(Rgba { r: 0, g: 255, b: 0, a: 128 }));
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("chartreuse-ish".parse::<Rgba>().is_err());
    }

    #[test]
    fn displays_as_css() {
        assert_eq!(Rgba::TRANSPARENT.to_string(), "rgba(0,0,0,0)");
        assert_eq!(Rgba::BLUE.to_string(), "rgba(0,0,255,1)");
    }
}
