//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

/// RGB color with alpha (0.0 - 1.0)
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// Parse `"#rrggbb"` or `"r,g,b[,a]"`
    pub fn parse(s: &str) -> Result<Color, String> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("Invalid hex color '{}'", s));
            }
            let parse = |range: &str| {
                u8::from_str_radix(range, 16).map_err(|_| format!("Invalid hex color '{}'", s))
            };
            return Ok(Color::new(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
                1.0,
            ));
        }
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(format!("Invalid color '{}'", s));
        }
        let channel =
            |p: &str| p.parse::<u8>().map_err(|_| format!("Invalid color '{}'", s));
        let a = if parts.len() == 4 {
            parts[3]
                .parse::<f64>()
                .map_err(|_| format!("Invalid color '{}'", s))?
        } else {
            1.0
        };
        Ok(Color::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }
}

/// Settings input accepts a color either as the channel object written by
/// the exporter or as a `"#rrggbb"` / `"r,g,b[,a]"` string
impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        fn opaque() -> f64 {
            1.0
        }
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorForm {
            Text(String),
            Channels {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: f64,
            },
        }
        match ColorForm::deserialize(deserializer)? {
            ColorForm::Text(s) => Color::parse(&s).map_err(serde::de::Error::custom),
            ColorForm::Channels { r, g, b, a } => Ok(Color::new(r, g, b, a)),
        }
    }
}
