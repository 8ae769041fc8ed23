//! Color values.
//!
//! Supports `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`,
//! the CSS named colors and `currentColor`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::parse_number_prefix;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Fallback for unknown color names.
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack `0xAARRGGBB`.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack as `0xAARRGGBB`.
    pub const fn to_argb(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

/// A color as written: concrete, or `currentColor` to be resolved at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SvgColor {
    Current,
    Value(Color),
}

impl SvgColor {
    /// The concrete color, `None` for `currentColor`.
    pub fn value(&self) -> Option<Color> {
        match self {
            SvgColor::Value(c) => Some(*c),
            SvgColor::Current => None,
        }
    }
}

/// Parse a color attribute.
///
/// Never fails: malformed hex is transparent, an unknown name is gray.
pub fn parse_color(s: &str) -> SvgColor {
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace() || c == ',');
    if s.eq_ignore_ascii_case("currentColor") {
        return SvgColor::Current;
    }
    SvgColor::Value(parse_concrete(s))
}

fn parse_concrete(s: &str) -> Color {
    if s.is_empty() {
        return Color::TRANSPARENT;
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(Color::TRANSPARENT);
    }
    if let Some(args) = function_args(s, "rgba").or_else(|| function_args(s, "rgb")) {
        return parse_rgb_args(args);
    }
    lookup_named(s).unwrap_or(Color::GRAY)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim_end();
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// The text between `name(` and its closing parenthesis.
fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let head = s.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let rest = s[name.len()..].trim_start().strip_prefix('(')?;
    Some(rest.split(')').next().unwrap_or(rest))
}

/// `r, g, b[, a]` where channels are numbers or percentages and alpha is a
/// fraction or percentage. Missing channels are zero.
fn parse_rgb_args(args: &str) -> Color {
    let mut channels = [0u8; 3];
    let mut alpha = 255u8;
    let mut rest = args;

    for i in 0..4 {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',' || c == '/');
        let Some((value, tail)) = parse_number_prefix(rest) else {
            break;
        };
        let (percent, tail) = match tail.strip_prefix('%') {
            Some(t) => (true, t),
            None => (false, tail),
        };
        rest = tail;

        if i < 3 {
            let v = if percent { value * 255.0 / 100.0 } else { value };
            channels[i] = clamp_channel(v);
        } else {
            let fraction = if percent { value / 100.0 } else { value };
            alpha = clamp_channel(fraction * 255.0);
        }
    }

    Color::rgba(channels[0], channels[1], channels[2], alpha)
}

fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Exact, case-sensitive lookup in the CSS named color table.
pub fn lookup_named(name: &str) -> Option<Color> {
    NAMED_COLORS.get(name).copied()
}

lazy_static::lazy_static! {
    static ref NAMED_COLORS: HashMap<&'static str, Color> = {
        let mut m = HashMap::new();
        m.insert("transparent", Color::TRANSPARENT);
        m.insert("aliceblue", Color::rgb(240, 248, 255));
        m.insert("antiquewhite", Color::rgb(250, 235, 215));
        m.insert("aqua", Color::rgb(0, 255, 255));
        m.insert("aquamarine", Color::rgb(127, 255, 212));
        m.insert("azure", Color::rgb(240, 255, 255));
        m.insert("beige", Color::rgb(245, 245, 220));
        m.insert("bisque", Color::rgb(255, 228, 196));
        m.insert("black", Color::rgb(0, 0, 0));
        m.insert("blanchedalmond", Color::rgb(255, 235, 205));
        m.insert("blue", Color::rgb(0, 0, 255));
        m.insert("blueviolet", Color::rgb(138, 43, 226));
        m.insert("brown", Color::rgb(165, 42, 42));
        m.insert("burlywood", Color::rgb(222, 184, 135));
        m.insert("cadetblue", Color::rgb(95, 158, 160));
        m.insert("chartreuse", Color::rgb(127, 255, 0));
        m.insert("chocolate", Color::rgb(210, 105, 30));
        m.insert("coral", Color::rgb(255, 127, 80));
        m.insert("cornflowerblue", Color::rgb(100, 149, 237));
        m.insert("cornsilk", Color::rgb(255, 248, 220));
        m.insert("crimson", Color::rgb(220, 20, 60));
        m.insert("cyan", Color::rgb(0, 255, 255));
        m.insert("darkblue", Color::rgb(0, 0, 139));
        m.insert("darkcyan", Color::rgb(0, 139, 139));
        m.insert("darkgoldenrod", Color::rgb(184, 134, 11));
        m.insert("darkgray", Color::rgb(169, 169, 169));
        m.insert("darkgreen", Color::rgb(0, 100, 0));
        m.insert("darkgrey", Color::rgb(169, 169, 169));
        m.insert("darkkhaki", Color::rgb(189, 183, 107));
        m.insert("darkmagenta", Color::rgb(139, 0, 139));
        m.insert("darkolivegreen", Color::rgb(85, 107, 47));
        m.insert("darkorange", Color::rgb(255, 140, 0));
        m.insert("darkorchid", Color::rgb(153, 50, 204));
        m.insert("darkred", Color::rgb(139, 0, 0));
        m.insert("darksalmon", Color::rgb(233, 150, 122));
        m.insert("darkseagreen", Color::rgb(143, 188, 143));
        m.insert("darkslateblue", Color::rgb(72, 61, 139));
        m.insert("darkslategray", Color::rgb(47, 79, 79));
        m.insert("darkslategrey", Color::rgb(47, 79, 79));
        m.insert("darkturquoise", Color::rgb(0, 206, 209));
        m.insert("darkviolet", Color::rgb(148, 0, 211));
        m.insert("deeppink", Color::rgb(255, 20, 147));
        m.insert("deepskyblue", Color::rgb(0, 191, 255));
        m.insert("dimgray", Color::rgb(105, 105, 105));
        m.insert("dimgrey", Color::rgb(105, 105, 105));
        m.insert("dodgerblue", Color::rgb(30, 144, 255));
        m.insert("firebrick", Color::rgb(178, 34, 34));
        m.insert("floralwhite", Color::rgb(255, 250, 240));
        m.insert("forestgreen", Color::rgb(34, 139, 34));
        m.insert("fuchsia", Color::rgb(255, 0, 255));
        m.insert("gainsboro", Color::rgb(220, 220, 220));
        m.insert("ghostwhite", Color::rgb(248, 248, 255));
        m.insert("gold", Color::rgb(255, 215, 0));
        m.insert("goldenrod", Color::rgb(218, 165, 32));
        m.insert("gray", Color::rgb(128, 128, 128));
        m.insert("grey", Color::rgb(128, 128, 128));
        m.insert("green", Color::rgb(0, 128, 0));
        m.insert("greenyellow", Color::rgb(173, 255, 47));
        m.insert("honeydew", Color::rgb(240, 255, 240));
        m.insert("hotpink", Color::rgb(255, 105, 180));
        m.insert("indianred", Color::rgb(205, 92, 92));
        m.insert("indigo", Color::rgb(75, 0, 130));
        m.insert("ivory", Color::rgb(255, 255, 240));
        m.insert("khaki", Color::rgb(240, 230, 140));
        m.insert("lavender", Color::rgb(230, 230, 250));
        m.insert("lavenderblush", Color::rgb(255, 240, 245));
        m.insert("lawngreen", Color::rgb(124, 252, 0));
        m.insert("lemonchiffon", Color::rgb(255, 250, 205));
        m.insert("lightblue", Color::rgb(173, 216, 230));
        m.insert("lightcoral", Color::rgb(240, 128, 128));
        m.insert("lightcyan", Color::rgb(224, 255, 255));
        m.insert("lightgoldenrodyellow", Color::rgb(250, 250, 210));
        m.insert("lightgray", Color::rgb(211, 211, 211));
        m.insert("lightgreen", Color::rgb(144, 238, 144));
        m.insert("lightgrey", Color::rgb(211, 211, 211));
        m.insert("lightpink", Color::rgb(255, 182, 193));
        m.insert("lightsalmon", Color::rgb(255, 160, 122));
        m.insert("lightseagreen", Color::rgb(32, 178, 170));
        m.insert("lightskyblue", Color::rgb(135, 206, 250));
        m.insert("lightslategray", Color::rgb(119, 136, 153));
        m.insert("lightslategrey", Color::rgb(119, 136, 153));
        m.insert("lightsteelblue", Color::rgb(176, 196, 222));
        m.insert("lightyellow", Color::rgb(255, 255, 224));
        m.insert("lime", Color::rgb(0, 255, 0));
        m.insert("limegreen", Color::rgb(50, 205, 50));
        m.insert("linen", Color::rgb(250, 240, 230));
        m.insert("magenta", Color::rgb(255, 0, 255));
        m.insert("maroon", Color::rgb(128, 0, 0));
        m.insert("mediumaquamarine", Color::rgb(102, 205, 170));
        m.insert("mediumblue", Color::rgb(0, 0, 205));
        m.insert("mediumorchid", Color::rgb(186, 85, 211));
        m.insert("mediumpurple", Color::rgb(147, 112, 219));
        m.insert("mediumseagreen", Color::rgb(60, 179, 113));
        m.insert("mediumslateblue", Color::rgb(123, 104, 238));
        m.insert("mediumspringgreen", Color::rgb(0, 250, 154));
        m.insert("mediumturquoise", Color::rgb(72, 209, 204));
        m.insert("mediumvioletred", Color::rgb(199, 21, 133));
        m.insert("midnightblue", Color::rgb(25, 25, 112));
        m.insert("mintcream", Color::rgb(245, 255, 250));
        m.insert("mistyrose", Color::rgb(255, 228, 225));
        m.insert("moccasin", Color::rgb(255, 228, 181));
        m.insert("navajowhite", Color::rgb(255, 222, 173));
        m.insert("navy", Color::rgb(0, 0, 128));
        m.insert("oldlace", Color::rgb(253, 245, 230));
        m.insert("olive", Color::rgb(128, 128, 0));
        m.insert("olivedrab", Color::rgb(107, 142, 35));
        m.insert("orange", Color::rgb(255, 165, 0));
        m.insert("orangered", Color::rgb(255, 69, 0));
        m.insert("orchid", Color::rgb(218, 112, 214));
        m.insert("palegoldenrod", Color::rgb(238, 232, 170));
        m.insert("palegreen", Color::rgb(152, 251, 152));
        m.insert("paleturquoise", Color::rgb(175, 238, 238));
        m.insert("palevioletred", Color::rgb(219, 112, 147));
        m.insert("papayawhip", Color::rgb(255, 239, 213));
        m.insert("peachpuff", Color::rgb(255, 218, 185));
        m.insert("peru", Color::rgb(205, 133, 63));
        m.insert("pink", Color::rgb(255, 192, 203));
        m.insert("plum", Color::rgb(221, 160, 221));
        m.insert("powderblue", Color::rgb(176, 224, 230));
        m.insert("purple", Color::rgb(128, 0, 128));
        m.insert("red", Color::rgb(255, 0, 0));
        m.insert("rosybrown", Color::rgb(188, 143, 143));
        m.insert("royalblue", Color::rgb(65, 105, 225));
        m.insert("saddlebrown", Color::rgb(139, 69, 19));
        m.insert("salmon", Color::rgb(250, 128, 114));
        m.insert("sandybrown", Color::rgb(244, 164, 96));
        m.insert("seagreen", Color::rgb(46, 139, 87));
        m.insert("seashell", Color::rgb(255, 245, 238));
        m.insert("sienna", Color::rgb(160, 82, 45));
        m.insert("silver", Color::rgb(192, 192, 192));
        m.insert("skyblue", Color::rgb(135, 206, 235));
        m.insert("slateblue", Color::rgb(106, 90, 205));
        m.insert("slategray", Color::rgb(112, 128, 144));
        m.insert("slategrey", Color::rgb(112, 128, 144));
        m.insert("snow", Color::rgb(255, 250, 250));
        m.insert("springgreen", Color::rgb(0, 255, 127));
        m.insert("steelblue", Color::rgb(70, 130, 180));
        m.insert("tan", Color::rgb(210, 180, 140));
        m.insert("teal", Color::rgb(0, 128, 128));
        m.insert("thistle", Color::rgb(216, 191, 216));
        m.insert("tomato", Color::rgb(255, 99, 71));
        m.insert("turquoise", Color::rgb(64, 224, 208));
        m.insert("violet", Color::rgb(238, 130, 238));
        m.insert("wheat", Color::rgb(245, 222, 179));
        m.insert("white", Color::rgb(255, 255, 255));
        m.insert("whitesmoke", Color::rgb(245, 245, 245));
        m.insert("yellow", Color::rgb(255, 255, 0));
        m.insert("yellowgreen", Color::rgb(154, 205, 50));
        m
    };
}
