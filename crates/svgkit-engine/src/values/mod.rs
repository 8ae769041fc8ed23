//! Attribute value parsers.
//!
//! Every parser here is lenient: garbage yields a default or an empty
//! result, never an error.

pub mod aspect;
pub mod color;
pub mod keywords;
pub mod length;
pub mod paint;
pub mod path;
pub mod style;
pub mod transform;

pub use aspect::{parse_preserve_aspect_ratio, parse_view_box};
pub use color::{parse_color, Color, SvgColor};
pub use keywords::{FillRule, LineCap, LineJoin, SpreadMethod, TextAnchor, Units};
pub use length::{Length, LengthAxis, LengthUnit};
pub use paint::Paint;
pub use path::{parse_path_data, parse_points, PathCommand};
pub use style::declarations;
pub use transform::parse_transform;

use tracing::warn;

/// Parse the number at the start of `s`, returning it and the remainder.
///
/// Accepts an optional sign, integer part, fraction and exponent. An `e`
/// or `E` only starts an exponent when a digit or sign follows, so `2em`
/// reads as `2` followed by `em`.
pub fn parse_number_prefix(s: &str) -> Option<(f32, &str)> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let value = s[..end].parse::<f32>().ok()?;
    Some((value, &s[end..]))
}

/// Leading number of `s` after whitespace, or `0`.
pub fn atof(s: &str) -> f32 {
    parse_number_prefix(s.trim_start())
        .map(|(v, _)| v)
        .unwrap_or(0.0)
}

/// Skip whitespace and commas.
pub fn skip_separators(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',')
}

/// Every number in a whitespace/comma/semicolon separated list. Anything
/// unparseable is stepped over.
pub fn parse_number_list(s: &str) -> Vec<f32> {
    let mut values = Vec::new();
    let mut rest = s;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',' || c == ';');
        if rest.is_empty() {
            break;
        }
        match parse_number_prefix(rest) {
            Some((value, tail)) => {
                if !try_push(&mut values, value) {
                    break;
                }
                rest = tail;
            }
            None => {
                let skip = rest.chars().next().map_or(1, char::len_utf8);
                rest = &rest[skip..];
            }
        }
    }
    values
}

/// `stroke-dasharray`. `none`, an all-zero list or a negative entry mean
/// solid; an odd-length list is repeated to make it even.
pub fn parse_dash_array(s: &str) -> Vec<f32> {
    if s.trim() == "none" {
        return Vec::new();
    }
    let mut dashes = parse_number_list(s);
    if dashes.iter().any(|d| *d < 0.0) || dashes.iter().all(|d| *d == 0.0) {
        return Vec::new();
    }
    if dashes.len() % 2 == 1 {
        dashes.extend_from_within(..);
    }
    dashes
}

/// Push with fallible reservation. On allocation failure the buffer keeps
/// what it has and `false` is returned.
pub(crate) fn try_push<T>(buffer: &mut Vec<T>, value: T) -> bool {
    if buffer.try_reserve(1).is_err() {
        warn!(len = buffer.len(), "allocation failed, keeping partial buffer");
        return false;
    }
    buffer.push(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_prefix() {
        assert_eq!(parse_number_prefix("12.5px"), Some((12.5, "px")));
        assert_eq!(parse_number_prefix("-3"), Some((-3.0, "")));
        assert_eq!(parse_number_prefix("+.5,1"), Some((0.5, ",1")));
        assert_eq!(parse_number_prefix("1e2x"), Some((100.0, "x")));
        assert_eq!(parse_number_prefix("1.5.5"), Some((1.5, ".5")));
        assert_eq!(parse_number_prefix("7."), Some((7.0, "")));
        assert_eq!(parse_number_prefix("abc"), None);
        assert_eq!(parse_number_prefix("-"), None);
        assert_eq!(parse_number_prefix("."), None);
    }

    #[test]
    fn test_exponent_needs_digits() {
        assert_eq!(parse_number_prefix("2em"), Some((2.0, "em")));
        assert_eq!(parse_number_prefix("3ex"), Some((3.0, "ex")));
        assert_eq!(parse_number_prefix("4e-1"), Some((0.4, "")));
        assert_eq!(parse_number_prefix("4e+"), Some((4.0, "e+")));
    }

    #[test]
    fn test_atof() {
        assert_eq!(atof("  0.25"), 0.25);
        assert_eq!(atof("none"), 0.0);
        assert_eq!(atof("5px"), 5.0);
    }

    #[test]
    fn test_number_list() {
        assert_eq!(parse_number_list("0 0,100;50"), vec![0.0, 0.0, 100.0, 50.0]);
        assert_eq!(parse_number_list("1-2-3"), vec![1.0, -2.0, -3.0]);
        assert_eq!(parse_number_list("a 1 b 2"), vec![1.0, 2.0]);
        assert!(parse_number_list("").is_empty());
    }

    #[test]
    fn test_dash_array() {
        assert_eq!(parse_dash_array("5, 3"), vec![5.0, 3.0]);
        assert_eq!(parse_dash_array("5"), vec![5.0, 5.0]);
        assert_eq!(parse_dash_array("1 2 3"), vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
        assert!(parse_dash_array("none").is_empty());
        assert!(parse_dash_array("0 0").is_empty());
        assert!(parse_dash_array("4 -1").is_empty());
    }
}
