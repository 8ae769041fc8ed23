//! `transform` / `gradientTransform` lists.

use tracing::trace;

use super::{parse_number_prefix, skip_separators};
use crate::geometry::Transform;

const MAX_ARGS: usize = 6;

/// Parse a transform list, composing left to right.
///
/// Unknown text between functions is skipped. `matrix` needs all six
/// arguments and is ignored otherwise.
pub fn parse_transform(s: &str) -> Transform {
    let mut result = Transform::identity();
    let mut rest = s;

    while !rest.is_empty() {
        let Some((name, after_name)) = match_function(rest) else {
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            rest = &rest[skip..];
            continue;
        };
        let (args, count, tail) = parse_args(after_name);
        rest = tail;

        if let Some(t) = build(name, &args[..count]) {
            trace!("transform {}({:?})", name, &args[..count]);
            result = result.multiply(&t);
        }
    }

    result
}

fn match_function(s: &str) -> Option<(&'static str, &str)> {
    const NAMES: [&str; 6] = ["matrix", "translate", "scale", "rotate", "skewX", "skewY"];
    NAMES
        .iter()
        .find_map(|name| s.strip_prefix(name).map(|rest| (*name, rest)))
}

/// Numbers between `(` and `)`. Returns the args, how many were read, and
/// the text after `)`.
fn parse_args(s: &str) -> ([f32; MAX_ARGS], usize, &str) {
    let mut args = [0.0; MAX_ARGS];
    let mut count = 0;

    let Some(open) = s.find('(') else {
        return (args, 0, s);
    };
    let mut rest = &s[open + 1..];

    loop {
        rest = skip_separators(rest);
        if let Some(after) = rest.strip_prefix(')') {
            return (args, count, after);
        }
        if rest.is_empty() {
            return (args, count, rest);
        }
        match parse_number_prefix(rest) {
            Some((value, tail)) => {
                if count < MAX_ARGS {
                    args[count] = value;
                    count += 1;
                }
                rest = tail;
            }
            None => {
                let skip = rest.chars().next().map_or(1, char::len_utf8);
                rest = &rest[skip..];
            }
        }
    }
}

fn build(name: &str, args: &[f32]) -> Option<Transform> {
    let arg = |i: usize| args.get(i).copied();
    let t = match name {
        "matrix" => {
            if args.len() != MAX_ARGS {
                return None;
            }
            Transform::new(args[0], args[1], args[2], args[3], args[4], args[5])
        }
        "translate" => Transform::from_translate(arg(0)?, arg(1).unwrap_or(0.0)),
        "scale" => {
            let sx = arg(0)?;
            Transform::from_scale(sx, arg(1).unwrap_or(sx))
        }
        "rotate" => {
            let angle = arg(0)?.to_radians();
            match (arg(1), arg(2)) {
                (Some(cx), Some(cy)) => Transform::from_translate(-cx, -cy)
                    .pre_multiply(&Transform::from_rotate(angle))
                    .pre_multiply(&Transform::from_translate(cx, cy)),
                _ => Transform::from_rotate(angle),
            }
        }
        "skewX" => Transform::from_skew_x(arg(0).unwrap_or(0.0).to_radians()),
        "skewY" => Transform::from_skew_y(arg(0).unwrap_or(0.0).to_radians()),
        _ => return None,
    };
    Some(t)
}
