//! Inline `style` attributes.

/// Split `name: value; name: value` into trimmed pairs.
///
/// Semicolons inside parentheses or quotes do not split, so
/// `fill: url("#a;b")` stays one declaration. Entries without a colon or
/// with an empty name are dropped.
pub fn declarations(style: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                push_declaration(&style[start..i], &mut out);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&style[start..], &mut out);
    out
}

fn push_declaration<'a>(decl: &'a str, out: &mut Vec<(&'a str, &'a str)>) {
    let Some((name, value)) = decl.split_once(':') else {
        return;
    };
    let name = name.trim();
    if !name.is_empty() {
        out.push((name, value.trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_declarations() {
        assert_eq!(
            declarations("fill: red; stroke:blue ;"),
            vec![("fill", "red"), ("stroke", "blue")]
        );
    }

    #[test]
    fn test_parens_and_quotes_protect_semicolons() {
        assert_eq!(
            declarations("fill:url(#a;b);font-family:'x;y'"),
            vec![("fill", "url(#a;b)"), ("font-family", "'x;y'")]
        );
    }

    #[test]
    fn test_malformed_entries_dropped() {
        assert_eq!(
            declarations("junk; :red; opacity: .5"),
            vec![("opacity", ".5")]
        );
        assert!(declarations("").is_empty());
    }
}
