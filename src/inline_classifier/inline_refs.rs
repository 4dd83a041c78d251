//! Inline references: `{@name body}`.

use crate::block_tags::scan_tag_name;

/// If `text` starts with `{@name`, return the name.
///
/// `{` and `@` must be adjacent and a name must follow; a lone `{` or `{@ `
/// is ordinary text.
pub(super) fn try_parse_ref_start(text: &str) -> Option<&str> {
    let after = text.strip_prefix("{@")?;
    let name = scan_tag_name(after);
    (!name.is_empty()).then_some(name)
}

/// Scan an excluded reference body, tracking brace depth.
///
/// Returns the number of body bytes consumed and whether the reference's
/// closing `}` immediately follows them.
pub(super) fn scan_opaque_body(text: &str, depth: &mut usize) -> (usize, bool) {
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => *depth += 1,
            '}' if *depth == 0 => return (i, true),
            '}' => *depth -= 1,
            _ => {}
        }
    }
    (text.len(), false)
}

/// Length of a reference target at the start of `text`: leading whitespace
/// plus one token. The token ends at a brace, or at whitespace outside a
/// parameter list such as `#m(int, String)`. The second value is the length
/// of the token alone.
pub(super) fn scan_target(text: &str) -> (usize, usize) {
    let ws = text.len() - text.trim_start().len();
    let mut parens = 0usize;
    let mut token = text.len() - ws;

    for (i, ch) in text[ws..].char_indices() {
        match ch {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            '{' | '}' => {
                token = i;
                break;
            }
            c if c.is_whitespace() && parens == 0 => {
                token = i;
                break;
            }
            _ => {}
        }
    }
    (ws + token, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_start_requires_adjacent_at_and_name() {
        assert_eq!(try_parse_ref_start("{@link Foo}"), Some("link"));
        assert_eq!(try_parse_ref_start("{@inheritDoc}"), Some("inheritDoc"));
        assert_eq!(try_parse_ref_start("{ @link Foo}"), None);
        assert_eq!(try_parse_ref_start("{@ */"), None);
        assert_eq!(try_parse_ref_start("{x}"), None);
    }

    #[test]
    fn opaque_body_tracks_nested_braces() {
        let mut depth = 0;
        assert_eq!(scan_opaque_body(" Map<K, {V}>} rest", &mut depth), (12, true));
        assert_eq!(depth, 0);
    }

    #[test]
    fn opaque_body_can_continue_on_next_line() {
        let mut depth = 0;
        assert_eq!(scan_opaque_body(" a {b", &mut depth), (5, false));
        assert_eq!(depth, 1);
        assert_eq!(scan_opaque_body("c} d}", &mut depth), (4, true));
    }

    #[test]
    fn target_is_first_token() {
        assert_eq!(scan_target(" Foo#bar the label}"), (8, 7));
        assert_eq!(scan_target(" Foo}"), (4, 3));
        assert_eq!(scan_target("   "), (3, 0));
    }

    #[test]
    fn target_keeps_parameter_list_whole() {
        assert_eq!(scan_target(" #m(int, String) the method}"), (16, 15));
        assert_eq!(scan_target(" Map#put(K,  V)}"), (15, 14));
        // A brace still ends an unbalanced list.
        assert_eq!(scan_target(" #m(int}"), (7, 6));
    }
}
