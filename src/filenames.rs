//! Mapping user-facing glyph and layer names to file names.
//!
//! Follows the conventions of the [UFO specification][conv], which keep
//! names distinct on case-insensitive file systems.
//!
//! [conv]: https://unifiedfontobject.org/versions/ufo3/conventions/#common-user-name-to-file-name-algorithm

use std::collections::HashSet;

const MAX_LEN: usize = 255;
const COUNTER_DIGITS: usize = 15;
const MAX_COUNTER: u64 = 999_999_999_999_999;

static SPECIAL_ILLEGAL: &[char] = &['"', '*', '+', '/', ':', '<', '>', '?', '[', '\\', ']', '|'];
static RESERVED: &[&str] =
    &["con", "prn", "aux", "clock$", "nul", "a:-z:", "com1", "lpt1", "lpt2", "lpt3", "com2", "com3", "com4"];

/// Computes the `.glif` file name for a glyph.
///
/// `existing` holds the lowercased file names already in use.
pub(crate) fn glyph_file_name(name: &str, existing: &HashSet<String>) -> String {
    user_name_to_file_name(name, "", ".glif", existing)
}

/// Computes the directory name for a non-default layer.
pub(crate) fn layer_dir_name(name: &str, existing: &HashSet<String>) -> String {
    user_name_to_file_name(name, "glyphs.", "", existing)
}

fn user_name_to_file_name(name: &str, prefix: &str, suffix: &str, existing: &HashSet<String>) -> String {
    let mut result = String::with_capacity(name.len());

    for c in name.chars() {
        match c {
            '.' if result.is_empty() => result.push('_'),
            c if (c as u32) < 32 || (c as u32) == 0x7f || SPECIAL_ILLEGAL.contains(&c) => result.push('_'),
            c if c.is_uppercase() => {
                result.push(c);
                result.push('_');
            }
            c => result.push(c),
        }
    }

    let mut result = escape_reserved(&result);
    truncate(&mut result, MAX_LEN - prefix.len() - suffix.len());

    let full = format!("{prefix}{result}{suffix}");
    if !existing.contains(&full.to_lowercase()) {
        return full;
    }

    // Make room for the counter.
    truncate(&mut result, MAX_LEN - prefix.len() - suffix.len() - COUNTER_DIGITS);
    for counter in 1..=MAX_COUNTER {
        let full = format!("{prefix}{result}{counter:0width$}{suffix}", width = COUNTER_DIGITS);
        if !existing.contains(&full.to_lowercase()) {
            return full;
        }
    }
    // Every counter value taken; not reachable with real packages.
    format!("{prefix}{result}{suffix}")
}

/// Prefixes every dot-separated part that is a reserved Windows name with `_`.
fn escape_reserved(name: &str) -> String {
    name.split('.')
        .map(|part| {
            if RESERVED.contains(&part.to_lowercase().as_str()) {
                format!("_{part}")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn truncate(s: &mut String, max: usize) {
    if s.len() > max {
        let mut boundary = max;
        while !s.is_char_boundary(boundary) {
            boundary -= 1;
        }
        s.truncate(boundary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimmed_name(name: &str) -> String {
        glyph_file_name(name, &HashSet::new()).trim_end_matches(".glif").into()
    }

    #[test]
    fn path_for_name() {
        assert_eq!(trimmed_name("newGlyph.1"), "newG_lyph.1");
        assert_eq!(trimmed_name("a"), "a");
        assert_eq!(trimmed_name("A"), "A_");
        assert_eq!(trimmed_name("AE"), "A_E_");
        assert_eq!(trimmed_name("Ae"), "A_e");
        assert_eq!(trimmed_name("aE"), "aE_");
        assert_eq!(trimmed_name("a.alt"), "a.alt");
        assert_eq!(trimmed_name("A.Alt"), "A_.A_lt");
        assert_eq!(trimmed_name("T_H"), "T__H_");
        assert_eq!(trimmed_name("f_f_i"), "f_f_i");
        assert_eq!(trimmed_name("Aacute_V.swash"), "A_acute_V_.swash");
        assert_eq!(trimmed_name(".notdef"), "_notdef");
        assert_eq!(trimmed_name("a/b:c"), "a_b_c");
        assert_eq!(trimmed_name("Ω"), "Ω_");
    }

    #[test]
    fn reserved_names() {
        assert_eq!(trimmed_name("con"), "_con");
        assert_eq!(trimmed_name("CON"), "C_O_N_");
        assert_eq!(trimmed_name("con.alt"), "_con.alt");
        assert_eq!(trimmed_name("alt.con"), "alt._con");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "a".repeat(300);
        let file = glyph_file_name(&name, &HashSet::new());
        assert_eq!(file.len(), 255);
        assert!(file.ends_with(".glif"));

        let existing = HashSet::from([file.to_lowercase()]);
        let file = glyph_file_name(&name, &existing);
        assert_eq!(file.len(), 255);
        assert!(file.ends_with("000000000000001.glif"));
    }

    #[test]
    fn case_insensitive_clashes() {
        let mut existing = HashSet::new();
        let first = glyph_file_name("a", &existing);
        existing.insert(first.to_lowercase());
        // "A" maps to "A_", which does not clash; a lowercase "a_" does.
        let second = glyph_file_name("a_", &existing);
        assert_eq!(second, "a_.glif");
        existing.insert(second.to_lowercase());
        let third = glyph_file_name("A", &existing);
        assert_eq!(third, "A_000000000000001.glif");
        existing.insert(third.to_lowercase());
        let fourth = glyph_file_name("A", &existing);
        assert_eq!(fourth, "A_000000000000002.glif");
    }

    #[test]
    fn layer_names() {
        assert_eq!(layer_dir_name("background", &HashSet::new()), "glyphs.background");
        assert_eq!(layer_dir_name("Sketch", &HashSet::new()), "glyphs.S_ketch");
    }
}
