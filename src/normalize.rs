//! Canonical comparison form for Arabic names.
//!
//! Both ingestion and querying go through [`normalize`], so the stored
//! `arabic_name_normalized` column and the query terms can never drift apart.
//!
//! The rules are applied in a single pass over the input. Each character is
//! either dropped (diacritics, tatweel), folded to its canonical letter, or
//! filtered against the allowed Arabic range. Whitespace collapsing and
//! trimming happen on the fly while building the output.

/// Arabic vocalization marks (fathatan .. wavy hamza below).
const DIACRITICS: std::ops::RangeInclusive<char> = '\u{064B}'..='\u{065F}';

/// Elongation character, no phonetic value.
const TATWEEL: char = '\u{0640}';

/// Canonical letter folds. Order mirrors the normalization steps: alif
/// variants, hamza carriers, ta marbuta, alif maqsura.
const FOLDS: &[(char, char)] = &[
    ('\u{0623}', '\u{0627}'), // أ -> ا
    ('\u{0625}', '\u{0627}'), // إ -> ا
    ('\u{0622}', '\u{0627}'), // آ -> ا
    ('\u{0624}', '\u{0621}'), // ؤ -> ء
    ('\u{0626}', '\u{0621}'), // ئ -> ء
    ('\u{0629}', '\u{0647}'), // ة -> ه
    ('\u{0649}', '\u{064A}'), // ى -> ي
];

/// Apply a single character rule. `None` means the character is dropped.
#[inline]
fn fold_char(c: char) -> Option<char> {
    if DIACRITICS.contains(&c) || c == TATWEEL {
        return None;
    }

    let folded = FOLDS
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to);

    is_allowed(folded).then_some(folded)
}

/// Arabic letters (hamza .. ghain, tatweel .. sukun) and the plain space.
/// Any other whitespace is dropped, not collapsed.
#[inline]
fn is_allowed(c: char) -> bool {
    matches!(c, '\u{0621}'..='\u{063A}' | '\u{0640}'..='\u{0652}' | ' ')
}

/// Map raw display text to its canonical comparison form.
///
/// Total and pure: never fails, depends on nothing but `text`, and is
/// idempotent (`normalize(&normalize(t)) == normalize(t)`).
///
/// ```
/// use natega_engine::normalize::normalize;
///
/// assert_eq!(normalize("مُحَمَّد"), "محمد");
/// assert_eq!(normalize("نور إيمان"), "نور ايمان");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars().filter_map(fold_char) {
        if c == ' ' {
            // leading spaces and runs of spaces are skipped
            if out.is_empty() || out.ends_with(' ') {
                continue;
            }
        }
        out.push(c);
    }

    if out.ends_with(' ') {
        out.pop();
    }

    out
}
