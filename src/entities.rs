//! The pluggable named-character-reference lookup the tokenizer consults while in the
//! [`crate::State::NamedCharacterReference`] state.
//!
//! The WHATWG named character reference table has around 2100 entries and is usually generated
//! from the entities JSON published alongside the HTML spec. Shipping and maintaining that table
//! is out of scope here: instead, this module defines the interface the tokenizer needs
//! (`NamedCharacterReferences`) and a small built-in table (`BasicCharacterReferences`) covering
//! the handful of references that show up in ordinary documents and the testable properties
//! around ambiguous ampersands. Callers that need the full table can implement the trait
//! themselves, e.g. backed by a generated perfect-hash table, and pass it to
//! [`crate::Tokenizer::new_with_emitter_and_character_references`].

/// The result of successfully matching a named character reference.
#[derive(Debug, Clone, Copy)]
pub struct CharacterReference {
    /// The reference as matched, not including the leading `&` nor the first character after
    /// it (e.g. `"mp;"` for `&amp;`). Callers that already hold that first character (as the
    /// tokenizer does) append it separately before this suffix.
    pub name: &'static str,
    /// The characters the reference expands to.
    pub characters: &'static str,
}

/// A source of named character references, consulted by the tokenizer once it has seen `&`
/// followed by an ASCII alphanumeric character.
///
/// Implementations are given the first character after `&` plus a callback that attempts to
/// consume a fixed string from the input stream (case-sensitively); they use the callback to try
/// candidate reference names longest-match-first, per the WHATWG algorithm, and return the
/// longest one that matched.
pub trait NamedCharacterReferences {
    /// Attempt to match a named character reference starting with `first`.
    ///
    /// `try_read` attempts to consume the given suffix (the part of the reference name after
    /// `first`) from the input stream, returning whether it matched. Implementations should try
    /// longer candidates before shorter ones so that e.g. `&notin;` is preferred over `&not`.
    fn try_read_character_reference(
        &self,
        first: char,
        try_read: impl FnMut(&str) -> bool,
    ) -> Option<CharacterReference>;
}

/// A small built-in [`NamedCharacterReferences`] table.
///
/// Covers the references most commonly found in hand-written HTML and in this crate's own test
/// suite. Not a substitute for the full WHATWG table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCharacterReferences;

// (name including trailing `;` when applicable, expansion), longest names first so that
// `try_read_character_reference` can match greedily.
const TABLE: &[(&str, &str)] = &[
    ("hellip;", "\u{2026}"),
    ("trade;", "\u{2122}"),
    ("ndash;", "\u{2013}"),
    ("mdash;", "\u{2014}"),
    ("rsquo;", "\u{2019}"),
    ("lsquo;", "\u{2018}"),
    ("rdquo;", "\u{201d}"),
    ("ldquo;", "\u{201c}"),
    ("nbsp;", "\u{a0}"),
    ("copy;", "\u{a9}"),
    ("quot;", "\""),
    ("apos;", "'"),
    ("amp;", "&"),
    ("amp", "&"),
    ("lt;", "<"),
    ("lt", "<"),
    ("gt;", ">"),
    ("gt", ">"),
];

impl NamedCharacterReferences for BasicCharacterReferences {
    fn try_read_character_reference(
        &self,
        first: char,
        mut try_read: impl FnMut(&str) -> bool,
    ) -> Option<CharacterReference> {
        for (name, characters) in TABLE {
            let Some(rest) = name.strip_prefix(first) else {
                continue;
            };

            if try_read(rest) {
                return Some(CharacterReference {
                    name: rest,
                    characters,
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(reference: &str) -> Option<CharacterReference> {
        let mut chars = reference.chars();
        let first = chars.next().unwrap();
        let rest: String = chars.collect();
        BasicCharacterReferences.try_read_character_reference(first, |s| s == rest.as_str())
    }

    #[test]
    fn amp_with_semicolon_matches_before_bare_amp() {
        let found = lookup("amp;").unwrap();
        assert_eq!(found.name, "mp;");
        assert_eq!(found.characters, "&");
    }

    #[test]
    fn bare_amp_without_semicolon_still_matches() {
        let found = lookup("amp").unwrap();
        assert_eq!(found.name, "mp");
        assert_eq!(found.characters, "&");
    }

    #[test]
    fn unknown_reference_returns_none() {
        assert!(lookup("notarealentity;").is_none());
    }
}
