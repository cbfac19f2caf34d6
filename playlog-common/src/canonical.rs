//! Canonical text form for artist names and song titles
//!
//! Artists are unique by canonical name and songs by (artist, canonical
//! title). Every comparison against stored names goes through [`canonical`].

/// Returns the canonical form of an artist name or song title: surrounding
/// whitespace trimmed, then upper-cased.
///
/// The function is idempotent, so stored values (already canonical) can be
/// passed through it again without changing.
pub fn canonical(s: &str) -> String {
    s.trim().to_uppercase()
}
