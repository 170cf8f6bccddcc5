//! Text normalization shared by indexing and querying.

/// Split text into normalized search tokens.
///
/// Hyphens become word breaks and apostrophes are dropped before
/// lower-casing, so "Bul-Kathos' Children" yields `bul`, `kathos`, `children`
/// and "Heaven's" yields `heavens`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.replace('-', " ")
        .replace('\'', "")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("Stone of Jordan"), vec!["stone", "of", "jordan"]);
    }

    #[test]
    fn test_tokenize_hyphen_and_apostrophe() {
        assert_eq!(
            tokenize("Bul-Kathos' Children"),
            vec!["bul", "kathos", "children"]
        );
        assert_eq!(tokenize("M'avina's Battle Hymn"), vec!["mavinas", "battle", "hymn"]);
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
        assert!(tokenize(" - ' ").is_empty());
    }

    #[test]
    fn test_tokenize_collapses_runs_of_whitespace() {
        assert_eq!(tokenize("  Tal\tRasha's   Wrappings "), vec!["tal", "rashas", "wrappings"]);
    }
}
