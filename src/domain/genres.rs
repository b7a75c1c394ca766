//! Genre tag parsing for the raw catalog cells

/// Splits a raw genre cell like `"['pop', 'dance pop']"` into clean tags.
///
/// Strips bracket characters, splits on comma, trims each token and its
/// surrounding quotes, and drops empty and "n/a" entries. Malformed
/// input degrades to an empty list, never an error.
pub fn parse_genre_cell(cell: &str) -> Vec<String> {
    let unbracketed: String = cell.chars().filter(|c| *c != '[' && *c != ']').collect();
    clean_tags(unbracketed.split(','))
}

/// Cleans an already-split list of genre tokens with the same rules as
/// [`parse_genre_cell`].
pub fn clean_tags<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|token| token.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|tag| !tag.is_empty() && !tag.eq_ignore_ascii_case("n/a"))
        .map(|tag| tag.to_string())
        .collect()
}
