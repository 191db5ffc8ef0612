//! Default English stop-word list.

/// Articles, conjunctions, common prepositions, and forms of "be".
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    // articles
    "a", "an", "the",
    // conjunctions
    "and", "or", "but", "nor", "so", "yet", "if", "because", "while",
    // prepositions
    "in", "on", "at", "to", "for", "of", "with", "by", "from", "as", "into", "about",
    "over", "under", "between", "through", "during", "before", "after", "up", "down",
    "out", "off",
    // be
    "be", "am", "is", "are", "was", "were", "been", "being",
];
