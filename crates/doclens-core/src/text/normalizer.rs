//! Whitespace normalization, HTML stripping, segmentation, and keyword ranking.

use std::collections::{HashMap, HashSet};

use super::patterns::{
    HTML_ENTITY, HTML_SNIFF, HTML_TAG, PARAGRAPH_BREAK, SCRIPT_BLOCK, SENTENCE_BOUNDARY,
    STYLE_BLOCK, WHITESPACE,
};
use super::stopwords::DEFAULT_STOP_WORDS;

/// Tokens must be longer than this (in characters) to count as keywords.
const MIN_KEYWORD_LEN: usize = 2;

/// Converts raw document text into scan-ready form and derived views.
///
/// All operations are total over `&str` input.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: HashSet<String>,
}

impl TextNormalizer {
    /// Create a normalizer with the default English stop words.
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_STOP_WORDS.iter().copied())
    }

    /// Create a normalizer with a custom stop-word list.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self { stop_words }
    }

    /// Collapse every whitespace run (newlines included) to one space and trim.
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        WHITESPACE.replace_all(text, " ").trim().to_string()
    }

    /// Tag-sniffing heuristic for markup.
    pub fn looks_like_html(&self, text: &str) -> bool {
        HTML_SNIFF.is_match(text)
    }

    /// Strip markup, returning normalized visible text.
    ///
    /// `<style>` and `<script>` blocks are dropped with their content before
    /// the remaining tags are removed. Character references become spaces.
    pub fn extract_text_from_html(&self, html: &str) -> String {
        let text = STYLE_BLOCK.replace_all(html, " ");
        let text = SCRIPT_BLOCK.replace_all(&text, " ");
        let text = HTML_TAG.replace_all(&text, " ");
        let text = HTML_ENTITY.replace_all(&text, " ");
        self.normalize(&text)
    }

    /// Lazily iterate over sentences.
    ///
    /// The iterator is `Clone`, so a sequence can be restarted from any point.
    pub fn sentences<'a>(&self, text: &'a str) -> Sentences<'a> {
        Sentences { text, pos: 0 }
    }

    /// Split text into sentences, dropping empty pieces.
    pub fn split_into_sentences(&self, text: &str) -> Vec<String> {
        self.sentences(text).map(str::to_string).collect()
    }

    /// Split text on blank lines, dropping empty paragraphs.
    pub fn split_into_paragraphs(&self, text: &str) -> Vec<String> {
        PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Case-insensitive stop-word check.
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(&token.to_lowercase())
    }

    /// Drop stop-word tokens and rejoin the rest with single spaces.
    pub fn remove_stop_words(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|token| !self.is_stop_word(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Rank tokens by frequency, most frequent first.
    ///
    /// Ties keep first-seen order. Tokens are lowercased and stripped of
    /// surrounding punctuation; stop words and tokens of two characters or
    /// fewer never appear.
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        if max_keywords == 0 {
            return Vec::new();
        }

        let filtered = self.remove_stop_words(&self.normalize(text));

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for token in filtered.split_whitespace() {
            let token = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();

            if token.chars().count() <= MIN_KEYWORD_LEN || self.is_stop_word(&token) {
                continue;
            }

            let count = counts.entry(token.clone()).or_insert(0);
            if *count == 0 {
                order.push(token);
            }
            *count += 1;
        }

        // sort_by is stable, so equal counts stay in first-seen order
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));
        order.truncate(max_keywords);
        order
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy sentence iterator returned by [`TextNormalizer::sentences`].
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let (piece, next_pos) = match SENTENCE_BOUNDARY.find_at(self.text, self.pos) {
                Some(m) => (&self.text[self.pos..m.start()], m.end()),
                None => (&self.text[self.pos..], self.text.len()),
            };
            self.pos = next_pos;

            let piece = piece.trim();
            if !piece.is_empty() {
                return Some(piece);
            }
        }
        None
    }
}
