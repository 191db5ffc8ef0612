//! Regex patterns used for text normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // HTML sniffing: an opening or closing tag anywhere in the text
    pub static ref HTML_SNIFF: Regex = Regex::new(r"(?is)</?[a-z].*>").unwrap();

    // Blocks removed together with their content
    pub static ref STYLE_BLOCK: Regex = Regex::new(
        r"(?is)<style\b[^>]*>.*?</style\s*>"
    ).unwrap();

    pub static ref SCRIPT_BLOCK: Regex = Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>"
    ).unwrap();

    pub static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();

    // Named and numeric character references (&nbsp; &amp; &#160; &#xA0;)
    pub static ref HTML_ENTITY: Regex = Regex::new(
        r"&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);"
    ).unwrap();

    // Terminal punctuation followed by whitespace or end of text
    pub static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]+(?:\s+|$)").unwrap();

    // Two or more newlines, allowing blank lines that contain only spaces/tabs
    pub static ref PARAGRAPH_BREAK: Regex = Regex::new(r"(?:\r?\n[ \t]*){2,}").unwrap();
}
