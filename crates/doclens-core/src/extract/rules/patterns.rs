//! Built-in entity regex patterns.
//!
//! All patterns run against whitespace-normalized text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric dates: 12/31/2023, 31.12.23, 1-2-2024
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2})\b"
    ).unwrap();

    // Month-name dates: Jan 15, 2024 / September 3rd 2021
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}\b"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    // Optional country code, then 3-3-4 digit groups. Without a country
    // code the area code must start a word, so the tail of a longer digit
    // run is never read as a phone.
    pub static ref PHONE: Regex = Regex::new(
        r"(?:(?:\+\d{1,3}[\s.\-]?|\b\d{1,3}[\s.\-]?)?\(\d{3}\)|(?:\+\d{1,3}[\s.\-]?|\b\d{1,3}[\s.\-]?|\b)\d{3})[\s.\-]?\d{3}[\s.\-]?\d{4}\b"
    ).unwrap();

    // $1,250.00 / $3.5 billion / 200 EUR / 12k USD
    pub static ref CURRENCY: Regex = Regex::new(
        r"(?:\$\s?\d+(?:,\d{3})*(?:\.\d+)?|\b\d+(?:,\d{3})*(?:\.\d+)?\s?(?:USD|EUR|GBP|JPY|CHF|CAD|AUD|CNY|INR)\b)(?:\s?[kKmMbB](?:illion)?)?\b"
    ).unwrap();

    // Two consecutive capitalized words
    pub static ref PERSON: Regex = Regex::new(
        r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b"
    ).unwrap();

    // Capitalized word with an optional corporate suffix
    pub static ref ORGANIZATION: Regex = Regex::new(
        r"\b[A-Z][A-Za-z&]+\b(?:\s+(?:Corporation|Company|Corp|Inc|LLC|Ltd|GmbH)\b\.?)?"
    ).unwrap();

    pub static ref ORDINAL_SUFFIX: Regex = Regex::new(r"(\d)(?:st|nd|rd|th)\b").unwrap();
}
