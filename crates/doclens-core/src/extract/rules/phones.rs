//! Phone number canonicalization.

/// Number of ASCII digits in a value.
pub fn digit_count(value: &str) -> usize {
    value.bytes().filter(u8::is_ascii_digit).count()
}

/// Reformat a matched phone number.
///
/// 10 digits become `(XXX) XXX-XXXX`, 11 digits with a leading `1` become
/// `+1 (XXX) XXX-XXXX`; any other digit count is returned unchanged.
pub fn canonicalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => {
            format!("+1 ({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..11])
        }
        _ => raw.to_string(),
    }
}
