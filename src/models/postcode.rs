//! Postcode validation

use std::fmt;

/// Number of digits in a postcode
pub const POST_CODE_LEN: usize = 8;

/// Returns true when `code` is exactly eight ASCII digits.
#[must_use]
pub fn is_valid_post_code(code: &str) -> bool {
    code.len() == POST_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// A postcode that has passed [`is_valid_post_code`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCode(String);

impl PostCode {
    /// Validate a raw postcode. Returns `None` when it is malformed.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        is_valid_post_code(raw).then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
