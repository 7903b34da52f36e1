//! Location resolved from a postcode

use super::PostCode;

/// A locality the directory service returned for a postcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The postcode that was looked up
    pub postcode: PostCode,
    /// Human-readable place name, never empty
    pub locality: String,
}

impl Location {
    /// Create a location. Returns `None` for an empty locality, which the
    /// directory service uses to say it does not know the postcode.
    #[must_use]
    pub fn new(postcode: PostCode, locality: String) -> Option<Self> {
        if locality.is_empty() {
            return None;
        }
        Some(Self { postcode, locality })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_locality_is_rejected() {
        let code = PostCode::parse("12345678").unwrap();
        assert!(Location::new(code.clone(), String::new()).is_none());

        let location = Location::new(code, "City Example".to_string()).unwrap();
        assert_eq!(location.locality, "City Example");
        assert_eq!(location.postcode.as_str(), "12345678");
    }
}
