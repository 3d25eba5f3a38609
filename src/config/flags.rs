//! Environment flag helpers.

/// Interprets common truthy spellings (`1`, `true`, `yes`, `on`).
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        for truthy in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(truthy), "{truthy:?} should be truthy");
        }
        for falsy in ["", "0", "false", "off", "nope"] {
            assert!(!parse_flag(falsy), "{falsy:?} should be falsy");
        }
    }
}
