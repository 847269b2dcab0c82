//! Topic label normalization.

/// Topic assigned to rows recovered as bulleted without a stored topic.
pub const UNSORTED_TOPIC: &str = "UNSORTED";

/// Normalize a reviewer-entered topic to its index key.
///
/// Returns `None` for blank input.
pub fn normalize_topic(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(
            normalize_topic("  Economy Issues "),
            Some("ECONOMY ISSUES".to_string())
        );
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(normalize_topic(""), None);
        assert_eq!(normalize_topic(" \t\n"), None);
    }
}
