//! Hashtag extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#[\p{L}\p{N}_]+").expect("hashtag pattern is a valid regex")
});

/// Extracts hashtags from post content.
///
/// Tags keep their leading `#` and the order of first appearance; repeats
/// are dropped.
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for found in HASHTAG.find_iter(content) {
        let tag = found.as_str();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_tag() {
        assert_eq!(extract_tags("Hello #world"), vec!["#world"]);
    }

    #[test]
    fn test_extract_keeps_order_and_dedupes() {
        assert_eq!(
            extract_tags("#b then #a, again #b and #한국어_태그!"),
            vec!["#b", "#a", "#한국어_태그"]
        );
    }

    #[test]
    fn test_lone_hash_is_not_a_tag() {
        assert!(extract_tags("price # 5 and #").is_empty());
    }
}
