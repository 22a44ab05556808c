//! Remote record mapping
//!
//! Converts records from the remote endpoint into the local quote shape.
//! The remote side exposes generic title/body records, not quotes, so the
//! category is derived from the body: first line, truncated to 20 characters,
//! with a literal "Remote" fallback when nothing usable remains.

use qsync_common::Quote;

use super::remote_client::RemotePost;

/// Fallback category for remote records with no usable body
pub const REMOTE_CATEGORY: &str = "Remote";

/// Maximum derived category length in characters
const CATEGORY_MAX_CHARS: usize = 20;

/// Map one remote record into the local quote shape
pub fn map_remote_post(post: &RemotePost) -> Quote {
    Quote {
        text: post.title.clone(),
        category: derive_category(post.body.as_deref()),
    }
}

/// Map a batch of remote records, dropping ones that are invalid as quotes
/// (e.g. an empty title)
pub fn map_remote_posts(posts: &[RemotePost]) -> Vec<Quote> {
    posts
        .iter()
        .map(map_remote_post)
        .filter(|q| q.is_valid())
        .collect()
}

/// Derive a category from the record body: first line, trimmed, truncated to
/// 20 characters; "Remote" when empty or absent
fn derive_category(body: Option<&str>) -> String {
    let first_line = body
        .and_then(|b| b.lines().next())
        .map(str::trim)
        .unwrap_or("");

    let truncated: String = first_line.chars().take(CATEGORY_MAX_CHARS).collect();
    let truncated = truncated.trim().to_string();

    if truncated.is_empty() {
        REMOTE_CATEGORY.to_string()
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: Option<&str>) -> RemotePost {
        RemotePost {
            id: Some(1),
            title: title.to_string(),
            body: body.map(|b| b.to_string()),
        }
    }

    #[test]
    fn test_text_is_remote_title() {
        let quote = map_remote_post(&post("A remote saying", Some("wisdom\nsecond line")));
        assert_eq!(quote.text, "A remote saying");
    }

    #[test]
    fn test_category_is_first_body_line() {
        let quote = map_remote_post(&post("t", Some("wisdom\nignored line")));
        assert_eq!(quote.category, "wisdom");
    }

    #[test]
    fn test_category_truncated_to_20_chars() {
        let quote = map_remote_post(&post(
            "t",
            Some("abcdefghijklmnopqrstuvwxyz\nmore"),
        ));
        assert_eq!(quote.category, "abcdefghijklmnopqrst");
        assert_eq!(quote.category.chars().count(), 20);
    }

    #[test]
    fn test_category_fallback_when_body_missing() {
        assert_eq!(map_remote_post(&post("t", None)).category, REMOTE_CATEGORY);
    }

    #[test]
    fn test_category_fallback_when_body_blank() {
        assert_eq!(
            map_remote_post(&post("t", Some("   \nnext"))).category,
            REMOTE_CATEGORY
        );
        assert_eq!(map_remote_post(&post("t", Some(""))).category, REMOTE_CATEGORY);
    }

    #[test]
    fn test_batch_drops_empty_titles() {
        let posts = vec![post("valid", Some("cat")), post("", Some("cat"))];
        let quotes = map_remote_posts(&posts);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "valid");
    }
}
