//! Property tests for post formatting and truncation

use kol_agent::generation::truncate_message;
use kol_agent::post::{ContentFormatter, FormatError};
use proptest::prelude::*;

fn formatter() -> ContentFormatter {
    ContentFormatter::with_limit(280, "Crypto")
}

proptest! {
    #[test]
    fn formatted_posts_never_exceed_limit(
        message in "[a-zA-Z0-9 .!?🚀]{0,400}",
        tag in "[A-Za-z0-9_]{0,24}",
    ) {
        let formatter = formatter();
        let hashtag = formatter.normalize_tag(&tag);
        let body = message.trim().chars().count();
        let separator = if body == 0 { 0 } else { 2 };
        let expected = body + separator + hashtag.chars().count();

        match formatter.format(&message, &tag) {
            Ok(post) => {
                prop_assert!(expected <= 280);
                prop_assert!(post.text.chars().count() <= 280);
                prop_assert!(post.text.ends_with(&post.hashtag));
                prop_assert_eq!(post.text.matches('#').count(), 1);
            }
            Err(FormatError::ContentTooLong { length, limit }) => {
                prop_assert!(expected > 280);
                prop_assert_eq!(length, expected);
                prop_assert_eq!(limit, 280);
            }
        }
    }

    #[test]
    fn truncated_messages_always_fit(
        words in prop::collection::vec("[a-zA-Z]{1,12}", 0..80),
        tag in "[A-Za-z0-9]{0,16}",
    ) {
        let formatter = formatter();
        let message = words.join(" ");
        let fitted = truncate_message(&message, formatter.message_budget(&tag));

        let post = formatter.format(&fitted, &tag);
        prop_assert!(post.is_ok());
        prop_assert!(post.unwrap().text.chars().count() <= 280);
    }

    #[test]
    fn truncation_never_splits_words(
        words in prop::collection::vec("[a-z]{1,10}", 1..60),
        max_chars in 10usize..240,
    ) {
        let message = words.join(" ");
        let cut = truncate_message(&message, max_chars);

        prop_assert!(cut.chars().count() <= max_chars);
        for word in cut.split_whitespace() {
            prop_assert!(words.iter().any(|w| w == word));
        }
    }

    #[test]
    fn formatting_is_idempotent(
        message in "[a-zA-Z ]{0,300}",
        tag in "[A-Za-z]{0,10}",
    ) {
        let formatter = formatter();
        prop_assert_eq!(formatter.format(&message, &tag), formatter.format(&message, &tag));
    }
}

#[test]
fn test_boundary_is_exactly_280() {
    let formatter = formatter();

    let fits = "a".repeat(274);
    let post = formatter.format(&fits, "FOO").unwrap();
    assert_eq!(post.text.chars().count(), 280);

    let over = "a".repeat(275);
    assert_eq!(
        formatter.format(&over, "FOO"),
        Err(FormatError::ContentTooLong {
            length: 281,
            limit: 280
        })
    );
}
