use super::*;

// =============================================================================
// slugify
// =============================================================================

#[test]
fn slugify_lowercases_and_hyphenates() {
    assert_eq!(slugify("Launching Our New SaaS Offering"), "launching-our-new-saas-offering");
}

#[test]
fn slugify_collapses_punctuation_runs() {
    assert_eq!(slugify("  Web & Mobile -- 2025!!  "), "web-mobile-2025");
}

#[test]
fn slugify_drops_non_ascii() {
    assert_eq!(slugify("Café Ünïcode"), "caf-n-code");
}

#[test]
fn slugify_of_symbols_is_empty() {
    assert_eq!(slugify("!!! ???"), "");
}

// =============================================================================
// NewBlogPost
// =============================================================================

fn draft() -> NewBlogPost {
    NewBlogPost {
        title: "Why Static Sites Still Win".into(),
        body: "Fast pages convert.\n\nSecond paragraph.".into(),
        category: "Web".into(),
        ..NewBlogPost::default()
    }
}

#[test]
fn draft_slug_derived_from_title() {
    assert_eq!(draft().resolved_slug(), "why-static-sites-still-win");
}

#[test]
fn draft_explicit_slug_is_normalized() {
    let post = NewBlogPost { slug: Some(" Static Wins ".into()), ..draft() };
    assert_eq!(post.resolved_slug(), "static-wins");
}

#[test]
fn draft_blank_slug_falls_back_to_title() {
    let post = NewBlogPost { slug: Some("   ".into()), ..draft() };
    assert_eq!(post.resolved_slug(), "why-static-sites-still-win");
}

#[test]
fn draft_excerpt_defaults_to_first_paragraph() {
    assert_eq!(draft().resolved_excerpt(), "Fast pages convert.");
}

#[test]
fn draft_excerpt_truncates_long_paragraph() {
    let post = NewBlogPost { body: "word ".repeat(100), ..draft() };
    let excerpt = post.resolved_excerpt();
    assert!(excerpt.ends_with('…'));
    assert!(excerpt.chars().count() <= EXCERPT_LEN + 1);
}

#[test]
fn draft_explicit_excerpt_wins() {
    let post = NewBlogPost { excerpt: Some("Short take.".into()), ..draft() };
    assert_eq!(post.resolved_excerpt(), "Short take.");
}

#[test]
fn draft_validate_accepts_complete_post() {
    assert!(draft().validate().is_ok());
}

#[test]
fn draft_validate_rejects_blank_fields() {
    let no_title = NewBlogPost { title: " ".into(), ..draft() };
    let no_body = NewBlogPost { body: String::new(), ..draft() };
    let no_category = NewBlogPost { category: "\t".into(), ..draft() };
    for post in [no_title, no_body, no_category] {
        assert!(matches!(post.validate(), Err(StoreError::Invalid(_))));
    }
}

#[test]
fn draft_validate_rejects_unsluggable_title() {
    let post = NewBlogPost { title: "???".into(), ..draft() };
    assert!(matches!(post.validate(), Err(StoreError::Invalid(_))));
}

// =============================================================================
// ProjectKind
// =============================================================================

#[test]
fn project_kind_parses_case_insensitively() {
    assert_eq!("WEB".parse::<ProjectKind>(), Ok(ProjectKind::Web));
    assert_eq!(" saas ".parse::<ProjectKind>(), Ok(ProjectKind::Saas));
    assert!("desktop".parse::<ProjectKind>().is_err());
}

#[test]
fn project_kind_display_matches_serde() {
    for kind in ProjectKind::ALL {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, serde_json::Value::String(kind.to_string()));
    }
}

// =============================================================================
// ContentFilter
// =============================================================================

#[test]
fn filter_normalizes_category() {
    assert_eq!(ContentFilter::category("  Mobile ").normalized_category().as_deref(), Some("mobile"));
}

#[test]
fn filter_blank_category_means_any() {
    assert_eq!(ContentFilter::category("   ").normalized_category(), None);
    assert_eq!(ContentFilter::all().normalized_category(), None);
}

#[test]
fn filter_builders_compose() {
    let filter = ContentFilter::category("web").newest_first().limit(3);
    assert!(filter.newest_first);
    assert_eq!(filter.limit, Some(3));
}

// =============================================================================
// StoreError from sqlx::Error
// =============================================================================

#[test]
fn pool_timeout_is_unavailable() {
    assert!(matches!(StoreError::from(sqlx::Error::PoolTimedOut), StoreError::Unavailable(_)));
}

#[test]
fn pool_closed_is_unavailable() {
    assert!(matches!(StoreError::from(sqlx::Error::PoolClosed), StoreError::Unavailable(_)));
}

#[test]
fn io_error_is_unavailable() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    assert!(matches!(StoreError::from(sqlx::Error::Io(io)), StoreError::Unavailable(_)));
}

#[test]
fn missing_column_is_decode_error() {
    assert!(matches!(StoreError::from(sqlx::Error::ColumnNotFound("slug".into())), StoreError::Decode(_)));
}

#[test]
fn row_not_found_is_query_error() {
    assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::Query(_)));
}
