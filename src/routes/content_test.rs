use uuid::Uuid;

use super::*;
use crate::content::ProjectKind;
use crate::identity::Identity;
use crate::state::test_helpers::*;

fn project(title: &str, kind: ProjectKind) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: title.into(),
        summary: "Summary.".into(),
        kind,
        image_url: None,
        link_url: None,
        sort_index: 0,
    }
}

fn testimonial(author: &str, service: &str) -> Testimonial {
    Testimonial {
        id: Uuid::new_v4(),
        author: author.into(),
        role: None,
        company: None,
        quote: "Great work.".into(),
        service: service.into(),
        rating: 5,
    }
}

fn banner(page: &str, active: bool) -> Banner {
    Banner {
        id: Uuid::new_v4(),
        page: page.into(),
        headline: format!("{page} banner"),
        subheadline: None,
        cta_label: None,
        cta_href: None,
        image_url: None,
        active,
    }
}

fn seeded() -> AppState {
    let content = MockContent::new()
        .with_blog_posts(vec![
            blog_post("first", "web", 1_000),
            blog_post("second", "design", 2_000),
            blog_post("third", "web", 3_000),
        ])
        .with_projects(vec![project("Shop", ProjectKind::Web), project("Tracker", ProjectKind::Mobile)])
        .with_testimonials(vec![testimonial("Ana", "web"), testimonial("Bo", "seo")])
        .with_banners(vec![banner("home", true), banner("home", false), banner("blog", true)]);
    test_app_state(MockBackend::new(), content)
}

fn admin() -> AdminUser {
    AdminUser {
        identity: Identity { uid: "u-owner".into(), email: Some(ADMIN.into()), display_name: Some("Owner".into()) },
    }
}

// =============================================================================
// store_error_to_status
// =============================================================================

#[test]
fn store_error_status_mapping() {
    assert_eq!(store_error_to_status(StoreError::Unavailable("down".into())), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(store_error_to_status(StoreError::Invalid("title".into())), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store_error_to_status(StoreError::Conflict("slug".into())), StatusCode::CONFLICT);
    assert_eq!(store_error_to_status(StoreError::Query("syntax".into())), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store_error_to_status(StoreError::Decode("kind".into())), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// listings
// =============================================================================

#[tokio::test]
async fn blog_filtered_by_category_case_insensitively() {
    let query = BlogQuery { category: Some("WEB".into()), ..BlogQuery::default() };
    let Json(posts) = list_blog_posts(State(seeded()), Query(query)).await.unwrap();
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["third", "first"]);
}

#[tokio::test]
async fn blog_limit_applies() {
    let query = BlogQuery { limit: Some(1), newest: Some(true), ..BlogQuery::default() };
    let Json(posts) = list_blog_posts(State(seeded()), Query(query)).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "third");
}

#[tokio::test]
async fn unknown_category_is_empty_not_error() {
    let query = BlogQuery { category: Some("podcasts".into()), ..BlogQuery::default() };
    let Json(posts) = list_blog_posts(State(seeded()), Query(query)).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn projects_filtered_by_kind() {
    let query = KindQuery { kind: Some("mobile".into()) };
    let Json(projects) = list_projects(State(seeded()), Query(query)).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Tracker");
}

#[tokio::test]
async fn projects_unknown_kind_is_empty() {
    let query = KindQuery { kind: Some("desktop".into()) };
    let Json(projects) = list_projects(State(seeded()), Query(query)).await.unwrap();
    assert!(projects.is_empty());
}

#[tokio::test]
async fn testimonials_filtered_by_service() {
    let Json(all) = list_testimonials(State(seeded()), Query(ServiceQuery::default())).await.unwrap();
    assert_eq!(all.len(), 2);
    let query = ServiceQuery { service: Some("seo".into()) };
    let Json(seo) = list_testimonials(State(seeded()), Query(query)).await.unwrap();
    assert_eq!(seo.len(), 1);
    assert_eq!(seo[0].author, "Bo");
}

#[tokio::test]
async fn banners_only_active_for_page() {
    let query = PageQuery { page: Some("home".into()) };
    let Json(banners) = list_banners(State(seeded()), Query(query)).await.unwrap();
    assert_eq!(banners.len(), 1);
    assert!(banners[0].active);
}

#[tokio::test]
async fn unavailable_store_is_503() {
    let state = test_app_state(MockBackend::new(), MockContent::new().unavailable());
    let err = list_blog_posts(State(state), Query(BlogQuery::default())).await.unwrap_err();
    assert_eq!(err, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// publish_blog_post
// =============================================================================

fn draft(title: &str) -> NewBlogPost {
    NewBlogPost { title: title.into(), body: "Body.".into(), category: "web".into(), ..NewBlogPost::default() }
}

#[tokio::test]
async fn publish_defaults_author_to_display_name() {
    let state = seeded();
    let (status, Json(post)) = publish_blog_post(State(state.clone()), admin(), Json(draft("Fresh Post"))).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post.slug, "fresh-post");
    assert_eq!(post.author, "Owner");

    let query = BlogQuery { category: Some("web".into()), ..BlogQuery::default() };
    let Json(posts) = list_blog_posts(State(state), Query(query)).await.unwrap();
    assert!(posts.iter().any(|p| p.slug == "fresh-post"));
}

#[tokio::test]
async fn publish_keeps_explicit_author() {
    let mut post = draft("Guest Column");
    post.author = Some("Guest Writer".into());
    let (_, Json(post)) = publish_blog_post(State(seeded()), admin(), Json(post)).await.unwrap();
    assert_eq!(post.author, "Guest Writer");
}

#[tokio::test]
async fn publish_blank_title_is_422() {
    let err = publish_blog_post(State(seeded()), admin(), Json(draft("  "))).await.unwrap_err();
    assert_eq!(err, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn publish_duplicate_slug_is_409() {
    let err = publish_blog_post(State(seeded()), admin(), Json(draft("First"))).await.unwrap_err();
    assert_eq!(err, StatusCode::CONFLICT);
}
