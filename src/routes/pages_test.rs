use axum::body::to_bytes;

use super::*;
use crate::state::test_helpers::*;

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn sitemap_lists_blog_posts() {
    let content = MockContent::new().with_blog_posts(vec![blog_post("hello-world", "web", 1_709_640_000_000)]);
    let response = sitemap(State(test_app_state(MockBackend::new(), content))).await;
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml; charset=utf-8"
    );
    let xml = body_text(response).await;
    assert!(xml.contains("<loc>https://studio.test/blog/hello-world</loc>"));
    assert!(xml.contains("<loc>https://studio.test/about</loc>"));
}

#[tokio::test]
async fn sitemap_degrades_when_store_unavailable() {
    let state = test_app_state(MockBackend::new(), MockContent::new().unavailable());
    let response = sitemap(State(state)).await;
    assert!(response.status().is_success());
    let xml = body_text(response).await;
    assert!(xml.contains("<loc>https://studio.test/</loc>"));
    assert!(!xml.contains("/blog/"));
}
