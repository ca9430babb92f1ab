//! `sitemap.xml` rendering.
//!
//! Static pages are always listed; blog posts are appended when the content
//! store could be read. Private areas never appear.

use std::fmt::Write;

use crate::content::BlogPost;

/// Public pages of the static site, relative to the site root.
pub const STATIC_PAGES: &[&str] = &["/", "/about", "/services", "/portfolio", "/blog", "/contact", "/privacy", "/terms"];

/// Render the sitemap for `site_url` (no trailing slash).
#[must_use]
pub fn render_sitemap(site_url: &str, posts: &[BlogPost]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in STATIC_PAGES {
        push_url(&mut xml, &format!("{site_url}{page}"), None);
    }
    for post in posts {
        push_url(&mut xml, &format!("{site_url}/blog/{}", post.slug), Some(lastmod(post.published_at)));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<String>) {
    let _ = write!(xml, "  <url><loc>{}</loc>", escape_xml(loc));
    if let Some(date) = lastmod {
        let _ = write!(xml, "<lastmod>{date}</lastmod>");
    }
    xml.push_str("</url>\n");
}

/// `YYYY-MM-DD` for a millisecond Unix timestamp, UTC.
fn lastmod(published_ms: i64) -> String {
    let date = time::OffsetDateTime::from_unix_timestamp(published_ms.div_euclid(1000))
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
        .date();
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

pub(crate) fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "sitemap_test.rs"]
mod tests;
