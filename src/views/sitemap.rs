use super::states::US_STATES;
use chrono::NaiveDate;

/// Listing roots that are always in the sitemap
const STATIC_PATHS: [&str; 11] = [
    "/",
    "/explore",
    "/teams",
    "/leagues",
    "/tournaments",
    "/clinics",
    "/cities",
    "/adult",
    "/adult/free-agents",
    "/referees",
    "/submit",
];

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Sitemap of the static pages and one hub per state
pub fn render_sitemap(site_url: &str, last_modified: NaiveDate) -> String {
    let base = site_url.trim_end_matches('/');
    let lastmod = last_modified.format("%Y-%m-%d").to_string();

    let paths = STATIC_PATHS
        .iter()
        .map(|p| p.to_string())
        .chain(
            US_STATES
                .iter()
                .map(|(code, _)| format!("/states/{}", code.to_lowercase())),
        );

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in paths {
        xml.push_str("  <url><loc>");
        xml.push_str(&escape_xml(&format!("{base}{path}")));
        xml.push_str("</loc><lastmod>");
        xml.push_str(&lastmod);
        xml.push_str("</lastmod></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_contains_roots_and_states() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let xml = render_sitemap("https://flag.example/", date);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://flag.example/</loc>"));
        assert!(xml.contains("<loc>https://flag.example/explore</loc>"));
        assert!(xml.contains("<loc>https://flag.example/states/tx</loc>"));
        assert!(xml.contains("<lastmod>2026-10-01</lastmod>"));
        assert_eq!(
            xml.matches("<url>").count(),
            STATIC_PATHS.len() + US_STATES.len()
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b<c>"), "a&amp;b&lt;c&gt;");
    }
}
