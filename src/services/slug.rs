//! URL slugs and the slug-or-id lookup used by the detail pages.

/// Lower-cases `value` and joins its alphanumeric runs with `-`
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch == '\'' {
            continue;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Turns `north-dallas_flag` into `North Dallas Flag`
pub fn slug_to_name(slug: &str) -> String {
    slug.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits `"Austin, TX"` into its city and upper-cased state code
pub fn parse_location(location: &str) -> Option<(String, String)> {
    let (city, state) = location.rsplit_once(',')?;
    let city = city.trim();
    let state = state.trim().to_uppercase();
    if city.is_empty() || state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((city.to_string(), state))
}

/// The ways a detail page path segment can identify a row, tried in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugLookup {
    pub slug: String,
    pub id: Option<i32>,
    pub name: Option<String>,
}

impl SlugLookup {
    /// `None` for segments that can never match a row
    pub fn parse(segment: &str) -> Option<Self> {
        let slug = segment.trim();
        if slug.is_empty() || slug == "null" || slug == "undefined" {
            return None;
        }
        let name = Some(slug_to_name(slug)).filter(|n| !n.is_empty());
        Some(SlugLookup {
            slug: slug.to_string(),
            id: slug.parse::<i32>().ok(),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Metro Flag League"), "metro-flag-league");
        assert_eq!(slugify("  St. Louis -- Youth  "), "st-louis-youth");
        assert_eq!(slugify("Kids' Clinic 2026!"), "kids-clinic-2026");
        assert_eq!(slugify("Austin-TX"), "austin-tx");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_to_name() {
        assert_eq!(slug_to_name("north-dallas_flag"), "North Dallas Flag");
        assert_eq!(slug_to_name("--tampa--"), "Tampa");
        assert_eq!(slug_to_name(""), "");
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(
            parse_location("Austin, tx"),
            Some(("Austin".to_string(), "TX".to_string()))
        );
        assert_eq!(
            parse_location("Winston-Salem, NC"),
            Some(("Winston-Salem".to_string(), "NC".to_string()))
        );
        assert_eq!(parse_location("Austin"), None);
        assert_eq!(parse_location(", TX"), None);
        assert_eq!(parse_location("Austin, Texas"), None);
    }

    #[test]
    fn test_lookup_rejects_placeholder_segments() {
        assert!(SlugLookup::parse("").is_none());
        assert!(SlugLookup::parse("null").is_none());
        assert!(SlugLookup::parse("undefined").is_none());
    }

    #[test]
    fn test_lookup_parts() {
        let lookup = SlugLookup::parse("42").unwrap();
        assert_eq!(lookup.id, Some(42));
        assert_eq!(lookup.name.as_deref(), Some("42"));

        let lookup = SlugLookup::parse("metro-flag").unwrap();
        assert_eq!(lookup.slug, "metro-flag");
        assert_eq!(lookup.id, None);
        assert_eq!(lookup.name.as_deref(), Some("Metro Flag"));

        let lookup = SlugLookup::parse("---").unwrap();
        assert!(lookup.name.is_none());
    }
}
