/// Lowercase, dash-separated slug; apostrophes are dropped
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut needs_dash = false;
    for ch in value.chars().filter(|c| *c != '\'') {
        if !ch.is_alphanumeric() {
            needs_dash = !slug.is_empty();
            continue;
        }
        if needs_dash {
            slug.push('-');
            needs_dash = false;
        }
        slug.extend(ch.to_lowercase());
    }
    slug
}

/// Cache key for a city, `lower(name)-UPPER(state)`
pub fn city_key(name: &str, state: &str) -> String {
    format!("{}-{}", name.trim().to_lowercase(), state.trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Metro Flag League"), "metro-flag-league");
        assert_eq!(slugify("  St. Mary's 7v7!! "), "st-marys-7v7");
        assert_eq!(slugify("Austin-TX"), "austin-tx");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_city_key() {
        assert_eq!(city_key(" Austin ", "tx"), "austin-TX");
    }
}
