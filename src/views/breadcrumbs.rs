use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    /// `None` renders the crumb as plain text
    pub href: Option<String>,
}

/// Trail rendered above every page, always starting at Home
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Breadcrumbs {
    pub items: Vec<Crumb>,
}

impl Breadcrumbs {
    pub fn new(items: &[(&str, Option<&str>)]) -> Self {
        let mut crumbs = vec![Crumb {
            label: "Home".to_string(),
            href: Some("/".to_string()),
        }];
        let last = items.len().saturating_sub(1);
        crumbs.extend(items.iter().enumerate().map(|(i, (label, href))| Crumb {
            label: label.to_string(),
            href: if i == last {
                None
            } else {
                href.map(str::to_string)
            },
        }));
        Breadcrumbs { items: crumbs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_is_always_first() {
        let crumbs = Breadcrumbs::new(&[]);
        assert_eq!(crumbs.items.len(), 1);
        assert_eq!(crumbs.items[0].label, "Home");
        assert_eq!(crumbs.items[0].href.as_deref(), Some("/"));
    }

    #[test]
    fn test_last_item_is_plain_text() {
        let crumbs = Breadcrumbs::new(&[
            ("Leagues", Some("/leagues")),
            ("Texas", None),
            ("Metro Flag", Some("/leagues/metro-flag")),
        ]);
        let hrefs: Vec<_> = crumbs.items.iter().map(|c| c.href.as_deref()).collect();
        assert_eq!(hrefs, vec![Some("/"), Some("/leagues"), None, None]);
        assert_eq!(crumbs.items[3].label, "Metro Flag");
    }
}
