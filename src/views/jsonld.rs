use serde_json::{json, Value};

/// schema.org `ItemList` whose entries point at `urls`, in order
pub fn item_list<I>(name: &str, urls: I) -> Value
where
    I: IntoIterator<Item = String>,
{
    let elements: Vec<Value> = urls
        .into_iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "url": url,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "name": name,
        "itemListElement": elements,
    })
}

/// Serialises `data` for an inline `<script type="application/ld+json">` block
pub fn script_body(data: &Value) -> String {
    data.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_list_positions_start_at_one() {
        let list = item_list(
            "Flag Football Leagues in TX",
            vec!["/leagues/a".to_string(), "/leagues/b".to_string()],
        );
        assert_eq!(list["@type"], "ItemList");
        assert_eq!(list["itemListElement"][0]["position"], 1);
        assert_eq!(list["itemListElement"][1]["url"], "/leagues/b");
    }

    #[test]
    fn test_script_body_cannot_close_the_tag() {
        let data = json!({"name": "</script><script>alert(1)</script>"});
        assert!(!script_body(&data).contains("</script>"));
    }
}
