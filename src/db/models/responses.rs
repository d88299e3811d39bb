use serde::{Deserialize, Serialize};

/// One hit of the search API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub id: i32,
    pub name: String,
    /// `team`, `league`, `tournament` or `clinic`
    #[serde(rename = "type")]
    pub kind: String,
    /// Display location, `City, ST` or the event venue
    pub location: Option<String>,
    pub state: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Body accepted by `POST /api/submit`
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub payload: Option<serde_json::Value>,
    pub source: Option<String>,
}

impl SubmitRequest {
    /// `type` and `payload`, when both are present and usable
    pub fn parts(&self) -> Option<(&str, &serde_json::Value)> {
        let kind = self.kind.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let payload = self.payload.as_ref().filter(|p| !p.is_null())?;
        Some((kind, payload))
    }
}

/// Response of `POST /api/submit`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        SubmitResponse {
            ok: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SubmitResponse {
            ok: false,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_request_parts() {
        let req: SubmitRequest =
            serde_json::from_value(json!({"type": "league", "payload": {"name": "x"}})).unwrap();
        let (kind, payload) = req.parts().unwrap();
        assert_eq!(kind, "league");
        assert_eq!(payload["name"], "x");

        let req: SubmitRequest = serde_json::from_value(json!({"payload": {}})).unwrap();
        assert!(req.parts().is_none());

        let req: SubmitRequest =
            serde_json::from_value(json!({"type": "team", "payload": null})).unwrap();
        assert!(req.parts().is_none());

        let req: SubmitRequest = serde_json::from_value(json!({"type": " ", "payload": {}})).unwrap();
        assert!(req.parts().is_none());
    }

    #[test]
    fn test_submit_response_shape() {
        assert_eq!(
            serde_json::to_value(SubmitResponse::ok()).unwrap(),
            json!({"ok": true})
        );
        assert_eq!(
            serde_json::to_value(SubmitResponse::error("Missing type/payload")).unwrap(),
            json!({"ok": false, "error": "Missing type/payload"})
        );
    }

    #[test]
    fn test_search_result_uses_type_key() {
        let result = SearchResult {
            id: 4,
            name: "Metro Flag".to_string(),
            kind: "league".to_string(),
            location: Some("Austin, TX".to_string()),
            state: Some("TX".to_string()),
            slug: Some("metro-flag".to_string()),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "league");
        assert!(value.get("kind").is_none());
    }
}
