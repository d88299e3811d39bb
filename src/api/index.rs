use axum::Json;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Static JSON response for the API index endpoint
static INDEX_JSON: OnceLock<Value> = OnceLock::new();

/// Handler for the API index that documents the JSON endpoints
///
/// # Endpoint: GET /api
pub fn index() -> Json<Value> {
    let value = INDEX_JSON.get_or_init(|| {
        json!({
            "endpoints": [
                {
                    "path": "/api",
                    "method": "GET",
                    "description": "API endpoint documentation",
                    "params": {}
                },
                {
                    "path": "/api/search",
                    "method": "GET | POST",
                    "description": "Search teams, leagues, tournaments and clinics by name. POST takes the same fields as a JSON body",
                    "params": {
                        "q": {
                            "type": "string",
                            "required": false,
                            "description": "Search term. Without one the result list is empty"
                        },
                        "type": {
                            "type": "string",
                            "required": false,
                            "description": "One of all, team, league, tournament, clinic [default: all]"
                        },
                        "state": {
                            "type": "string",
                            "required": false,
                            "description": "Two-letter state code"
                        }
                    }
                },
                {
                    "path": "/api/submit",
                    "method": "POST",
                    "description": "Queue a program for review",
                    "params": {
                        "type": {
                            "type": "string",
                            "required": true,
                            "description": "Submission type, e.g. league, event, assignor"
                        },
                        "payload": {
                            "type": "object",
                            "required": true,
                            "description": "Program details"
                        },
                        "source": {
                            "type": "string",
                            "required": false,
                            "description": "Origin of the submission [default: api]"
                        }
                    }
                },
                {
                    "path": "/health",
                    "method": "GET",
                    "description": "Database and session store connectivity",
                    "params": {}
                }
            ]
        })
    });

    Json(value.clone())
}
