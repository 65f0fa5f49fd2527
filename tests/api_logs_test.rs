//! Integration tests for the network log API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::util::ServiceExt;

    use crate::test_utils::{MockTransport, body_to_json, reply, test_app_with, test_config};

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .body(Body::empty())
            .unwrap()
    }

    /// App that has already completed `count` exchanges
    async fn app_with_entries(count: usize) -> Router {
        let replies = (0..count).map(|i| reply(&format!("reply {}", i), 2500)).collect();
        let app = test_app_with(test_config(), Arc::new(MockTransport::new(replies)));
        for i in 0..count {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/chat")
                        .method("POST")
                        .header("content-type", "application/json")
                        .body(Body::from(json!({ "message": format!("msg {}", i) }).to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        app
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        if status != StatusCode::OK {
            return (status, Value::Null);
        }
        (status, body_to_json(response.into_body()).await)
    }

    /// Tests entries are listed newest first with redacted headers
    #[tokio::test]
    #[serial]
    async fn it_lists_entries_newest_first() {
        let app = app_with_entries(3).await;

        let (status, body) = call(
            &app,
            Request::builder()
                .uri("/api/logs")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let entries = body["entries"].as_array().unwrap();
        let ids: Vec<u64> = entries.iter().map(|e| e["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(body["expanded"], json!([1, 2, 3]));

        let headers = entries[0]["request_headers"].as_str().unwrap();
        assert!(headers.contains("Authorization: *******"));
        assert!(!headers.contains("sk-test-secret"));
        let response_headers = entries[0]["response_headers"].as_str().unwrap();
        assert!(!response_headers.contains("apim-request-id"));
        assert_eq!(entries[0]["response_time_ms"], 2500);
    }

    /// Tests toggling flips a single entry
    #[tokio::test]
    #[serial]
    async fn it_toggles_an_entry() {
        let app = app_with_entries(2).await;

        let (status, body) = call(&app, post("/api/logs/1/toggle")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 1, "expanded": false}));

        let (_, body) = call(&app, post("/api/logs/1/toggle")).await;
        assert_eq!(body, json!({"id": 1, "expanded": true}));
    }

    /// Tests toggling an unknown entry is a 404
    #[tokio::test]
    #[serial]
    async fn it_does_not_toggle_unknown_entries() {
        let app = app_with_entries(1).await;

        let (status, _) = call(&app, post("/api/logs/7/toggle")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Tests collapse all then expand all
    #[tokio::test]
    #[serial]
    async fn it_expands_and_collapses_all() {
        let app = app_with_entries(3).await;

        let (_, body) = call(&app, post("/api/logs/collapse")).await;
        assert_eq!(body["expanded"], json!([]));
        assert_eq!(body["entries"].as_array().unwrap().len(), 3);

        let (_, body) = call(&app, post("/api/logs/expand")).await;
        assert_eq!(body["expanded"], json!([1, 2, 3]));
    }
}
