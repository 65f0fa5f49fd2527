//! Integration tests for the endpoint configuration API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::util::ServiceExt;

    use crate::test_utils::{
        MockTransport, PRIMARY_URL, body_to_json, body_to_string, reply, test_app, test_app_with,
        test_config,
    };

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method(method)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Tests credentials are masked when reading the config
    #[tokio::test]
    #[serial]
    async fn it_masks_credentials() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert!(!body.contains("sk-test-secret"));

        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["selected"], "primary");
        assert_eq!(body["primary"]["url"], PRIMARY_URL);
        assert_eq!(body["primary"]["credential"], "*******");
        assert_eq!(body["primary"]["auth_scheme"], "bearer");
        assert_eq!(body["primary"]["label"], "DIR");
        assert_eq!(body["secondary"]["credential"], "");
        assert_eq!(body["secondary"]["auth_scheme"], "test-key");
        assert_eq!(body["secondary"]["label"], "EGW");
    }

    /// Tests a partial update only changes the given fields
    #[tokio::test]
    #[serial]
    async fn it_updates_an_endpoint() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/config/secondary",
                json!({"url": "https://egw.example.com/openai/", "credential": "tk-1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["secondary"]["url"], "https://egw.example.com/openai");
        assert_eq!(body["secondary"]["credential"], "*******");
        assert_eq!(body["secondary"]["auth_scheme"], "test-key");
        assert_eq!(body["primary"]["url"], PRIMARY_URL);
    }

    /// Tests unknown endpoint names are rejected
    #[tokio::test]
    #[serial]
    async fn it_rejects_unknown_endpoint() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/config/tertiary",
                json!({"url": "https://x.example.com"}),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    /// Tests switching endpoints changes the auth header and log label
    /// of the next request
    #[tokio::test]
    #[serial]
    async fn it_sends_to_selected_endpoint() {
        let transport = Arc::new(MockTransport::new(vec![reply("Hi", 10)]));
        let app = test_app_with(test_config(), Arc::clone(&transport));

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/config/secondary",
                json!({"url": "https://egw.example.com", "credential": "tk-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/config/select",
                json!({"endpoint": "secondary"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["selected"], "secondary");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/chat", json!({"message": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let sent = transport.sent();
        assert_eq!(
            sent[0].url,
            "https://egw.example.com/chat/completions?api-version=2024-06-01"
        );
        assert!(
            sent[0]
                .headers
                .contains(&("Test-Key".to_string(), "tk-1".to_string()))
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/logs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["entries"][0]["endpoint_label"], "EGW");
        assert!(
            body["entries"][0]["request_headers"]
                .as_str()
                .unwrap()
                .contains("Test-Key: *******")
        );
    }
}
