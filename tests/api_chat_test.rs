//! Integration tests for the chat API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use mockito::Matcher;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use crate::test_utils::{
        TEST_API_KEY, TEST_PERSONALITY, body_to_string, gemini_reply, generate_content_path,
        test_app, test_config,
    };

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .uri("/api/chat")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn get_history(app: &Router) -> Value {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        serde_json::from_str(&body).unwrap()
    }

    /// Tests the history starts out empty
    #[tokio::test]
    async fn it_gets_empty_history() {
        let app = test_app(test_config("http://127.0.0.1:9", Some(TEST_API_KEY)));

        let history = get_history(&app).await;
        assert_eq!(history, json!({ "transcript": [] }));
    }

    /// Tests a prompt is answered and recorded with the seeded personality
    #[tokio::test]
    async fn it_sends_a_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", generate_content_path().as_str())
            .match_query(Matcher::UrlEncoded("key".into(), TEST_API_KEY.into()))
            .match_body(Matcher::Json(json!({
                "contents": [
                    { "parts": [{ "text": TEST_PERSONALITY }], "role": "model" },
                    { "parts": [{ "text": "Tell me a joke." }], "role": "user" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_reply("Why did..."))
            .create_async()
            .await;

        let app = test_app(test_config(&server.url(), Some(TEST_API_KEY)));

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "Tell me a joke." })))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({ "message": "Why did..." })
        );

        let history = get_history(&app).await;
        assert_eq!(
            history,
            json!({
                "transcript": [
                    { "role": "model", "text": TEST_PERSONALITY },
                    { "role": "user", "text": "Tell me a joke." },
                    { "role": "model", "text": "Why did..." }
                ]
            })
        );
    }

    /// Tests the personality in the request seeds an empty conversation
    #[tokio::test]
    async fn it_uses_personality_override() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", generate_content_path().as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(gemini_reply("Arr"))
            .create_async()
            .await;

        let app = test_app(test_config(&server.url(), Some(TEST_API_KEY)));

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi", "personality": "pirate" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi", "personality": "robot" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let history = get_history(&app).await;
        assert_eq!(history["transcript"][0]["text"], "pirate");
        assert_eq!(history["transcript"].as_array().unwrap().len(), 5);
    }

    /// Tests a missing API key fails without calling the provider
    #[tokio::test]
    async fn it_rejects_missing_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let app = test_app(test_config(&server.url(), None));

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi" })))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_to_string(response.into_body()).await;
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["kind"], "missing_credential");

        let history = get_history(&app).await;
        assert_eq!(history, json!({ "transcript": [] }));
    }

    /// Tests a provider error surfaces as a bad gateway and keeps the prompt
    #[tokio::test]
    async fn it_reports_provider_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", generate_content_path().as_str())
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": {"status": "RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let app = test_app(test_config(&server.url(), Some(TEST_API_KEY)));

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_to_string(response.into_body()).await;
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["kind"], "transport_error");
        assert!(body["error"].as_str().unwrap().contains("RESOURCE_EXHAUSTED"));

        let history = get_history(&app).await;
        assert_eq!(
            history,
            json!({
                "transcript": [
                    { "role": "model", "text": TEST_PERSONALITY },
                    { "role": "user", "text": "hi" }
                ]
            })
        );
    }

    /// Tests a connection failure never sends the API key back to the client
    #[tokio::test]
    async fn it_hides_api_key_on_connection_errors() {
        // Nothing listens on port 9 in the test environment
        let app = test_app(test_config("http://127.0.0.1:9", Some("SUPER-SECRET-KEY")));

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_to_string(response.into_body()).await;
        assert!(!body.contains("SUPER-SECRET-KEY"), "key in body: {}", body);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["kind"], "transport_error");
    }

    /// Tests a reply without candidate text is a bad gateway
    #[tokio::test]
    async fn it_reports_malformed_responses() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", generate_content_path().as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let app = test_app(test_config(&server.url(), Some(TEST_API_KEY)));

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_to_string(response.into_body()).await;
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["kind"], "malformed_response");
    }

    /// Tests clearing the history and setting the personality
    #[tokio::test]
    async fn it_clears_history_and_sets_personality() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", generate_content_path().as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(gemini_reply("R"))
            .create_async()
            .await;

        let app = test_app(test_config(&server.url(), Some(TEST_API_KEY)));

        app.clone()
            .oneshot(post_chat(json!({ "message": "hi" })))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat/personality")
                    .method("PUT")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "personality": "X" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let history = get_history(&app).await;
        assert_eq!(history["transcript"][0]["text"], "X");
        assert_eq!(history["transcript"].as_array().unwrap().len(), 3);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat/history")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let history = get_history(&app).await;
        assert_eq!(history, json!({ "transcript": [] }));
    }
}
