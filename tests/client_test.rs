#[cfg(test)]
mod tests {
    use anyhow::Result;
    use captionify::client::models::CaptionRequest;
    use captionify::client::{CaptionService, HttpCaptionService};
    use captionify::config::AppConfig;
    use captionify::error::{FailureKind, ServiceError};
    use captionify::form::{Tone, WritingStyle};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn service_for(server: &mockito::ServerGuard) -> HttpCaptionService {
        HttpCaptionService::new(Url::parse(&server.url()).unwrap())
    }

    fn request() -> CaptionRequest {
        CaptionRequest {
            description: "A golden retriever catching a frisbee".to_string(),
            tone: Tone::Excited,
            style: WritingStyle::Casual,
            additional_context: Some("Central Park".to_string()),
            emojis: true,
            hashtags: false,
        }
    }

    #[tokio::test]
    async fn test_describe_sends_data_url() -> Result<()> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/description")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "image": "data:image/png;base64,AAAA" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#""A small test image""#)
            .create_async()
            .await;

        let description = service_for(&server).describe_image("data:image/png;base64,AAAA").await?;

        assert_eq!(description, "A small test image");
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_describe_accepts_plain_text() -> Result<()> {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/description")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("A plate of tacos on a wooden table")
            .create_async()
            .await;

        let description = service_for(&server).describe_image("data:image/jpeg;base64,AAAA").await?;
        assert_eq!(description, "A plate of tacos on a wooden table");
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_sends_wire_format() -> Result<()> {
        let mut server = Server::new_async().await;
        let body = serde_json::to_string(r#"{"captions": ["Fetch mode: ON", "Air Bud who?"]}"#)?;
        let mock = server
            .mock("POST", "/api/caption")
            .match_body(Matcher::Json(json!({
                "description": "A golden retriever catching a frisbee",
                "tone": "Excited",
                "style": "Casual",
                "additionalContext": "Central Park",
                "emojis": "Yes",
                "hashtags": "No"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let captions = service_for(&server).generate_captions(&request()).await?;

        assert_eq!(captions, vec!["Fetch mode: ON", "Air Bud who?"]);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_carries_detail() -> Result<()> {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/caption")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "OpenAI API error: rate limited"}"#)
            .create_async()
            .await;

        let error = service_for(&server).generate_captions(&request()).await.unwrap_err();

        assert_eq!(error.kind(), FailureKind::Server);
        match error {
            ServiceError::Server { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "OpenAI API error: rate limited");
            }
            other => panic!("expected server error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_captions_are_client_errors() -> Result<()> {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/caption")
            .with_status(200)
            .with_body("definitely not json")
            .create_async()
            .await;

        let error = service_for(&server).generate_captions(&request()).await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::Client);
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() -> Result<()> {
        // Nothing listens on port 9 of the loopback interface
        let service = HttpCaptionService::new(Url::parse("http://127.0.0.1:9")?);

        let error = service.describe_image("data:image/png;base64,AAAA").await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::Network);
        Ok(())
    }

    #[tokio::test]
    async fn test_request_timeout_is_network_error() -> Result<()> {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/caption")
            .with_status(200)
            .with_chunked_body(|w| {
                use std::io::Write;
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(br#""{\"captions\": [\"Too late\"]}""#)
            })
            .create_async()
            .await;

        let config = AppConfig {
            api_url: server.url(),
            request_timeout_secs: Some(1),
            ..AppConfig::default()
        };
        let service = HttpCaptionService::from_config(&config)?;

        let error = service.generate_captions(&request()).await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::Network);
        assert_eq!(error.user_message(), captionify::error::NETWORK_ERROR_MESSAGE);
        Ok(())
    }

    #[tokio::test]
    async fn test_service_under_path_prefix() -> Result<()> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/captionify/api/description")
            .with_status(200)
            .with_body(r#""prefixed""#)
            .create_async()
            .await;

        let config = AppConfig::default().with_api_url(format!("{}/captionify", server.url()));
        let service = HttpCaptionService::from_config(&config)?;

        assert_eq!(service.describe_image("data:image/png;base64,AAAA").await?, "prefixed");
        mock.assert_async().await;
        Ok(())
    }
}
