    use super::*;
    use std::time::Duration;

    use forgor_client::MemoryTokenStore;
    use forgor_config::ServerConfig;
    use forgor_protocols::TokenPair;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use crate::testing::RecordingSink;

    const PNG_DATA_URL: &str = "data:image/png;base64,aGVsbG8=";

    struct Fixture {
        actions: UserActions,
        badge: BadgeController,
        tier: Arc<TierTracker>,
        bus: NotificationBus,
    }

    fn fixture(server: &MockServer) -> Fixture {
        let config = ServerConfig {
            base_url: server.uri(),
            ..Default::default()
        };
        let store = Arc::new(MemoryTokenStore::with_pair(TokenPair::new("a", "r")));
        let api = ForgorApi::from_config(&config, store).unwrap();
        let badge = BadgeController::new(
            Arc::new(RecordingSink::default()),
            Duration::from_millis(3000),
        );
        let bus = NotificationBus::new();
        let tier = Arc::new(TierTracker::new(api.clone(), bus.clone()));
        Fixture {
            actions: UserActions::new(api, badge.clone(), tier.clone(), bus.clone()),
            badge,
            tier,
            bus,
        }
    }

    async fn mount_tier(server: &MockServer, used: u32, max: u32) {
        Mock::given(matchers::path("/api/get_saves_left"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tier": "free",
                "current_saves": used,
                "max_saves": max
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_screenshot_upload_success() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/api/upload/image"))
            .and(matchers::body_string_contains("Example page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        mount_tier(&server, 3, 50).await;

        let f = fixture(&server);
        let mut rx = f.bus.subscribe();
        let page = PageContext::new("https://example.com", "Example page");

        let reply = f.actions.upload_screenshot(PNG_DATA_URL, &page).await.unwrap();
        assert_eq!(reply["ok"], true);
        assert_eq!(f.badge.state(), BadgeState::Saved);
        assert_eq!(f.tier.snapshot().map(|t| t.current_saves), Some(3));
        assert!(matches!(
            rx.recv().await.unwrap(),
            UiNotification::UpdateTierInfo { .. }
        ));
    }

    #[tokio::test]
    async fn test_upload_failure_sets_error() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/upload/image"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let f = fixture(&server);
        let err = f
            .actions
            .upload_screenshot(PNG_DATA_URL, &PageContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Client(ClientError::Http { status: 500, .. })));
        assert_eq!(f.badge.state(), BadgeState::Error);
    }

    #[tokio::test]
    async fn test_invalid_screenshot_sets_error() {
        let server = MockServer::start().await;
        let f = fixture(&server);
        let err = f
            .actions
            .upload_screenshot("not a data url", &PageContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Client(ClientError::InvalidInput(_))));
        assert_eq!(f.badge.state(), BadgeState::Error);
    }

    #[tokio::test]
    async fn test_save_blocked_sends_nothing() {
        let server = MockServer::start().await;
        mount_tier(&server, 50, 50).await;
        Mock::given(matchers::path("/api/upload/imageurl"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let f = fixture(&server);
        f.tier.refresh().await.unwrap();

        let err = f
            .actions
            .upload_image("https://cdn.example.com/a.jpg", &PageContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::SaveBlocked { max_saves: 50, .. }));
        assert_eq!(f.badge.state(), BadgeState::SaveBlocked);
    }

    #[tokio::test]
    async fn test_upload_image_routes_by_source() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/upload/imageurl"))
            .and(matchers::body_string_contains("https://cdn.example.com/a.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::path("/api/upload/image"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_tier(&server, 0, 50).await;

        let f = fixture(&server);
        let page = PageContext::new("https://example.com", "Example");
        f.actions
            .upload_image("https://cdn.example.com/a.jpg", &page)
            .await
            .unwrap();
        f.actions.upload_image(PNG_DATA_URL, &page).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_image_without_source() {
        let server = MockServer::start().await;
        let f = fixture(&server);
        let err = f
            .actions
            .upload_image("", &PageContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Client(ClientError::InvalidInput(_))));
        assert_eq!(f.badge.state(), BadgeState::Error);
    }

    #[tokio::test]
    async fn test_search_similar_publishes_results() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/search/similar"))
            .and(matchers::body_json(serde_json::json!({
                "image_b64": "aGVsbG8=",
                "page_url": "https://example.com",
                "page_title": "Example"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"name": "a.png"}],
                "query_content": "cats"
            })))
            .mount(&server)
            .await;

        let f = fixture(&server);
        let mut rx = f.bus.subscribe();
        let page = PageContext::new("https://example.com", "Example");

        let results = f.actions.search_similar(PNG_DATA_URL, &page).await.unwrap();
        assert_eq!(results.results.len(), 1);
        assert_eq!(f.badge.state(), BadgeState::Match);
        assert_eq!(
            rx.recv().await.unwrap(),
            UiNotification::DisplaySimilarResults {
                results: vec![serde_json::json!({"name": "a.png"})],
                query_content: Some(serde_json::json!("cats")),
            }
        );
    }

    #[tokio::test]
    async fn test_search_similar_empty_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/search/similar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
            .mount(&server)
            .await;

        let f = fixture(&server);
        f.actions
            .search_similar(PNG_DATA_URL, &PageContext::default())
            .await
            .unwrap();
        assert_eq!(f.badge.state(), BadgeState::NoMatch);
    }

    #[tokio::test]
    async fn test_toolbar_clicked() {
        let server = MockServer::start().await;
        let f = fixture(&server);
        let mut rx = f.bus.subscribe();
        f.badge.set_state(BadgeState::Match).await;

        f.actions.toolbar_clicked().await;
        assert_eq!(f.badge.state(), BadgeState::Idle);
        assert_eq!(rx.recv().await.unwrap(), UiNotification::RefreshIfOpen);
    }

    #[test]
    fn test_menu_command_parsing() {
        let command: MenuCommand = serde_json::from_value(serde_json::json!({
            "item": "forgor-upload-image-url",
            "srcUrl": "https://cdn.example.com/a.jpg",
            "page": {"url": "https://example.com", "title": "Example"}
        }))
        .unwrap();
        assert_eq!(
            command,
            MenuCommand::UploadImage {
                src_url: "https://cdn.example.com/a.jpg".to_string(),
                page: PageContext::new("https://example.com", "Example"),
            }
        );

        let unknown = serde_json::from_value::<MenuCommand>(serde_json::json!({"item": "other"}));
        assert!(unknown.is_err());
    }

