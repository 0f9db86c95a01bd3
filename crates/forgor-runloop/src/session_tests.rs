    use super::*;

    use forgor_client::MemoryTokenStore;
    use forgor_config::ServerConfig;
    use forgor_protocols::{BadgeState, ResultField, QueryResult};
    use tokio::sync::broadcast::error::TryRecvError;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use crate::actions::PageContext;
    use crate::testing::{FakeBackend, RecordingSink};

    fn api_at(base_url: String, pair: TokenPair) -> (ForgorApi, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::with_pair(pair));
        let config = ServerConfig {
            base_url,
            ..Default::default()
        };
        (ForgorApi::from_config(&config, store.clone()).unwrap(), store)
    }

    /// Session with an in-memory relevance backend and an unreachable API.
    fn offline_session() -> (Session, Arc<FakeBackend>) {
        let (api, _) = api_at("http://127.0.0.1:9".to_string(), TokenPair::new("a", "r"));
        let backend = FakeBackend::new();
        let session = Session::with_backend(
            api,
            backend.clone(),
            Arc::new(RecordingSink::default()),
            SessionSettings::default(),
        );
        (session, backend)
    }

    fn online_session(server: &MockServer, pair: TokenPair) -> (Session, Arc<MemoryTokenStore>) {
        let (api, store) = api_at(server.uri(), pair);
        let session = Session::new(api, Arc::new(RecordingSink::default()), SessionSettings::default());
        (session, store)
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<UiNotification>) -> Vec<UiNotification> {
        let mut seen = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(n) => seen.push(n),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return seen,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    #[test]
    fn test_install_reason() {
        assert_eq!(InstallReason::from("install"), InstallReason::Install);
        assert_eq!(InstallReason::from("update"), InstallReason::Update);
        assert_eq!(InstallReason::from("chrome_update"), InstallReason::Other);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.timing.flush_ms = 250;
        config.relevance.threshold = 0.5;
        let settings = SessionSettings::from_config(&config);
        assert_eq!(settings.quiet_window, Duration::from_millis(250));
        assert_eq!(settings.threshold, 0.5);
        assert_eq!(settings.idle_delay, Duration::from_millis(15_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_events_coalesce_into_one_query() {
        let (session, backend) = offline_session();
        backend.always(Ok(forgor_protocols::RawResponse::new(
            200,
            r#"{"images":[{"name":"hit","hybrid_score":0.8}]}"#,
        )));

        assert!(session.on_tab_activated(&TabSnapshot::new("A", "https://x.com/a")));
        let loading = TabChange {
            status: Some("loading".to_string()),
            ..Default::default()
        };
        assert!(!session.on_tab_updated(&loading, &TabSnapshot::new("C", "https://z.com")));
        let complete = TabChange {
            status: Some("complete".to_string()),
            ..Default::default()
        };
        assert!(session.on_tab_updated(&complete, &TabSnapshot::new("B", "https://y.com")));

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(backend.calls(), vec!["A x.com || B y.com".to_string()]);
        assert_eq!(session.badge().state(), BadgeState::Match);
        assert!(session.cache().get("a x.com || b y.com").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_reevaluates_last_tab() {
        let (session, backend) = offline_session();
        session.on_tab_activated(&TabSnapshot::new("A", "https://x.com"));

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(backend.call_count(), 1);

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert_eq!(backend.calls(), vec!["A x.com".to_string(), "A x.com".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_state() {
        let (session, backend) = offline_session();
        session.cache().put("q", QueryResult::new(ResultField::Images, vec![]));
        session.on_tab_activated(&TabSnapshot::new("A", "https://x.com"));
        session.badge().set_state(BadgeState::Match).await;

        session.reset().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(backend.call_count(), 0);
        assert!(session.cache().is_empty());
        assert!(session.poller().buffer().lock().is_empty());
        assert_eq!(session.badge().state(), BadgeState::Idle);
    }

    #[tokio::test]
    async fn test_installed_prompts_login() {
        let server = MockServer::start().await;
        let (session, _) = online_session(&server, TokenPair::default());
        let mut rx = session.bus().subscribe();

        session.on_installed(InstallReason::Install).await;
        assert_eq!(drain(&mut rx), vec![UiNotification::OpenLogin]);
    }

    #[tokio::test]
    async fn test_update_with_complete_tokens_is_quiet() {
        let server = MockServer::start().await;
        let (session, _) = online_session(&server, TokenPair::new("a", "r"));
        let mut rx = session.bus().subscribe();

        session.on_installed(InstallReason::Update).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_update_with_failed_refresh() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/refresh_token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        let (session, store) = online_session(&server, TokenPair::new("", "stale"));
        let mut rx = session.bus().subscribe();

        session.on_installed(InstallReason::Update).await;
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(drain(&mut rx), vec![UiNotification::OpenLogin]);
    }

    #[tokio::test]
    async fn test_update_with_successful_refresh_still_prompts_once() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/refresh_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "new"})),
            )
            .mount(&server)
            .await;
        let (session, store) = online_session(&server, TokenPair::new("", "r"));
        let mut rx = session.bus().subscribe();

        session.on_installed(InstallReason::Update).await;
        assert_eq!(store.load().await.unwrap(), TokenPair::new("new", "r"));
        assert_eq!(drain(&mut rx), vec![UiNotification::OpenLogin]);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "a1",
                "refresh_token": "r1"
            })))
            .mount(&server)
            .await;
        Mock::given(matchers::path("/api/get_saves_left"))
            .and(matchers::header("Authorization", "Bearer a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tier": "free",
                "current_saves": 1,
                "max_saves": 50
            })))
            .mount(&server)
            .await;

        let (session, store) = online_session(&server, TokenPair::default());
        let mut rx = session.bus().subscribe();

        let pair = session.login("ada", "pw").await.unwrap();
        assert_eq!(pair, TokenPair::new("a1", "r1"));
        let seen = drain(&mut rx);
        assert!(seen.iter().any(|n| matches!(n, UiNotification::UpdateTierInfo { .. })));
        assert_eq!(seen.last(), Some(&UiNotification::RefreshIfOpen));
        assert!(session.tier().snapshot().is_some());

        session.logout().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert!(session.tier().snapshot().is_none());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/register"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "a1",
                "refresh_token": "r1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (session, _) = online_session(&server, TokenPair::default());
        let pair = session.register("ada", "pw").await.unwrap();
        assert!(pair.is_complete());
    }

    #[tokio::test]
    async fn test_context_menu_without_session_prompts_login() {
        let server = MockServer::start().await;
        let (session, _) = online_session(&server, TokenPair::default());
        let mut rx = session.bus().subscribe();

        let command = MenuCommand::UploadImage {
            src_url: "https://cdn.example.com/a.jpg".to_string(),
            page: PageContext::default(),
        };
        let err = session.on_context_menu(&command).await.unwrap_err();
        assert!(err.requires_login());
        assert_eq!(session.badge().state(), BadgeState::Error);
        assert_eq!(drain(&mut rx), vec![UiNotification::OpenLogin]);
    }
