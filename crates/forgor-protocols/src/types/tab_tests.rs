    use super::*;

    #[test]
    fn test_signal_key_title_and_host() {
        let tab = TabSnapshot::new("  Rust Book  ", "https://doc.rust-lang.org/book/");
        assert_eq!(tab.signal_key().as_deref(), Some("Rust Book doc.rust-lang.org"));
    }

    #[test]
    fn test_signal_key_title_only_for_malformed_url() {
        let tab = TabSnapshot::new("Notes", "not a url");
        assert_eq!(tab.hostname(), "");
        assert_eq!(tab.signal_key().as_deref(), Some("Notes"));
    }

    #[test]
    fn test_signal_key_host_only() {
        let tab = TabSnapshot::new("", "https://example.com/path?q=1");
        assert_eq!(tab.signal_key().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_signal_key_empty() {
        let tab = TabSnapshot::default();
        assert_eq!(tab.signal_key(), None);

        let tab = TabSnapshot::new("   ", "chrome://newtab");
        assert_eq!(tab.signal_key().as_deref(), Some("newtab"));

        let tab = TabSnapshot::new("   ", "about:blank");
        assert_eq!(tab.signal_key(), None);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let tab: TabSnapshot =
            serde_json::from_str(r#"{"tabId": 7, "title": "Home", "url": "https://x.com"}"#).unwrap();
        assert_eq!(tab.tab_id, Some(7));
        assert_eq!(tab.signal_key().as_deref(), Some("Home x.com"));
    }

    #[test]
    fn test_change_qualifies() {
        let complete = TabChange {
            status: Some("complete".to_string()),
            ..Default::default()
        };
        assert!(complete.qualifies());

        let loading = TabChange {
            status: Some("loading".to_string()),
            ..Default::default()
        };
        assert!(!loading.qualifies());

        let title = TabChange {
            title: Some("New".to_string()),
            ..Default::default()
        };
        assert!(title.qualifies());

        let url = TabChange {
            url: Some("https://a.b".to_string()),
            ..Default::default()
        };
        assert!(url.qualifies());

        assert!(!TabChange::default().qualifies());
    }
