use super::mock::{many_sites, widget_sites, Reply, ScriptedTransport};
use std::sync::Arc;
use termscan::{ItemError, PoolConfig, ScanError, Scanner};

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(transport: Arc<ScriptedTransport>, concurrency: usize) -> Scanner {
        Scanner::with_transport(PoolConfig::new(concurrency), transport)
    }

    #[tokio::test]
    async fn test_widget_scenario() {
        let transport = widget_sites().shared();
        let results = scanner(transport.clone(), 20)
            .run(&["a.test", "b.test", "c.test"], "widget")
            .await
            .unwrap();

        assert_eq!(results.len(), 3);

        let a = results.get("a.test").unwrap();
        assert!(a.found);
        assert!(a.error.is_none());

        let b = results.get("b.test").unwrap();
        assert!(!b.found);
        assert!(matches!(
            b.error,
            Some(ItemError::Transport {
                fallback: Some(_),
                ..
            })
        ));

        let c = results.get("c.test").unwrap();
        assert!(!c.found);
        assert!(c.error.is_none());

        // b.test was retried once with the www. prefix, nothing else was
        let mut requests = transport.requests();
        requests.sort();
        assert_eq!(
            requests,
            vec![
                "http://a.test",
                "http://b.test",
                "http://c.test",
                "http://www.b.test"
            ]
        );
    }

    #[tokio::test]
    async fn test_one_result_per_target_in_submission_order() {
        let (targets, transport) = many_sites(25, "widget");
        let results = scanner(transport.shared(), 4)
            .run(&targets, "widget")
            .await
            .unwrap();

        assert_eq!(results.len(), targets.len());
        let returned: Vec<&str> = results.iter().map(|r| r.target.as_str()).collect();
        let expected: Vec<&str> = targets.iter().map(String::as_str).collect();
        assert_eq!(returned, expected);
        assert_eq!(results.found_count(), 25);
    }

    #[tokio::test]
    async fn test_duplicate_targets_are_kept() {
        let transport = widget_sites().shared();
        let results = scanner(transport.clone(), 2)
            .run(&["a.test", "c.test", "a.test"], "widget")
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        let found: Vec<bool> = results.iter().map(|r| r.found).collect();
        assert_eq!(found, vec![true, false, true]);
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let scanner = scanner(widget_sites().shared(), 3);
        let targets = ["c.test", "a.test", "b.test", "a.test"];

        let first = scanner.run(&targets, "widget").await.unwrap();
        let second = scanner.run(&targets, "widget").await.unwrap();

        assert_eq!(first.results(), second.results());
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive() {
        let transport = ScriptedTransport::new()
            .body("http://fox.test", "<p>The Quick Brown Fox</p>")
            .shared();
        let scanner = scanner(transport, 1);

        for term in ["FOX", "fox", "Quick brown"] {
            let results = scanner.run(&["fox.test"], term).await.unwrap();
            assert!(results.get("fox.test").unwrap().found, "term {:?}", term);
        }
    }

    #[tokio::test]
    async fn test_markup_is_not_searched() {
        let transport = ScriptedTransport::new()
            .body(
                "http://a.test",
                r#"<div class="widget"><script>var widget = 1;</script>plain text</div>"#,
            )
            .shared();

        let results = scanner(transport, 1).run(&["a.test"], "widget").await.unwrap();
        assert!(!results.get("a.test").unwrap().found);
    }

    #[tokio::test]
    async fn test_empty_term_makes_no_requests() {
        let transport = widget_sites().shared();
        let result = scanner(transport.clone(), 5)
            .run(&["a.test", "b.test"], "")
            .await;

        assert!(matches!(result, Err(ScanError::Configuration { .. })));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_concurrency_makes_no_requests() {
        let transport = widget_sites().shared();
        let result = scanner(transport.clone(), 0).run(&["a.test"], "widget").await;

        assert!(matches!(result, Err(ScanError::Configuration { .. })));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_negative_concurrency_rejected() {
        assert!(matches!(
            PoolConfig::concurrency_from_signed(-4),
            Err(ScanError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_in_term_is_significant() {
        let transport = ScriptedTransport::new()
            .body("http://joined.test", "<p>awidgetb</p>")
            .body("http://spaced.test", "<p>a Widget b</p>")
            .shared();

        let results = scanner(transport, 2)
            .run(&["joined.test", "spaced.test"], " widget ")
            .await
            .unwrap();

        assert!(!results.get("joined.test").unwrap().found);
        assert!(results.get("spaced.test").unwrap().found);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_transform_error() {
        let transport = ScriptedTransport::new()
            .reply("http://bin.test", Reply::Raw(vec![0xff, 0xfe, 0x00, 0x9f]))
            .body("http://a.test", "<p>widget</p>")
            .shared();

        let results = scanner(transport.clone(), 2)
            .run(&["bin.test", "a.test"], "widget")
            .await
            .unwrap();

        let bin = results.get("bin.test").unwrap();
        assert!(!bin.found);
        assert!(matches!(bin.error, Some(ItemError::Transform(_))));
        assert!(results.get("a.test").unwrap().found);

        // A transform failure is not a transport failure, so no www. retry
        assert!(!transport
            .requests()
            .contains(&"http://www.bin.test".to_string()));
    }

    #[tokio::test]
    async fn test_free_run_rejects_empty_term_without_client() {
        let result = termscan::run(&["a.test"], "   ", PoolConfig::default()).await;
        assert!(matches!(result, Err(ScanError::Configuration { .. })));
    }
}
