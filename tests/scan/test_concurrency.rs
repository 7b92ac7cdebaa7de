use super::mock::{many_sites, Reply, ScriptedTransport};
use std::sync::Arc;
use std::time::Duration;
use termscan::{PoolConfig, ScanError, Scanner};
use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_peak_in_flight_bounded_by_concurrency() {
        for (concurrency, n) in [(1, 6), (3, 10), (8, 5), (20, 40)] {
            let (targets, transport) = many_sites(n, "widget");
            let transport = transport.with_delay(Duration::from_millis(50)).shared();

            let results = Scanner::with_transport(PoolConfig::new(concurrency), transport.clone())
                .run(&targets, "widget")
                .await
                .unwrap();

            let bound = concurrency.min(n);
            assert_eq!(results.len(), n);
            assert_eq!(results.concurrency(), bound);
            assert!(
                transport.peak_in_flight() <= bound,
                "peak {} exceeds {} (concurrency {}, {} targets)",
                transport.peak_in_flight(),
                bound,
                concurrency,
                n
            );
            assert!(transport.peak_in_flight() >= 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_returns_partial_results() {
        let (mut targets, transport) = many_sites(3, "widget");
        let transport = transport
            .reply("http://slow.test", Reply::Hang)
            .reply("http://www.slow.test", Reply::Hang)
            .shared();
        targets.insert(1, "slow.test".to_string());

        let config = PoolConfig::new(4).with_collection_deadline(Duration::from_secs(5));
        let result = Scanner::with_transport(config, transport.clone())
            .run(&targets, "widget")
            .await;

        match result {
            Err(ScanError::DeadlineExceeded {
                deadline,
                expected,
                partial,
            }) => {
                assert_eq!(deadline, Duration::from_secs(5));
                assert_eq!(expected, 4);
                assert_eq!(partial.len(), 3);
                assert!(partial.get("slow.test").is_none());
                let order: Vec<&str> = partial.iter().map(|r| r.target.as_str()).collect();
                assert_eq!(order, vec!["site0.test", "site1.test", "site2.test"]);
            }
            other => panic!("expected deadline error, got {:?}", other.map(|s| s.len())),
        }

        // Every unit has exited, including the one stuck on slow.test
        assert_eq!(transport.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_oversized_deadline_is_configuration_error() {
        let transport = ScriptedTransport::new()
            .body("http://a.test", "<p>widget</p>")
            .shared();
        let config = PoolConfig::new(1).with_collection_deadline(Duration::from_secs(u64::MAX));

        let outcome = tokio::spawn({
            let transport = transport.clone();
            async move {
                Scanner::with_transport(config, transport)
                    .run(&["a.test"], "widget")
                    .await
            }
        })
        .await
        .expect("scan task must not panic");

        assert!(matches!(outcome, Err(ScanError::Configuration { .. })));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_returns_partial_results() {
        let transport = ScriptedTransport::new()
            .body("http://a.test", "<p>widget</p>")
            .reply("http://slow.test", Reply::Hang)
            .shared();
        let scanner = Scanner::with_transport(PoolConfig::new(2), transport.clone());

        let cancel = CancellationToken::new();
        tokio::spawn({
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                cancel.cancel();
            }
        });

        let result = scanner
            .run_with_cancel(&["a.test", "slow.test"], "widget", cancel)
            .await;

        match result {
            Err(ScanError::Cancelled { expected, partial }) => {
                assert_eq!(expected, 2);
                assert_eq!(partial.len(), 1);
                assert!(partial.get("a.test").unwrap().found);
            }
            other => panic!("expected cancellation, got {:?}", other.map(|s| s.len())),
        }
        assert_eq!(transport.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_target_does_not_block_others() {
        let (mut targets, transport) = many_sites(6, "widget");
        let transport = transport
            .body("http://slow.test", "<p>widget</p>")
            .with_delay(Duration::from_millis(10))
            .shared();
        targets.insert(0, "slow.test".to_string());

        let results = Scanner::with_transport(PoolConfig::new(2), transport)
            .run(&targets, "widget")
            .await
            .unwrap();
        assert_eq!(results.found_count(), 7);
    }

    #[tokio::test]
    async fn test_scanner_shared_by_concurrent_runs() {
        let (targets, transport) = many_sites(12, "widget");
        let transport = transport.shared();
        let scanner = Arc::new(Scanner::with_transport(PoolConfig::new(3), transport.clone()));

        let runs = (0..4).map(|_| {
            let scanner = scanner.clone();
            let targets = targets.clone();
            async move { scanner.run(&targets, "widget").await }
        });
        let outcomes = futures::future::join_all(runs).await;

        for outcome in outcomes {
            let results = outcome.unwrap();
            assert_eq!(results.len(), 12);
            assert_eq!(results.found_count(), 12);
        }
        assert_eq!(transport.request_count(), 48);
    }

    #[tokio::test]
    async fn test_per_call_config_overrides_concurrency() {
        let (targets, transport) = many_sites(8, "widget");
        let transport = transport.with_delay(Duration::from_millis(5)).shared();
        let scanner = Scanner::with_transport(PoolConfig::new(8), transport.clone());

        let results = scanner
            .run_with(&targets, "widget", &PoolConfig::new(2), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.concurrency(), 2);
        assert!(transport.peak_in_flight() <= 2);
        // The scanner's own configuration is untouched
        assert_eq!(scanner.config().concurrency, 8);
    }
}
