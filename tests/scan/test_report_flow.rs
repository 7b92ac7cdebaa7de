use super::mock::widget_sites;
use std::io::Write;
use termscan::{load_targets, render_report, write_report, PoolConfig, Scanner, TargetsOptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_csv_to_report() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            input,
            "Rank,URL,Linking Root Domains\n1,a.test,100\n2,b.test,90\n3,c.test,80"
        )
        .unwrap();

        let targets = load_targets(input.path(), &TargetsOptions::default()).unwrap();
        assert_eq!(targets, vec!["a.test", "b.test", "c.test"]);

        let results = Scanner::with_transport(PoolConfig::new(20), widget_sites().shared())
            .run(&targets, "Widget")
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.txt");
        let written = write_report(&output, &results).unwrap();

        let report = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, report.len());
        assert_eq!(report, render_report(&results));

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Site"));

        let fields = |line: &str| -> Vec<String> {
            line.split('\t')
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect()
        };
        assert_eq!(fields(lines[1]), vec!["a.test", "true", "<nil>"]);
        assert_eq!(fields(lines[2])[..2], ["b.test", "false"]);
        assert!(fields(lines[2])[2].contains("fallback"));
        assert_eq!(fields(lines[3]), vec!["c.test", "false", "<nil>"]);
    }
}
