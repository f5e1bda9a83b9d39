use super::*;
use tempfile::TempDir;

#[test]
fn docker_arguments() {
    let tool = DockerJplag::new(JplagConfig::default(), "/tmp/out");
    let args = tool.build_args(Path::new("/work/subs"), Path::new("/tmp/out/run"));

    assert_eq!(
        args,
        vec![
            "run",
            "--rm",
            "-v",
            "/work/subs:/submissions:ro",
            "-v",
            "/tmp/out/run:/results",
            "ghcr.io/jplag/jplag:latest",
            "-l",
            "java",
            "-r",
            "/results/report",
            "--mode",
            "run",
            "--csv-export",
            "/submissions",
        ]
    );
}

#[test]
fn parses_fraction_and_percent_results() {
    let csv = "submissionName1,submissionName2,averageSimilarity,maxSimilarity\n\
               alice,bob,0.75,0.8\n\
               \"carol\",dave,42.5,50\n\
               \n";

    let comparisons = parse_results_csv(csv).expect("csv should parse");
    assert_eq!(comparisons.len(), 2);
    assert_eq!(comparisons[0].first, "alice");
    assert!((comparisons[0].similarity - 0.75).abs() < 1e-12);
    assert_eq!(comparisons[1].first, "carol");
    assert!((comparisons[1].similarity - 0.425).abs() < 1e-12);
}

#[test]
fn header_only_gives_no_comparisons() {
    let comparisons = parse_results_csv("first,second,similarity\n").expect("csv should parse");
    assert!(comparisons.is_empty());
}

#[test]
fn malformed_rows_are_errors() {
    let short = parse_results_csv("h\nalice,bob\n").expect_err("short row");
    assert!(matches!(short, PlagiarismError::ExternalTool(_)));
    assert!(short.to_string().contains("line 2"));

    let bad_value = parse_results_csv("h\nalice,bob,high\n").expect_err("non-numeric");
    assert!(bad_value.to_string().contains("high"));
}

#[test]
fn non_finite_similarity_is_rejected() {
    for value in ["NaN", "inf", "-inf"] {
        let csv = format!("first,second,similarity\nalice,bob,0.5\ncarol,dave,{}\n", value);
        let err = parse_results_csv(&csv).expect_err("non-finite value should fail");
        assert!(matches!(err, PlagiarismError::ExternalTool(_)));
        assert!(err.to_string().contains("line 3"), "unexpected message: {}", err);
    }
}

#[test]
fn finds_nested_results_file() {
    let dir = TempDir::new().expect("should create temp dir");
    let nested = dir.path().join("report");
    fs::create_dir_all(&nested).expect("should create dir");
    fs::write(nested.join(RESULTS_FILE), "h\n").expect("should write");

    let found = find_results_file(dir.path()).expect("search should succeed");
    assert_eq!(found, Some(nested.join(RESULTS_FILE)));

    let empty = TempDir::new().expect("should create temp dir");
    assert_eq!(find_results_file(empty.path()).expect("search should succeed"), None);
}

#[tokio::test]
async fn missing_submissions_directory() {
    let out = TempDir::new().expect("should create temp dir");
    let tool = DockerJplag::new(JplagConfig::default(), out.path());

    let err = tool
        .compare(&out.path().join("does-not-exist"))
        .await
        .expect_err("missing directory should fail");
    assert!(matches!(err, PlagiarismError::InvalidInput(_)));
}

#[tokio::test]
async fn failing_tool_reports_external_error() {
    let subs = TempDir::new().expect("should create temp dir");
    let out = TempDir::new().expect("should create temp dir");
    let config = JplagConfig {
        docker_binary: "false".to_string(),
        ..JplagConfig::default()
    };
    let tool = DockerJplag::new(config, out.path());

    let err = tool
        .compare(subs.path())
        .await
        .expect_err("failing binary should fail");
    assert!(matches!(err, PlagiarismError::ExternalTool(_)));
}

#[tokio::test]
async fn missing_binary_reports_external_error() {
    let subs = TempDir::new().expect("should create temp dir");
    let out = TempDir::new().expect("should create temp dir");
    let config = JplagConfig {
        docker_binary: "definitely-not-a-real-docker-binary".to_string(),
        ..JplagConfig::default()
    };
    let tool = DockerJplag::new(config, out.path());

    let err = tool.compare(subs.path()).await.expect_err("should fail");
    assert!(err.to_string().contains("Failed to start"));
}

fn run_dirs_left(root: &Path) -> usize {
    fs::read_dir(root).map_or(0, |entries| entries.count())
}

#[tokio::test]
async fn run_directory_is_removed_after_failures() {
    let subs = TempDir::new().expect("should create temp dir");
    let out = TempDir::new().expect("should create temp dir");
    let runs = out.path().join("tool-runs");

    // `false` exits non-zero, `true` exits cleanly without writing results
    for binary in ["false", "true", "definitely-not-a-real-docker-binary"] {
        let config = JplagConfig {
            docker_binary: binary.to_string(),
            ..JplagConfig::default()
        };
        let tool = DockerJplag::new(config, &runs);

        let err = tool.compare(subs.path()).await.expect_err("run should fail");
        assert!(matches!(err, PlagiarismError::ExternalTool(_)));
        assert_eq!(run_dirs_left(&runs), 0, "{} left a run directory", binary);
    }
}
