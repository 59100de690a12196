use super::*;
use clap::CommandFactory;

fn fixture_service() -> PredictionService {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let artifacts = load_artifacts(&dir.join("scaler.json"), &dir.join("xgb_model.json")).unwrap();
    PredictionService::new(Arc::new(artifacts), RangePolicy::Warn)
}

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_serve_defaults() {
    let cli = Cli::try_parse_from(["wine-quality-api", "serve"]).unwrap();
    let Command::Serve(args) = cli.command else {
        panic!("expected serve");
    };
    assert_eq!(args.port, 8000);
    assert_eq!(args.host, "127.0.0.1");
    assert_eq!(args.range_policy, RangePolicy::Warn);
    assert_eq!(args.request_timeout_ms, 5000);
    assert!(!args.allow_degraded);
    assert_eq!(args.artifacts.scaler_path, PathBuf::from("models/scaler.json"));
}

#[test]
fn test_serve_overrides() {
    let cli = Cli::try_parse_from([
        "wine-quality-api",
        "--log-level",
        "debug",
        "serve",
        "--port",
        "9100",
        "--range-policy",
        "strict",
        "--model",
        "/srv/model.json.gz",
        "--allow-degraded",
    ])
    .unwrap();
    assert_eq!(cli.log_level, "debug");
    let Command::Serve(args) = cli.command else {
        panic!("expected serve");
    };
    assert_eq!(args.port, 9100);
    assert_eq!(args.range_policy, RangePolicy::Strict);
    assert_eq!(args.artifacts.model_path, PathBuf::from("/srv/model.json.gz"));
    assert!(args.allow_degraded);
}

#[test]
fn test_invalid_range_policy_is_rejected() {
    let err = Cli::try_parse_from(["wine-quality-api", "serve", "--range-policy", "loose"]);
    assert!(err.is_err());
}

#[test]
fn test_build_state_fails_without_artifacts() {
    let cli = Cli::try_parse_from([
        "wine-quality-api",
        "serve",
        "--scaler",
        "/nonexistent/scaler.json",
    ])
    .unwrap();
    let Command::Serve(args) = cli.command else {
        panic!("expected serve");
    };
    assert!(build_state(&args).is_err());
}

#[test]
fn test_build_state_degraded_when_allowed() {
    let cli = Cli::try_parse_from([
        "wine-quality-api",
        "serve",
        "--scaler",
        "/nonexistent/scaler.json",
        "--allow-degraded",
    ])
    .unwrap();
    let Command::Serve(args) = cli.command else {
        panic!("expected serve");
    };
    let state = build_state(&args).unwrap();
    assert!(!state.is_ready());
}

#[test]
fn test_score_text_success() {
    let service = fixture_service();
    let text = serde_json::json!({
        "fixed acidity": 7.4,
        "volatile acidity": 0.7,
        "citric acid": 0.0,
        "residual sugar": 1.9,
        "chlorides": 0.076,
        "free sulfur dioxide": 11.0,
        "total sulfur dioxide": 34.0,
        "density": 0.9978,
        "pH": 3.51,
        "sulphates": 0.56,
        "alcohol": 9.4
    })
    .to_string();
    let (outcome, body) = score_text(&service, &text).unwrap();
    assert_eq!(outcome, Outcome::Done);
    let score = body["predicted_quality"].as_f64().unwrap();
    assert!((score - 5.03).abs() <= 0.05);
    assert_eq!(body["message"], "prediction successful");
}

#[test]
fn test_score_text_rejections() {
    let service = fixture_service();

    let (outcome, body) = score_text(&service, "{\"alcohol\": 9.4}").unwrap();
    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(body["errors"].as_array().unwrap().len(), 10);

    let (outcome, body) = score_text(&service, "not json").unwrap();
    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(body["errors"][0]["field"], "body");
}

#[test]
fn test_scaler_round_trip_error_is_tiny_for_fixture() {
    let service = fixture_service();
    let drift = scaler_round_trip_error(&service.artifacts().scaler).unwrap();
    assert!(drift <= ROUND_TRIP_TOLERANCE, "drift {drift:e}");
}

#[test]
fn test_scaler_round_trip_rejects_other_width() {
    let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]).unwrap();
    let err = scaler_round_trip_error(&scaler).unwrap_err();
    assert!(err.contains("expected 3"));
}
