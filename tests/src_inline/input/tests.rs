use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::xgboost::parse_param_f64;
use super::{ArtifactError, load_artifacts};
use super::scaler_file::load_scaler;
use super::xgboost::load_xgboost;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("wine_quality_input_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let file = File::create(path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_text(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap()
}

fn model_with(mutate: impl FnOnce(&mut serde_json::Value)) -> String {
    let mut doc: serde_json::Value = serde_json::from_str(&fixture_text("xgb_model.json")).unwrap();
    mutate(&mut doc);
    doc.to_string()
}

#[test]
fn test_load_fixture_artifacts() {
    let artifacts = load_artifacts(&fixture("scaler.json"), &fixture("xgb_model.json")).unwrap();
    assert_eq!(artifacts.scaler.n_features(), 11);
    assert_eq!(artifacts.regressor.n_features(), 11);
    assert_eq!(artifacts.regressor.n_trees(), 4);
    assert!((artifacts.regressor.base_score() - 5.636).abs() < 1e-12);
    assert!(artifacts.regressor.feature_names().is_none());
}

#[test]
fn test_gzip_artifacts_are_decompressed() {
    let dir = make_temp_dir();
    let scaler = dir.join("scaler.json.gz");
    let model = dir.join("model.json.gz");
    write_gz(&scaler, &fixture_text("scaler.json"));
    write_gz(&model, &fixture_text("xgb_model.json"));

    let artifacts = load_artifacts(&scaler, &model).unwrap();
    assert_eq!(artifacts.regressor.n_trees(), 4);
}

#[test]
fn test_missing_artifact_is_io_error() {
    let dir = make_temp_dir();
    let err = load_artifacts(&dir.join("nope.json"), &fixture("xgb_model.json")).unwrap_err();
    assert!(matches!(err, ArtifactError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_corrupt_artifact_is_json_error() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    write_file(&path, "{\"learner\": {");
    let err = load_xgboost(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Json { .. }));
}

#[test]
fn test_scaler_with_wrong_feature_count_is_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("scaler.json");
    write_file(&path, r#"{"mean": [1.0, 2.0], "scale": [1.0, 1.0]}"#);
    let err = load_scaler(&path).unwrap_err();
    match err {
        ArtifactError::Invalid { reason, .. } => {
            assert!(reason.contains("fitted on 2 features"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_scaler_with_reordered_names_is_rejected() {
    let mut doc: serde_json::Value = serde_json::from_str(&fixture_text("scaler.json")).unwrap();
    doc["feature_names_in_"].as_array_mut().unwrap().swap(7, 8);
    let dir = make_temp_dir();
    let path = dir.join("scaler.json");
    write_file(&path, &doc.to_string());

    let err = load_scaler(&path).unwrap_err();
    assert!(err.to_string().contains("feature 7"));
}

#[test]
fn test_scaler_accepts_unsuffixed_field_names() {
    let dir = make_temp_dir();
    let path = dir.join("scaler.json");
    write_file(
        &path,
        r#"{"mean": [0,0,0,0,0,0,0,0,0,0,0], "scale": [1,1,1,1,1,1,1,1,1,1,1]}"#,
    );
    let scaler = load_scaler(&path).unwrap();
    let values = [3.0; 11];
    assert_eq!(scaler.transform(&values).unwrap(), values.to_vec());
}

#[test]
fn test_model_with_wrong_feature_count_is_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    write_file(
        &path,
        &model_with(|doc| {
            doc["learner"]["learner_model_param"]["num_feature"] = "12".into();
        }),
    );
    let err = load_xgboost(&path).unwrap_err();
    assert!(err.to_string().contains("trained on 12 features"));
}

#[test]
fn test_model_with_non_tree_booster_is_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    write_file(
        &path,
        &model_with(|doc| {
            doc["learner"]["gradient_booster"]["name"] = "gblinear".into();
        }),
    );
    let err = load_xgboost(&path).unwrap_err();
    assert!(err.to_string().contains("gblinear"));
}

#[test]
fn test_model_with_link_objective_is_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    write_file(
        &path,
        &model_with(|doc| {
            doc["learner"]["objective"]["name"] = "reg:logistic".into();
        }),
    );
    let err = load_xgboost(&path).unwrap_err();
    assert!(err.to_string().contains("reg:logistic"));
}

#[test]
fn test_model_with_recorded_names_must_match_schema() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    let names: Vec<String> = crate::schema::field_order().map(str::to_string).collect();

    write_file(
        &path,
        &model_with(|doc| {
            doc["learner"]["feature_names"] = serde_json::json!(names);
        }),
    );
    let model = load_xgboost(&path).unwrap();
    assert_eq!(model.feature_names().map(|n| n.len()), Some(11));

    write_file(
        &path,
        &model_with(|doc| {
            let mut bad = names.clone();
            bad[0] = "Fixed Acidity".to_string();
            doc["learner"]["feature_names"] = serde_json::json!(bad);
        }),
    );
    assert!(matches!(
        load_xgboost(&path).unwrap_err(),
        ArtifactError::Invalid { .. }
    ));
}

#[test]
fn test_model_with_ragged_tree_arrays_is_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    write_file(
        &path,
        &model_with(|doc| {
            doc["learner"]["gradient_booster"]["model"]["trees"][1]["split_indices"] =
                serde_json::json!([9, 0]);
        }),
    );
    let err = load_xgboost(&path).unwrap_err();
    assert!(err.to_string().contains("tree 1 has node arrays of unequal length"));
}

#[test]
fn test_model_with_cyclic_child_is_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("model.json");
    write_file(
        &path,
        &model_with(|doc| {
            doc["learner"]["gradient_booster"]["model"]["trees"][0]["left_children"] =
                serde_json::json!([1, 0, -1, -1, -1]);
        }),
    );
    let err = load_xgboost(&path).unwrap_err();
    assert!(err.to_string().contains("tree 0 node 1"));
}

#[test]
fn test_base_score_parsing_accepts_bracketed_form() {
    assert_eq!(parse_param_f64("5.636E0"), Some(5.636));
    assert_eq!(parse_param_f64("[5.636E0]"), Some(5.636));
    assert_eq!(parse_param_f64(" 0.5 "), Some(0.5));
    assert_eq!(parse_param_f64("abc"), None);
}
