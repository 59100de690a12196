use super::defs::PlausibleRange;
use super::*;

fn is_field(name: &str) -> bool {
    field_order().any(|field| field == name)
}

#[test]
fn test_schema_has_eleven_fields_in_training_order() {
    assert_eq!(expected_field_count(), FEATURE_COUNT);
    let order: Vec<&str> = field_order().collect();
    assert_eq!(
        order,
        vec![
            "fixed acidity",
            "volatile acidity",
            "citric acid",
            "residual sugar",
            "chlorides",
            "free sulfur dioxide",
            "total sulfur dioxide",
            "density",
            "pH",
            "sulphates",
            "alcohol",
        ]
    );
}

#[test]
fn test_field_names_are_case_and_spacing_sensitive() {
    assert!(is_field("pH"));
    assert!(!is_field("ph"));
    assert!(!is_field("fixed_acidity"));
    assert!(!is_field(" alcohol"));
}

#[test]
fn test_examples_lie_inside_plausible_ranges() {
    for def in builtin_features() {
        assert!(def.range.contains(def.example), "{} example outside range", def.name);
    }
}

#[test]
fn test_plausible_range_bounds() {
    let range = PlausibleRange {
        min: 2.74,
        max: 4.01,
    };
    assert!(range.contains(2.74));
    assert!(range.contains(4.01));
    assert!(!range.contains(4.02));
    assert!(!range.contains(2.73));
}

#[test]
fn test_check_order_reports_first_mismatch() {
    let mut names: Vec<String> = field_order().map(str::to_string).collect();
    assert!(check_order(&names).is_ok());

    names.swap(0, 1);
    let err = check_order(&names).unwrap_err();
    assert!(err.contains("feature 0"));

    names.pop();
    let err = check_order(&names).unwrap_err();
    assert!(err.contains("expected 11 feature names, found 10"));
}

#[test]
fn test_feature_vector_names_follow_schema_order() {
    let mut values = [0.0; FEATURE_COUNT];
    values[10] = 9.4;
    let vector = FeatureVector::new(values);
    let named: Vec<_> = vector.named().collect();
    assert_eq!(named.len(), FEATURE_COUNT);
    assert_eq!(named[10], ("alcohol", 9.4));
}
