use std::io::Write;

use flash_advisor::config::{Configuration, PhotographyMode};

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
guide-number: 45
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!((cfg.guide_number - 45.0).abs() < f64::EPSILON);
    // untouched fields keep their defaults
    assert_eq!(cfg.available_apertures, vec![2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0]);
    assert_eq!(cfg.available_isos, vec![100, 160, 200, 400, 800, 1600]);
    assert!(!cfg.battery_saving_mode);
}

#[test]
fn parse_partial_priority_weights() {
    let yaml = r#"
priority-weights:
  efficiency: 1.0
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!((cfg.priority_weights.efficiency - 1.0).abs() < f64::EPSILON);
    assert!((cfg.priority_weights.depth_of_field - 0.5).abs() < f64::EPSILON);
    assert!((cfg.priority_weights.accuracy - 0.3).abs() < f64::EPSILON);
}

#[test]
fn parse_analog_mode() {
    let yaml = r#"
photography-mode: analog
fixed-iso: 200
battery-saving-mode: true
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.photography_mode, PhotographyMode::Analog);
    assert_eq!(cfg.fixed_iso, 200);
    assert!(cfg.battery_saving_mode);
}

#[test]
fn effective_iso_follows_the_photography_mode() {
    let digital = Configuration::default();
    assert_eq!(digital.photography_mode, PhotographyMode::Digital);
    assert_eq!(digital.effective_iso(Some(800)), 800);
    // no selection falls back to the first configured ISO
    assert_eq!(digital.effective_iso(None), 100);

    let analog = Configuration {
        photography_mode: PhotographyMode::Analog,
        fixed_iso: 400,
        ..Configuration::default()
    };
    // analog ignores the per-shot selection entirely
    assert_eq!(analog.effective_iso(Some(800)), 400);
    assert_eq!(analog.effective_iso(None), 400);
}

#[test]
fn default_configuration_validates() {
    Configuration::default().validated().unwrap();
}

#[test]
fn validation_rejects_empty_apertures() {
    let cfg = Configuration {
        available_apertures: Vec::new(),
        ..Configuration::default()
    };
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("available-apertures"));
}

#[test]
fn validation_rejects_non_positive_guide_number() {
    let cfg = Configuration {
        guide_number: 0.0,
        ..Configuration::default()
    };
    assert!(cfg.validated().is_err());
}

#[test]
fn validation_rejects_inverted_distance_window() {
    let cfg = Configuration {
        min_distance: 5.0,
        max_distance: 2.0,
        ..Configuration::default()
    };
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("max-distance"));
}

#[test]
fn load_configuration_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "guide-number: 60\navailable-apertures: [2.8, 4, 5.6]\nbattery-saving-mode: true"
    )
    .unwrap();

    let cfg = Configuration::from_yaml_file(file.path()).unwrap();
    assert!((cfg.guide_number - 60.0).abs() < f64::EPSILON);
    assert_eq!(cfg.available_apertures, vec![2.8, 4.0, 5.6]);
    assert!(cfg.battery_saving_mode);
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let err = Configuration::from_yaml_file("/nonexistent/flash.yaml").unwrap_err();
    assert!(matches!(err, flash_advisor::error::Error::Io(_)));
}
