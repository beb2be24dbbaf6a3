use super::*;
use crate::HistoryConfig;

#[test]
fn test_normalize_path() {
    assert_eq!(normalize_path("Dummy//out/"), "/Dummy/out");
    assert_eq!(normalize_path("/Dummy/out"), "/Dummy/out");
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("///"), "/");
}

#[test]
fn test_join_path() {
    assert_eq!(join_path("History", "/Dummy/out"), "/History/Dummy/out");
    assert_eq!(join_path("/", "x"), "/x");
    assert_eq!(join_path("/a/b/", "/c/"), "/a/b/c");
}

#[test]
fn test_is_within() {
    assert!(is_within("/Dummy/out", "/"));
    assert!(is_within("/Dummy/out", ""));
    assert!(is_within("/Device/Sub/out", "Device/Sub"));
    assert!(!is_within("/Device/SubX/out", "Device/Sub"));
    assert!(!is_within("/Device/Sub", "Device/Sub"));
}

#[test]
fn test_scalar_output_names() {
    let naming = HistoryNaming::new("History", "ServerHistory", "history", false);

    assert_eq!(
        naming.output_names("/Dummy/out", 1),
        vec![OutputNames {
            data: "/History/Dummy/out".to_string(),
            time_stamps: None,
        }]
    );
}

#[test]
fn test_array_output_names_with_time_stamps() {
    let naming = HistoryNaming::new("History", "ServerHistory", "history", true);
    let names = naming.output_names("/Dummy/out", 3);

    let data: Vec<_> = names.iter().map(|n| n.data.as_str()).collect();
    assert_eq!(
        data,
        vec!["/History/Dummy/out_0", "/History/Dummy/out_1", "/History/Dummy/out_2"]
    );
    assert_eq!(
        names[2].time_stamps.as_deref(),
        Some("/History/Dummy/out_2_timeStamps")
    );
}

#[test]
fn test_internal_tag() {
    let naming = HistoryNaming::new("History", "ServerHistory", "history", false);
    assert_eq!(naming.internal_tag(), "ServerHistory_internal");
}

#[test]
fn test_internal_tag_when_module_name_equals_input_tag() {
    let naming = HistoryNaming::new("History", "history", "history", false);
    assert_eq!(naming.internal_tag(), "history_internal_module");
}

#[test]
fn test_internal_tag_when_computed_tag_equals_input_tag() {
    let naming = HistoryNaming::new("History", "ServerHistory", "ServerHistory_internal", false);
    assert_eq!(naming.internal_tag(), "ServerHistory_internal_module");
    assert_ne!(naming.internal_tag(), naming.input_tag());
}

#[test]
fn test_from_config() {
    let config = HistoryConfig {
        prefix: "Archive".to_string(),
        enable_time_stamps: true,
        ..Default::default()
    };
    let naming = HistoryNaming::from_config("Hist", &config);

    assert_eq!(naming.input_tag(), "history");
    assert!(naming.with_time_stamps());
    assert_eq!(naming.history_name("x"), "/Archive/x");
}
