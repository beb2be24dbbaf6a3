use super::*;

#[test]
fn test_counter_increment() {
    OBSERVATIONS_PROCESSED.with_label_values(&["metrics_test_counter"]).inc();
    OBSERVATIONS_PROCESSED.with_label_values(&["metrics_test_counter"]).inc();

    let value = OBSERVATIONS_PROCESSED
        .with_label_values(&["metrics_test_counter"])
        .get();
    assert_eq!(value, 2, "Counter should increment correctly");
}

#[test]
fn test_gather_metrics_renders_text_format() {
    MONITORED_VARIABLES
        .with_label_values(&["metrics_test_gather", "Int32"])
        .set(3);
    UNMATCHED_OBSERVATIONS.with_label_values(&["metrics_test_gather"]).inc();

    let text = gather_metrics().unwrap();
    assert!(text.contains("history_monitored_variables{kind=\"Int32\",module=\"metrics_test_gather\"} 3"));
    assert!(text.contains("history_unmatched_observations{module=\"metrics_test_gather\"} 1"));
}

#[test]
fn test_register_custom_metrics_is_idempotent() {
    register_custom_metrics();
    register_custom_metrics();

    let families = REGISTRY.gather();
    let count = families
        .iter()
        .filter(|family| family.get_name() == "history_observations_processed")
        .count();
    assert!(count <= 1);
}
