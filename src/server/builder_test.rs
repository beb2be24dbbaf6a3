use std::sync::Arc;

use serial_test::serial;
use temp_env::with_vars;

use super::*;
use crate::test_utils::dummy_application;
use crate::test_utils::enable_logger;
use crate::test_utils::test_config;
use crate::Error;
use crate::MockProcessVariableSink;
use crate::ValueKind;

#[test]
fn test_build_publishes_to_default_output_registry() {
    enable_logger();
    let builder = ServerHistoryBuilder::new("ServerHistory").config(test_config(8, true));
    let outputs = builder.outputs();

    let history = builder.build(&dummy_application(ValueKind::UInt32, 2)).unwrap();

    assert_eq!(history.get_number_of_variables(), 1);
    assert_eq!(outputs.len(), 4);
    assert_eq!(outputs.read_as::<u32>("/History/Dummy/out_1"), Some(vec![0; 8]));
}

#[test]
fn test_build_with_custom_sink() {
    enable_logger();
    let mut sink = MockProcessVariableSink::new();
    sink.expect_define()
        .withf(|name, _, length, _, _| name == "/History/Dummy/out" && *length == 3)
        .times(1)
        .returning(|_, _, _, _, _| Ok(()));
    let builder = ServerHistoryBuilder::new("ServerHistory")
        .config(test_config(3, false))
        .sink(Arc::new(sink));
    let outputs = builder.outputs();

    let history = builder.build(&dummy_application(ValueKind::Int8, 1)).unwrap();

    assert_eq!(history.get_number_of_variables(), 1);
    assert!(outputs.is_empty());
}

#[test]
#[serial]
fn test_build_loads_environment_config() {
    enable_logger();
    with_vars(
        vec![
            ("CONFIG_PATH", None),
            ("HISTORY__HISTORY__HISTORY_LENGTH", Some("6")),
            ("HISTORY__HISTORY__PREFIX", Some("Archive")),
        ],
        || {
            let builder = ServerHistoryBuilder::new("ServerHistory");
            let outputs = builder.outputs();

            let history = builder.build(&dummy_application(ValueKind::Int32, 1)).unwrap();

            assert_eq!(history.config().history.history_length, 6);
            assert_eq!(outputs.read_as::<i32>("/Archive/Dummy/out"), Some(vec![0; 6]));
        },
    );
}

#[test]
#[serial]
fn test_build_applies_override_file() {
    enable_logger();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("history.toml");
    std::fs::write(
        &config_path,
        r#"
        [history]
        history_length = 0
        "#,
    )
    .unwrap();

    let result = ServerHistoryBuilder::new("ServerHistory")
        .config(test_config(3, false))
        .config_path(config_path.to_str().unwrap())
        .build(&dummy_application(ValueKind::Int32, 1));

    assert!(matches!(result, Err(Error::Config(_))));
}
