use crate::ApplicationModel;
use crate::Directory;
use crate::HistoryConfig;
use crate::ProcessVariable;
use crate::ServerHistoryConfig;
use crate::ValueKind;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Validated configuration with a short history
pub fn test_config(
    history_length: usize,
    enable_time_stamps: bool,
) -> ServerHistoryConfig {
    ServerHistoryConfig {
        history: HistoryConfig {
            history_length,
            enable_time_stamps,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Application exposing `/Dummy/out` of `kind` with `n_elements`, tagged `history`
pub fn dummy_application(
    kind: ValueKind,
    n_elements: usize,
) -> ApplicationModel {
    ApplicationModel::new(
        Directory::new("/").with_directory(
            Directory::new("Dummy")
                .with_variable(ProcessVariable::new("/Dummy/out", kind, n_elements).with_tag("history")),
        ),
    )
}
