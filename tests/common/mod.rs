#![allow(dead_code)]

use pv_history::ApplicationModel;
use pv_history::Directory;
use pv_history::HistoryConfig;
use pv_history::ProcessVariable;
use pv_history::ServerHistoryConfig;
use pv_history::ValueKind;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

pub fn config(
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

/// Application with a single tagged variable `/Dummy/out`
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

/// Application without any tagged variable
pub fn untagged_application() -> ApplicationModel {
    ApplicationModel::new(
        Directory::new("/").with_variable(ProcessVariable::new("/Dummy/out", ValueKind::Int32, 1)),
    )
}

/// Device exposing two directories with identically shaped variables
pub fn dummy_device() -> Directory {
    Directory::new("Device")
        .with_variable(ProcessVariable::new("/signal", ValueKind::Int32, 1))
        .with_directory(
            Directory::new("Sub")
                .with_variable(ProcessVariable::new("/Sub/a", ValueKind::Int32, 1))
                .with_variable(ProcessVariable::new("/Sub/b", ValueKind::Int32, 1)),
        )
}
