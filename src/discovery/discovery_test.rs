use std::sync::Arc;

use super::*;
use crate::test_utils::enable_logger;
use crate::ApplicationModel;
use crate::Directory;
use crate::Error;
use crate::HistoryNaming;
use crate::InputHub;
use crate::OutputRegistry;
use crate::ProcessVariable;
use crate::ValueKind;

fn registry() -> VariableRegistry {
    enable_logger();
    let (hub, _group) = InputHub::new(8);
    VariableRegistry::new(
        HistoryNaming::new("History", "ServerHistory", "history", false),
        10,
        Arc::new(hub),
        OutputRegistry::new(),
    )
}

fn application() -> ApplicationModel {
    ApplicationModel::new(
        Directory::new("/")
            .with_variable(ProcessVariable::new("/top", ValueKind::Int32, 1).with_tag("history"))
            .with_variable(ProcessVariable::new("/plain", ValueKind::Int32, 1))
            .with_directory(
                Directory::new("A")
                    .with_variable(ProcessVariable::new("/A/x", ValueKind::Float32, 3).with_tag("history"))
                    .with_directory(
                        Directory::new("Deep").with_variable(
                            ProcessVariable::new("/A/Deep/z", ValueKind::String, 1)
                                .with_tag("history")
                                .with_tag("other"),
                        ),
                    ),
            ),
    )
}

fn device() -> Directory {
    Directory::new("Device")
        .with_variable(ProcessVariable::new("/status", ValueKind::Boolean, 1))
        .with_directory(
            Directory::new("Sub")
                .with_variable(ProcessVariable::new("/Sub/a", ValueKind::UInt16, 1))
                .with_variable(ProcessVariable::new("/Sub/b", ValueKind::UInt16, 4)),
        )
        .with_directory(
            Directory::new("SubX").with_variable(ProcessVariable::new("/SubX/c", ValueKind::UInt16, 1)),
        )
}

#[test]
fn test_discover_tagged_registers_only_tagged_variables() {
    let mut registry = registry();

    let added = discover_tagged("ServerHistory", &application(), &mut registry).unwrap();

    assert_eq!(added, 3);
    assert!(registry.contains("/top"));
    assert!(registry.contains("/A/x"));
    assert!(registry.contains("/A/Deep/z"));
    assert!(!registry.contains("/plain"));
}

#[test]
fn test_discover_tagged_without_search_root_fails() {
    let mut registry = registry();

    let result = discover_tagged("ServerHistory", &ApplicationModel::detached(), &mut registry);

    match result {
        Err(Error::Setup(SetupError::SearchRootNotFound { module })) => assert_eq!(module, "ServerHistory"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_discover_tagged_with_nothing_tagged_is_not_an_error() {
    let mut registry = registry();
    let scope = ApplicationModel::new(Directory::new("/").with_variable(ProcessVariable::new(
        "/plain",
        ValueKind::Int32,
        1,
    )));

    assert_eq!(discover_tagged("ServerHistory", &scope, &mut registry).unwrap(), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_discover_source_ignores_tags() {
    let mut registry = registry();

    let added = discover_source(&device(), "", &mut registry).unwrap();

    assert_eq!(added, 4);
    assert_eq!(registry.names(ValueKind::UInt16).len(), 3);
    assert!(registry.contains("/status"));
}

#[test]
fn test_discover_source_restricted_to_submodule() {
    let mut registry = registry();

    let added = discover_source(&device(), "Sub", &mut registry).unwrap();

    assert_eq!(added, 2);
    assert_eq!(
        registry.names(ValueKind::UInt16),
        &["/Sub/a".to_string(), "/Sub/b".to_string()]
    );
    assert!(!registry.contains("/SubX/c"));
    assert!(!registry.contains("/status"));
}

#[test]
fn test_discover_source_twice_reports_duplicate() {
    let mut registry = registry();
    discover_source(&device(), "Sub", &mut registry).unwrap();

    let result = discover_source(&device(), "/Sub/", &mut registry);

    assert!(matches!(
        result,
        Err(Error::Setup(SetupError::DuplicateVariable { .. }))
    ));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_failed_discover_source_registers_nothing() {
    enable_logger();
    let (hub, _group) = InputHub::new(8);
    let hub = Arc::new(hub);
    let outputs = OutputRegistry::new();
    let mut registry = VariableRegistry::new(
        HistoryNaming::new("History", "ServerHistory", "history", false),
        3,
        hub.clone(),
        outputs.clone(),
    );
    // "/a" element 1 maps onto the output of the scalar "/a_1"
    let source = Directory::new("Device")
        .with_variable(ProcessVariable::new("/a_1", ValueKind::Int32, 1))
        .with_variable(ProcessVariable::new("/b", ValueKind::Int32, 1))
        .with_variable(ProcessVariable::new("/a", ValueKind::Int32, 2));

    let result = discover_source(&source, "", &mut registry);

    match result {
        Err(Error::Setup(SetupError::DuplicateOutput { name })) => assert_eq!(name, "/History/a_1"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(registry.is_empty());
    assert!(hub.is_empty());
    assert!(outputs.is_empty());
}

#[test]
fn test_failed_discover_tagged_registers_nothing() {
    let mut registry = registry();
    let scope = ApplicationModel::new(
        Directory::new("/")
            .with_variable(ProcessVariable::new("/x_0", ValueKind::UInt8, 1).with_tag("history"))
            .with_directory(
                Directory::new("B").with_variable(ProcessVariable::new("/x", ValueKind::UInt8, 2).with_tag("history")),
            ),
    );

    assert!(discover_tagged("ServerHistory", &scope, &mut registry).is_err());
    assert!(registry.is_empty());
}
