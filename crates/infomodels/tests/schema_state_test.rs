//! Integration tests for schema state resolution.

use chrono::{DateTime, TimeZone, Utc};

use infomodels::{
    InfomodelsError, MemoryLog, Operation, SchemaStateError, SchemaStateResolver,
};

fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

#[test]
fn test_create_without_drop_is_active() {
    let mut log = MemoryLog::new();
    log.record("dcc", Operation::CreateTables, "pedsnet", "2.0.0", ts(2016, 1, 1));

    let state = SchemaStateResolver::new(log).resolve("dcc").unwrap();
    assert_eq!(state.model, "pedsnet");
    assert_eq!(state.model_version, "2.0.0");
}

#[test]
fn test_drop_after_create_is_not_active() {
    let mut log = MemoryLog::new();
    log.record("dcc", Operation::CreateTables, "pedsnet", "2.0.0", ts(2016, 1, 1));
    log.record("dcc", Operation::DropTables, "pedsnet", "2.0.0", ts(2016, 2, 1));

    let err = SchemaStateResolver::new(log).resolve("dcc").unwrap_err();
    match err {
        InfomodelsError::SchemaState(SchemaStateError::NoActiveSchema {
            model,
            model_version,
            ..
        }) => {
            assert_eq!(model, "pedsnet");
            assert_eq!(model_version, "2.0.0");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_recreate_after_drop_is_active() {
    let mut log = MemoryLog::new();
    log.record("dcc", Operation::CreateTables, "pedsnet", "2.0.0", ts(2016, 1, 1));
    log.record("dcc", Operation::DropTables, "pedsnet", "2.0.0", ts(2016, 2, 1));
    log.record("dcc", Operation::CreateTables, "pedsnet", "2.1.0", ts(2016, 3, 1));
    log.record("dcc", Operation::CreateConstraints, "pedsnet", "2.1.0", ts(2016, 3, 2));

    let state = SchemaStateResolver::new(log).resolve("dcc,public").unwrap();
    assert_eq!(state.model_version, "2.1.0");
}

#[test]
fn test_empty_log_has_no_prior_schema() {
    let mut log = MemoryLog::new();
    log.record("other", Operation::CreateTables, "pcornet", "3.0.0", ts(2016, 1, 1));

    let err = SchemaStateResolver::new(log).resolve("dcc").unwrap_err();
    assert!(matches!(
        err,
        InfomodelsError::SchemaState(SchemaStateError::NoPriorSchema { .. })
    ));
}

#[test]
fn test_error_messages_are_distinct() {
    let no_prior = SchemaStateError::NoPriorSchema {
        search_path: "dcc".to_string(),
    };
    let no_active = SchemaStateError::NoActiveSchema {
        search_path: "dcc".to_string(),
        model: "pedsnet".to_string(),
        model_version: "2.0.0".to_string(),
        dropped_at: ts(2016, 2, 1),
    };

    assert!(no_prior.to_string().contains("no 'create tables'"));
    assert!(no_active.to_string().contains("was dropped"));
}
