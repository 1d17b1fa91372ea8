//! Audit files written to a temporary logs directory.

use std::fs;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use topup_toolkit::{
    AuditLogger, Error, PurchaseRecord, RegistryApi, Settings, SingletonRegistry,
};

fn record(is_package: bool, status: i64, transaction_id: &str) -> PurchaseRecord {
    PurchaseRecord {
        package_id: "12".to_string(),
        mobile: "09351234567".to_string(),
        price: 20_000,
        transaction_id: transaction_id.to_string(),
        operator: "3".to_string(),
        result_code: if status == 1 { "0" } else { "-14" }.to_string(),
        status,
        is_package,
        timestamp: Local.with_ymd_and_hms(2024, 7, 1, 18, 5, 9).unwrap(),
    }
}

#[test]
fn test_purchase_lines_are_appended_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::new(dir.path()).with_pid(1234);

    let ok_path = logger.write_purchase_log(&record(true, 1, "t1")).unwrap();
    logger.write_purchase_log(&record(true, 1, "t2")).unwrap();
    let err_path = logger.write_purchase_log(&record(false, 0, "t3")).unwrap();

    assert_eq!(ok_path, dir.path().join("package_2024-07-01_1234.log"));
    assert_eq!(err_path, dir.path().join("direct_2024-07-01_1234_err.log"));

    let ok = fs::read_to_string(&ok_path).unwrap();
    let lines: Vec<_> = ok.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("INFO-2024-07-01 18:05:09-package[PACKAGE_ID=12]"));
    assert!(lines[0].contains("transaction[TRANSACTION_ID=t1]"));
    assert!(lines[1].contains("transaction[TRANSACTION_ID=t2]"));

    let err = fs::read_to_string(&err_path).unwrap();
    assert_eq!(err.lines().count(), 1);
    assert!(err.ends_with("operator[OPERATOR_ID=3], ERROR=> -14\n"));
}

#[test]
fn test_connection_error_file() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::new(dir.path());
    let at = Local.with_ymd_and_hms(2024, 7, 2, 0, 0, 1).unwrap();

    let path = logger
        .write_connection_error_log_at("operator timed out", at)
        .unwrap();

    assert_eq!(path, dir.path().join("connection_2024-07-02_err.log"));
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "ERROR-2024-07-02 00:00:01-connection error ERROR=operator timed out\n"
    );
}

#[test]
fn test_missing_logs_dir_propagates_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::new(dir.path().join("absent"));

    let err = logger.write_purchase_log(&record(true, 1, "t")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    let err = logger.write_connection_error_log("boom").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_logger_from_settings_and_registry() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();

    let registry = SingletonRegistry::new();
    let settings = registry
        .instance::<Settings>(Settings::new(dir.path()))
        .unwrap();

    let logger = registry
        .keyed_instance::<AuditLogger>(settings.logs_dir(), ())
        .unwrap();
    let same = registry
        .keyed_instance::<AuditLogger>(settings.logs_dir(), ())
        .unwrap();
    assert!(Arc::ptr_eq(&logger, &same));

    let direct = AuditLogger::from_settings(&settings);
    assert_eq!(direct.logs_dir(), logger.logs_dir());

    let path = logger.write_connection_error_log("dns failure").unwrap();
    assert_eq!(path.parent(), Some(dir.path().join("logs").as_path()));
    assert!(fs::read_to_string(path)
        .unwrap()
        .contains("connection error ERROR=dns failure"));
}
