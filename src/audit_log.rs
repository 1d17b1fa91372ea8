//! Append-only audit files for purchase attempts.
//!
//! Every purchase attempt becomes one line in a file chosen by transaction kind,
//! outcome, date and process id:
//!
//! | kind          | success                       | failure                           |
//! |---------------|-------------------------------|-----------------------------------|
//! | direct charge | `direct_<date>_<pid>.log`     | `direct_<date>_<pid>_err.log`     |
//! | package       | `package_<date>_<pid>.log`    | `package_<date>_<pid>_err.log`    |
//!
//! Connection errors go to `connection_<date>_err.log`. The logs directory must
//! already exist; write failures are returned to the caller untouched.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{PropertySingleton, Settings};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_MICROS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// `status` value reported by the operator for a successful purchase.
pub const STATUS_SUCCESS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Package,
    DirectCharge,
}

impl TransactionKind {
    fn file_prefix(self) -> &'static str {
        match self {
            TransactionKind::Package => "package",
            TransactionKind::DirectCharge => "direct",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// A purchase attempt as reported back by the operator gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub package_id: String,
    pub mobile: String,
    pub price: u64,
    pub transaction_id: String,
    pub operator: String,
    pub result_code: String,
    pub status: i64,
    pub is_package: bool,
    #[serde(default = "Local::now")]
    pub timestamp: DateTime<Local>,
}

impl PurchaseRecord {
    pub fn kind(&self) -> TransactionKind {
        if self.is_package {
            TransactionKind::Package
        } else {
            TransactionKind::DirectCharge
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.status == STATUS_SUCCESS {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    /// The audit line for this record, without the trailing newline.
    pub fn message(&self) -> String {
        let head = format!(
            "{level}-{datetime}-package[PACKAGE_ID={package_id}], {what} for \
             user[MOBILE={mobile}], \
             amount[AMOUNT={price}], \
             transaction[TRANSACTION_ID={transaction_id}], \
             operator[OPERATOR_ID={operator}], ",
            level = match self.outcome() {
                Outcome::Success => "INFO",
                Outcome::Failure => "ERROR",
            },
            datetime = format_timestamp(&self.timestamp),
            package_id = self.package_id,
            what = match (self.kind(), self.outcome()) {
                (TransactionKind::Package, Outcome::Success) => {
                    "internet package was applied successfully"
                }
                (TransactionKind::DirectCharge, Outcome::Success) => {
                    "direct charge was applied successfully"
                }
                (TransactionKind::Package, Outcome::Failure) => "internet package was failed",
                (TransactionKind::DirectCharge, Outcome::Failure) => "direct charge was failed",
            },
            mobile = self.mobile,
            price = self.price,
            transaction_id = self.transaction_id,
            operator = self.operator,
        );

        let tail = match (self.kind(), self.outcome()) {
            (_, Outcome::Success) => format!("result[RESULT_CODE={}]", self.result_code),
            (TransactionKind::DirectCharge, Outcome::Failure) => {
                format!("ERROR=> {}", self.result_code)
            }
            (TransactionKind::Package, Outcome::Failure) => {
                format!("ERROR =>[RESULT_CODE={}]", self.result_code)
            }
        };

        head + &tail
    }
}

/// Writes audit lines under a logs directory.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    logs_dir: PathBuf,
    pid: u32,
}

impl AuditLogger {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        AuditLogger {
            logs_dir: logs_dir.into(),
            pid: std::process::id(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.logs_dir())
    }

    /// Override the process id written into file names.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// File a record is appended to.
    pub fn purchase_log_path(&self, record: &PurchaseRecord) -> PathBuf {
        let suffix = match record.outcome() {
            Outcome::Success => "",
            Outcome::Failure => "_err",
        };
        self.logs_dir.join(format!(
            "{}_{}_{}{}.log",
            record.kind().file_prefix(),
            record.timestamp.format(DATE_FORMAT),
            self.pid,
            suffix
        ))
    }

    pub fn connection_log_path(&self, at: DateTime<Local>) -> PathBuf {
        self.logs_dir
            .join(format!("connection_{}_err.log", at.format(DATE_FORMAT)))
    }

    /// Append the record's line to its file and return the file path.
    pub fn write_purchase_log(&self, record: &PurchaseRecord) -> Result<PathBuf> {
        let path = self.purchase_log_path(record);
        append_line(&path, &record.message())?;

        match record.outcome() {
            Outcome::Success => tracing::info!(
                transaction_id = %record.transaction_id,
                kind = ?record.kind(),
                "purchase logged"
            ),
            Outcome::Failure => tracing::warn!(
                transaction_id = %record.transaction_id,
                kind = ?record.kind(),
                result_code = %record.result_code,
                "failed purchase logged"
            ),
        }

        Ok(path)
    }

    /// Append a connection error stamped with the current time.
    pub fn write_connection_error_log(&self, error: impl fmt::Display) -> Result<PathBuf> {
        self.write_connection_error_log_at(error, Local::now())
    }

    pub fn write_connection_error_log_at(
        &self,
        error: impl fmt::Display,
        at: DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = self.connection_log_path(at);
        let message = format!(
            "ERROR-{}-connection error ERROR={}",
            format_timestamp(&at),
            error
        );
        append_line(&path, &message)?;
        tracing::warn!(%error, "connection error logged");
        Ok(path)
    }
}

/// One logger per logs directory.
impl PropertySingleton for AuditLogger {
    type Key = PathBuf;
    type Args = ();

    fn construct(logs_dir: &PathBuf, _: ()) -> Self {
        AuditLogger::new(logs_dir.clone())
    }
}

/// Microseconds are printed only when non-zero.
fn format_timestamp(at: &DateTime<Local>) -> String {
    if at.timestamp_subsec_micros() == 0 {
        at.format(TIMESTAMP_FORMAT).to_string()
    } else {
        at.format(TIMESTAMP_MICROS_FORMAT).to_string()
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
