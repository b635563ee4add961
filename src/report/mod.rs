//! Monthly Report Generator
//!
//! Buckets the ledger by (year, month) and produces the CSV extract of a
//! selected period.

mod extract;

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{DomainError, Period, TransactionRecord};
use crate::store::{LedgerStore, StoreError};

pub use extract::{read_csv, write_csv, ReportRow, HEADER};

/// Report errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Extract of one period, not yet written anywhere
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub period: Period,
    pub records: Vec<TransactionRecord>,
    pub csv: Vec<u8>,
}

/// Extract written to the reports directory
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub period: Period,
    pub file_name: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Report generator over a ledger
#[derive(Clone)]
pub struct ReportGenerator {
    ledger: Arc<dyn LedgerStore>,
    reports_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(ledger: Arc<dyn LedgerStore>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            ledger,
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Distinct periods having at least one sale, oldest first
    pub async fn list_distinct_periods(&self) -> Result<Vec<Period>, ReportError> {
        let records = self.ledger.list_all().await?;
        let periods: BTreeSet<Period> = records.iter().map(|r| Period::of(&r.timestamp)).collect();
        Ok(periods.into_iter().collect())
    }

    /// Build the extract of one month.
    ///
    /// The month spans from midnight of its first day up to, but excluding,
    /// midnight of the first day of the next month.
    ///
    /// # Errors
    /// - `DomainError::NoTransactionsInPeriod` if no record falls in the month
    pub async fn generate(&self, period: Period) -> Result<MonthlyReport, ReportError> {
        let records = self
            .ledger
            .query_by_date_range(period.start(), period.end_inclusive())
            .await?;

        if records.is_empty() {
            return Err(DomainError::NoTransactionsInPeriod {
                month: period.month,
                year: period.year,
            }
            .into());
        }

        let csv = write_csv(&records)?;

        tracing::info!(period = %period, rows = records.len(), "Monthly report generated");

        Ok(MonthlyReport {
            period,
            records,
            csv,
        })
    }

    /// Generate and write `relatorio_MM_YYYY.csv` into the reports directory,
    /// replacing an earlier extract of the same period.
    pub async fn export(&self, period: Period) -> Result<ReportFile, ReportError> {
        let report = self.generate(period).await?;

        tokio::fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(StoreError::from)?;

        let file_name = period.report_file_name();
        let path = self.reports_dir.join(&file_name);
        tokio::fs::write(&path, &report.csv)
            .await
            .map_err(StoreError::from)?;

        tracing::info!(path = %path.display(), "Monthly report written");

        Ok(ReportFile {
            period,
            file_name,
            path,
            rows: report.records.len(),
        })
    }

    /// Contents of a previously exported extract, `None` if never written.
    pub async fn read_export(&self, period: Period) -> Result<Option<Vec<u8>>, ReportError> {
        let path = self.reports_dir.join(period.report_file_name());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::from(e).into()),
        }
    }
}
