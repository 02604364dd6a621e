//! # Crop Cycle Reports
//!
//! A library for keeping the records of an agricultural operation (production
//! cycles, business partners and financial transactions) and turning them into
//! daily, monthly or yearly financial reports.
//!
//! ## Core Concepts
//!
//! - **Production Cycle**: One planting-to-harvest run of a crop on an area, tracked
//!   through five stages (nursery, planting, weeding, pruning, harvest)
//! - **Transaction**: A purchase, sale, production cost, financing or collection.
//!   Only completed transactions reach a report
//! - **Period Window**: The 30 days, 12 months or 5 years ending at a reference date
//! - **Report Row**: Production, sales and cost totals for one period, with
//!   `profit = sales - costs - production cost` and margin as a percentage of sales
//!
//! ## Example
//!
//! ```rust,ignore
//! use crop_cycle_reports::*;
//! use chrono::NaiveDate;
//!
//! let book = RecordBook::load("records.json")?;
//! let config = ReportConfig {
//!     granularity: Granularity::Monthly,
//!     reference_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
//! };
//!
//! let report = ReportProcessor::process(&book, &config)?;
//! let csv = to_csv_string(&report)?;
//! ```

pub mod cycle;
pub mod engine;
pub mod error;
pub mod export;
pub mod filters;
pub mod format;
pub mod schema;
pub mod summary;
pub mod utils;

pub use cycle::StageUpdate;
pub use engine::{
    generate, period_window, CostTotals, Granularity, Period, PeriodAggregator,
    ProductionTotals, Report, ReportRow, SalesTotals,
};
pub use error::{ReportError, Result};
pub use export::{export_file_name, render_printable, to_csv_string, write_csv};
pub use filters::*;
pub use format::{format_kwanza, period_label};
pub use schema::*;
pub use summary::ProductionSummary;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// What report to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub granularity: Granularity,
    /// Last day covered by the report window.
    pub reference_date: NaiveDate,
}

impl ReportConfig {
    /// Builds a config from user-facing strings such as `"mensal"` and
    /// `"2024-06-15"`.
    pub fn parse(granularity: &str, reference_date: &str) -> Result<Self> {
        Ok(Self {
            granularity: granularity.parse()?,
            reference_date: utils::parse_iso_date(reference_date)?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct ReportProcessor;

impl ReportProcessor {
    pub fn process(book: &RecordBook, config: &ReportConfig) -> Result<Report> {
        info!(
            "Generating {} report ending {}",
            config.granularity, config.reference_date
        );
        debug!(
            "Record book contains {} cycles, {} partners and {} transactions",
            book.cycles.len(),
            book.partners.len(),
            book.transactions.len()
        );

        let report = Report::build(
            &book.cycles,
            &book.transactions,
            config.granularity,
            config.reference_date,
        )?;

        if let Some((start, end)) = report.date_range()? {
            debug!("Report covers {} to {} in {} rows", start, end, report.rows.len());
        }

        Ok(report)
    }

    pub fn summarize(book: &RecordBook) -> ProductionSummary {
        ProductionSummary::from_book(&book.cycles, &book.transactions)
    }
}

pub fn generate_report(book: &RecordBook, config: &ReportConfig) -> Result<Report> {
    ReportProcessor::process(book, config)
}
