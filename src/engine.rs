use crate::error::{ReportError, Result};
use crate::format::period_label;
use crate::schema::{ProductionCycle, Transaction, TransactionKind};
use crate::utils::{
    daily_window_start, first_day_of_month, last_day_of_month, month_from_index, month_index,
};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Number of periods in a report window.
    pub fn window_len(self) -> usize {
        match self {
            Self::Daily => 30,
            Self::Monthly => 12,
            Self::Yearly => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Title used in printed reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Daily => "Diário",
            Self::Monthly => "Mensal",
            Self::Yearly => "Anual",
        }
    }

    /// Tag used in exported file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Daily => "diario",
            Self::Monthly => "mensal",
            Self::Yearly => "anual",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "diario" | "diário" => Ok(Self::Daily),
            "monthly" | "month" | "mensal" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" | "anual" => Ok(Self::Yearly),
            _ => Err(ReportError::UnsupportedGranularity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A calendar bucket. Months are stored as their first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Day(NaiveDate),
    Month(NaiveDate),
    Year(i32),
}

impl Period {
    /// The period of the given granularity that contains `date`.
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Result<Self> {
        Ok(match granularity {
            Granularity::Daily => Self::Day(date),
            Granularity::Monthly => Self::Month(first_day_of_month(date.year(), date.month())?),
            Granularity::Yearly => Self::Year(date.year()),
        })
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Day(_) => Granularity::Daily,
            Self::Month(_) => Granularity::Monthly,
            Self::Year(_) => Granularity::Yearly,
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        match self {
            Self::Day(date) | Self::Month(date) => Ok(*date),
            Self::Year(year) => first_day_of_month(*year, 1),
        }
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        match self {
            Self::Day(date) => Ok(*date),
            Self::Month(date) => last_day_of_month(date.year(), date.month()),
            Self::Year(year) => last_day_of_month(*year, 12),
        }
    }

    pub fn label(&self) -> String {
        period_label(self)
    }
}

/// The bucket key: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Month(date) => write!(f, "{}", date.format("%Y-%m")),
            Self::Year(year) => write!(f, "{:04}", year),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Periods covered by a report, oldest first.
pub fn period_window(granularity: Granularity, reference_date: NaiveDate) -> Result<Vec<Period>> {
    let len = granularity.window_len();

    match granularity {
        Granularity::Daily => {
            let start = daily_window_start(reference_date, len as u64)?;
            Ok(start.iter_days().take(len).map(Period::Day).collect())
        }
        Granularity::Monthly => {
            let end = month_index(reference_date);
            (end - len as i32 + 1..=end)
                .map(|idx| month_from_index(idx).map(Period::Month))
                .collect()
        }
        Granularity::Yearly => {
            let end = reference_date.year();
            Ok((end - len as i32 + 1..=end).map(Period::Year).collect())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductionTotals {
    pub cycles: usize,
    pub area: f64,
    pub cost: f64,
    #[serde(rename = "yield")]
    pub yield_kg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesTotals {
    pub quantity: f64,
    pub value: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostTotals {
    pub value: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub period: Period,
    pub label: String,
    pub production: ProductionTotals,
    pub sales: SalesTotals,
    pub costs: CostTotals,
    /// sales.value - costs.value - production.cost. Production cost is
    /// subtracted even when the same spend was also logged as a
    /// production-cost transaction.
    pub profit: f64,
    /// Profit as a percentage of sales value, 0 when there were no sales.
    pub margin: f64,
}

// Running sums for one period while records are bucketed
#[derive(Default)]
struct PeriodBucket {
    production: ProductionTotals,
    sales: SalesTotals,
    costs: CostTotals,
}

impl PeriodBucket {
    fn add_cycle(&mut self, cycle: &ProductionCycle) {
        self.production.cycles += 1;
        self.production.area += cycle.area;
        self.production.cost += cycle.total_cost;
        self.production.yield_kg += cycle.actual_yield;
    }

    fn add_transaction(&mut self, transaction: &Transaction) {
        if transaction.kind == TransactionKind::Sale {
            self.sales.quantity += transaction.quantity.unwrap_or(0.0);
            self.sales.value += transaction.amount;
            self.sales.count += 1;
        } else if transaction.is_report_cost() {
            self.costs.value += transaction.amount;
            self.costs.count += 1;
        }
    }

    fn into_row(self, period: Period) -> ReportRow {
        let profit = self.sales.value - self.costs.value - self.production.cost;
        let margin = if self.sales.value > 0.0 {
            (profit / self.sales.value) * 100.0
        } else {
            0.0
        };

        ReportRow {
            label: period.label(),
            period,
            production: self.production,
            sales: self.sales,
            costs: self.costs,
            profit,
            margin,
        }
    }
}

pub struct PeriodAggregator {
    granularity: Granularity,
    reference_date: NaiveDate,
}

impl PeriodAggregator {
    pub fn new(granularity: Granularity, reference_date: NaiveDate) -> Self {
        Self {
            granularity,
            reference_date,
        }
    }

    pub fn window(&self) -> Result<Vec<Period>> {
        period_window(self.granularity, self.reference_date)
    }

    /// Buckets the records into the report window and returns one row per
    /// period, most recent first. Inputs are only read.
    pub fn generate(
        &self,
        cycles: &[ProductionCycle],
        transactions: &[Transaction],
    ) -> Result<Vec<ReportRow>> {
        let mut buckets: BTreeMap<Period, PeriodBucket> = self
            .window()?
            .into_iter()
            .map(|period| (period, PeriodBucket::default()))
            .collect();

        let mut outside_window = 0usize;
        for cycle in cycles {
            let period = Period::containing(cycle.start_date, self.granularity)?;
            match buckets.get_mut(&period) {
                Some(bucket) => bucket.add_cycle(cycle),
                None => outside_window += 1,
            }
        }

        let mut not_completed = 0usize;
        for transaction in transactions {
            if !transaction.is_completed() {
                not_completed += 1;
                continue;
            }
            let period = Period::containing(transaction.date, self.granularity)?;
            match buckets.get_mut(&period) {
                Some(bucket) => bucket.add_transaction(transaction),
                None => outside_window += 1,
            }
        }

        debug!(
            "Bucketed {} cycles and {} transactions into {} {} periods ({} outside window, {} not completed)",
            cycles.len(),
            transactions.len(),
            buckets.len(),
            self.granularity,
            outside_window,
            not_completed
        );

        // BTreeMap iterates oldest first; reports list the newest period first
        Ok(buckets
            .into_iter()
            .map(|(period, bucket)| bucket.into_row(period))
            .rev()
            .collect())
    }
}

pub fn generate(
    cycles: &[ProductionCycle],
    transactions: &[Transaction],
    granularity: Granularity,
    reference_date: NaiveDate,
) -> Result<Vec<ReportRow>> {
    PeriodAggregator::new(granularity, reference_date).generate(cycles, transactions)
}

/// A generated report. Every renderer reads its numbers from `rows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub granularity: Granularity,
    pub reference_date: NaiveDate,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn build(
        cycles: &[ProductionCycle],
        transactions: &[Transaction],
        granularity: Granularity,
        reference_date: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            granularity,
            reference_date,
            rows: generate(cycles, transactions, granularity, reference_date)?,
        })
    }

    /// First and last calendar day covered by the report.
    pub fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        match (self.rows.last(), self.rows.first()) {
            (Some(oldest), Some(newest)) => {
                Ok(Some((oldest.period.first_day()?, newest.period.last_day()?)))
            }
            _ => Ok(None),
        }
    }
}
