use crate::schema::{ProductionCycle, Transaction, TransactionKind};
use serde::Serialize;

/// Totals over every cycle and transaction in the book, regardless of date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductionSummary {
    pub total_cycles: usize,
    pub active_cycles: usize,
    pub completed_cycles: usize,
    pub total_area: f64,
    pub total_cost: f64,
    pub total_yield: f64,
    /// Completed sales only.
    pub total_revenue: f64,
    /// total_revenue - total_cost
    pub profit: f64,
    pub avg_yield_per_ha: f64,
}

impl ProductionSummary {
    pub fn from_book(cycles: &[ProductionCycle], transactions: &[Transaction]) -> Self {
        let total_area: f64 = cycles.iter().map(|c| c.area).sum();
        let total_cost: f64 = cycles.iter().map(|c| c.total_cost).sum();
        let total_yield: f64 = cycles.iter().map(|c| c.actual_yield).sum();

        let total_revenue: f64 = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Sale && t.is_completed())
            .map(|t| t.amount)
            .sum();

        Self {
            total_cycles: cycles.len(),
            active_cycles: cycles.iter().filter(|c| c.is_active()).count(),
            completed_cycles: cycles.iter().filter(|c| c.is_harvested()).count(),
            total_area,
            total_cost,
            total_yield,
            total_revenue,
            profit: total_revenue - total_cost,
            avg_yield_per_ha: if total_area > 0.0 {
                total_yield / total_area
            } else {
                0.0
            },
        }
    }
}
