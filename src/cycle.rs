use crate::schema::{ProductionCycle, ProductionStage, StageMap, StageRecord, StageStatus};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;

/// Values recorded against one stage of a cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageUpdate {
    pub start_date: Option<NaiveDate>,
    /// Setting an end date marks the stage completed.
    pub end_date: Option<NaiveDate>,
    pub notes: String,
    pub cost: f64,
    /// Harvested kilograms. Ignored for every stage except harvest.
    pub yield_kg: f64,
}

impl ProductionCycle {
    pub fn new(
        id: impl Into<String>,
        crop_type: impl Into<String>,
        variety: impl Into<String>,
        area: f64,
        start_date: NaiveDate,
        expected_yield: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            crop_type: crop_type.into(),
            variety: variety.into(),
            area,
            start_date,
            current_stage: ProductionStage::Nursery,
            stages: StageMap::default(),
            total_cost: 0.0,
            expected_yield,
            actual_yield: 0.0,
            created_at,
        }
    }

    /// Records `update` on `stage` and recomputes the derived fields.
    pub fn apply_stage_update(&mut self, stage: ProductionStage, update: StageUpdate) {
        let is_harvest = stage == ProductionStage::Harvest;
        let completed = update.end_date.is_some();

        self.stages[stage] = StageRecord {
            status: if completed {
                StageStatus::Completed
            } else {
                StageStatus::InProgress
            },
            start_date: update.start_date,
            end_date: update.end_date,
            notes: update.notes,
            cost: update.cost,
            yield_kg: is_harvest.then_some(update.yield_kg),
        };

        self.total_cost = self.stages.total_cost();
        if is_harvest {
            self.actual_yield = update.yield_kg;
        }

        self.current_stage = if completed {
            // Every stage done leaves the cycle parked on harvest
            self.next_stage().unwrap_or(ProductionStage::Harvest)
        } else {
            stage
        };

        debug!(
            "Cycle {} stage {:?} -> {:?}, total cost {:.2}, current stage {:?}",
            self.id,
            stage,
            self.stages[stage].status,
            self.total_cost,
            self.current_stage
        );
    }

    /// First stage, in order, that has not been started.
    pub fn next_stage(&self) -> Option<ProductionStage> {
        self.stages
            .iter()
            .find(|(_, record)| record.status == StageStatus::Pending)
            .map(|(stage, _)| stage)
    }

    /// Share of completed stages, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        let completed = self.stages.count_with_status(StageStatus::Completed);
        completed as f64 * 100.0 / ProductionStage::ALL.len() as f64
    }

    pub fn is_harvested(&self) -> bool {
        self.stages[ProductionStage::Harvest].status == StageStatus::Completed
    }

    /// Still running: not parked on harvest, or harvest has no end date yet.
    pub fn is_active(&self) -> bool {
        self.current_stage != ProductionStage::Harvest
            || self.stages[ProductionStage::Harvest].end_date.is_none()
    }
}
