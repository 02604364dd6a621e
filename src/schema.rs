use crate::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::path::Path;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProductionStage {
    #[schemars(description = "Seedling and seed preparation")]
    Nursery,

    #[schemars(description = "Transplanting seedlings to the field")]
    Planting,

    #[schemars(description = "Clearing and maintaining the plot")]
    Weeding,

    #[schemars(description = "Pruning and plant maintenance")]
    Pruning,

    #[schemars(description = "Picking the crop. The only stage that records a yield")]
    Harvest,
}

impl ProductionStage {
    /// All stages in the order a cycle moves through them.
    pub const ALL: [ProductionStage; 5] = [
        ProductionStage::Nursery,
        ProductionStage::Planting,
        ProductionStage::Weeding,
        ProductionStage::Pruning,
        ProductionStage::Harvest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Nursery => "Viveiramento",
            Self::Planting => "Plantação",
            Self::Weeding => "Capina",
            Self::Pruning => "Poda",
            Self::Harvest => "Colheita",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Nursery => "Preparação de mudas e sementes",
            Self::Planting => "Plantio das mudas no campo",
            Self::Weeding => "Limpeza e manutenção do terreno",
            Self::Pruning => "Poda e manutenção das plantas",
            Self::Harvest => "Colheita dos produtos",
        }
    }

    /// Estimated duration of the stage in days.
    pub fn estimated_days(self) -> u32 {
        match self {
            Self::Nursery => 30,
            Self::Planting => 7,
            Self::Weeding => 3,
            Self::Pruning => 5,
            Self::Harvest => 14,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
pub struct StageRecord {
    pub status: StageStatus,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub cost: f64,

    #[serde(rename = "yield", default)]
    #[schemars(description = "Harvested kilograms. Only present on the harvest stage")]
    pub yield_kg: Option<f64>,
}

/// Stage records keyed by the closed stage enumeration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(transparent)]
pub struct StageMap([StageRecord; 5]);

impl StageMap {
    pub fn iter(&self) -> impl Iterator<Item = (ProductionStage, &StageRecord)> {
        ProductionStage::ALL.into_iter().zip(self.0.iter())
    }

    pub fn total_cost(&self) -> f64 {
        self.0.iter().map(|s| s.cost).sum()
    }

    pub fn count_with_status(&self, status: StageStatus) -> usize {
        self.0.iter().filter(|s| s.status == status).count()
    }
}

impl Index<ProductionStage> for StageMap {
    type Output = StageRecord;

    fn index(&self, stage: ProductionStage) -> &StageRecord {
        &self.0[stage.index()]
    }
}

impl IndexMut<ProductionStage> for StageMap {
    fn index_mut(&mut self, stage: ProductionStage) -> &mut StageRecord {
        &mut self.0[stage.index()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ProductionCycle {
    pub id: String,

    #[schemars(description = "Crop planted in this cycle (e.g., 'Café Arábica')")]
    pub crop_type: String,

    pub variety: String,

    #[schemars(description = "Planted area in hectares")]
    pub area: f64,

    pub start_date: NaiveDate,

    pub current_stage: ProductionStage,

    pub stages: StageMap,

    #[schemars(description = "Sum of all stage costs")]
    pub total_cost: f64,

    #[schemars(description = "Expected yield in kilograms")]
    pub expected_yield: f64,

    #[schemars(description = "Harvested kilograms, zero until the harvest stage records a yield")]
    pub actual_yield: f64,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PartnerRole {
    Client,
    Supplier,
    Worker,
    Technician,
    FinancedParty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub role: PartnerRole,

    #[serde(default)]
    pub contact: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub specialization: Option<String>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Purchase,
    Sale,
    ProductionCost,
    Financing,
    Collection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CoffeeType {
    Commercial,
    Husk,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,

    #[serde(default)]
    pub production_cycle_id: Option<String>,

    pub partner_id: String,

    #[schemars(description = "Monetary amount in Kwanza")]
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "Quantity in kilograms, if the transaction moves product")]
    pub quantity: Option<f64>,

    #[serde(default)]
    pub coffee_type: Option<CoffeeType>,

    #[serde(default)]
    pub description: String,

    pub date: NaiveDate,

    pub status: TransactionStatus,

    #[serde(default)]
    pub notes: String,
}

impl Transaction {
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Production costs and financing count as report costs; purchases and
    /// collections never do.
    pub fn is_report_cost(&self) -> bool {
        matches!(
            self.kind,
            TransactionKind::ProductionCost | TransactionKind::Financing
        )
    }
}

trait Record {
    fn id(&self) -> &str;
}

impl Record for ProductionCycle {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Partner {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

fn replace_record<T: Record>(items: &mut [T], item: T) -> Result<()> {
    let slot = items
        .iter_mut()
        .find(|existing| existing.id() == item.id())
        .ok_or_else(|| ReportError::UnknownRecord(item.id().to_string()))?;
    *slot = item;
    Ok(())
}

fn remove_record<T: Record>(items: &mut Vec<T>, id: &str) -> Result<T> {
    let position = items
        .iter()
        .position(|existing| existing.id() == id)
        .ok_or_else(|| ReportError::UnknownRecord(id.to_string()))?;
    Ok(items.remove(position))
}

/// The full application state: every collection the surrounding application
/// edits and the report engine reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
pub struct RecordBook {
    #[serde(default)]
    pub cycles: Vec<ProductionCycle>,

    #[serde(default)]
    pub partners: Vec<Partner>,

    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cycles.clear();
        self.partners.clear();
        self.transactions.clear();
    }

    pub fn partner(&self, id: &str) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == id)
    }

    pub fn cycle(&self, id: &str) -> Option<&ProductionCycle> {
        self.cycles.iter().find(|c| c.id == id)
    }

    pub fn cycle_mut(&mut self, id: &str) -> Option<&mut ProductionCycle> {
        self.cycles.iter_mut().find(|c| c.id == id)
    }

    pub fn add_cycle(&mut self, cycle: ProductionCycle) {
        self.cycles.push(cycle);
    }

    pub fn add_partner(&mut self, partner: Partner) {
        self.partners.push(partner);
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn replace_cycle(&mut self, cycle: ProductionCycle) -> Result<()> {
        replace_record(&mut self.cycles, cycle)
    }

    pub fn replace_partner(&mut self, partner: Partner) -> Result<()> {
        replace_record(&mut self.partners, partner)
    }

    pub fn replace_transaction(&mut self, transaction: Transaction) -> Result<()> {
        replace_record(&mut self.transactions, transaction)
    }

    pub fn remove_cycle(&mut self, id: &str) -> Result<ProductionCycle> {
        remove_record(&mut self.cycles, id)
    }

    pub fn remove_partner(&mut self, id: &str) -> Result<Partner> {
        remove_record(&mut self.partners, id)
    }

    pub fn remove_transaction(&mut self, id: &str) -> Result<Transaction> {
        remove_record(&mut self.transactions, id)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RecordBook)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
