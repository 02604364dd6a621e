//! Search and type filters for the record lists.
//!
//! Searches are case-insensitive substring matches; an empty search matches
//! everything and a `None` type filter disables type filtering.

use crate::schema::{
    Partner, PartnerRole, ProductionCycle, ProductionStage, Transaction, TransactionKind,
};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn filter_cycles<'a>(
    cycles: &'a [ProductionCycle],
    search: &str,
    stage: Option<ProductionStage>,
) -> Vec<&'a ProductionCycle> {
    let needle = search.to_lowercase();
    cycles
        .iter()
        .filter(|c| {
            contains_ignore_case(&c.crop_type, &needle) || contains_ignore_case(&c.variety, &needle)
        })
        .filter(|c| stage.map_or(true, |s| c.current_stage == s))
        .collect()
}

pub fn filter_partners<'a>(
    partners: &'a [Partner],
    search: &str,
    role: Option<PartnerRole>,
) -> Vec<&'a Partner> {
    let needle = search.to_lowercase();
    partners
        .iter()
        .filter(|p| contains_ignore_case(&p.name, &needle) || contains_ignore_case(&p.contact, &needle))
        .filter(|p| role.map_or(true, |r| p.role == r))
        .collect()
}

/// Matches on the linked partner's name or the description. A transaction
/// whose partner is missing can still match on its description.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    partners: &[Partner],
    search: &str,
    kind: Option<TransactionKind>,
) -> Vec<&'a Transaction> {
    let needle = search.to_lowercase();
    transactions
        .iter()
        .filter(|t| {
            let partner_match = partners
                .iter()
                .find(|p| p.id == t.partner_id)
                .is_some_and(|p| contains_ignore_case(&p.name, &needle));
            partner_match || contains_ignore_case(&t.description, &needle)
        })
        .filter(|t| kind.map_or(true, |k| t.kind == k))
        .collect()
}
