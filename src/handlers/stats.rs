//! Per-coordinator roll-up

use crate::models::{Company, CompanySummary, CoordinatorStats};
use std::collections::HashMap;

/// Group companies by coordinator in a single pass.
///
/// Output order follows the first appearance of each coordinator in
/// `companies`; each coordinator's company list keeps input order.
/// Unassigned companies (empty coordinator) are skipped.
pub fn aggregate_coordinator_stats(companies: &[Company]) -> Vec<CoordinatorStats> {
    let mut stats: Vec<CoordinatorStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for company in companies {
        if company.coordinator.is_empty() {
            continue;
        }

        let slot = *index.entry(company.coordinator.as_str()).or_insert_with(|| {
            stats.push(CoordinatorStats {
                coordinator: company.coordinator.clone(),
                total: 0,
                tracked: 0,
                invited: 0,
                called: 0,
                companies: Vec::new(),
            });
            stats.len() - 1
        });

        let entry = &mut stats[slot];
        entry.total += 1;
        entry.tracked += u64::from(company.tracked);
        entry.invited += u64::from(company.invited);
        entry.called += u64::from(company.called);
        entry.companies.push(CompanySummary::from(company));
    }

    stats
}
