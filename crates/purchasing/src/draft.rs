use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use surtido_core::SupplierId;
use surtido_pricing::OrderTotals;

use crate::line::OrderLine;

/// Lines grouped by supplier, not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
}

/// Group lines into per-supplier draft orders.
///
/// Pure: called again after every edit and always recomputes everything —
/// lines with quantity 0 drop out, totals are derived from scratch (a
/// stale partial sum would be a correctness defect, so none is kept).
/// Output is sorted by supplier name, then supplier id, for stable
/// presentation.
pub fn aggregate(lines: &[OrderLine]) -> Vec<DraftOrder> {
    let mut by_supplier: HashMap<SupplierId, Vec<OrderLine>> = HashMap::new();
    for line in lines.iter().filter(|l| l.quantity > 0) {
        by_supplier
            .entry(line.supplier_id)
            .or_default()
            .push(line.clone());
    }

    let mut drafts: Vec<DraftOrder> = by_supplier
        .into_iter()
        .map(|(supplier_id, lines)| DraftOrder {
            supplier_id,
            supplier_name: lines[0].supplier_name.clone(),
            totals: surtido_pricing::compute_order(lines.iter().map(OrderLine::totals)),
            lines,
        })
        .collect();

    drafts.sort_by(|a, b| {
        a.supplier_name
            .cmp(&b.supplier_name)
            .then_with(|| a.supplier_id.cmp(&b.supplier_id))
    });
    drafts
}
