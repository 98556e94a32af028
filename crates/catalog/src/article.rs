use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use surtido_core::{ArticleId, DomainError, DomainResult, OfferId, SupplierId};

/// One supplier's price and tax terms for an article.
///
/// An article usually carries several offers; price, tax rate and
/// equivalence surcharge differ per offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierOffer {
    pub id: OfferId,
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    /// The supplier's own code for this article.
    pub supplier_sku: String,
    /// Tax-exclusive unit price.
    pub unit_price: Decimal,
    /// Tax rate, percent (e.g. `4` for 4 %).
    pub tax_rate: Decimal,
    /// Equivalence surcharge (recargo de equivalencia), percent.
    pub surcharge_rate: Decimal,
    pub last_purchase: Option<DateTime<Utc>>,
    pub last_invoice: Option<String>,
    pub is_preferred: bool,
    pub is_active: bool,
}

impl SupplierOffer {
    pub fn new(
        supplier_id: SupplierId,
        supplier_name: impl Into<String>,
        supplier_sku: impl Into<String>,
        unit_price: Decimal,
        tax_rate: Decimal,
        surcharge_rate: Decimal,
    ) -> Self {
        Self {
            id: OfferId::new(),
            supplier_id,
            supplier_name: supplier_name.into(),
            supplier_sku: supplier_sku.into(),
            unit_price,
            tax_rate,
            surcharge_rate,
            last_purchase: None,
            last_invoice: None,
            is_preferred: false,
            is_active: true,
        }
    }

    pub fn preferred(mut self) -> Self {
        self.is_preferred = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A purchasable/stockable catalog item at one location.
///
/// Read-only to the replenishment subsystem; stock fields are mutated
/// only through the [`crate::CatalogStore`] receiving/sales hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    /// Internal article code (stable sort key for planning).
    pub code: String,
    pub name: String,
    pub category: String,

    /// Sellable units on hand.
    pub available: i64,
    /// Units reserved against open sales.
    pub committed: i64,
    pub minimum: i64,
    pub maximum: i64,
    /// Stock threshold below which replenishment is triggered.
    pub reorder_point: i64,

    pub average_cost: Decimal,
    pub sale_price: Decimal,
    pub turnover_rate: Decimal,

    /// Ordered: fallback offer resolution uses declaration order.
    pub offers: Vec<SupplierOffer>,
    pub preferred_offer_id: Option<OfferId>,
}

impl Article {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ArticleId::new(),
            code: code.into(),
            name: name.into(),
            category: category.into(),
            available: 0,
            committed: 0,
            minimum: 0,
            maximum: 0,
            reorder_point: 0,
            average_cost: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            turnover_rate: Decimal::ZERO,
            offers: Vec::new(),
            preferred_offer_id: None,
        }
    }

    /// Attach an offer; flags it preferred when built with
    /// [`SupplierOffer::preferred`] and keeps `preferred_offer_id` in sync.
    pub fn with_offer(mut self, offer: SupplierOffer) -> Self {
        if offer.is_preferred {
            self.preferred_offer_id = Some(offer.id);
        }
        self.offers.push(offer);
        self
    }

    pub fn offer(&self, id: OfferId) -> Option<&SupplierOffer> {
        self.offers.iter().find(|o| o.id == id)
    }

    pub fn preferred_offer(&self) -> Option<&SupplierOffer> {
        self.offers.iter().find(|o| o.is_preferred)
    }

    /// The offer a new order line should use: the preferred offer, else
    /// the first active offer in declaration order (documented tie-break),
    /// else none.
    pub fn resolve_offer(&self) -> Option<&SupplierOffer> {
        self.preferred_offer()
            .or_else(|| self.offers.iter().find(|o| o.is_active))
    }

    pub fn needs_replenishment(&self) -> bool {
        self.available < self.reorder_point
    }

    /// Reorder-up-to-maximum quantity, never negative.
    pub fn recommended_quantity(&self) -> i64 {
        (self.maximum - self.available).max(0)
    }

    /// Catalog-management invariants, checked on every store upsert.
    pub fn validate(&self) -> DomainResult<()> {
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("article code cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("article name cannot be empty"));
        }
        if self.available < 0 || self.committed < 0 {
            return Err(DomainError::validation(format!(
                "stock counts cannot be negative (available={}, committed={})",
                self.available, self.committed
            )));
        }
        if !(self.minimum <= self.reorder_point && self.reorder_point <= self.maximum) {
            return Err(DomainError::validation(format!(
                "expected minimum <= reorder_point <= maximum, got {} / {} / {}",
                self.minimum, self.reorder_point, self.maximum
            )));
        }

        let flagged = self.offers.iter().filter(|o| o.is_preferred).count();
        if flagged > 1 {
            return Err(DomainError::validation(
                "at most one offer may be flagged preferred",
            ));
        }
        match self.preferred_offer_id {
            Some(id) if self.offer(id).is_none() => {
                return Err(DomainError::validation(format!(
                    "preferred offer {id} is not among the article's offers"
                )));
            }
            Some(id) => {
                // The flag and the pointer must agree.
                if self.offers.iter().any(|o| o.is_preferred && o.id != id) {
                    return Err(DomainError::validation(
                        "preferred_offer_id disagrees with the offer flagged preferred",
                    ));
                }
            }
            None => {
                if flagged > 0 {
                    return Err(DomainError::validation(
                        "an offer is flagged preferred but preferred_offer_id is unset",
                    ));
                }
            }
        }

        Ok(())
    }
}
