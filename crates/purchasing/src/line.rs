use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use surtido_catalog::Article;
use surtido_core::{ArticleId, DomainError, DomainResult, OfferId, SupplierId};
use surtido_planning::Suggestion;
use surtido_pricing::LineTotals;

/// The mutable working item of a draft: one article, one chosen supplier
/// offer, a user-editable quantity.
///
/// Price, tax rate and surcharge rate are a snapshot of the chosen offer,
/// re-read whenever the offer changes. Monetary fields are always derived
/// through [`totals`](OrderLine::totals), never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub article_id: ArticleId,
    pub article_code: String,
    pub article_name: String,

    pub offer_id: OfferId,
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub supplier_sku: String,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub surcharge_rate: Decimal,

    /// Never negative. Zero keeps the line in the draft but excludes it
    /// from aggregation.
    pub quantity: i64,
}

impl OrderLine {
    /// Build a line from a planner suggestion, snapshotting the suggested
    /// offer's terms.
    pub fn from_suggestion(article: &Article, suggestion: &Suggestion) -> DomainResult<Self> {
        if article.id != suggestion.article_id {
            return Err(DomainError::conflict(format!(
                "suggestion for article {} applied to article {}",
                suggestion.article_code, article.code
            )));
        }
        let offer = article
            .offer(suggestion.offer_id)
            .ok_or_else(|| DomainError::offer_not_found(&article.code, suggestion.offer_id))?;

        Ok(Self {
            article_id: article.id,
            article_code: article.code.clone(),
            article_name: article.name.clone(),
            offer_id: offer.id,
            supplier_id: offer.supplier_id,
            supplier_name: offer.supplier_name.clone(),
            supplier_sku: offer.supplier_sku.clone(),
            unit_price: offer.unit_price,
            tax_rate: offer.tax_rate,
            surcharge_rate: offer.surcharge_rate,
            quantity: suggestion.recommended_quantity,
        })
    }

    /// Set the ordered quantity. Negative quantities are rejected; zero is
    /// legal and merely drops the line from aggregation.
    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Swap the chosen supplier offer.
    ///
    /// The one place price changes silently cascade, so the swap is
    /// explicit and logged with the old and new price. Unit price, tax
    /// rate, surcharge rate and supplier fields are all replaced by the
    /// new offer's values; the previous offer's values are fully
    /// discarded.
    pub fn set_offer(&mut self, article: &Article, offer_id: OfferId) -> DomainResult<()> {
        if article.id != self.article_id {
            return Err(DomainError::conflict(format!(
                "line for article {} edited against article {}",
                self.article_code, article.code
            )));
        }
        let offer = article
            .offer(offer_id)
            .ok_or_else(|| DomainError::offer_not_found(&article.code, offer_id))?;

        tracing::info!(
            article = %self.article_code,
            old_offer = %self.offer_id,
            new_offer = %offer.id,
            old_price = %self.unit_price,
            new_price = %offer.unit_price,
            "supplier offer changed on order line"
        );

        self.offer_id = offer.id;
        self.supplier_id = offer.supplier_id;
        self.supplier_name = offer.supplier_name.clone();
        self.supplier_sku = offer.supplier_sku.clone();
        self.unit_price = offer.unit_price;
        self.tax_rate = offer.tax_rate;
        self.surcharge_rate = offer.surcharge_rate;
        Ok(())
    }

    /// Derived monetary breakdown of this line, full precision.
    pub fn totals(&self) -> LineTotals {
        surtido_pricing::compute_line(
            self.quantity,
            self.unit_price,
            self.tax_rate,
            self.surcharge_rate,
        )
    }
}
