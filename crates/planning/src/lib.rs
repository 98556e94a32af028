//! `surtido-planning` — reorder-point replenishment planning.
//!
//! Scans a catalog snapshot and derives transient reorder [`Suggestion`]s.
//! Pure over its input: the same snapshot always yields the same
//! suggestions in the same (article-code) order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use surtido_catalog::Article;
use surtido_core::{ArticleId, OfferId, SupplierId};

/// A derived reorder proposal. Not persisted; discarded once converted
/// into an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub article_id: ArticleId,
    pub article_code: String,
    pub article_name: String,
    /// Top-up-to-maximum quantity, never negative.
    pub recommended_quantity: i64,
    /// The resolved offer: preferred, else first active in declaration
    /// order.
    pub offer_id: OfferId,
    pub supplier_id: SupplierId,
    pub unit_price: Decimal,
}

/// Outcome of a planning run: suggestions plus the articles that were
/// skipped because they have no orderable supplier offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanReport {
    pub suggestions: Vec<Suggestion>,
    pub skipped: Vec<ArticleId>,
}

/// Plan replenishment over a catalog snapshot.
///
/// An article below its reorder point with no resolvable offer is skipped
/// with a diagnostic; planning continues for the rest of the catalog.
pub fn plan(articles: &[Article]) -> Vec<Suggestion> {
    plan_report(articles).suggestions
}

/// Like [`plan`], but also reports which articles were skipped so the
/// caller can surface the diagnostic.
pub fn plan_report(articles: &[Article]) -> PlanReport {
    let mut report = PlanReport::default();

    for article in articles {
        if !article.needs_replenishment() {
            continue;
        }

        let Some(offer) = article.resolve_offer() else {
            tracing::warn!(
                article = %article.code,
                "article is below its reorder point but has no supplier offer; skipped"
            );
            report.skipped.push(article.id);
            continue;
        };

        report.suggestions.push(Suggestion {
            article_id: article.id,
            article_code: article.code.clone(),
            article_name: article.name.clone(),
            recommended_quantity: article.recommended_quantity(),
            offer_id: offer.id,
            supplier_id: offer.supplier_id,
            unit_price: offer.unit_price,
        });
    }

    tracing::debug!(
        suggestions = report.suggestions.len(),
        skipped = report.skipped.len(),
        scanned = articles.len(),
        "replenishment plan computed"
    );

    report
}
