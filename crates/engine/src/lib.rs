//! `surtido-engine` — the replenishment and purchase-order engine.
//!
//! Wires the catalog, planner, line editor, aggregator and order book
//! behind one façade ([`ReplenishmentEngine`]) consumed by the dashboard's
//! UI sessions. All writes are serialized (one mutex for the order book,
//! one write lock for the catalog); reads run against consistent
//! snapshots. Everything is synchronous request/response — no background
//! processing, no async I/O.

pub mod book;
pub mod journal;
pub mod suppliers;

use std::sync::Arc;

use chrono::Utc;

use surtido_catalog::{ArticleFilter, CatalogStore};
use surtido_core::{DomainResult, OfferId, OrderId};
use surtido_planning::{PlanReport, Suggestion};
use surtido_purchasing::{ContactChannel, DraftOrder, OrderLine, OrderStatus, PurchaseOrder};

pub use book::{OrderBook, OrderFilter};
pub use journal::{BusinessJournal, EngineEvent, JournalEntry};
pub use suppliers::{Supplier, SupplierDirectory};

/// The engine façade the UI layer talks to.
///
/// Wall-clock time is stamped here, at the edge; everything below takes
/// explicit timestamps and stays deterministic.
#[derive(Debug)]
pub struct ReplenishmentEngine {
    catalog: Arc<CatalogStore>,
    suppliers: SupplierDirectory,
    book: OrderBook,
    journal: BusinessJournal,
}

impl ReplenishmentEngine {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self {
            catalog,
            suppliers: SupplierDirectory::new(),
            book: OrderBook::new(),
            journal: BusinessJournal::new(),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn suppliers(&self) -> &SupplierDirectory {
        &self.suppliers
    }

    pub fn journal(&self) -> &BusinessJournal {
        &self.journal
    }

    /// Scan the catalog and propose reorder suggestions.
    pub fn plan_suggestions(&self) -> Vec<Suggestion> {
        surtido_planning::plan(&self.catalog.snapshot())
    }

    /// Like [`plan_suggestions`](Self::plan_suggestions), with the skipped
    /// (offerless) articles reported for the UI's diagnostic toast.
    pub fn plan_suggestions_report(&self) -> PlanReport {
        surtido_planning::plan_report(&self.catalog.snapshot())
    }

    /// Turn suggestions into editable order lines against the current
    /// catalog.
    pub fn lines_from_suggestions(
        &self,
        suggestions: &[Suggestion],
    ) -> DomainResult<Vec<OrderLine>> {
        suggestions
            .iter()
            .map(|s| {
                let article = self.catalog.get(s.article_id)?;
                OrderLine::from_suggestion(&article, s)
            })
            .collect()
    }

    /// Edit a line's quantity. Zero keeps the line but drops it from
    /// aggregation; negatives are rejected.
    pub fn set_line_quantity(&self, line: &mut OrderLine, quantity: i64) -> DomainResult<()> {
        line.set_quantity(quantity)
    }

    /// Swap a line's supplier offer, re-reading price and tax terms from
    /// the catalog and journaling the price cascade.
    pub fn set_line_offer(&self, line: &mut OrderLine, offer_id: OfferId) -> DomainResult<()> {
        let article = self.catalog.get(line.article_id)?;
        let (old_offer, old_price) = (line.offer_id, line.unit_price);
        line.set_offer(&article, offer_id)?;
        self.journal.append(
            Utc::now(),
            EngineEvent::OfferSwapped {
                article_id: article.id,
                old_offer,
                new_offer: line.offer_id,
                old_price,
                new_price: line.unit_price,
            },
        );
        Ok(())
    }

    /// Group edited lines into per-supplier draft orders.
    pub fn aggregate_draft(&self, lines: &[OrderLine]) -> Vec<DraftOrder> {
        surtido_purchasing::aggregate(lines)
    }

    /// Submit a draft: number it, freeze it, append it to the order book.
    pub fn submit_order(
        &self,
        draft: DraftOrder,
        channel: ContactChannel,
        responsible: &str,
        notes: &str,
    ) -> DomainResult<PurchaseOrder> {
        let order = self
            .book
            .submit(draft, channel, responsible, notes, Utc::now())?;
        self.journal.append(
            order.requested_at(),
            EngineEvent::OrderSubmitted {
                order_id: order.id(),
                number: order.number().to_string(),
                supplier_id: order.supplier_id(),
                total: order.totals().total,
            },
        );
        Ok(order)
    }

    /// Move an order through its lifecycle.
    pub fn transition_order(
        &self,
        order_id: OrderId,
        to: OrderStatus,
    ) -> DomainResult<PurchaseOrder> {
        let now = Utc::now();
        let (from, order) = self.book.transition(order_id, to, now)?;
        self.journal.append(
            now,
            EngineEvent::OrderStatusChanged {
                order_id: order.id(),
                number: order.number().to_string(),
                from,
                to,
            },
        );
        Ok(order)
    }

    /// Link the supplier invoice covering an order.
    pub fn attach_invoice(&self, order_id: OrderId, reference: &str) -> DomainResult<PurchaseOrder> {
        let order = self.book.attach_invoice(order_id, reference)?;
        self.journal.append(
            Utc::now(),
            EngineEvent::InvoiceAttached {
                order_id: order.id(),
                invoice_ref: reference.to_string(),
            },
        );
        Ok(order)
    }

    /// Mark an order reconciled (caseado) against its linked invoice.
    pub fn mark_order_reconciled(&self, order_id: OrderId) -> DomainResult<PurchaseOrder> {
        let order = self.book.mark_reconciled(order_id)?;
        self.journal
            .append(Utc::now(), EngineEvent::OrderReconciled { order_id });
        Ok(order)
    }

    pub fn get_order(&self, order_id: OrderId) -> DomainResult<PurchaseOrder> {
        self.book.get(order_id)
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> Vec<PurchaseOrder> {
        self.book.list(filter)
    }

    /// Filtered catalog listing, for the articles view.
    pub fn list_articles(&self, filter: &ArticleFilter) -> Vec<surtido_catalog::Article> {
        self.catalog.list(filter)
    }
}
