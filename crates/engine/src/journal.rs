use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use surtido_core::{ArticleId, OfferId, OrderId, SupplierId};
use surtido_purchasing::OrderStatus;

/// A business event the dashboard surfaces (the engine-side half of
/// "log a business event and show a toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    OrderSubmitted {
        order_id: OrderId,
        number: String,
        supplier_id: SupplierId,
        total: Decimal,
    },
    OrderStatusChanged {
        order_id: OrderId,
        number: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    OfferSwapped {
        article_id: ArticleId,
        old_offer: OfferId,
        new_offer: OfferId,
        old_price: Decimal,
        new_price: Decimal,
    },
    InvoiceAttached {
        order_id: OrderId,
        invoice_ref: String,
    },
    OrderReconciled {
        order_id: OrderId,
    },
}

impl EngineEvent {
    /// Stable event name, suitable for filtering and external sinks.
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::OrderSubmitted { .. } => "purchasing.order.submitted",
            EngineEvent::OrderStatusChanged { .. } => "purchasing.order.status_changed",
            EngineEvent::OfferSwapped { .. } => "purchasing.line.offer_swapped",
            EngineEvent::InvoiceAttached { .. } => "purchasing.order.invoice_attached",
            EngineEvent::OrderReconciled { .. } => "purchasing.order.reconciled",
        }
    }

    /// The order this event belongs to, if any.
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            EngineEvent::OrderSubmitted { order_id, .. }
            | EngineEvent::OrderStatusChanged { order_id, .. }
            | EngineEvent::InvoiceAttached { order_id, .. }
            | EngineEvent::OrderReconciled { order_id } => Some(*order_id),
            EngineEvent::OfferSwapped { .. } => None,
        }
    }
}

/// One journal record. Treat as an immutable fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub event: EngineEvent,
}

/// Append-only in-memory business journal.
///
/// The engine has no background consumers, so events are queried
/// synchronously instead of published on a bus. Entries are never
/// removed.
#[derive(Debug, Default)]
pub struct BusinessJournal {
    entries: RwLock<Vec<JournalEntry>>,
}

impl BusinessJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, occurred_at: DateTime<Utc>, event: EngineEvent) {
        tracing::info!(event_type = event.event_type(), "business event");
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(JournalEntry {
            id: Uuid::now_v7(),
            occurred_at,
            event,
        });
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn entries_for_order(&self, order_id: OrderId) -> Vec<JournalEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.event.order_id() == Some(order_id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
