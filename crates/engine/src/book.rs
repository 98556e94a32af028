use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Datelike, Utc};

use surtido_core::{DomainError, DomainResult, OrderId, SupplierId};
use surtido_purchasing::{ContactChannel, DraftOrder, OrderNumber, OrderStatus, PurchaseOrder};

/// Filter for [`OrderBook::list`].
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub supplier_id: Option<SupplierId>,
    /// Case-insensitive match against order number, supplier name or
    /// notes.
    pub text: Option<String>,
}

impl OrderFilter {
    fn matches(&self, order: &PurchaseOrder) -> bool {
        if let Some(status) = self.status {
            if order.status() != status {
                return false;
            }
        }
        if let Some(supplier_id) = self.supplier_id {
            if order.supplier_id() != supplier_id {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let number = order.number().to_string().to_lowercase();
            if !number.contains(&needle)
                && !order.supplier_name().to_lowercase().contains(&needle)
                && !order.notes().to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Default)]
struct BookInner {
    orders: Vec<PurchaseOrder>,
    /// Highest sequence handed out per calendar year.
    sequences: HashMap<i32, u32>,
}

/// The authoritative purchase-order list.
///
/// Single serialization point: every mutation — submission (including the
/// number sequence) and status transition — runs under the one mutex, so
/// two near-simultaneous calls can never interleave partially or collide
/// on an order number. Reads clone out under the same lock and never see
/// a half-applied mutation.
#[derive(Debug, Default)]
pub struct OrderBook {
    inner: Mutex<BookInner>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze a draft into a numbered purchase order and append it.
    ///
    /// The number sequence only advances when the order is actually
    /// created, so a rejected draft burns no number; once handed out a
    /// number is never reused, also not after cancellation.
    pub fn submit(
        &self,
        draft: DraftOrder,
        channel: ContactChannel,
        responsible: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<PurchaseOrder> {
        let mut inner = self.lock();

        let year = now.year();
        let sequence = inner.sequences.get(&year).copied().unwrap_or(0) + 1;
        let number = OrderNumber::new(year, sequence);

        let order = PurchaseOrder::from_draft(number, draft, channel, responsible, notes, now)?;
        inner.sequences.insert(year, sequence);
        inner.orders.push(order.clone());

        tracing::info!(
            number = %order.number(),
            supplier = order.supplier_name(),
            total = %order.totals().total,
            "purchase order submitted"
        );
        Ok(order)
    }

    /// Apply a status transition.
    ///
    /// Returns the previous status together with the updated order; an
    /// illegal pair fails with `InvalidTransition` and the order is left
    /// unchanged.
    pub fn transition(
        &self,
        order_id: OrderId,
        to: OrderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<(OrderStatus, PurchaseOrder)> {
        let mut inner = self.lock();
        let order = Self::find_mut(&mut inner, order_id)?;

        let from = order.status();
        order.transition_to(to, now)?;

        tracing::info!(number = %order.number(), %from, %to, "purchase order status changed");
        Ok((from, order.clone()))
    }

    /// Link the supplier invoice covering an order.
    pub fn attach_invoice(
        &self,
        order_id: OrderId,
        reference: &str,
    ) -> DomainResult<PurchaseOrder> {
        let mut inner = self.lock();
        let order = Self::find_mut(&mut inner, order_id)?;
        order.attach_invoice(reference)?;
        Ok(order.clone())
    }

    /// Flag an order as reconciled (caseado) against its invoice.
    pub fn mark_reconciled(&self, order_id: OrderId) -> DomainResult<PurchaseOrder> {
        let mut inner = self.lock();
        let order = Self::find_mut(&mut inner, order_id)?;
        order.mark_reconciled()?;
        Ok(order.clone())
    }

    pub fn get(&self, order_id: OrderId) -> DomainResult<PurchaseOrder> {
        let inner = self.lock();
        inner
            .orders
            .iter()
            .find(|o| o.id() == order_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("order", order_id))
    }

    /// Filtered listing, newest number first (the dashboard order).
    pub fn list(&self, filter: &OrderFilter) -> Vec<PurchaseOrder> {
        let inner = self.lock();
        let mut out: Vec<PurchaseOrder> = inner
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.number().cmp(&a.number()));
        out
    }

    pub fn len(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find_mut(inner: &mut BookInner, order_id: OrderId) -> DomainResult<&mut PurchaseOrder> {
        inner
            .orders
            .iter_mut()
            .find(|o| o.id() == order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BookInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
