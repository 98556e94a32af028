use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use surtido_core::{DomainError, DomainResult, OrderId, SupplierId};
use surtido_pricing::OrderTotals;

use crate::draft::DraftOrder;
use crate::line::OrderLine;
use crate::number::OrderNumber;
use crate::status::OrderStatus;

/// How the order is sent to the supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    Email,
    Phone,
    Whatsapp,
}

impl core::fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ContactChannel::Email => "email",
            ContactChannel::Phone => "phone",
            ContactChannel::Whatsapp => "whatsapp",
        };
        f.write_str(s)
    }
}

/// A submitted purchase order.
///
/// Lines and totals are frozen at submission; after that the order only
/// changes through [`transition_to`](PurchaseOrder::transition_to) and the
/// invoice-reconciliation bookkeeping. Orders are never deleted, only
/// transitioned to a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: OrderId,
    number: OrderNumber,
    supplier_id: SupplierId,
    supplier_name: String,
    lines: Vec<OrderLine>,
    totals: OrderTotals,
    notes: String,
    channel: ContactChannel,
    responsible: String,
    status: OrderStatus,
    requested_at: DateTime<Utc>,
    estimated_delivery: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    invoice_ref: Option<String>,
    reconciled: bool,
}

impl PurchaseOrder {
    /// Freeze a draft into a purchase order.
    ///
    /// Totals are recomputed here from the frozen lines rather than
    /// trusted from the draft. The delivery estimate is a fixed three
    /// days; the supplier's configured lead time is not consulted (see
    /// DESIGN.md).
    pub fn from_draft(
        number: OrderNumber,
        draft: DraftOrder,
        channel: ContactChannel,
        responsible: impl Into<String>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if draft.lines.is_empty() {
            return Err(DomainError::validation(
                "cannot submit an order without lines",
            ));
        }
        for line in &draft.lines {
            if line.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "line for article {} has non-positive quantity {}",
                    line.article_code, line.quantity
                )));
            }
            if line.supplier_id != draft.supplier_id {
                return Err(DomainError::conflict(format!(
                    "line for article {} belongs to another supplier",
                    line.article_code
                )));
            }
        }

        let totals = surtido_pricing::compute_order(draft.lines.iter().map(OrderLine::totals));

        Ok(Self {
            id: OrderId::new(),
            number,
            supplier_id: draft.supplier_id,
            supplier_name: draft.supplier_name,
            lines: draft.lines,
            totals,
            notes: notes.into(),
            channel,
            responsible: responsible.into(),
            status: OrderStatus::Solicitado,
            requested_at: now,
            estimated_delivery: now + Duration::days(3),
            confirmed_at: None,
            delivered_at: None,
            invoice_ref: None,
            reconciled: false,
        })
    }

    /// Apply a status transition, stamping the matching timestamp.
    ///
    /// An illegal pair fails with `InvalidTransition` and leaves status
    /// and timestamps untouched. Lines and totals are never touched here.
    pub fn transition_to(&mut self, to: OrderStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::invalid_transition(self.status, to));
        }
        self.status = to;
        match to {
            OrderStatus::Confirmado => self.confirmed_at = Some(now),
            OrderStatus::Entregado => self.delivered_at = Some(now),
            _ => {}
        }
        Ok(())
    }

    /// Link the supplier invoice covering this order.
    pub fn attach_invoice(&mut self, reference: impl Into<String>) -> DomainResult<()> {
        if self.status == OrderStatus::Anulado {
            return Err(DomainError::validation(
                "cannot attach an invoice to a cancelled order",
            ));
        }
        self.invoice_ref = Some(reference.into());
        Ok(())
    }

    /// Mark the order reconciled (caseado) against its invoice.
    pub fn mark_reconciled(&mut self) -> DomainResult<()> {
        if self.invoice_ref.is_none() {
            return Err(DomainError::validation(
                "cannot reconcile an order without a linked invoice",
            ));
        }
        self.reconciled = true;
        Ok(())
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn number(&self) -> OrderNumber {
        self.number
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn totals(&self) -> OrderTotals {
        self.totals
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn channel(&self) -> ContactChannel {
        self.channel
    }

    pub fn responsible(&self) -> &str {
        &self.responsible
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn estimated_delivery(&self) -> DateTime<Utc> {
        self.estimated_delivery
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub fn invoice_ref(&self) -> Option<&str> {
        self.invoice_ref.as_deref()
    }

    pub fn is_reconciled(&self) -> bool {
        self.reconciled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::aggregate;
    use crate::line::OrderLine;
    use surtido_catalog::{Article, SupplierOffer};
    use surtido_planning::plan;

    fn draft() -> DraftOrder {
        let offer = SupplierOffer::new(
            SupplierId::new(),
            "Distribuciones Norte",
            "DN-1001",
            "10.00".parse().unwrap(),
            "4".parse().unwrap(),
            "0.5".parse().unwrap(),
        );
        let mut article = Article::new("ART-001", "Harina de trigo", "secos").with_offer(offer);
        article.available = 5;
        article.reorder_point = 10;
        article.maximum = 15; // quantity 10

        let suggestions = plan(std::slice::from_ref(&article));
        let lines: Vec<OrderLine> = suggestions
            .iter()
            .map(|s| OrderLine::from_suggestion(&article, s).unwrap())
            .collect();
        aggregate(&lines).remove(0)
    }

    fn submitted() -> PurchaseOrder {
        PurchaseOrder::from_draft(
            OrderNumber::new(2026, 1),
            draft(),
            ContactChannel::Email,
            "Lucía",
            "entrega por la mañana",
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn from_draft_freezes_lines_and_derives_totals() {
        let order = submitted();

        assert_eq!(order.status(), OrderStatus::Solicitado);
        assert_eq!(order.number().to_string(), "PED-2026-001");
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.totals().subtotal, "100.00".parse().unwrap());
        assert_eq!(order.totals().tax, "4.00".parse().unwrap());
        assert_eq!(order.totals().surcharge, "0.50".parse().unwrap());
        assert_eq!(order.totals().total, "104.50".parse().unwrap());
        assert_eq!(
            order.estimated_delivery(),
            order.requested_at() + Duration::days(3)
        );
    }

    #[test]
    fn aggregate_totals_equal_the_sum_of_line_totals() {
        let order = submitted();
        let summed = surtido_pricing::compute_order(order.lines().iter().map(OrderLine::totals));
        assert_eq!(order.totals(), summed);
    }

    #[test]
    fn from_draft_rejects_an_empty_draft() {
        let mut d = draft();
        d.lines.clear();
        let err = PurchaseOrder::from_draft(
            OrderNumber::new(2026, 1),
            d,
            ContactChannel::Email,
            "Lucía",
            "",
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn happy_path_transitions_stamp_timestamps() {
        let mut order = submitted();
        let t1 = Utc::now();
        order.transition_to(OrderStatus::Confirmado, t1).unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmado);
        assert_eq!(order.confirmed_at(), Some(t1));

        order.transition_to(OrderStatus::EnTransito, Utc::now()).unwrap();
        let t2 = Utc::now();
        order.transition_to(OrderStatus::Entregado, t2).unwrap();
        assert_eq!(order.status(), OrderStatus::Entregado);
        assert_eq!(order.delivered_at(), Some(t2));
    }

    #[test]
    fn confirmed_orders_cannot_be_cancelled_after_transit() {
        // submit -> confirm succeeds; a later cancel attempt fails.
        let mut order = submitted();
        order.transition_to(OrderStatus::Confirmado, Utc::now()).unwrap();
        order.transition_to(OrderStatus::EnTransito, Utc::now()).unwrap();

        let err = order
            .transition_to(OrderStatus::Anulado, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_transition("en-transito", "anulado")
        );
        assert_eq!(order.status(), OrderStatus::EnTransito);
    }

    #[test]
    fn failed_transition_changes_nothing() {
        let mut order = submitted();
        let before = order.clone();

        assert!(order.transition_to(OrderStatus::Entregado, Utc::now()).is_err());
        assert_eq!(order, before);
    }

    #[test]
    fn transitions_never_touch_lines_or_totals() {
        let mut order = submitted();
        let lines = order.lines().to_vec();
        let totals = order.totals();

        order.transition_to(OrderStatus::Confirmado, Utc::now()).unwrap();
        order.transition_to(OrderStatus::EnTransito, Utc::now()).unwrap();
        order.transition_to(OrderStatus::Reclamado, Utc::now()).unwrap();
        order.transition_to(OrderStatus::Entregado, Utc::now()).unwrap();

        assert_eq!(order.lines(), lines.as_slice());
        assert_eq!(order.totals(), totals);
    }

    #[test]
    fn reconciliation_requires_an_invoice() {
        let mut order = submitted();
        assert!(order.mark_reconciled().is_err());

        order.attach_invoice("FAC-2026-118").unwrap();
        order.mark_reconciled().unwrap();
        assert!(order.is_reconciled());
        assert_eq!(order.invoice_ref(), Some("FAC-2026-118"));
    }

    #[test]
    fn cancelled_orders_refuse_invoices() {
        let mut order = submitted();
        order.transition_to(OrderStatus::Anulado, Utc::now()).unwrap();
        assert!(order.attach_invoice("FAC-2026-119").is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = OrderStatus> {
            proptest::sample::select(OrderStatus::ALL.to_vec())
        }

        proptest! {
            /// Closure of the transition table: from a freshly submitted
            /// order, a random walk only ever succeeds on listed pairs,
            /// and every failure leaves the order bit-identical.
            #[test]
            fn random_walk_respects_the_table(steps in proptest::collection::vec(any_status(), 1..20)) {
                let mut order = submitted();
                for to in steps {
                    let from = order.status();
                    let before = order.clone();
                    let result = order.transition_to(to, Utc::now());
                    if from.can_transition_to(to) {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(order.status(), to);
                    } else {
                        prop_assert!(result.is_err());
                        prop_assert_eq!(&order, &before);
                    }
                }
            }
        }
    }
}
