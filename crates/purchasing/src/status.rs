use serde::{Deserialize, Serialize};

/// Purchase-order status lifecycle.
///
/// The serialized literals are the ones the dashboard's users see
/// (`solicitado`, `en-transito`, …). The transition table in
/// [`OrderStatus::can_transition_to`] is the single authority on which
/// changes are legal; UI affordances are not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Initial: order placed with the supplier, awaiting confirmation.
    Solicitado,
    Confirmado,
    EnTransito,
    /// Terminal success.
    Entregado,
    /// Claim/dispute on a delivery; resolvable back to delivered.
    Reclamado,
    /// Terminal cancellation.
    Anulado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Solicitado,
        OrderStatus::Confirmado,
        OrderStatus::EnTransito,
        OrderStatus::Entregado,
        OrderStatus::Reclamado,
        OrderStatus::Anulado,
    ];

    /// The closed transition table. Anything not listed here is illegal.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Solicitado, Confirmado)
                | (Solicitado, Anulado)
                | (Confirmado, EnTransito)
                | (Confirmado, Anulado)
                | (EnTransito, Entregado)
                | (EnTransito, Reclamado)
                | (Reclamado, Entregado)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Entregado | OrderStatus::Anulado)
    }

    /// The dashboard literal for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Solicitado => "solicitado",
            OrderStatus::Confirmado => "confirmado",
            OrderStatus::EnTransito => "en-transito",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Reclamado => "reclamado",
            OrderStatus::Anulado => "anulado",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = surtido_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                surtido_core::DomainError::validation(format!("unknown order status: {s}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::OrderStatus::*;

    #[test]
    fn the_happy_path_is_legal() {
        assert!(Solicitado.can_transition_to(Confirmado));
        assert!(Confirmado.can_transition_to(EnTransito));
        assert!(EnTransito.can_transition_to(Entregado));
    }

    #[test]
    fn claims_are_re_enterable_to_delivered() {
        assert!(EnTransito.can_transition_to(Reclamado));
        assert!(Reclamado.can_transition_to(Entregado));
        assert!(!Reclamado.can_transition_to(EnTransito));
    }

    #[test]
    fn only_early_statuses_can_be_cancelled() {
        assert!(Solicitado.can_transition_to(Anulado));
        assert!(Confirmado.can_transition_to(Anulado));
        assert!(!EnTransito.can_transition_to(Anulado));
        assert!(!Entregado.can_transition_to(Anulado));
    }

    #[test]
    fn terminal_statuses_go_nowhere() {
        for to in OrderStatus::ALL {
            assert!(!Entregado.can_transition_to(to));
            assert!(!Anulado.can_transition_to(to));
        }
    }

    #[test]
    fn self_transitions_are_illegal() {
        for status in OrderStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn exactly_seven_pairs_are_legal() {
        let legal = OrderStatus::ALL
            .into_iter()
            .flat_map(|from| OrderStatus::ALL.into_iter().map(move |to| (from, to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .count();
        assert_eq!(legal, 7);
    }

    #[test]
    fn literals_round_trip_through_serde_and_from_str() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
