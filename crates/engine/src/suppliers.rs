use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use surtido_core::{DomainError, DomainResult, SupplierId};
use surtido_purchasing::ContactChannel;

/// A supplier as the directory knows it.
///
/// `lead_time_days` is carried for reporting but not consulted by order
/// submission, which uses the fixed three-day estimate (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub channel: ContactChannel,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lead_time_days: Option<u32>,
}

impl Supplier {
    pub fn new(name: impl Into<String>, channel: ContactChannel) -> Self {
        Self {
            id: SupplierId::new(),
            name: name.into(),
            channel,
            email: None,
            phone: None,
            lead_time_days: None,
        }
    }
}

/// Shared supplier directory.
#[derive(Debug, Default)]
pub struct SupplierDirectory {
    suppliers: RwLock<HashMap<SupplierId, Supplier>>,
}

impl SupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, supplier: Supplier) -> DomainResult<()> {
        if supplier.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        let mut suppliers = self
            .suppliers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        suppliers.insert(supplier.id, supplier);
        Ok(())
    }

    pub fn get(&self, id: SupplierId) -> DomainResult<Supplier> {
        self.suppliers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("supplier", id))
    }

    /// The supplier's configured contact channel, for pre-selecting how a
    /// new order is sent.
    pub fn default_channel(&self, id: SupplierId) -> DomainResult<ContactChannel> {
        Ok(self.get(id)?.channel)
    }

    pub fn list(&self) -> Vec<Supplier> {
        let mut out: Vec<Supplier> = self
            .suppliers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_and_get_round_trip() {
        let directory = SupplierDirectory::new();
        let mut supplier = Supplier::new("Distribuciones Norte", ContactChannel::Email);
        supplier.email = Some("pedidos@dnorte.es".into());
        supplier.lead_time_days = Some(2);
        let id = supplier.id;

        directory.upsert(supplier.clone()).unwrap();
        assert_eq!(directory.get(id).unwrap(), supplier);
        assert_eq!(directory.default_channel(id).unwrap(), ContactChannel::Email);
    }

    #[test]
    fn unknown_supplier_is_not_found() {
        let directory = SupplierDirectory::new();
        let err = directory.get(SupplierId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "supplier", .. }));
    }

    #[test]
    fn list_is_sorted_by_name() {
        let directory = SupplierDirectory::new();
        directory
            .upsert(Supplier::new("Mayorista Sur", ContactChannel::Phone))
            .unwrap();
        directory
            .upsert(Supplier::new("Distribuciones Norte", ContactChannel::Email))
            .unwrap();

        let names: Vec<_> = directory.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Distribuciones Norte", "Mayorista Sur"]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let directory = SupplierDirectory::new();
        let err = directory
            .upsert(Supplier::new("   ", ContactChannel::Email))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
