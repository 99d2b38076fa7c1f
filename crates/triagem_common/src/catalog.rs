//! Service catalog - the fixed set of classifiable banking services.

use serde::{Deserialize, Serialize};

/// One classifiable service category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: u32,
    pub label: String,
}

/// Ordered, immutable list of service categories.
///
/// Built once at startup and shared read-only for the process lifetime.
/// Ids are unique and stable; iteration preserves declaration order
/// because the classification prompt enumerates entries in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCatalog {
    entries: Vec<ServiceEntry>,
}

impl ServiceCatalog {
    pub fn new(entries: Vec<ServiceEntry>) -> Self {
        Self { entries }
    }

    /// Authoritative label for a service id. `None` is a normal outcome,
    /// consumed by the resolver as a silent rejection.
    pub fn lookup(&self, id: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ServiceCatalog {
    /// The production catalog of banking/credit-card services.
    fn default() -> Self {
        fn entry(id: u32, label: &str) -> ServiceEntry {
            ServiceEntry {
                id,
                label: label.to_string(),
            }
        }

        Self::new(vec![
            entry(1, "Consulta Limite / Vencimento do cartão / Melhor dia de compra"),
            entry(2, "Segunda via de boleto de acordo"),
            entry(3, "Segunda via de Fatura"),
            entry(4, "Status de Entrega do Cartão"),
            entry(5, "Status de cartão"),
            entry(6, "Solicitação de aumento de limite"),
            entry(7, "Cancelamento de cartão"),
            entry(8, "Telefones de seguradoras"),
            entry(9, "Desbloqueio de Cartão"),
            entry(10, "Esqueceu senha / Troca de senha"),
            entry(11, "Perda e roubo"),
            entry(12, "Consulta do Saldo"),
            entry(13, "Pagamento de contas"),
            entry(14, "Reclamações"),
            entry(15, "Atendimento humano"),
            entry(16, "Token de proposta"),
        ])
    }
}

/// Terminal outcome of one classification attempt that reached a decision.
///
/// `Matched.label` is always the catalog's authoritative label, never the
/// text the model answered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Matched { id: u32, label: String },
    NoMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_all_services() {
        let catalog = ServiceCatalog::default();
        assert_eq!(catalog.len(), 16);
    }

    #[test]
    fn test_lookup_returns_exact_label() {
        let catalog = ServiceCatalog::default();
        assert_eq!(
            catalog.lookup(1),
            Some("Consulta Limite / Vencimento do cartão / Melhor dia de compra")
        );
        assert_eq!(catalog.lookup(3), Some("Segunda via de Fatura"));
        assert_eq!(catalog.lookup(12), Some("Consulta do Saldo"));
        assert_eq!(catalog.lookup(16), Some("Token de proposta"));
    }

    #[test]
    fn test_lookup_every_configured_id() {
        let catalog = ServiceCatalog::default();
        for entry in catalog.iter() {
            assert_eq!(catalog.lookup(entry.id), Some(entry.label.as_str()));
        }
    }

    #[test]
    fn test_lookup_unknown_id_is_not_found() {
        let catalog = ServiceCatalog::default();
        assert_eq!(catalog.lookup(0), None);
        assert_eq!(catalog.lookup(17), None);
        assert_eq!(catalog.lookup(999), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = ServiceCatalog::default();
        let mut ids: Vec<u32> = catalog.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_iteration_preserves_order() {
        let catalog = ServiceCatalog::default();
        let ids: Vec<u32> = catalog.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=16).collect::<Vec<u32>>());
    }
}
