//! Lookup lists loaded once per session.

use crmdesk_catalog::{CatalogProduct, Organization, Paybox, PriceType, ReferenceKind, Warehouse};
use crmdesk_client::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub organizations: Vec<Organization>,
    pub warehouses: Vec<Warehouse>,
    pub payboxes: Vec<Paybox>,
    pub price_types: Vec<PriceType>,
    pub products: Vec<CatalogProduct>,
}

impl ReferenceData {
    pub fn count(&self, kind: ReferenceKind) -> usize {
        match kind {
            ReferenceKind::Organizations => self.organizations.len(),
            ReferenceKind::Warehouses => self.warehouses.len(),
            ReferenceKind::Payboxes => self.payboxes.len(),
            ReferenceKind::PriceTypes => self.price_types.len(),
            ReferenceKind::Nomenclature => self.products.len(),
        }
    }
}

/// Outcome of one full load: which lists failed and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub failures: Vec<(ReferenceKind, ApiError)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_kinds(&self) -> Vec<ReferenceKind> {
        self.failures.iter().map(|(kind, _)| *kind).collect()
    }

    /// One operator-facing sentence, or `None` when everything loaded.
    pub fn summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.failures.iter().map(|(kind, _)| kind.as_str()).collect();
        Some(format!(
            "Could not load reference data ({}). Check the token and the connection.",
            names.join(", ")
        ))
    }

    pub(crate) fn record<T>(&mut self, kind: ReferenceKind, result: Result<Vec<T>, ApiError>) -> Vec<T> {
        match result {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(%kind, error = %err, "reference list failed to load");
                self.failures.push((kind, err));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_every_failed_list() {
        let mut report = LoadReport::default();
        assert_eq!(report.summary(), None);

        let loaded = report.record::<Warehouse>(
            ReferenceKind::Warehouses,
            Err(ApiError::Network("refused".to_string())),
        );
        assert!(loaded.is_empty());
        report.record::<Paybox>(
            ReferenceKind::Payboxes,
            Err(ApiError::Status {
                status: 500,
                body: String::new(),
            }),
        );

        assert!(!report.is_complete());
        assert_eq!(
            report.failed_kinds(),
            vec![ReferenceKind::Warehouses, ReferenceKind::Payboxes]
        );
        assert_eq!(
            report.summary().unwrap(),
            "Could not load reference data (warehouses, cash accounts). Check the token and the connection."
        );
    }
}
