//! The order being drafted: selections, lines, payment, validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crmdesk_catalog::{CatalogProduct, Customer, PriceSource};
use crmdesk_core::{DraftId, Money, RemoteId};

use crate::line::{LineDefaults, LineItems};
use crate::payload::{GoodsLine, PayloadSettings, SALE_OPERATION, SalePayload};

/// Why a draft cannot be submitted yet. Checked before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("select a customer")]
    MissingCustomer,
    #[error("select an organization")]
    MissingOrganization,
    #[error("select a warehouse")]
    MissingWarehouse,
    #[error("select a cash account")]
    MissingPaybox,
    #[error("add at least one product")]
    NoLines,
    #[error("paid amount {paid} is less than the order total {total}")]
    InsufficientPayment { paid: Money, total: Money },
}

/// In-memory order for one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    id: DraftId,
    organization: Option<RemoteId>,
    warehouse: Option<RemoteId>,
    paybox: Option<RemoteId>,
    price_source: PriceSource,
    customer: Option<Customer>,
    paid: Money,
    lines: LineItems,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new(LineDefaults::default())
    }
}

impl OrderDraft {
    pub fn new(defaults: LineDefaults) -> Self {
        Self {
            id: DraftId::new(),
            organization: None,
            warehouse: None,
            paybox: None,
            price_source: PriceSource::FirstAvailable,
            customer: None,
            paid: Money::ZERO,
            lines: LineItems::new(defaults),
        }
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn organization(&self) -> Option<RemoteId> {
        self.organization
    }

    pub fn warehouse(&self) -> Option<RemoteId> {
        self.warehouse
    }

    pub fn paybox(&self) -> Option<RemoteId> {
        self.paybox
    }

    pub fn price_source(&self) -> &PriceSource {
        &self.price_source
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn paid(&self) -> Money {
        self.paid
    }

    pub fn lines(&self) -> &LineItems {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut LineItems {
        &mut self.lines
    }

    pub fn set_organization(&mut self, id: Option<RemoteId>) {
        self.organization = id;
    }

    pub fn set_warehouse(&mut self, id: Option<RemoteId>) {
        self.warehouse = id;
    }

    pub fn set_paybox(&mut self, id: Option<RemoteId>) {
        self.paybox = id;
    }

    /// Price list used to seed lines added from now on.
    pub fn set_price_source(&mut self, source: PriceSource) {
        self.price_source = source;
    }

    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
    }

    pub fn set_paid(&mut self, paid: Money) {
        self.paid = paid;
    }

    /// Operator-typed payment; unparsable text counts as zero.
    pub fn set_paid_text(&mut self, text: &str) {
        self.paid = Money::parse_lenient(text);
    }

    pub fn add_product(&mut self, product: Option<&CatalogProduct>) -> Option<usize> {
        let source = self.price_source.clone();
        self.lines.add_line(product, &source)
    }

    pub fn total_sum(&self) -> Money {
        self.lines.total_sum()
    }

    /// First blocking problem, if any.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.customer.is_none() {
            return Err(DraftError::MissingCustomer);
        }
        if self.organization.is_none() {
            return Err(DraftError::MissingOrganization);
        }
        if self.warehouse.is_none() {
            return Err(DraftError::MissingWarehouse);
        }
        if self.paybox.is_none() {
            return Err(DraftError::MissingPaybox);
        }
        if self.lines.is_empty() {
            return Err(DraftError::NoLines);
        }
        let total = self.total_sum();
        if self.paid < total {
            return Err(DraftError::InsufficientPayment {
                paid: self.paid,
                total,
            });
        }
        Ok(())
    }

    /// Validate and freeze the draft into a payload.
    ///
    /// `conduct` posts the document immediately instead of saving it unposted.
    pub fn snapshot(
        &self,
        conduct: bool,
        settings: &PayloadSettings,
        dated: DateTime<Utc>,
    ) -> Result<SalePayload, DraftError> {
        self.validate()?;

        let (Some(customer), Some(organization), Some(warehouse), Some(paybox)) = (
            self.customer.as_ref(),
            self.organization,
            self.warehouse,
            self.paybox,
        ) else {
            // validate() has already rejected every missing selection.
            return Err(DraftError::MissingCustomer);
        };

        Ok(SalePayload {
            operation: SALE_OPERATION.to_string(),
            tax_included: settings.tax_included,
            tax_active: settings.tax_active,
            goods: self
                .lines
                .lines()
                .iter()
                .map(|line| GoodsLine::from_line(line, settings))
                .collect(),
            loyality_card_id: customer.primary_loyalty_card(),
            warehouse,
            contragent: customer.id,
            paybox,
            organization,
            status: conduct,
            paid_rubles: self.paid,
            dated: dated.timestamp(),
        })
    }

    /// Start the next order: lines, customer and payment are cleared;
    /// organization, warehouse, cash account and price list stay selected.
    pub fn reset(&mut self) {
        self.id = DraftId::new();
        self.customer = None;
        self.paid = Money::ZERO;
        self.lines.clear();
    }
}
