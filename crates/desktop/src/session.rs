//! One operator session of the order form.
//!
//! [`OrderForm`] owns the selectors, the loaded reference data and the draft,
//! and is the only place that talks to the [`CrmApi`]. All state changes happen
//! on the caller's task; the only awaits are network calls.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;

use crmdesk_catalog::{
    CatalogProduct, Customer, CustomerQuery, NameField, Organization, Paybox, PriceSource,
    PriceType, ReferenceKind, ReferenceRecord, Warehouse,
};
use crmdesk_client::{ApiError, AuthError, AuthToken, CrmApi, SubmissionReceipt};
use crmdesk_sales::{DraftError, LineError, LineField, OrderDraft, OrderLine};
use crmdesk_select::{Autocomplete, AutocompleteConfig, ResultsView, SearchRequest, entity_key};

use crate::notice::Notice;
use crate::reference::{LoadReport, ReferenceData};
use crate::settings::FormSettings;

/// The six selectors on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Picker {
    Organization,
    Warehouse,
    Paybox,
    PriceType,
    Product,
    Customer,
}

impl Picker {
    pub const ALL: [Picker; 6] = [
        Picker::Organization,
        Picker::Warehouse,
        Picker::Paybox,
        Picker::PriceType,
        Picker::Product,
        Picker::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Picker::Organization => "organization",
            Picker::Warehouse => "warehouse",
            Picker::Paybox => "cash account",
            Picker::PriceType => "price type",
            Picker::Product => "product",
            Picker::Customer => "customer",
        }
    }
}

impl core::fmt::Display for Picker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown field {0:?}")]
pub struct UnknownPicker(pub String);

impl FromStr for Picker {
    type Err = UnknownPicker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "org" | "organization" => Ok(Picker::Organization),
            "wh" | "warehouse" => Ok(Picker::Warehouse),
            "cash" | "paybox" => Ok(Picker::Paybox),
            "price" | "pricetype" | "price_type" => Ok(Picker::PriceType),
            "product" | "item" => Ok(Picker::Product),
            "customer" | "client" => Ok(Picker::Customer),
            other => Err(UnknownPicker(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("sign in first")]
pub struct NotAuthenticated;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error(transparent)]
    Missing(#[from] AuthError),
    #[error("the server rejected the token; check it and try again")]
    Rejected,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticated),
    #[error(transparent)]
    Invalid(#[from] DraftError),
    #[error("submission failed: {0}")]
    Api(#[from] ApiError),
}

type Outbox = Rc<RefCell<Vec<SearchRequest>>>;

// Runs `$body` with `$sel` bound to the selector behind `$picker`.
macro_rules! dispatch {
    (&mut $form:ident, $picker:expr, |$sel:ident| $body:expr) => {
        match $picker {
            Picker::Organization => {
                let $sel = &mut $form.organizations;
                $body
            }
            Picker::Warehouse => {
                let $sel = &mut $form.warehouses;
                $body
            }
            Picker::Paybox => {
                let $sel = &mut $form.payboxes;
                $body
            }
            Picker::PriceType => {
                let $sel = &mut $form.price_types;
                $body
            }
            Picker::Product => {
                let $sel = &mut $form.products;
                $body
            }
            Picker::Customer => {
                let $sel = &mut $form.customers;
                $body
            }
        }
    };
    (&$form:ident, $picker:expr, |$sel:ident| $body:expr) => {
        match $picker {
            Picker::Organization => {
                let $sel = &$form.organizations;
                $body
            }
            Picker::Warehouse => {
                let $sel = &$form.warehouses;
                $body
            }
            Picker::Paybox => {
                let $sel = &$form.payboxes;
                $body
            }
            Picker::PriceType => {
                let $sel = &$form.price_types;
                $body
            }
            Picker::Product => {
                let $sel = &$form.products;
                $body
            }
            Picker::Customer => {
                let $sel = &$form.customers;
                $body
            }
        }
    };
}

fn reference_picker<R: ReferenceRecord>(
    order: Vec<NameField>,
    config: AutocompleteConfig,
) -> Autocomplete<R> {
    Autocomplete::new(move |record: &R| record.names().first_of(&order).map(str::to_string))
        .with_key(entity_key::<R>)
        .with_config(config)
}

fn customer_label(customer: &Customer) -> Option<String> {
    let name = customer.names.first_of(&NameField::DEFAULT_ORDER);
    let phone = customer
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    match (name, phone) {
        (Some(name), Some(phone)) => Some(format!("{name} ({phone})")),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(phone)) => Some(phone.to_string()),
        (None, None) => None,
    }
}

pub struct OrderForm<A> {
    api: A,
    settings: FormSettings,
    token: Option<AuthToken>,
    reference: ReferenceData,
    organizations: Autocomplete<Organization>,
    warehouses: Autocomplete<Warehouse>,
    payboxes: Autocomplete<Paybox>,
    price_types: Autocomplete<PriceType>,
    products: Autocomplete<CatalogProduct>,
    customers: Autocomplete<Customer>,
    customer_searches: Outbox,
    draft: OrderDraft,
    notices: Vec<Notice>,
}

impl<A> core::fmt::Debug for OrderForm<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderForm")
            .field("authenticated", &self.token.is_some())
            .field("draft", &self.draft)
            .field("notices", &self.notices.len())
            .finish()
    }
}

impl<A: CrmApi> OrderForm<A> {
    pub fn new(api: A, settings: FormSettings) -> Self {
        let config = AutocompleteConfig {
            max_items: settings.max_items,
            ..AutocompleteConfig::default()
        };
        let names = NameField::DEFAULT_ORDER.to_vec();

        let customer_searches: Outbox = Rc::default();
        let sink = Rc::clone(&customer_searches);
        let customers = Autocomplete::new(customer_label)
            .with_key(entity_key::<Customer>)
            .with_config(config.clone())
            .with_search(move |request| sink.borrow_mut().push(request));

        Self {
            organizations: reference_picker(settings.organization_names.clone(), config.clone()),
            warehouses: reference_picker(names.clone(), config.clone()),
            payboxes: reference_picker(names.clone(), config.clone()),
            price_types: reference_picker(names, config.clone()),
            products: reference_picker(
                settings.lines.name_order.clone(),
                AutocompleteConfig {
                    clear_on_select: true,
                    ..config
                },
            ),
            customers,
            customer_searches,
            draft: OrderDraft::new(settings.lines.clone()),
            api,
            settings,
            token: None,
            reference: ReferenceData::default(),
            notices: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Check the token with the server and keep it for the session.
    pub async fn authenticate(&mut self, raw: &str) -> Result<(), AuthFailure> {
        let token = AuthToken::new(raw)?;
        if !self.api.validate_token(&token).await {
            return Err(AuthFailure::Rejected);
        }
        tracing::info!("signed in");
        self.token = Some(token);
        Ok(())
    }

    /// Fetch all five reference lists at once.
    ///
    /// A list that fails is left empty; the failures are returned and also
    /// summarized in a single notice.
    pub async fn load_reference_data(&mut self) -> Result<LoadReport, NotAuthenticated> {
        let token = self.token.clone().ok_or(NotAuthenticated)?;
        let api = &self.api;
        let (organizations, warehouses, payboxes, price_types, products) = tokio::join!(
            api.try_list_reference_data::<Organization>(&token),
            api.try_list_reference_data::<Warehouse>(&token),
            api.try_list_reference_data::<Paybox>(&token),
            api.try_list_reference_data::<PriceType>(&token),
            api.try_list_reference_data::<CatalogProduct>(&token),
        );

        let mut report = LoadReport::default();
        let data = ReferenceData {
            organizations: report.record(ReferenceKind::Organizations, organizations),
            warehouses: report.record(ReferenceKind::Warehouses, warehouses),
            payboxes: report.record(ReferenceKind::Payboxes, payboxes),
            price_types: report.record(ReferenceKind::PriceTypes, price_types),
            products: report.record(ReferenceKind::Nomenclature, products),
        };

        self.organizations.set_candidates(data.organizations.clone());
        self.warehouses.set_candidates(data.warehouses.clone());
        self.payboxes.set_candidates(data.payboxes.clone());
        self.price_types.set_candidates(data.price_types.clone());
        self.products.set_candidates(data.products.clone());

        tracing::info!(
            organizations = data.organizations.len(),
            warehouses = data.warehouses.len(),
            payboxes = data.payboxes.len(),
            price_types = data.price_types.len(),
            products = data.products.len(),
            failed = report.failures.len(),
            "reference data loaded"
        );
        self.reference = data;

        if let Some(summary) = report.summary() {
            self.notices.push(Notice::error(summary));
        }
        Ok(report)
    }

    /// Keystroke in a selector. Customer searches are queued, see
    /// [`run_pending_searches`](Self::run_pending_searches).
    pub fn input(&mut self, picker: Picker, text: &str) {
        dispatch!(&mut self, picker, |sel| sel.input(text))
    }

    pub fn focus(&mut self, picker: Picker) {
        dispatch!(&mut self, picker, |sel| sel.focus())
    }

    pub fn close(&mut self, picker: Picker) {
        dispatch!(&mut self, picker, |sel| sel.close())
    }

    pub fn view(&self, picker: Picker) -> ResultsView {
        dispatch!(&self, picker, |sel| sel.view())
    }

    pub fn text(&self, picker: Picker) -> &str {
        dispatch!(&self, picker, |sel| sel.text())
    }

    pub fn selected_label(&self, picker: Picker) -> Option<String> {
        dispatch!(&self, picker, |sel| sel.selected().map(|item| sel.label_of(item)))
    }

    /// Keystroke followed by any search it triggered.
    pub async fn type_into(&mut self, picker: Picker, text: &str) {
        self.input(picker, text);
        self.run_pending_searches().await;
    }

    /// Focus followed by any search it triggered.
    pub async fn open(&mut self, picker: Picker) {
        self.focus(picker);
        self.run_pending_searches().await;
    }

    pub fn pending_searches(&self) -> usize {
        self.customer_searches.borrow().len()
    }

    /// Send queued customer searches in issue order.
    ///
    /// Results land only if they answer the latest search. A failed latest
    /// search empties the list and leaves a notice. Returns how many result
    /// sets were applied.
    pub async fn run_pending_searches(&mut self) -> usize {
        let requests: Vec<SearchRequest> = self.customer_searches.borrow_mut().drain(..).collect();
        if requests.is_empty() {
            return 0;
        }
        let Some(token) = self.token.clone() else {
            tracing::debug!(dropped = requests.len(), "customer search before sign-in");
            return 0;
        };

        let mut applied = 0;
        for request in requests {
            let query = CustomerQuery::parse(&request.query);
            match self.api.search_customers(&query, &token).await {
                Ok(found) => {
                    if self.customers.deliver(request.ticket, found) {
                        applied += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "customer search failed");
                    if self.customers.deliver(request.ticket, Vec::new()) {
                        self.notices
                            .push(Notice::warning(format!("Customer search failed: {err}")));
                    }
                }
            }
        }
        applied
    }

    /// Choose row `position` of a selector's current view and apply it to the
    /// draft. Returns the chosen item's label.
    pub fn pick(&mut self, picker: Picker, position: usize) -> Option<String> {
        match picker {
            Picker::Organization => {
                let org = self.organizations.select_row(position)?;
                self.draft.set_organization(Some(org.id));
                Some(self.organizations.label_of(&org))
            }
            Picker::Warehouse => {
                let warehouse = self.warehouses.select_row(position)?;
                self.draft.set_warehouse(Some(warehouse.id));
                Some(self.warehouses.label_of(&warehouse))
            }
            Picker::Paybox => {
                let paybox = self.payboxes.select_row(position)?;
                self.draft.set_paybox(Some(paybox.id));
                Some(self.payboxes.label_of(&paybox))
            }
            Picker::PriceType => {
                let price_type = self.price_types.select_row(position)?;
                let source = match price_type.names.first_of(&NameField::DEFAULT_ORDER) {
                    Some(name) => PriceSource::PriceType(name.to_string()),
                    None => PriceSource::FirstAvailable,
                };
                self.draft.set_price_source(source);
                Some(self.price_types.label_of(&price_type))
            }
            Picker::Product => {
                let product = self.products.select_row(position)?;
                let label = self.products.label_of(&product);
                if self.draft.add_product(Some(&product)).is_none() {
                    self.notices
                        .push(Notice::warning(format!("Could not add {label}")));
                }
                Some(label)
            }
            Picker::Customer => {
                let customer = self.customers.select_row(position)?;
                let label = self.customers.label_of(&customer);
                self.draft.set_customer(Some(customer));
                Some(label)
            }
        }
    }

    pub fn update_line(
        &mut self,
        index: usize,
        field: LineField,
        value: Decimal,
    ) -> Result<&OrderLine, LineError> {
        self.draft.lines_mut().update_line(index, field, value)
    }

    pub fn remove_line(&mut self, index: usize) -> Result<OrderLine, LineError> {
        self.draft.lines_mut().remove_line(index)
    }

    pub fn set_paid_text(&mut self, text: &str) {
        self.draft.set_paid_text(text);
    }

    /// Validate, then post the document. A rejected draft never reaches the
    /// network. On success the draft starts over for the next order.
    pub async fn submit(&mut self, conduct: bool) -> Result<SubmissionReceipt, SubmitError> {
        let payload = match self.draft.snapshot(conduct, &self.settings.payload, Utc::now()) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::info!(draft = %self.draft.id(), reason = %err, "submission blocked");
                return Err(err.into());
            }
        };
        let token = self.token.clone().ok_or(NotAuthenticated)?;

        let receipt = match self.api.submit_order(&payload, &token).await {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::warn!(draft = %self.draft.id(), status = err.status(), error = %err, "submission failed");
                return Err(err.into());
            }
        };

        tracing::info!(draft = %self.draft.id(), conduct, "order submitted");
        self.notices.push(Notice::info(if conduct {
            "Order created and conducted"
        } else {
            "Draft saved"
        }));
        self.draft.reset();
        self.customers.clear();
        self.products.clear();
        Ok(receipt)
    }
}
