//! Wire shape of a sales document (`docs_sales`).

use serde::{Deserialize, Serialize};

use crmdesk_core::{Money, Quantity, RemoteId};

use crate::line::OrderLine;

/// Operation name of an order document.
pub const SALE_OPERATION: &str = "Заказ";

/// Fixed document attributes that are configuration rather than operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSettings {
    /// Unit-of-measure id sent for every line.
    pub unit_id: i64,
    pub tax_included: bool,
    pub tax_active: bool,
}

impl Default for PayloadSettings {
    fn default() -> Self {
        Self {
            unit_id: 116,
            tax_included: true,
            tax_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsLine {
    pub price: Money,
    pub quantity: Quantity,
    pub unit: i64,
    pub discount: Money,
    pub sum_discounted: Money,
    pub nomenclature: RemoteId,
}

impl GoodsLine {
    pub fn from_line(line: &OrderLine, settings: &PayloadSettings) -> Self {
        Self {
            price: line.unit_price(),
            quantity: line.quantity(),
            unit: settings.unit_id,
            discount: Money::ZERO,
            sum_discounted: line.line_sum(),
            nomenclature: line.product_ref(),
        }
    }
}

/// Immutable snapshot of a validated draft, as posted to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePayload {
    pub operation: String,
    pub tax_included: bool,
    pub tax_active: bool,
    pub goods: Vec<GoodsLine>,
    /// Spelling is the remote field name.
    pub loyality_card_id: Option<RemoteId>,
    pub warehouse: RemoteId,
    pub contragent: RemoteId,
    pub paybox: RemoteId,
    pub organization: RemoteId,
    /// `true` posts ("conducts") the document; `false` saves it unposted.
    pub status: bool,
    pub paid_rubles: Money,
    /// Unix seconds.
    pub dated: i64,
}

impl SalePayload {
    pub fn total(&self) -> Money {
        self.goods.iter().map(|g| g.sum_discounted).sum()
    }
}
