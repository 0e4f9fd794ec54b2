use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crmdesk_catalog::{CatalogProduct, NameField, PriceSource};
use crmdesk_core::{DomainError, Money, Quantity, RemoteId};

/// Order line: product, unit price, quantity and their product.
///
/// Fields are private so `line_sum == unit_price * quantity` cannot be broken
/// from outside; every mutation goes through [`LineItems::update_line`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    product_ref: RemoteId,
    display_name: String,
    unit_price: Money,
    quantity: Quantity,
    line_sum: Money,
}

impl OrderLine {
    pub fn new(
        product_ref: RemoteId,
        display_name: impl Into<String>,
        unit_price: Money,
        quantity: Quantity,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            product_ref,
            display_name: display_name.into(),
            unit_price,
            quantity,
            line_sum: unit_price.times(quantity)?,
        })
    }

    pub fn product_ref(&self) -> RemoteId {
        self.product_ref
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn line_sum(&self) -> Money {
        self.line_sum
    }
}

/// Editable numeric field of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    UnitPrice,
    Quantity,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("line {index} is out of range (order has {len} lines)")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// How new lines are seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDefaults {
    /// Quantity of a freshly added line. Defaults to 1.
    pub quantity: Quantity,
    /// Product name fields tried, in order, for the line's display name.
    pub name_order: Vec<NameField>,
}

impl Default for LineDefaults {
    fn default() -> Self {
        Self {
            quantity: Quantity::from_integer(1),
            name_order: NameField::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// The ordered line items of one draft and their running total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItems {
    lines: Vec<OrderLine>,
    defaults: LineDefaults,
}

impl LineItems {
    pub fn new(defaults: LineDefaults) -> Self {
        Self {
            lines: Vec::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &LineDefaults {
        &self.defaults
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OrderLine> {
        self.lines.get(index)
    }

    /// Append a line for `product`; returns its index.
    ///
    /// No-op (returns `None`) when there is no product.
    pub fn add_line(&mut self, product: Option<&CatalogProduct>, source: &PriceSource) -> Option<usize> {
        let product = product?;
        let name = product
            .names
            .first_of(&self.defaults.name_order)
            .unwrap_or_default();
        let unit_price = product.unit_price(source);

        match OrderLine::new(product.id, name, unit_price, self.defaults.quantity) {
            Ok(line) => {
                self.lines.push(line);
                Some(self.lines.len() - 1)
            }
            Err(err) => {
                tracing::warn!(product = %product.id, error = %err, "could not add order line");
                None
            }
        }
    }

    /// Set one field of the line at `index` and recompute its sum.
    ///
    /// On error the line is left untouched.
    pub fn update_line(
        &mut self,
        index: usize,
        field: LineField,
        value: Decimal,
    ) -> Result<&OrderLine, LineError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(LineError::OutOfRange { index, len })?;

        let (unit_price, quantity) = match field {
            LineField::UnitPrice => (Money::new(value)?, line.quantity),
            LineField::Quantity => (line.unit_price, Quantity::new(value)?),
        };
        let line_sum = unit_price.times(quantity)?;

        line.unit_price = unit_price;
        line.quantity = quantity;
        line.line_sum = line_sum;
        Ok(&*line)
    }

    /// Remove the line at `index`, keeping the others in order.
    pub fn remove_line(&mut self, index: usize) -> Result<OrderLine, LineError> {
        if index >= self.lines.len() {
            return Err(LineError::OutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ line sums.
    pub fn total_sum(&self) -> Money {
        self.lines.iter().map(OrderLine::line_sum).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn widget() -> CatalogProduct {
        CatalogProduct::new(1, "Widget").with_price(None, Decimal::from(10))
    }

    fn gadget() -> CatalogProduct {
        CatalogProduct::new(2, "Gadget").with_price(None, Decimal::from(15))
    }

    fn money(n: u32) -> Money {
        Money::from_integer(n)
    }

    #[test]
    fn add_then_set_quantity_recomputes_sum() {
        let mut items = LineItems::default();
        let idx = items.add_line(Some(&widget()), &PriceSource::FirstAvailable).unwrap();
        assert_eq!(idx, 0);

        let line = items
            .update_line(0, LineField::Quantity, Decimal::from(3))
            .unwrap()
            .clone();
        assert_eq!(line.product_ref(), RemoteId::new(1));
        assert_eq!(line.display_name(), "Widget");
        assert_eq!(line.unit_price(), money(10));
        assert_eq!(line.quantity(), Quantity::from_integer(3));
        assert_eq!(line.line_sum(), money(30));
        assert_eq!(items.total_sum(), money(30));
    }

    #[test]
    fn new_line_uses_default_quantity_of_one() {
        let mut items = LineItems::default();
        items.add_line(Some(&widget()), &PriceSource::FirstAvailable);
        let line = items.get(0).unwrap();
        assert_eq!(line.quantity(), Quantity::from_integer(1));
        assert_eq!(line.line_sum(), money(10));
    }

    #[test]
    fn default_quantity_is_configurable() {
        let mut items = LineItems::new(LineDefaults {
            quantity: Quantity::ZERO,
            ..LineDefaults::default()
        });
        items.add_line(Some(&widget()), &PriceSource::FirstAvailable);
        assert_eq!(items.get(0).unwrap().line_sum(), Money::ZERO);
    }

    #[test]
    fn absent_product_is_a_no_op() {
        let mut items = LineItems::default();
        assert_eq!(items.add_line(None, &PriceSource::FirstAvailable), None);
        assert!(items.is_empty());
    }

    #[test]
    fn product_without_prices_gets_zero_price() {
        let mut items = LineItems::default();
        items.add_line(Some(&CatalogProduct::new(5, "Free")), &PriceSource::FirstAvailable);
        assert_eq!(items.get(0).unwrap().unit_price(), Money::ZERO);
    }

    #[test]
    fn remove_keeps_remaining_order_and_total() {
        let mut items = LineItems::default();
        items.add_line(Some(&widget()), &PriceSource::FirstAvailable);
        items.add_line(Some(&gadget()), &PriceSource::FirstAvailable);
        items.update_line(0, LineField::Quantity, Decimal::from(3)).unwrap();
        items.update_line(1, LineField::Quantity, Decimal::from(3)).unwrap();
        assert_eq!(items.total_sum(), money(75));

        let removed = items.remove_line(0).unwrap();
        assert_eq!(removed.line_sum(), money(30));
        assert_eq!(items.len(), 1);
        assert_eq!(items.get(0).unwrap().line_sum(), money(45));
        assert_eq!(items.total_sum(), money(45));
    }

    #[test]
    fn out_of_range_index_fails() {
        let mut items = LineItems::default();
        items.add_line(Some(&widget()), &PriceSource::FirstAvailable);

        let err = items
            .update_line(1, LineField::UnitPrice, Decimal::from(1))
            .unwrap_err();
        assert_eq!(err, LineError::OutOfRange { index: 1, len: 1 });
        assert_eq!(
            items.remove_line(7).unwrap_err(),
            LineError::OutOfRange { index: 7, len: 1 }
        );
    }

    #[test]
    fn negative_value_is_rejected_and_line_unchanged() {
        let mut items = LineItems::default();
        items.add_line(Some(&widget()), &PriceSource::FirstAvailable);
        let before = items.get(0).unwrap().clone();

        let err = items
            .update_line(0, LineField::Quantity, Decimal::from(-2))
            .unwrap_err();
        assert!(matches!(err, LineError::Invalid(DomainError::Validation(_))));
        assert_eq!(items.get(0).unwrap(), &before);
    }

    #[test]
    fn price_edit_keeps_quantity() {
        let mut items = LineItems::default();
        items.add_line(Some(&widget()), &PriceSource::FirstAvailable);
        items.update_line(0, LineField::Quantity, Decimal::from(4)).unwrap();
        let line = items
            .update_line(0, LineField::UnitPrice, Decimal::new(125, 1))
            .unwrap();
        assert_eq!(line.quantity(), Quantity::from_integer(4));
        assert_eq!(line.line_sum(), money(50));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { price_cents: u32 },
        Update { index: usize, field: LineField, value_cents: u32 },
        Remove { index: usize },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..100_000).prop_map(|price_cents| Op::Add { price_cents }),
            (
                0usize..8,
                prop_oneof![Just(LineField::UnitPrice), Just(LineField::Quantity)],
                0u32..100_000
            )
                .prop_map(|(index, field, value_cents)| Op::Update { index, field, value_cents }),
            (0usize..8).prop_map(|index| Op::Remove { index }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any operation sequence each line sum equals price * quantity,
        /// and the total equals the sum of price * quantity over the remaining lines.
        #[test]
        fn sums_stay_consistent(ops in prop::collection::vec(op(), 0..40)) {
            let mut items = LineItems::default();
            for (n, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Add { price_cents } => {
                        let product = CatalogProduct::new(n as i64, format!("p{n}"))
                            .with_price(None, Decimal::new(i64::from(price_cents), 2));
                        items.add_line(Some(&product), &PriceSource::FirstAvailable);
                    }
                    Op::Update { index, field, value_cents } => {
                        let _ = items.update_line(index, field, Decimal::new(i64::from(value_cents), 2));
                    }
                    Op::Remove { index } => {
                        let _ = items.remove_line(index);
                    }
                }

                let mut expected = Decimal::ZERO;
                for line in items.lines() {
                    let product = line.unit_price().value() * line.quantity().value();
                    prop_assert_eq!(line.line_sum().value(), product);
                    expected += product;
                }
                prop_assert_eq!(items.total_sum().value(), expected);
            }
        }

        /// Property: removing a line then totalling equals filtering it out and summing.
        #[test]
        fn remove_matches_filter_then_sum(
            prices in prop::collection::vec(0u32..100_000, 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut items = LineItems::default();
            for (n, cents) in prices.iter().enumerate() {
                let product = CatalogProduct::new(n as i64, "p")
                    .with_price(None, Decimal::new(i64::from(*cents), 2));
                items.add_line(Some(&product), &PriceSource::FirstAvailable);
            }
            let index = pick.index(items.len());

            let expected: Money = items
                .lines()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, l)| l.line_sum())
                .sum();

            items.remove_line(index).unwrap();
            prop_assert_eq!(items.total_sum(), expected);
        }
    }
}
