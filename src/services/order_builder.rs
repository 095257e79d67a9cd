//! Order composition engine.
//!
//! Owns the working order's line state and every derived quantity. The
//! engine never fetches anything: catalog records enter only as read-only
//! inputs to [`OrderBuilder::add_product`], and submission is performed by
//! the caller from the payload this engine builds.

use crate::error::AppError;
use crate::models::{DraftStatus, OrderLine, OrderTotals, Product, SubmissionPayload};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Engine-level contract violations. Reported synchronously as part of the
/// failing operation's result; line state is never left corrupted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("no customer selected for submission")]
    MissingCustomer,

    #[error("quantity must be a positive integer, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    #[error("discount rate must be between 0 and 100, got {rate}")]
    InvalidDiscountRate { rate: u32 },

    #[error("a submission is already in flight for this order")]
    SubmissionInFlight,
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::SubmissionInFlight => AppError::Conflict(anyhow::Error::new(err)),
            _ => AppError::BadRequest(anyhow::Error::new(err)),
        }
    }
}

/// In-memory working order: one line per distinct product, insertion order
/// preserved, totals derived from scratch on every read.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    lines: Vec<OrderLine>,
    discount_rate: u32,
    total_discount_amount: Decimal,
    status: DraftStatus,
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBuilder {
    /// Empty order in the composing state.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            discount_rate: 0,
            total_discount_amount: Decimal::ZERO,
            status: DraftStatus::Composing,
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn discount_rate(&self) -> u32 {
        self.discount_rate
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    /// Add a catalog product to the order.
    ///
    /// An already-present product increments its line's quantity; the price
    /// snapshot taken at first addition is left untouched. A new product
    /// appends a quantity-1 line at the end, so display order is first-add
    /// order.
    pub fn add_product(&mut self, product: &Product) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.product_id)
        {
            line.quantity += 1;
            return;
        }

        self.lines.push(OrderLine {
            product_id: product.product_id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            original_price: product.unit_price,
            quantity: 1,
            discounted_price: None,
        });
    }

    /// Remove the line for `product_id`. No-op when absent.
    pub fn remove_product(&mut self, product_id: Uuid) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Set the quantity on the line for `product_id`.
    ///
    /// A quantity of zero is refused and the line is left unchanged; an
    /// unknown product id is a no-op.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: u32) -> Result<(), OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Apply a percentage discount to every current line.
    ///
    /// The discount total is summed from the lines as they stand before the
    /// discounted prices are written; summing afterwards would double-apply
    /// the rate. `original_price` is fixed at add time, so re-applying the
    /// same rate is idempotent, and the total is recomputed fresh on every
    /// call rather than accumulated.
    pub fn apply_discount(&mut self, rate: u32) -> Result<(), OrderError> {
        if rate > 100 {
            return Err(OrderError::InvalidDiscountRate { rate });
        }

        let rate_fraction = Decimal::from(rate) / Decimal::from(100u32);

        let discount_total: Decimal = self
            .lines
            .iter()
            .map(|line| line.original_price * rate_fraction * Decimal::from(line.quantity))
            .sum();

        for line in &mut self.lines {
            line.discounted_price = Some(line.original_price * (Decimal::ONE - rate_fraction));
        }

        self.discount_rate = rate;
        self.total_discount_amount = discount_total;

        Ok(())
    }

    /// Derive the order aggregates from the current line state.
    pub fn totals(&self) -> OrderTotals {
        let total_quantity = self.lines.iter().map(|line| line.quantity).sum();
        let total_amount = self
            .lines
            .iter()
            .map(|line| line.effective_price() * Decimal::from(line.quantity))
            .sum();

        OrderTotals {
            total_quantity,
            total_amount,
            total_discount_amount: self.total_discount_amount,
            discount_rate: self.discount_rate,
        }
    }

    /// Build the immutable snapshot handed to the submission collaborator.
    ///
    /// Fails with [`OrderError::MissingCustomer`] when no customer is
    /// selected, before any submission state change.
    pub fn build_payload(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<SubmissionPayload, OrderError> {
        let customer = customer_id.ok_or(OrderError::MissingCustomer)?;

        Ok(SubmissionPayload {
            customer,
            products: self.lines.clone(),
            discount: self.discount_rate,
        })
    }

    /// Transition to the submitting state. Refused while a submission is
    /// already outstanding.
    pub fn begin_submission(&mut self) -> Result<(), OrderError> {
        if self.status == DraftStatus::Submitting {
            return Err(OrderError::SubmissionInFlight);
        }
        self.status = DraftStatus::Submitting;
        Ok(())
    }

    /// Record the submission outcome and return to composing. Success
    /// resets the order; failure keeps the lines intact for a retry.
    pub fn finish_submission(&mut self, success: bool) {
        if success {
            self.reset();
        } else {
            self.status = DraftStatus::Composing;
        }
    }

    /// Return to the initial state: empty lines, no discount, composing.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.discount_rate = 0;
        self.total_discount_amount = Decimal::ZERO;
        self.status = DraftStatus::Composing;
    }
}

/// One composition session: an order being put together on the screen.
/// Lives in process memory only and is discarded on restart or deletion.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub draft_id: Uuid,
    pub created_utc: DateTime<Utc>,
    pub order: OrderBuilder,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self {
            draft_id: Uuid::new_v4(),
            created_utc: Utc::now(),
            order: OrderBuilder::new(),
        }
    }
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, unit_price: u32) -> Product {
        Product {
            product_id: Uuid::new_v4(),
            name: name.to_string(),
            unit_price: Decimal::from(unit_price),
            unit_label: "each".to_string(),
            stock_count: 100,
            category: "test".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn duplicate_add_increments_quantity() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);

        order.add_product(&widget);
        order.add_product(&widget);

        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].quantity, 2);
    }

    #[test]
    fn distinct_products_create_distinct_lines_in_add_order() {
        let mut order = OrderBuilder::new();
        let first = product("First", 10);
        let second = product("Second", 20);

        order.add_product(&first);
        order.add_product(&second);
        order.add_product(&first);

        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.lines()[0].product_id, first.product_id);
        assert_eq!(order.lines()[1].product_id, second.product_id);
        assert_eq!(order.lines()[0].quantity, 2);
        assert_eq!(order.lines()[1].quantity, 1);
    }

    #[test]
    fn remove_unknown_product_is_noop() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        order.remove_product(Uuid::new_v4());

        assert_eq!(order.lines().len(), 1);
    }

    #[test]
    fn remove_product_drops_its_line() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);
        order.add_product(&widget);

        order.remove_product(widget.product_id);

        assert!(order.lines().is_empty());
    }

    #[test]
    fn set_quantity_rejects_zero() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);
        order.add_product(&widget);

        let result = order.set_quantity(widget.product_id, 0);

        assert_eq!(result, Err(OrderError::InvalidQuantity { quantity: 0 }));
        assert_eq!(order.lines()[0].quantity, 1);
    }

    #[test]
    fn set_quantity_on_unknown_product_is_noop() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        order.set_quantity(Uuid::new_v4(), 5).unwrap();

        assert_eq!(order.lines()[0].quantity, 1);
    }

    #[test]
    fn discount_derives_price_and_total_from_pre_discount_state() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);
        order.add_product(&widget);
        order.add_product(&widget);

        order.apply_discount(10).unwrap();

        let line = &order.lines()[0];
        assert_eq!(line.discounted_price.unwrap(), Decimal::from(90));
        assert_eq!(line.original_price, Decimal::from(100));
        assert_eq!(order.totals().total_discount_amount, Decimal::from(20));
    }

    #[test]
    fn zero_discount_keeps_original_prices() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        order.apply_discount(0).unwrap();

        let line = &order.lines()[0];
        assert_eq!(line.discounted_price.unwrap(), line.original_price);
        assert_eq!(order.totals().total_discount_amount, Decimal::ZERO);
    }

    #[test]
    fn discount_is_idempotent_across_repeated_application() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);
        order.add_product(&widget);
        order.add_product(&widget);

        order.apply_discount(10).unwrap();
        let first_price = order.lines()[0].discounted_price.unwrap();
        let first_total = order.totals().total_discount_amount;

        order.apply_discount(10).unwrap();

        assert_eq!(order.lines()[0].discounted_price.unwrap(), first_price);
        assert_eq!(order.totals().total_discount_amount, first_total);
    }

    #[test]
    fn discount_rate_above_hundred_is_rejected() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        let result = order.apply_discount(101);

        assert_eq!(result, Err(OrderError::InvalidDiscountRate { rate: 101 }));
        assert!(order.lines()[0].discounted_price.is_none());
        assert_eq!(order.discount_rate(), 0);
    }

    #[test]
    fn totals_reflect_discounted_prices() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);
        let gadget = product("Gadget", 200);
        order.add_product(&widget);
        order.add_product(&widget);
        order.add_product(&gadget);

        order.apply_discount(10).unwrap();

        let totals = order.totals();
        assert_eq!(totals.total_quantity, 3);
        // 90 * 2 + 180 * 1
        assert_eq!(totals.total_amount, Decimal::from(360));
    }

    #[test]
    fn totals_recompute_after_every_mutation() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 50);
        order.add_product(&widget);
        assert_eq!(order.totals().total_amount, Decimal::from(50));

        order.set_quantity(widget.product_id, 4).unwrap();
        assert_eq!(order.totals().total_quantity, 4);
        assert_eq!(order.totals().total_amount, Decimal::from(200));

        order.remove_product(widget.product_id);
        assert_eq!(order.totals().total_amount, Decimal::ZERO);
    }

    #[test]
    fn payload_requires_a_customer() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        assert_eq!(order.build_payload(None), Err(OrderError::MissingCustomer));
        assert_eq!(order.status(), DraftStatus::Composing);
    }

    #[test]
    fn payload_round_trips_through_json() {
        let mut order = OrderBuilder::new();
        let widget = product("Widget", 100);
        order.add_product(&widget);
        order.add_product(&widget);
        order.apply_discount(25).unwrap();

        let customer_id = Uuid::new_v4();
        let payload = order.build_payload(Some(customer_id)).unwrap();

        let json = serde_json::to_string(&payload).unwrap();
        let parsed: SubmissionPayload = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.customer, customer_id);
        assert_eq!(parsed.discount, 25);
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.products[0].product_id, widget.product_id);
        assert_eq!(parsed.products[0].quantity, 2);
        assert_eq!(parsed.products[0].discounted_price, Some(Decimal::from(75)));
    }

    #[test]
    fn second_submission_is_refused_while_one_is_in_flight() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        order.begin_submission().unwrap();

        assert_eq!(order.begin_submission(), Err(OrderError::SubmissionInFlight));
    }

    #[test]
    fn successful_submission_resets_the_order() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));
        order.apply_discount(10).unwrap();

        order.begin_submission().unwrap();
        order.finish_submission(true);

        assert!(order.lines().is_empty());
        assert_eq!(order.discount_rate(), 0);
        assert_eq!(order.status(), DraftStatus::Composing);
        assert_eq!(order.totals().total_discount_amount, Decimal::ZERO);
    }

    #[test]
    fn failed_submission_keeps_lines_for_retry() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("Widget", 100));

        order.begin_submission().unwrap();
        order.finish_submission(false);

        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.status(), DraftStatus::Composing);
    }
}
