//! Cart totals for display: subtotal, shipping, grand total.

use rust_decimal::Decimal;
use serde::Serialize;

use shopcart_core::Cart;

/// Flat shipping charged on any non-empty order unless configured otherwise.
pub const DEFAULT_SHIPPING_FLAT_RATE: Decimal = Decimal::TEN;

/// How shipping is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Charged once when the subtotal is above zero.
    pub flat_rate: Decimal,
}

impl ShippingPolicy {
    #[must_use]
    pub const fn flat(flat_rate: Decimal) -> Self {
        Self { flat_rate }
    }

    /// Shipping for a given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > Decimal::ZERO {
            self.flat_rate
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::flat(DEFAULT_SHIPPING_FLAT_RATE)
    }
}

/// Totals shown under the cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}

impl CartSummary {
    #[must_use]
    pub fn new(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.subtotal();
        let shipping = policy.shipping_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
            item_count: cart.item_count(),
        }
    }
}

/// Format an amount as dollars with two decimal places.
///
/// ```
/// use rust_decimal::Decimal;
/// use shopcart_store::format_money;
///
/// assert_eq!(format_money(Decimal::from(320)), "$320.00");
/// assert_eq!(format_money(Decimal::new(19999, 3)), "$20.00");
/// ```
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopcart_core::{NewLineItem, Price, ProductId, Quantity};

    use super::*;

    fn cart_with(lines: &[(&str, &str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, price, quantity) in lines {
            cart.add(
                NewLineItem {
                    id: ProductId::new(*id),
                    title: (*id).to_string(),
                    price: Price::new(*price),
                    image: None,
                },
                Quantity::new(*quantity).unwrap(),
            );
        }
        cart
    }

    #[test]
    fn test_summary_with_items() {
        let cart = cart_with(&[("1", "120", 2), ("2", "80", 1)]);
        let summary = CartSummary::new(&cart, &ShippingPolicy::default());

        assert_eq!(summary.subtotal, Decimal::from(320));
        assert_eq!(summary.shipping, Decimal::from(10));
        assert_eq!(summary.total, Decimal::from(330));
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_empty_cart_ships_free() {
        let summary = CartSummary::new(&Cart::new(), &ShippingPolicy::default());

        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn test_zero_priced_items_ship_free() {
        let cart = cart_with(&[("1", "free", 3)]);
        let summary = CartSummary::new(&cart, &ShippingPolicy::default());

        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_custom_flat_rate() {
        let cart = cart_with(&[("1", "5", 1)]);
        let summary = CartSummary::new(&cart, &ShippingPolicy::flat(Decimal::new(495, 2)));

        assert_eq!(summary.total, Decimal::new(995, 2));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
        assert_eq!(format_money(Decimal::new(1999, 2)), "$19.99");
        assert_eq!(format_money(Decimal::new(5, 1)), "$0.50");
    }
}
