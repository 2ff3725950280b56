//! `shopcart cart ...` commands.

use std::io::Write;
use std::sync::Arc;

use tracing::info;

use shopcart_core::{Cart, ProductId, Quantity};
use shopcart_store::{
    CartStorage, CartStore, CartSummary, Catalog, RecordingListener, format_money,
};

use super::CommandError;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn write_cart(cart: &Cart, summary: &CartSummary, out: &mut impl Write) -> std::io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    for line in cart {
        writeln!(
            out,
            "{:>4} x {} [{}]  {} each  {}",
            line.quantity.get(),
            line.title,
            line.id,
            format_money(line.price.amount_or_zero()),
            format_money(line.line_total()),
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Subtotal: {}", format_money(summary.subtotal))?;
    writeln!(out, "Shipping: {}", format_money(summary.shipping))?;
    writeln!(out, "Total:    {}", format_money(summary.total))
}

/// Run a mutation and print its notification, if any.
fn with_notifications<S, F>(mut store: CartStore<S>, out: &mut impl Write, op: F) -> CommandResult
where
    S: CartStorage,
    F: FnOnce(&CartStore<S>) -> shopcart_store::Result<Cart>,
{
    let listener = Arc::new(RecordingListener::new());
    store.subscribe(listener.clone());

    let cart = op(&store)?;
    for message in listener.take_notifications() {
        writeln!(out, "{message}")?;
    }
    writeln!(out, "Cart now holds {} item(s).", cart.item_count())?;
    Ok(())
}

/// Print the cart.
pub fn show<S: CartStorage>(store: &CartStore<S>, out: &mut impl Write) -> CommandResult {
    let cart = store.get_cart();
    write_cart(&cart, &store.summarize(&cart), out)?;
    Ok(())
}

/// Add a catalog product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog or the cart cannot be saved.
pub fn add<S: CartStorage>(
    store: CartStore<S>,
    catalog: &Catalog,
    id: &str,
    quantity: Option<&str>,
    out: &mut impl Write,
) -> CommandResult {
    let id = ProductId::new(id);
    let product = catalog
        .get(&id)
        .ok_or_else(|| CommandError::UnknownProduct(id.clone()))?;
    let quantity = quantity.map_or(Quantity::ONE, Quantity::parse_lenient);

    info!(product_id = %id, %quantity, "Adding to cart");
    let item = product.to_line_item();
    with_notifications(store, out, |store| store.add_item(item, quantity))
}

/// Remove a line.
pub fn remove<S: CartStorage>(store: CartStore<S>, id: &str, out: &mut impl Write) -> CommandResult {
    let id = ProductId::new(id);
    with_notifications(store, out, |store| store.remove_item(&id))
}

/// Set a line's quantity.
pub fn update<S: CartStorage>(
    store: CartStore<S>,
    id: &str,
    quantity: i64,
    out: &mut impl Write,
) -> CommandResult {
    let id = ProductId::new(id);
    with_notifications(store, out, |store| store.update_quantity(&id, quantity))
}

/// Empty the cart.
pub fn clear<S: CartStorage>(store: &CartStore<S>, out: &mut impl Write) -> CommandResult {
    store.clear()?;
    writeln!(out, "Cart cleared.")?;
    Ok(())
}

/// Print the grand total, shipping included.
pub fn total<S: CartStorage>(store: &CartStore<S>, out: &mut impl Write) -> CommandResult {
    writeln!(out, "{}", format_money(store.summary().total))?;
    Ok(())
}

/// Print the unit count.
pub fn count<S: CartStorage>(store: &CartStore<S>, out: &mut impl Write) -> CommandResult {
    writeln!(out, "{}", store.item_count())?;
    Ok(())
}
