//! Cart route handlers.
//!
//! Each browser session owns one cart record. The record key is created on
//! the first mutation and kept in the session; reads before that see an empty
//! cart without creating anything.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use shopcart_core::{Cart, LineItem, ProductId, Quantity};
use shopcart_store::{CartStore, CartSummary, RecordingListener, format_money};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::{AppState, SharedStorage};

/// Session key holding the shopper's cart record key.
pub const CART_KEY_SESSION: &str = "cart_key";

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&LineItem> for CartLineView {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.id.clone(),
            title: line.title.clone(),
            price: format_money(line.price.amount_or_zero()),
            quantity: line.quantity.get(),
            line_total: format_money(line.line_total()),
            image: line.image.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, summary: &CartSummary) -> Self {
        Self {
            items: cart.iter().map(CartLineView::from).collect(),
            subtotal: format_money(summary.subtotal),
            shipping: format_money(summary.shipping),
            total: format_money(summary.total),
            item_count: summary.item_count,
        }
    }
}

/// Response to a cart mutation.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    /// Shopper-facing notification, e.g. "Gamepad added to cart!"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub id: ProductId,
    /// Coerced leniently: missing, non-numeric or non-positive means 1.
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub id: ProductId,
    pub quantity: i64,
}

/// Request naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub id: ProductId,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart record key from the session.
async fn get_cart_key(session: &Session) -> Result<Option<String>> {
    Ok(session.get::<String>(CART_KEY_SESSION).await?)
}

/// Get the cart record key, assigning a new one on first use.
async fn get_or_create_cart_key(session: &Session) -> Result<String> {
    if let Some(key) = get_cart_key(session).await? {
        return Ok(key);
    }

    let key = format!("cart:{}", Uuid::new_v4());
    session.insert(CART_KEY_SESSION, &key).await?;
    tracing::debug!(cart_key = %key, "Assigned cart to session");
    Ok(key)
}

fn empty_view(state: &AppState) -> CartView {
    let cart = Cart::new();
    CartView::new(&cart, &CartSummary::new(&cart, &state.shipping()))
}

/// Run one cart mutation for the session's cart.
async fn mutate<F>(state: &AppState, session: &Session, op: F) -> Result<Json<CartResponse>>
where
    F: FnOnce(&CartStore<SharedStorage>) -> shopcart_store::Result<Cart>,
{
    let key = get_or_create_cart_key(session).await?;
    let listener = Arc::new(RecordingListener::new());
    let mut store = state.cart_store(key);
    store.subscribe(listener.clone());

    let cart = {
        let _guard = state.lock_writes().await;
        op(&store)?
    };

    Ok(Json(CartResponse {
        cart: CartView::new(&cart, &store.summarize(&cart)),
        message: listener.take_notifications().pop(),
    }))
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the session's cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let view = match get_cart_key(&session).await? {
        Some(key) => {
            let store = state.cart_store(key);
            let cart = store.get_cart();
            CartView::new(&cart, &store.summarize(&cart))
        }
        None => empty_view(&state),
    };
    Ok(Json(view))
}

/// Add a catalog product to the cart.
///
/// The quantity is clamped to the configured maximum.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let product = state
        .catalog()
        .get(&request.id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.id)))?;

    let quantity = request
        .quantity
        .as_ref()
        .map_or(Quantity::ONE, Quantity::coerce)
        .clamp_to(state.max_add_quantity());

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", product.id.as_str())],
    );

    let item = product.to_line_item();
    mutate(&state, &session, |store| store.add_item(item, quantity)).await
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    mutate(&state, &session, |store| {
        store.update_quantity(&request.id, request.quantity)
    })
    .await
}

/// Increase a line's quantity by one.
#[instrument(skip(state, session))]
pub async fn increment(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<CartResponse>> {
    mutate(&state, &session, |store| store.increment(&request.id)).await
}

/// Decrease a line's quantity by one.
#[instrument(skip(state, session))]
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<CartResponse>> {
    mutate(&state, &session, |store| store.decrement(&request.id)).await
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<CartResponse>> {
    mutate(&state, &session, |store| store.remove_item(&request.id)).await
}

/// Empty the cart. A session without a cart is left untouched.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    if get_cart_key(&session).await?.is_none() {
        return Ok(Json(CartResponse {
            cart: empty_view(&state),
            message: None,
        }));
    }
    mutate(&state, &session, |store| store.clear().map(|()| Cart::new())).await
}

/// Total units in the cart.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CountResponse>> {
    let count = get_cart_key(&session)
        .await?
        .map_or(0, |key| state.cart_store(key).item_count());
    Ok(Json(CountResponse { count }))
}
