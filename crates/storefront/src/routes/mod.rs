//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Health check
//!
//! # Cart (JSON, scoped to the session cookie)
//! GET    /cart                 - Cart lines and totals
//! DELETE /cart                 - Empty the cart
//! POST   /cart/add             - {id, quantity?} add a catalog product
//! POST   /cart/update          - {id, quantity} set quantity (<= 0 removes)
//! POST   /cart/increment       - {id}
//! POST   /cart/decrement       - {id}
//! POST   /cart/remove          - {id}
//! GET    /cart/count           - {count}
//!
//! # Catalog
//! GET    /products             - Product listing
//! GET    /products/{id}        - Product detail with related products
//! GET    /search?q=&category=  - Catalog search
//! ```

pub mod cart;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .nest("/products", product_routes())
        .route("/search", get(search::search))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use shopcart_store::Catalog;
    use tower::ServiceExt;

    use crate::app;
    use crate::config::StorefrontConfig;
    use crate::state::AppState;
    use crate::sweeper::sweep_idle_carts;

    fn test_app() -> axum::Router {
        app(AppState::new(StorefrontConfig::default(), Catalog::demo()))
    }

    async fn send(
        app: &axum::Router,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, set_cookie, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_cart_without_session() {
        let app = test_app();
        let (status, cookie, body) = send(&app, Method::GET, "/cart", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(cookie.is_none());
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["total"], "$0.00");
        assert_eq!(body["item_count"], 0);
    }

    #[tokio::test]
    async fn test_add_then_count_and_show() {
        let app = test_app();
        let (status, cookie, body) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "1", "quantity": 2})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "HAVIT HV-G92 Gamepad added to cart!");
        assert_eq!(body["cart"]["item_count"], 2);
        let cookie = cookie.unwrap();

        let (_, _, body) = send(&app, Method::GET, "/cart/count", Some(&cookie), None).await;
        assert_eq!(body["count"], 2);

        send(
            &app,
            Method::POST,
            "/cart/add",
            Some(&cookie),
            Some(json!({"id": 2})),
        )
        .await;
        let (_, _, body) = send(&app, Method::GET, "/cart", Some(&cookie), None).await;
        assert_eq!(body["subtotal"], "$320.00");
        assert_eq!(body["shipping"], "$10.00");
        assert_eq!(body["total"], "$330.00");
        assert_eq!(body["items"][1]["line_total"], "$80.00");
    }

    #[tokio::test]
    async fn test_add_clamps_quantity() {
        let app = test_app();
        let (_, _, body) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "3", "quantity": 50})),
        )
        .await;
        assert_eq!(body["cart"]["items"][0]["quantity"], 10);

        let (_, _, body) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "3", "quantity": "abc"})),
        )
        .await;
        assert_eq!(body["cart"]["items"][0]["quantity"], 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let app = test_app();
        let (status, _, body) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "999"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: product 999");
    }

    #[tokio::test]
    async fn test_update_remove_and_clear() {
        let app = test_app();
        let (_, cookie, _) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "1"})),
        )
        .await;
        let cookie = cookie.unwrap();
        send(
            &app,
            Method::POST,
            "/cart/add",
            Some(&cookie),
            Some(json!({"id": "2"})),
        )
        .await;

        let (_, _, body) = send(
            &app,
            Method::POST,
            "/cart/update",
            Some(&cookie),
            Some(json!({"id": "1", "quantity": 4})),
        )
        .await;
        assert_eq!(body["cart"]["item_count"], 5);
        assert!(body.get("message").is_none());

        let (_, _, body) = send(
            &app,
            Method::POST,
            "/cart/increment",
            Some(&cookie),
            Some(json!({"id": "2"})),
        )
        .await;
        assert_eq!(body["cart"]["items"][1]["quantity"], 2);

        let (_, _, body) = send(
            &app,
            Method::POST,
            "/cart/remove",
            Some(&cookie),
            Some(json!({"id": "2"})),
        )
        .await;
        assert_eq!(body["message"], "AK-900 Wired Keyboard removed from cart!");
        assert_eq!(body["cart"]["item_count"], 4);

        let (status, _, body) = send(&app, Method::DELETE, "/cart", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart"]["item_count"], 0);

        let (_, _, body) = send(&app, Method::GET, "/cart/count", Some(&cookie), None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_clear_without_session_creates_nothing() {
        let app = test_app();
        let (status, cookie, body) = send(&app, Method::DELETE, "/cart", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(cookie.is_none());
        assert_eq!(body["cart"]["items"], json!([]));
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_abandoned_session_carts_are_swept() {
        let config = StorefrontConfig {
            session_expiry: Duration::from_millis(30),
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, Catalog::demo());
        let app = app(state.clone());

        for _ in 0..3 {
            let (status, cookie, _) = send(
                &app,
                Method::POST,
                "/cart/add",
                None,
                Some(json!({"id": "1"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert!(cookie.is_some());
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(sweep_idle_carts(&state).await, 3);
        assert_eq!(sweep_idle_carts(&state).await, 0);
    }

    #[tokio::test]
    async fn test_sessions_have_separate_carts() {
        let app = test_app();
        let (_, first, _) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "1"})),
        )
        .await;
        let (_, second, _) = send(
            &app,
            Method::POST,
            "/cart/add",
            None,
            Some(json!({"id": "2", "quantity": 3})),
        )
        .await;

        let (_, _, body) = send(&app, Method::GET, "/cart/count", first.as_deref(), None).await;
        assert_eq!(body["count"], 1);
        let (_, _, body) = send(&app, Method::GET, "/cart/count", second.as_deref(), None).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_invalid_body_rejected() {
        let app = test_app();
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/cart/update",
            None,
            Some(json!({"id": "1"})),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_product_detail_and_related() {
        let app = test_app();
        let (status, _, body) = send(&app, Method::GET, "/products/2", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["title"], "AK-900 Wired Keyboard");
        assert_eq!(body["product"]["display_price"], "$80.00");
        let related: Vec<_> = body["related"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(related, ["1", "3", "4", "5"]);

        let (status, _, _) = send(&app, Method::GET, "/products/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_listing() {
        let app = test_app();
        let (_, _, body) = send(&app, Method::GET, "/products", None, None).await;
        assert_eq!(body["products"].as_array().unwrap().len(), 8);
        assert_eq!(body["categories"][0], "Clothing");
    }

    #[tokio::test]
    async fn test_search() {
        let app = test_app();
        let (_, _, body) = send(
            &app,
            Method::GET,
            "/search?q=chair&category=all",
            None,
            None,
        )
        .await;
        assert_eq!(body["active"], true);
        assert_eq!(body["results"][0]["id"], "4");

        let (_, _, body) = send(&app, Method::GET, "/search?q=c", None, None).await;
        assert_eq!(body["active"], false);
        assert_eq!(body["results"], json!([]));
    }
}
