//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                           - Home page
//!
//! # Auth (Google OAuth)
//! GET    /login/google               - Redirect to Google's consent page
//! GET    /auth/google                - OAuth callback; sets the access token cookie
//! GET    /verify-token               - Report authentication state
//! POST   /logout                     - Clear the access token cookie
//!
//! # Stores
//! POST   /stores                     - Register a store
//! GET    /stores                     - List the caller's stores
//! GET    /stores/{store_id}          - Store detail
//! PUT    /stores/{store_id}          - Update a store
//! DELETE /stores/{store_id}          - Delete a store and everything under it
//!
//! # Inventory
//! POST   /inventory                  - Stock a fruit in a store
//! GET    /inventory/store/{store_id} - List a store's inventory
//! GET    /inventory/{item_id}        - Inventory item detail
//! PUT    /inventory/{item_id}        - Update an inventory item
//! DELETE /inventory/{item_id}        - Remove a fruit from a store's shelf
//!
//! # Sales
//! POST   /sales                      - Record a sale against inventory
//! GET    /sales                      - List sales across the caller's stores
//! GET    /sales/{sale_id}            - Sale detail
//! PUT    /sales/{sale_id}            - Correct a sale
//! DELETE /sales/{sale_id}            - Delete a sale record
//!
//! # Suppliers
//! POST   /suppliers                  - Register a supplier
//! GET    /suppliers/store/{store_id} - List a store's suppliers
//! GET    /suppliers/{supplier_id}    - Supplier detail
//! PUT    /suppliers/{supplier_id}    - Update a supplier
//! DELETE /suppliers/{supplier_id}    - Delete a supplier
//! ```
//!
//! Trailing slashes are trimmed before routing, so `POST /sales/` and
//! `POST /sales` land on the same handler. Every route below the auth
//! group requires a valid access token cookie and answers 401 without one.

pub mod auth;
pub mod home;
pub mod inventory;
pub mod sales;
pub mod stores;
pub mod suppliers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/google", get(auth::login_google))
        .route("/auth/google", get(auth::callback))
        .route("/verify-token", get(auth::verify_token))
        .route("/logout", post(auth::logout))
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index).post(stores::create))
        .route(
            "/{store_id}",
            get(stores::show).put(stores::update).delete(stores::remove),
        )
}

/// Create the inventory routes router.
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(inventory::create))
        .route("/store/{store_id}", get(inventory::index))
        .route(
            "/{item_id}",
            get(inventory::show)
                .put(inventory::update)
                .delete(inventory::remove),
        )
}

/// Create the sale routes router.
pub fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sales::index).post(sales::create))
        .route(
            "/{sale_id}",
            get(sales::show).put(sales::update).delete(sales::remove),
        )
}

/// Create the supplier routes router.
pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(suppliers::create))
        .route("/store/{store_id}", get(suppliers::index))
        .route(
            "/{supplier_id}",
            get(suppliers::show)
                .put(suppliers::update)
                .delete(suppliers::remove),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Store routes
        .nest("/stores", store_routes())
        // Inventory routes
        .nest("/inventory", inventory_routes())
        // Sale routes
        .nest("/sales", sale_routes())
        // Supplier routes
        .nest("/suppliers", supplier_routes())
        // Auth routes (top level, mixed prefixes)
        .merge(auth_routes())
}
