//! Router assembly
//! Mission: Map every shop path to its handler and put the access gate in front
//! of the protected ones

use crate::{
    api::{catalog, orders, users, AppState},
    auth::{access_gate, api as auth_api, AccessPipeline},
    store::CredentialStore,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the API router
///
/// Gated routes:
/// - `GET /user` - authenticated
/// - `GET /user/admin/:email` - authenticated, caller's own email only
/// - `GET /admin/user` - authenticated, role "admin"
pub fn build_router(state: AppState) -> Router {
    let credentials: Arc<dyn CredentialStore> = state.store.clone();
    let base = AccessPipeline::new(state.jwt_handler.clone(), credentials);

    let authenticated = base.clone().require_authenticated();
    let own_email = base.clone().require_authenticated().require_self("email");
    let admin_only = base.require_authenticated().require_admin();

    Router::new()
        .route("/", get(root_handler))
        .route("/jwt", post(auth_api::issue_token))
        // Users
        .route(
            "/user",
            get(users::list_users)
                .route_layer(middleware::from_fn_with_state(authenticated, access_gate))
                .post(users::create_user),
        )
        .route(
            "/user/admin/:email",
            get(auth_api::check_admin)
                .route_layer(middleware::from_fn_with_state(own_email, access_gate)),
        )
        .route("/user/email/:email", get(users::get_users_by_email))
        .route("/user/:id", get(users::get_user).put(users::update_user))
        // Products
        .route("/product", get(catalog::list_products))
        .route("/product/:id", get(catalog::get_product))
        // Orders
        .route(
            "/order",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/order/:email", get(orders::get_orders_by_email))
        // Banners
        .route("/banner", get(catalog::list_banners))
        .route("/banner/:id", get(catalog::get_banner))
        // Admin
        .route(
            "/admin/user",
            get(users::list_users)
                .route_layer(middleware::from_fn_with_state(admin_only, access_gate)),
        )
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "BD Shop server is running"
}
