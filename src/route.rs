use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/add_task", post(add_task))
        .route("/toggle_task/:task_id", get(toggle_task))
        .route("/delete_task/:task_id", get(delete_task))
        .route("/logout", get(logout))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/", get(index))
        .route("/login", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);
    app
}
