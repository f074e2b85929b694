use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::model::{CurrentUser, User};
use crate::{session, AppState};

/// Resolves the session cookie to a [`CurrentUser`] and makes it available to
/// handlers via request extensions. Unauthenticated requests are sent to the
/// login page.
pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    match authenticate(&data, request.headers()).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            debug!("unauthenticated request to {}", request.uri().path());
            Redirect::to("/login").into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

/// Verifies the session cookie and loads the user it names. A signature that
/// no longer matches a user row counts as unauthenticated.
pub async fn authenticate(
    data: &AppState,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, sqlx::Error> {
    let Some(raw) = session::cookie_value(headers, session::SESSION_COOKIE) else {
        return Ok(None);
    };
    let Some(user_id) = data.sessions.verify(&raw) else {
        return Ok(None);
    };
    let user =
        sqlx::query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&data.db)
            .await?;
    Ok(user.map(|user| CurrentUser {
        id: user.id,
        username: user.username,
    }))
}
