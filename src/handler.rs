use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Extension,
};
use chrono::NaiveDate;
use sqlx::{query, query_as};
use tracing::{debug, info};

use crate::error::AppError;
use crate::middleware::authenticate;
use crate::model::{CurrentUser, Task, User};
use crate::schema::{AddTaskSchema, LoginSchema, RegisterSchema};
use crate::{session, view, AppState};

const BCRYPT_COST: u32 = 12;
const INVALID_CREDENTIALS: &str = "Invalid username or password";

// Handler for the landing page; logged-in visitors go straight to the dashboard
pub async fn index(
    State(data): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if authenticate(&data, &headers).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    Ok(Html(view::index_page()).into_response())
}

// Handler for rendering the login form
pub async fn login_form(headers: HeaderMap) -> Response {
    render_with_flash(&headers, view::login_page)
}

// Handler for rendering the registration form
pub async fn register_form(headers: HeaderMap) -> Response {
    render_with_flash(&headers, view::register_page)
}

// Handler for authenticating a user and establishing a session
pub async fn login(
    State(data): State<Arc<AppState>>,
    Form(body): Form<LoginSchema>,
) -> Result<Response, AppError> {
    let user =
        query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(&body.username)
            .fetch_optional(&data.db)
            .await?;

    // Unknown user and wrong password get the same message.
    let Some(user) = user else {
        return Ok(flash_redirect("/login", INVALID_CREDENTIALS));
    };
    if !bcrypt::verify(&body.password, &user.password_hash)? {
        return Ok(flash_redirect("/login", INVALID_CREDENTIALS));
    }

    info!(username = %user.username, "logged in");
    Ok(establish_session(&data, user.id))
}

// Handler for creating an account and establishing a session
pub async fn register(
    State(data): State<Arc<AppState>>,
    Form(body): Form<RegisterSchema>,
) -> Result<Response, AppError> {
    let taken = query("SELECT id FROM users WHERE username = ?")
        .bind(&body.username)
        .fetch_optional(&data.db)
        .await?;
    if taken.is_some() {
        return Ok(flash_redirect("/register", "Username already exists"));
    }

    let password_hash = bcrypt::hash(&body.password, BCRYPT_COST)?;
    let user = query_as::<_, User>(
        "INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING id, username, password_hash",
    )
    .bind(&body.username)
    .bind(&password_hash)
    .fetch_one(&data.db)
    .await?;

    info!(username = %user.username, "registered");
    Ok(establish_session(&data, user.id))
}

// Handler for listing the session user's tasks
pub async fn dashboard(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let tasks = query_as::<_, Task>(
        "SELECT id, description, due_date, completed, priority, user_id FROM tasks WHERE user_id = ?",
    )
    .bind(user.id)
    .fetch_all(&data.db)
    .await?;

    Ok(match session::take_flash(&headers) {
        Some(message) => (
            AppendHeaders([(SET_COOKIE, session::clear_flash_cookie())]),
            Html(view::dashboard_page(&user.username, &tasks, Some(&message))),
        )
            .into_response(),
        None => Html(view::dashboard_page(&user.username, &tasks, None)).into_response(),
    })
}

// Handler for creating a task from the dashboard form
pub async fn add_task(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(body): Form<AddTaskSchema>,
) -> Result<Response, AppError> {
    let due_date = match parse_due_date(body.due_date.as_deref()) {
        Ok(date) => date,
        Err(()) => return Ok(flash_redirect("/dashboard", "Invalid due date")),
    };
    let priority = body.priority.filter(|p| !p.is_empty());

    query("INSERT INTO tasks (description, due_date, priority, user_id) VALUES (?, ?, ?, ?)")
        .bind(&body.description)
        .bind(due_date)
        .bind(&priority)
        .bind(user.id)
        .execute(&data.db)
        .await?;

    Ok(Redirect::to("/dashboard").into_response())
}

// Handler for flipping a task's completion flag
pub async fn toggle_task(
    Path(task_id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    // The ownership check is the WHERE clause: a non-owner matches zero rows
    // and the request becomes a no-op redirect.
    let result = query("UPDATE tasks SET completed = NOT completed WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(user.id)
        .execute(&data.db)
        .await?;
    if result.rows_affected() == 0 {
        debug!(task_id, user_id = user.id, "toggle matched no owned task");
    }
    Ok(Redirect::to("/dashboard").into_response())
}

// Handler for deleting a task
pub async fn delete_task(
    Path(task_id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    let result = query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(user.id)
        .execute(&data.db)
        .await?;
    if result.rows_affected() == 0 {
        debug!(task_id, user_id = user.id, "delete matched no owned task");
    }
    Ok(Redirect::to("/dashboard").into_response())
}

// Handler for ending the session
pub async fn logout(Extension(user): Extension<CurrentUser>) -> Response {
    info!(username = %user.username, "logged out");
    (
        AppendHeaders([(SET_COOKIE, session::clear_session_cookie())]),
        Redirect::to("/"),
    )
        .into_response()
}

fn render_with_flash(headers: &HeaderMap, page: fn(Option<&str>) -> String) -> Response {
    match session::take_flash(headers) {
        Some(message) => (
            AppendHeaders([(SET_COOKIE, session::clear_flash_cookie())]),
            Html(page(Some(&message))),
        )
            .into_response(),
        None => Html(page(None)).into_response(),
    }
}

fn flash_redirect(location: &str, message: &str) -> Response {
    (
        AppendHeaders([(SET_COOKIE, session::flash_cookie(message))]),
        Redirect::to(location),
    )
        .into_response()
}

fn establish_session(data: &AppState, user_id: i64) -> Response {
    (
        AppendHeaders([
            (SET_COOKIE, session::session_cookie(&data.sessions.sign(user_id))),
            (SET_COOKIE, session::clear_flash_cookie()),
        ]),
        Redirect::to("/dashboard"),
    )
        .into_response()
}

/// Empty or missing input means no due date; anything else must be YYYY-MM-DD.
fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ()> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ()),
    }
}
