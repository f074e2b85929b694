use chrono::NaiveDate;

#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

// A task always belongs to exactly one user; handlers enforce this by
// filtering every read and mutation on user_id.
#[derive(Debug, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub priority: Option<String>,
    pub user_id: i64,
}

// Authenticated requester, inserted into request extensions by the auth
// middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}
