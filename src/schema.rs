// Form bodies posted by the HTML views.

#[derive(Debug, serde::Deserialize)]
pub struct RegisterSchema {
    pub username: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginSchema {
    pub username: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct AddTaskSchema {
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}
