use crate::model::Task;

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    let notice = match flash {
        Some(message) => format!("<p class=\"flash\">{}</p>\n", escape(message)),
        None => String::new(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}{}\n</body>\n</html>\n",
        escape(title),
        notice,
        body
    )
}

pub fn index_page() -> String {
    layout(
        "Todo App",
        None,
        "<h1>Welcome to Todo App</h1>\n\
         <p><a href=\"/login\">Login</a> or <a href=\"/register\">Register</a></p>",
    )
}

pub fn login_page(flash: Option<&str>) -> String {
    layout(
        "Login",
        flash,
        "<h1>Login</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\" required>\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\" required>\n\
         <button type=\"submit\">Login</button>\n\
         </form>\n\
         <p>No account? <a href=\"/register\">Register</a></p>",
    )
}

pub fn register_page(flash: Option<&str>) -> String {
    layout(
        "Register",
        flash,
        "<h1>Register</h1>\n\
         <form method=\"post\" action=\"/register\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\" required>\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\" required>\n\
         <button type=\"submit\">Register</button>\n\
         </form>\n\
         <p>Have an account? <a href=\"/login\">Login</a></p>",
    )
}

pub fn dashboard_page(username: &str, tasks: &[Task], flash: Option<&str>) -> String {
    let mut items = String::new();
    for task in tasks {
        items.push_str(&task_item(task));
    }
    let body = format!(
        "<h1>Your Tasks</h1>\n\
         <p>Logged in as <strong>{}</strong> | <a href=\"/logout\">Logout</a></p>\n\
         <form method=\"post\" action=\"/add_task\">\n\
         <input type=\"text\" name=\"description\" placeholder=\"Description\" required>\n\
         <input type=\"date\" name=\"due_date\">\n\
         <input type=\"text\" name=\"priority\" placeholder=\"Priority\">\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n\
         <ul>\n{}</ul>",
        escape(username),
        items
    );
    layout("Your Tasks", flash, &body)
}

fn task_item(task: &Task) -> String {
    let mut meta = String::new();
    if let Some(priority) = &task.priority {
        meta.push_str(&format!(" [{}]", escape(priority)));
    }
    if let Some(due) = task.due_date {
        meta.push_str(&format!(" (due {})", due.format("%Y-%m-%d")));
    }
    let class = if task.completed { "done" } else { "open" };
    format!(
        "<li class=\"{}\">{}{} | <a href=\"/toggle_task/{}\">toggle</a> <a href=\"/delete_task/{}\">delete</a></li>\n",
        class,
        escape(&task.description),
        meta,
        task.id,
        task.id
    )
}
