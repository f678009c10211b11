use axum::response::Html;

pub const WELCOME_HTML: &str = "<h1>Welcome to the Email Service API</h1>\
<p>Use a POST request to /calculate to send an email with a personalized health analysis</p>";

pub async fn index() -> Html<&'static str> {
    Html(WELCOME_HTML)
}
