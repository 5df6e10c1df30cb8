//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::OptionalUser;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Signed-in user's display name, if any.
    pub user_name: Option<String>,
}

/// Display the home page.
///
/// Shows a sign-in link for anonymous visitors and a short greeting for
/// authenticated ones. The real clients talk JSON; this page exists so a
/// browser hitting the server root lands somewhere useful.
pub async fn home(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    HomeTemplate {
        user_name: user.map(|user| {
            if user.name.is_empty() {
                user.email.into_inner()
            } else {
                user.name
            }
        }),
    }
}
