use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::context::RequestContext;

/// Template wrapper that converts Askama templates into HTML responses.
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Failed to render template");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template: {err}"),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "aboutus.html")]
struct AboutTemplate {
    ctx: RequestContext,
}

/// GET / - the news list is the home page.
pub async fn index() -> Redirect {
    Redirect::to("/news")
}

/// GET /aboutus
pub async fn about(ctx: RequestContext) -> impl IntoResponse {
    HtmlTemplate(AboutTemplate { ctx })
}
