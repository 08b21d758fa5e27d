use askama::Template;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fanzone_core::pagination::PageError;
use fanzone_core::storage::{
    page_error_to_status_code, repository_error_to_status_code, RepositoryError,
};

use crate::context::RequestContext;
use crate::handlers::pages::HtmlTemplate;

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    ctx: RequestContext,
    status: u16,
    reason: &'static str,
    message: String,
}

/// Renders the error page for `status`.
pub fn error_page(status: StatusCode, ctx: RequestContext, message: impl Into<String>) -> Response {
    let page = ErrorTemplate {
        ctx,
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Error"),
        message: message.into(),
    };
    (status, HtmlTemplate(page)).into_response()
}

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(repo_error)
        } else if let Some(page_error) = self.0.downcast_ref::<PageError>() {
            page_error_to_status_code(page_error)
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            tracing::error!(error = %self.0, status = status_code.as_u16(), "Request failed");
            "Something went wrong on our side.".to_string()
        } else {
            tracing::debug!(error = %self.0, status = status_code.as_u16(), "Request rejected");
            self.0.to_string()
        };

        error_page(status_code, RequestContext::default(), message)
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Fallback for unknown routes.
pub async fn not_found(ctx: RequestContext) -> Response {
    error_page(StatusCode::NOT_FOUND, ctx, "The page you are looking for does not exist.")
}
