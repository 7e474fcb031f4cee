//! Login route and result mapping.
//!
//! Every credential rejection gets the same status and body. Backend trouble
//! gets a separate service-unavailable response.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;

use crate::auth::{AuthRequest, AuthResult, AuthenticationService};

/// Maximum login request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

/// Status code the transport uses for each outcome
pub fn status_for(result: AuthResult) -> StatusCode {
    match result {
        AuthResult::Authenticated => StatusCode::OK,
        AuthResult::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthResult::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn render(result: AuthResult) -> Response {
    let body = match result {
        AuthResult::Authenticated => json!({ "status": "Success" }),
        AuthResult::InvalidCredentials => {
            json!({ "status": "Error", "description": "Invalid credentials." })
        }
        AuthResult::StoreUnavailable => {
            json!({ "status": "Error", "description": "Service unavailable." })
        }
    };
    (status_for(result), Json(body)).into_response()
}

async fn handle_login(
    State(service): State<AuthenticationService>,
    Form(form): Form<LoginForm>,
) -> Response {
    let LoginForm { username, password } = form;
    let result = service.authenticate(AuthRequest::new(username, password)).await;
    render(result)
}

pub fn router(service: AuthenticationService) -> Router {
    Router::new()
        .route("/", post(handle_login))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .with_state(service)
}
