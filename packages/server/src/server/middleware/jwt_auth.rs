use crate::common::{authenticate, Authentication};
use crate::domains::auth::JwtService;
use axum::{http::header::AUTHORIZATION, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Extracts the bearer token from the Authorization header, verifies it, and
/// adds an `Authentication` to request extensions. The request always
/// continues; handlers that need a user call `Authentication::require`.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth = extract_authentication(&request, &jwt_service);

    match &auth {
        Authentication::Authenticated(user) => {
            debug!("Authenticated user: {} (role: {})", user.email, user.role)
        }
        Authentication::Invalid => debug!("Invalid authentication token"),
        Authentication::Missing => {}
    }

    request.extensions_mut().insert(auth);
    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_authentication(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Authentication {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    authenticate(header, jwt_service)
}
