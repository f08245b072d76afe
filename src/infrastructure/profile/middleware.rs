use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

use super::request_id::RequestId;

pub const X_CLIENT_PROFILE: &str = "x-client-profile";

/// Browser profile a request belongs to; quota pools are scoped by it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientProfile {
    pub profile_id: Uuid,
    /// True when the request carried no usable profile and one was minted
    pub minted: bool,
}

/// Resolve the client profile from the `x-client-profile` header.
///
/// A missing or unparsable header gets a new profile ID. The resolved ID is
/// always echoed back in the response so the browser can persist it.
pub async fn profile_middleware(mut request: Request, next: Next) -> Response {
    let existing = request
        .headers()
        .get(X_CLIENT_PROFILE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok());

    let profile = match existing {
        Some(profile_id) => ClientProfile {
            profile_id,
            minted: false,
        },
        None => ClientProfile {
            profile_id: Uuid::new_v4(),
            minted: true,
        },
    };

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    tracing::debug!(
        profile_id = %profile.profile_id,
        minted = profile.minted,
        request_id = %request_id,
        "Client profile resolved"
    );

    request.extensions_mut().insert(profile);

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&profile.profile_id.to_string()) {
        response.headers_mut().insert(X_CLIENT_PROFILE, header_value);
    }

    response
}
