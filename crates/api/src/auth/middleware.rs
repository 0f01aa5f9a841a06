use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::auth::{Claims, JwtService};

/// Best-effort claims extraction for the GraphQL endpoint: a valid
/// bearer token yields the actor's claims, anything else is anonymous
/// (the read side stays reachable without a token).
pub fn claims_from_headers(jwt_service: &JwtService, headers: &HeaderMap) -> Option<Claims> {
    let auth_header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;
    jwt_service.verify_token(token).ok()
}
