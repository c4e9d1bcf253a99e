use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use vows_types::api::Claims;

fn jwt_secret() -> String {
    std::env::var("VOWS_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into())
}

/// Decode the Bearer token from a request's headers, if one is present and
/// valid. Used both by the middleware layers and by handlers that accept an
/// optional admin credential (comment deletion).
pub fn claims_from_headers(headers: &HeaderMap) -> Option<Claims> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Extract and validate a JWT from the Authorization header.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = claims_from_headers(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Like `require_auth`, but additionally requires the admin role.
pub async fn require_admin(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = claims_from_headers(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    if !claims.role.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;
    use vows_types::models::Role;

    #[test]
    fn missing_or_malformed_header_yields_no_claims() {
        let headers = HeaderMap::new();
        assert!(claims_from_headers(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Token abc"),
        );
        assert!(claims_from_headers(&headers).is_none());
    }

    #[test]
    fn valid_bearer_token_is_decoded() {
        // The middleware reads VOWS_JWT_SECRET; unset here, both sides fall
        // back to the dev default.
        let token =
            crate::auth::create_token("dev-secret-change-me", Uuid::new_v4(), Role::Guest).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        let claims = claims_from_headers(&headers).expect("token should decode");
        assert_eq!(claims.role, Role::Guest);
    }
}
