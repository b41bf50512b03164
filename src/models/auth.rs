//! Authenticated user extracted from the session identity.
//!
//! The identity cookie stores a JWT issued by the auth service. It is decoded
//! with the shared secret on every request.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Decodes and validates an HS256 token.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }

    /// Encodes the user as an HS256 token.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

/// Returns `true` when `role` is among `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("Unauthorized"))?;
    let token = identity
        .id()
        .map_err(|_| ErrorUnauthorized("Unauthorized"))?;

    let server_config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("Server config is not registered"))?;

    AuthenticatedUser::from_jwt(&token, &server_config.secret).map_err(|e| {
        log::warn!("Rejected session token: {e}");
        ErrorUnauthorized("Unauthorized")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(exp: usize) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            hub_id: 1,
            name: "Admin".into(),
            roles: vec!["grounds".into(), "grounds_admin".into()],
            exp,
        }
    }

    #[test]
    fn token_round_trip_with_shared_secret() {
        let original = user(4_102_444_800);
        let token = original.to_jwt("secret").expect("encodes");

        let decoded = AuthenticatedUser::from_jwt(&token, "secret").expect("decodes");
        assert_eq!(decoded, original);
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = user(1).to_jwt("secret").expect("encodes");
        assert!(AuthenticatedUser::from_jwt(&token, "secret").is_err());
    }

    #[test]
    fn check_role_matches_exactly() {
        let roles = vec!["grounds_admin".to_string()];
        assert!(check_role("grounds_admin", &roles));
        assert!(!check_role("grounds", &roles));
    }
}
