/*!
 * # Authentication Module
 *
 * Email/password accounts for the farm dashboard:
 *
 * - sign-up with Argon2 password hashing
 * - sign-in issuing HS256 JWT access tokens
 * - middleware that guards the API and exposes the caller as [`AuthUser`]
 */

use argon2::password_hash::rand_core::OsRng;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::{DefaultBodyLimit, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::entities::user;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub iss: String,
    pub aud: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// Token ID
    pub jti: String,
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub token_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            jwt_audience: cfg.auth_audience.clone(),
            jwt_issuer: cfg.auth_issuer.clone(),
            access_token_expiration: Duration::from_secs(cfg.jwt_expiration as u64),
        }
    }
}

/// Authentication service that handles accounts, token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Registers a new account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<UserProfile, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = normalize_email(&request.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)?;
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
        };

        let saved = model.insert(&*self.db).await.map_err(|e| {
            match e.sql_err() {
                // lost a race with a concurrent sign-up for the same address
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AuthError::EmailTaken,
                _ => {
                    error!("Failed to create user: {}", e);
                    AuthError::DatabaseError(e.to_string())
                }
            }
        })?;

        info!(user_id = %saved.id, "User signed up");
        Ok(UserProfile::from(saved))
    }

    /// Checks credentials and issues an access token. Unknown accounts and bad
    /// passwords are indistinguishable to the caller.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: LoginCredentials) -> Result<TokenPair, AuthError> {
        let email = normalize_email(&credentials.email);
        let Some(account) = self.find_by_email(&email).await? else {
            warn!("Sign-in for unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&credentials.password, &account.password_hash)? {
            warn!(user_id = %account.id, "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.generate_token(&account)
    }

    /// Generate a JWT access token for a user
    pub fn generate_token(&self, account: &user::Model) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: account.id.to_string(),
            name: Some(account.name.clone()),
            email: Some(account.email.clone()),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
        })
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, AuthError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AuthError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::InternalError(format!("Corrupt password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Token response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login credentials
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Email address is already registered")]
    EmailTaken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authentication required".to_string(),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::TokenCreation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                "Could not issue token".to_string(),
            ),
            Self::EmailTaken => (
                StatusCode::CONFLICT,
                "AUTH_EMAIL_TAKEN",
                "Email address is already registered".to_string(),
            ),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "AUTH_VALIDATION", msg.clone()),
            Self::UserNotFound => (
                StatusCode::NOT_FOUND,
                "AUTH_USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_DATABASE_ERROR",
                "Database error".to_string(),
            ),
            Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message) = self.parts();
        if status.is_server_error() {
            error!(error = %self, "authentication failure");
        }

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "request_id": crate::tracing::current_request_id().map(|rid| rid.0),
        }));

        (status, body).into_response()
    }
}

/// Authentication middleware that validates the bearer token and stores the
/// caller in the request extensions
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match extract_auth_from_headers(request.headers(), &auth_service) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let auth_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingAuth)?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingAuth)?;

    let claims = auth_service.validate_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthUser {
        user_id,
        name: claims.name,
        email: claims.email,
        token_id: claims.jti,
    })
}

/// Authentication routes
pub fn auth_routes(auth_service: Arc<AuthService>) -> Router<Arc<AuthService>> {
    Router::new()
        .route("/me", get(me_handler))
        .with_auth(auth_service)
        .route("/sign-up", post(sign_up_handler))
        .route("/sign-in", post(sign_in_handler))
        .layer(DefaultBodyLimit::max(1024 * 64))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn sign_up_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AuthError> {
    let profile = auth_service.sign_up(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Signed in", body = TokenPair),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn sign_in_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<TokenPair>, AuthError> {
    Ok(Json(auth_service.sign_in(credentials).await?))
}

/// The account behind the presented token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserProfile),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(auth_service): State<Arc<AuthService>>,
    auth_user: AuthUser,
) -> Result<Json<UserProfile>, AuthError> {
    Ok(Json(auth_service.get_profile(auth_user.user_id).await?))
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self, auth_service: Arc<AuthService>) -> Self;
}

impl<S> AuthRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Guards every route registered so far; routes added afterwards stay public.
    fn with_auth(self, auth_service: Arc<AuthService>) -> Self {
        self.route_layer(axum::middleware::from_fn_with_state(
            auth_service,
            auth_middleware,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn service() -> AuthService {
        let db = DatabaseConnection::default();
        AuthService::new(
            AuthConfig {
                jwt_secret: "test-secret-for-unit-tests-that-is-long-enough-0123456789abcdef".into(),
                jwt_audience: "henhouse-dashboard".into(),
                jwt_issuer: "henhouse-api".into(),
                access_token_expiration: Duration::from_secs(600),
            },
            Arc::new(db),
        )
    }

    fn account() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@farm.test".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_validate() {
        let svc = service();
        let account = account();
        let pair = svc.generate_token(&account).unwrap();
        let claims = svc.validate_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(pair.token_type, "Bearer");
    }

    #[test]
    fn tokens_for_another_audience_are_rejected() {
        let issuer = service();
        let mut verifier = service();
        verifier.config.jwt_audience = "someone-else".into();
        let pair = issuer.generate_token(&account()).unwrap();
        assert_matches!(
            verifier.validate_token(&pair.access_token),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn bearer_header_is_required() {
        let svc = service();
        let mut headers = HeaderMap::new();
        assert_matches!(
            extract_auth_from_headers(&headers, &svc),
            Err(AuthError::MissingAuth)
        );
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_matches!(
            extract_auth_from_headers(&headers, &svc),
            Err(AuthError::MissingAuth)
        );
        headers.insert(header::AUTHORIZATION, "Bearer nonsense".parse().unwrap());
        assert_matches!(
            extract_auth_from_headers(&headers, &svc),
            Err(AuthError::InvalidToken)
        );
    }
}
