/**
 * Admin Authentication Routes
 * Single configured administrator, bcrypt password check, JWT bearer tokens
 */
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::routes::extract::AppJson;
use crate::AppState;

/// Access token lifetime. Covers a working day of editing.
const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 8 * 60;

const ADMIN_ROLE: &str = "ADMIN";

// ============================================================================
// Types
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Admin email
    pub role: String, // Always ADMIN
    pub exp: i64,     // Expiry timestamp
    pub iat: i64,     // Issued at timestamp
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminInfo {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AdminInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResponse {
    fn failure(status: StatusCode, error: &str) -> (StatusCode, Json<LoginResponse>) {
        (
            status,
            Json(LoginResponse {
                success: false,
                user: None,
                access_token: None,
                expires_in: None,
                error: Some(error.to_string()),
            }),
        )
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: AdminInfo,
    pub expires_at: i64,
}

// ============================================================================
// Helper Functions
// ============================================================================

pub fn create_access_token(
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES);

    let claims = Claims {
        sub: email.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_access_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a valid admin bearer token. Valid claims are
/// made available to handlers as a request extension.
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Some(t) => t.to_string(),
        None => return AppError::Unauthorized("Authorization required".to_string()).into_response(),
    };

    match verify_access_token(&token, &state.config.jwt_secret) {
        Ok(claims) if claims.role == ADMIN_ROLE => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Ok(_) => AppError::Unauthorized("Insufficient permissions".to_string()).into_response(),
        Err(e) => {
            tracing::debug!("Token verification failed: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string()).into_response()
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> impl IntoResponse {
    let email = payload.email.trim().to_string();

    if email.is_empty() || payload.password.is_empty() {
        return LoginResponse::failure(StatusCode::BAD_REQUEST, "Email and password are required");
    }
    if !email.contains('@') {
        return LoginResponse::failure(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    let email_matches = email.eq_ignore_ascii_case(&state.config.admin_email);

    // bcrypt is CPU-bound; keep the async executor free.
    let password = payload.password;
    let hash = state.config.admin_password_hash.clone();
    let password_ok = tokio::task::spawn_blocking(move || verify(&password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false);

    if !email_matches || !password_ok {
        tracing::warn!("Failed login attempt for: {}", email);
        return LoginResponse::failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let access_token = match create_access_token(&state.config.admin_email, &state.config.jwt_secret) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to create access token: {}", e);
            return LoginResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create token");
        }
    };

    tracing::info!("Successful login for admin: {}", state.config.admin_email);

    (
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            user: Some(AdminInfo {
                email: state.config.admin_email.clone(),
                role: ADMIN_ROLE.to_string(),
            }),
            access_token: Some(access_token),
            expires_in: Some(ACCESS_TOKEN_EXPIRY_MINUTES * 60),
            error: None,
        }),
    )
}

/// POST /api/admin/verify
/// Runs behind `require_admin`, so reaching it means the token is good.
pub async fn verify_token(axum::Extension(claims): axum::Extension<Claims>) -> impl IntoResponse {
    Json(VerifyResponse {
        success: true,
        user: AdminInfo {
            email: claims.sub,
            role: claims.role,
        },
        expires_at: claims.exp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use crate::test_support::*;
    use serde_json::json;

    #[test]
    fn test_verify_access_token_invalid_returns_err() {
        assert!(verify_access_token("invalid.jwt.token", "secret").is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = create_access_token("a@b.c", "one").unwrap();
        assert!(verify_access_token(&token, "two").is_err());
        assert_eq!(verify_access_token(&token, "one").unwrap().sub, "a@b.c");
    }

    #[tokio::test]
    async fn test_login_empty_email_returns_bad_request() {
        let (state, _dir) = test_state().await;
        let (status, _) = send(
            create_app(state),
            json_request(
                "POST",
                "/api/admin/login",
                None,
                &json!({"email": "", "password": ADMIN_PASSWORD}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_wrong_credentials_returns_unauthorized() {
        let (state, _dir) = test_state().await;
        let (status, body) = send(
            create_app(state),
            json_request(
                "POST",
                "/api/admin/login",
                None,
                &json!({"email": ADMIN_EMAIL, "password": "wrongpassword"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_login_then_verify() {
        let (state, _dir) = test_state().await;
        let app = create_app(state);

        let (status, body) = send(
            app.clone(),
            json_request(
                "POST",
                "/api/admin/login",
                None,
                &json!({"email": "CLERK@council.test", "password": ADMIN_PASSWORD}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, body) = send(
            app,
            json_request("POST", "/api/admin/verify", Some(&token), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let (state, _dir) = test_state().await;
        let (status, _) = send(
            create_app(state),
            get_request("/api/admin/categories", Some("not-a-token")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
