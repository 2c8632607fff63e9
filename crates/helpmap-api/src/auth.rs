use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};

use helpmap_db::Store;
use helpmap_types::api::{AuthResponse, Claims, LoginRequest, ProfileResponse, RegisterRequest};
use helpmap_types::models::{DEFAULT_ROLE, User};

use crate::error::{ApiError, ApiResult};
use crate::{ApiJson, blocking, password};

const MISSING_CREDENTIALS: &str = "Username and password are required";
const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let (username, password) = credentials(req.username, req.password)?;
    let role = req.role.unwrap_or_else(|| DEFAULT_ROLE.to_string());

    let created = blocking(&state, move |store| {
        let password_hash = password::hash(&password)?;
        store.create_user(&username, &password_hash, &role)
    })
    .await?
    .ok_or_else(|| ApiError::Conflict(USER_EXISTS.to_string()))?;

    let user = created.into_user();
    let token = create_token(&state, &user)?;
    info!("Registered user {} ({})", user.id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Registration successful".to_string(),
            user,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (username, password) = credentials(req.username, req.password)?;

    // Unknown user and wrong password get the same answer.
    let lookup = username.clone();
    let user = blocking(&state, move |store| {
        Ok(match store.get_user_by_username(&lookup)? {
            Some(row) if password::verify(&password, &row.password) => Some(row),
            Some(_) => None,
            None => {
                password::verify_absent(&password);
                None
            }
        })
    })
    .await?
    .ok_or_else(|| {
        warn!("Failed login for {}", username);
        ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
    })?
    .into_user();

    let token = create_token(&state, &user)?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user,
        token,
    }))
}

/// GET /api/me — the user behind the bearer token.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let user = blocking(&state, move |store| store.get_user_by_id(claims.sub))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into_user();

    Ok(Json(ProfileResponse { success: true, user }))
}

fn credentials(username: Option<String>, password: Option<String>) -> ApiResult<(String, String)> {
    match (
        username.filter(|u| !u.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(ApiError::BadRequest(MISSING_CREDENTIALS.to_string())),
    }
}

pub fn create_token(state: &AppStateInner, user: &User) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
        exp: expiry(state.token_ttl)?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

fn expiry(ttl: chrono::Duration) -> anyhow::Result<usize> {
    if ttl <= chrono::Duration::zero() {
        anyhow::bail!("token lifetime must be positive, got {}", ttl);
    }

    let exp = chrono::Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("token lifetime {} overflows", ttl))?;
    Ok(exp.timestamp() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::decode_token;

    fn state_with_ttl(ttl: chrono::Duration) -> AppStateInner {
        let dir = std::env::temp_dir().join(format!("helpmap_auth_{}", std::process::id()));
        AppStateInner {
            store: Store::open(&dir).unwrap(),
            jwt_secret: "unit-secret".to_string(),
            token_ttl: ttl,
        }
    }

    fn user() -> User {
        User {
            id: 7,
            username: "ann".to_string(),
            role: "help".to_string(),
            created_at: chrono::Local::now().naive_local(),
        }
    }

    #[test]
    fn token_carries_user_claims() {
        let state = state_with_ttl(chrono::Duration::days(30));
        let token = create_token(&state, &user()).unwrap();
        let claims = decode_token("unit-secret", &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "help");
    }

    #[test]
    fn overflowing_token_lifetime_is_an_error() {
        let state = state_with_ttl(chrono::Duration::days(100_000_000));
        assert!(create_token(&state, &user()).is_err());
    }

    #[test]
    fn non_positive_token_lifetime_is_an_error() {
        assert!(create_token(&state_with_ttl(chrono::Duration::days(-1)), &user()).is_err());
        assert!(create_token(&state_with_ttl(chrono::Duration::zero()), &user()).is_err());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(credentials(Some("ann".into()), Some("pw".into())).is_ok());
        assert!(matches!(
            credentials(Some("ann".into()), None),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            credentials(Some(String::new()), Some("pw".into())),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(credentials(None, None), Err(ApiError::BadRequest(_))));
    }
}
