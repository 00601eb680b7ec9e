use std::future::{Ready, ready};
use std::sync::LazyLock;

use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::{
    models::{
        AuthResponse, CreateUserInput, Department, LoginInput, MAX_ADMINS, User, UserRole,
        normalize_email,
    },
    repositories::user as user_repo,
    transaction::{DatabaseTransaction, LockScope, lock},
};
use crate::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub role: UserRole,
    pub department: Department,
    pub exp: usize, // expiration time
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            return ready(Err(ErrorUnauthorized(
                "Missing or invalid authorization header",
            )));
        };

        match verify_token(token, config) {
            Ok(claims) => ready(Ok(claims)),
            Err(_) => ready(Err(ErrorUnauthorized("Invalid token"))),
        }
    }
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

pub fn generate_token(user: &User, config: &Config) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(config.jwt_expiration_days))
        .ok_or_else(|| AppError::internal_server_error_message("token expiry out of range"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        department: user.department,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| {
        log::error!("Failed to sign token for {}: {}", user.id, e);
        AppError::internal_server_error_message("failed to sign token")
    })
}

/// Shape checks that need no database access.
pub fn validate_registration(input: &CreateUserInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if !EMAIL_RE.is_match(&normalize_email(&input.email)) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn ensure_admin_seat(admin_count: i64) -> Result<(), AppError> {
    if admin_count >= MAX_ADMINS {
        return Err(AppError::Forbidden(format!(
            "The maximum of {} admins has been reached",
            MAX_ADMINS
        )));
    }
    Ok(())
}

pub async fn register(input: CreateUserInput, config: &Config) -> Result<AuthResponse, AppError> {
    validate_registration(&input)?;

    let email = normalize_email(&input.email);
    if user_repo::email_exists(&email).await? {
        return Err(AppError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = hash(&input.password, DEFAULT_COST).map_err(|e| {
        log::error!("Failed to hash password: {}", e);
        AppError::internal_server_error_message("failed to hash password")
    })?;

    let role = input.role.unwrap_or_default();
    let user = User::new(
        input.name,
        &email,
        password_hash,
        role,
        input.department,
        input.birthday,
    );

    let user = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            if user.is_admin() {
                lock(tx, LockScope::AdminRoles).await?;
                ensure_admin_seat(user_repo::count_admins(tx).await?)?;
            }
            Ok(user_repo::create_user(tx, &user).await?)
        })
    })
    .await?;

    log::info!("Registered user {} ({})", user.id, user.role);

    let token = generate_token(&user, config)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn login(input: LoginInput, config: &Config) -> Result<AuthResponse, AppError> {
    let invalid = || AppError::BadRequest("Invalid email or password".to_string());

    let user = user_repo::find_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let matches = verify(&input.password, &user.password_hash).map_err(|e| {
        log::error!("Failed to verify password hash for {}: {}", user.id, e);
        AppError::internal_server_error_message("failed to verify password")
    })?;
    if !matches {
        log::warn!("Failed login for {}", user.id);
        return Err(invalid());
    }

    let token = generate_token(&user, config)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Changes a user's role, keeping the admin count within bounds.
pub async fn update_role(user_id: Uuid, role: UserRole) -> Result<User, AppError> {
    let current = user_repo::find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound(user_id))?;

    let user = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            if role == UserRole::Admin && !current.is_admin() {
                lock(tx, LockScope::AdminRoles).await?;
                ensure_admin_seat(user_repo::count_admins(tx).await?)?;
            }
            user_repo::update_role(tx, user_id, role)
                .await?
                .ok_or(AppError::UserNotFound(user_id))
        })
    })
    .await?;

    log::info!("User {} role changed to {}", user.id, user.role);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::Name};
    use pretty_assertions::assert_eq;

    fn input(email: &str, password: &str) -> CreateUserInput {
        CreateUserInput {
            name: Name().fake(),
            email: email.to_string(),
            password: password.to_string(),
            department: Department::Family,
            birthday: None,
            role: None,
        }
    }

    #[test]
    fn registration_requires_well_formed_email_and_password() {
        let email: String = SafeEmail().fake();
        assert!(validate_registration(&input(&email, "long-enough")).is_ok());
        assert!(validate_registration(&input("  Upper@Example.COM ", "long-enough")).is_ok());

        assert!(matches!(
            validate_registration(&input("not-an-email", "long-enough")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_registration(&input(&email, "short")),
            Err(AppError::BadRequest(_))
        ));

        let mut nameless = input(&email, "long-enough");
        nameless.name = "   ".to_string();
        assert!(validate_registration(&nameless).is_err());
    }

    #[test]
    fn admin_seats_are_capped() {
        assert!(ensure_admin_seat(0).is_ok());
        assert!(ensure_admin_seat(MAX_ADMINS - 1).is_ok());
        assert!(matches!(
            ensure_admin_seat(MAX_ADMINS),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn issued_tokens_carry_role_and_department() {
        let config = Config::test_config();
        let user = User::new(
            Name().fake(),
            &SafeEmail().fake::<String>(),
            "hash".to_string(),
            UserRole::Admin,
            Department::Worship,
            None,
        );

        let token = generate_token(&user, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.department, Department::Worship);

        let mut other = Config::test_config();
        other.jwt_secret = "a-different-secret-entirely".to_string();
        assert!(verify_token(&token, &other).is_err());
    }
}
