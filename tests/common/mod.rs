#![allow(dead_code, unused_macros)]

use std::env;
use std::future::Future;
use std::sync::LazyLock;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use chrono::{Duration, Utc};
use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::Name};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::PgPool;

use fellowship::Config;
use fellowship::database::repositories::user as user_repo;
use fellowship::database::transaction::DatabaseTransaction;
use fellowship::database::{get_pool, init_database};
use fellowship::database::models::{Department, User, UserRole};
use fellowship::handlers::shared::ApiResponse;
use fellowship::services::auth::{Claims, generate_token};

/// Builds the full API with the fixed test configuration. No database pool is
/// initialized, so only requests rejected before persistence can succeed.
macro_rules! test_app {
    () => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(fellowship::Config::test_config()))
                .wrap(fellowship::middleware::RequestIdMiddleware)
                .configure(fellowship::routes::configure),
        )
        .await
    };
}

/// The pool is process-wide and its connections belong to the runtime that
/// opened them, so every store test runs on this one runtime.
static RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("test runtime builds")
});

// Test database wrapper
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connects to `TEST_DATABASE_URL` and empties every table. Returns `None`
    /// when the variable is unset.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
            return Ok(None);
        };

        let pool = match get_pool() {
            Ok(pool) => pool.clone(),
            Err(_) => init_database(&database_url).await?,
        };

        sqlx::query(
            "TRUNCATE prayer_requests, board_posts, prayer_teams, moderator_schedules, \
             news, prayer_subjects, users",
        )
        .execute(&pool)
        .await?;

        Ok(Some(Self { pool }))
    }

    pub async fn create_users(&self, count: usize) -> Vec<User> {
        let users: Vec<User> = (0..count)
            .map(|_| fake_user(UserRole::Member, Department::Prayer))
            .collect();

        DatabaseTransaction::run(|tx| {
            Box::pin(async move {
                for user in &users {
                    user_repo::create_user(tx, user).await?;
                }
                Ok(users)
            })
        })
        .await
        .expect("test users are stored")
    }
}

/// Runs `test` against a clean database, or skips it when no test database
/// is configured.
pub fn with_database<F, Fut>(test: F)
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = ()>,
{
    RUNTIME.block_on(async {
        match TestContext::new().await.expect("test database is reachable") {
            Some(ctx) => test(ctx).await,
            None => eprintln!("TEST_DATABASE_URL is not set; skipping store test"),
        }
    });
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fake_user(role: UserRole, department: Department) -> User {
    User::new(
        Name().fake(),
        &SafeEmail().fake::<String>(),
        "not-a-real-hash".to_string(),
        role,
        department,
        None,
    )
}

// Authentication helpers
pub struct AuthHelper;

impl AuthHelper {
    pub fn token_for(user: &User) -> String {
        generate_token(user, &Config::test_config()).expect("token signs with test config")
    }

    pub fn token(role: UserRole, department: Department) -> String {
        Self::token_for(&fake_user(role, department))
    }

    pub fn member(department: Department) -> String {
        Self::token(UserRole::Member, department)
    }

    pub fn admin(department: Department) -> String {
        Self::token(UserRole::Admin, department)
    }

    pub fn expired_token() -> String {
        let user = fake_user(UserRole::Admin, Department::Family);
        let claims = Claims {
            sub: user.id,
            email: user.email,
            role: user.role,
            department: user.department,
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Config::test_config().jwt_secret.as_ref()),
        )
        .expect("expired token signs")
    }

    pub fn token_with_secret(secret: &str) -> String {
        let mut config = Config::test_config();
        config.jwt_secret = secret.to_string();
        generate_token(&fake_user(UserRole::Admin, Department::Family), &config)
            .expect("token signs with custom secret")
    }

    pub fn auth_header(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }
}

// Test assertion helpers
pub struct TestAssertions;

impl TestAssertions {
    /// Reads an error envelope and returns its message.
    pub async fn assert_error_response<B: MessageBody>(resp: ServiceResponse<B>) -> String {
        let body = test::read_body(resp).await;
        let response: ApiResponse<Value> =
            serde_json::from_slice(&body).expect("Failed to parse JSON response");

        assert!(!response.success, "Expected an error envelope");
        assert!(response.data.is_none());
        response.message.expect("Expected a message in error response")
    }
}
