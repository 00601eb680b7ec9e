use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::AUTHORIZATION};
use uuid::Uuid;

use crate::database::models::{Department, UserRole};
use crate::error::AppError;
use crate::services::auth::Claims;

/// The authenticated caller, built from verified token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub department: Department,
}

impl From<Claims> for UserContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            department: claims.department,
        }
    }
}

impl UserContext {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn belongs_to(&self, department: Department) -> bool {
        self.department == department
    }

    pub fn is_department_admin(&self, department: Department) -> bool {
        self.is_admin() && self.belongs_to(department)
    }

    pub fn requires_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    pub fn requires_department_admin(&self, department: Department) -> Result<(), AppError> {
        if self.is_department_admin(department) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Admin access to the {} department required",
                department
            )))
        }
    }

    pub fn requires_department_member(&self, department: Department) -> Result<(), AppError> {
        if self.belongs_to(department) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Membership in the {} department required",
                department
            )))
        }
    }

    /// Owners may act on their own resources; admins on anyone's.
    pub fn requires_same_user_or_admin(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only act on your own resources".to_string(),
            ))
        }
    }
}

/// Extract the caller from the bearer token; missing or invalid tokens are `Unauthorized`.
pub fn extract_context(req: &HttpRequest) -> Result<UserContext, AppError> {
    let mut payload = Payload::None;
    Claims::from_request(req, &mut payload)
        .into_inner()
        .map(UserContext::from)
        .map_err(|e| {
            log::debug!("Rejected credentials: {}", e);
            AppError::Unauthorized
        })
}

/// Like [`extract_context`], but a request without an `Authorization` header is anonymous.
pub fn extract_optional_context(req: &HttpRequest) -> Result<Option<UserContext>, AppError> {
    if req.headers().get(AUTHORIZATION).is_none() {
        return Ok(None);
    }
    extract_context(req).map(Some)
}
