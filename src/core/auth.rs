//! Authorization context for the pet-care API
//!
//! Authentication itself happens outside this crate. An [`AuthProvider`]
//! turns request headers into an [`AuthContext`]:
//! - User authentication (opaque user id + roles)
//! - Admin access
//! - Anonymous access

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::http::HeaderMap;
use uuid::Uuid;

/// Header carrying the authenticated user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the user's comma separated roles
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// Role that turns a user context into an admin context
pub const ADMIN_ROLE: &str = "admin";

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated user
    User { user_id: Uuid, roles: Vec<String> },

    /// System administrator
    Admin { admin_id: Uuid },

    /// No authentication (public access)
    Anonymous,
}

impl AuthContext {
    /// Check if context represents an admin
    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    /// Get the current user's id, admins included
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id, .. } => Some(*user_id),
            AuthContext::Admin { admin_id } => Some(*admin_id),
            AuthContext::Anonymous => None,
        }
    }

    /// Check if the user holds `role`, ignoring case
    pub fn has_role(&self, role: &str) -> bool {
        match self {
            AuthContext::User { roles, .. } => roles.iter().any(|r| r.eq_ignore_ascii_case(role)),
            _ => false,
        }
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// User must have one of these roles
    HasRole(Vec<String>),

    /// Admin only
    AdminOnly,

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::HasRole(required_roles) => {
                required_roles.iter().any(|role| context.has_role(role))
            }

            AuthPolicy::AdminOnly => context.is_admin(),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }

    /// Policy granting access to sensitive contact fields
    pub fn sensitive_info(roles: &[String]) -> Self {
        AuthPolicy::Or(vec![
            AuthPolicy::AdminOnly,
            AuthPolicy::HasRole(roles.to_vec()),
        ])
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from HTTP request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Default no-auth provider (for development)
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _headers: &HeaderMap) -> Result<AuthContext> {
        Ok(AuthContext::Anonymous)
    }
}

/// Provider trusting identity headers set by an upstream gateway
///
/// `X-User-Id` holds the user's UUID and `X-User-Roles` a comma separated
/// role list. Without `X-User-Id` the request is anonymous.
pub struct HeaderAuthProvider;

#[async_trait]
impl AuthProvider for HeaderAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let Some(raw_id) = headers.get(USER_ID_HEADER) else {
            return Ok(AuthContext::Anonymous);
        };
        let raw_id = raw_id
            .to_str()
            .map_err(|_| anyhow!("{} is not valid text", USER_ID_HEADER))?;
        let user_id = Uuid::parse_str(raw_id.trim())
            .map_err(|e| anyhow!("{} is not a valid UUID: {}", USER_ID_HEADER, e))?;

        let roles: Vec<String> = headers
            .get(USER_ROLES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(',')
                    .map(|role| role.trim().to_lowercase())
                    .filter(|role| !role.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if roles.iter().any(|role| role == ADMIN_ROLE) {
            Ok(AuthContext::Admin { admin_id: user_id })
        } else {
            Ok(AuthContext::User { user_id, roles })
        }
    }
}
