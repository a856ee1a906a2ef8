//! Role-based capability checks.
//!
//! Every screen and command asks `can` instead of comparing roles itself.

use crate::models::Role;

use super::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Enter the admin dashboard at all
    AccessDashboard,
    ManageUsers,
    ManageTenants,
    /// Categories and products
    ManageCatalog,
    /// Pick any tenant instead of being pinned to one's own
    ChooseTenant,
}

impl Capability {
    fn allowed_roles(self) -> &'static [Role] {
        match self {
            Capability::AccessDashboard | Capability::ManageCatalog => {
                &[Role::Admin, Role::Manager]
            }
            Capability::ManageUsers | Capability::ManageTenants | Capability::ChooseTenant => {
                &[Role::Admin]
            }
        }
    }
}

pub fn can(session: Option<&Session>, capability: Capability) -> bool {
    session
        .map(|s| capability.allowed_roles().contains(&s.role))
        .unwrap_or(false)
}

/// Which restaurants a session's catalog queries and writes may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Any restaurant
    All,
    /// Only this one
    Own(i64),
    /// Pinned to a restaurant, but the session carries none
    Unassigned,
}

/// Managers only see their own restaurant; admins are unscoped.
pub fn tenant_scope(session: &Session) -> TenantScope {
    if can(Some(session), Capability::ChooseTenant) {
        TenantScope::All
    } else {
        session
            .tenant_id()
            .map(TenantScope::Own)
            .unwrap_or(TenantScope::Unassigned)
    }
}
