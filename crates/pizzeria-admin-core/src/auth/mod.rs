//! Authentication state for the admin client.
//!
//! This module provides:
//! - `Session` / `SessionStore`: the signed-in user and its observable holder
//! - `BootstrapGuard`: the startup "who am I" check and route gating
//! - `can` / `Capability`: role checks shared by every screen
//! - `CredentialStore`: remembered passwords in the OS keychain
//!
//! Access and refresh tokens are cookies owned by the HTTP client; nothing
//! here stores them.

pub mod bootstrap;
pub mod credentials;
pub mod permissions;
pub mod session;

pub use bootstrap::{BootstrapGuard, BootstrapState, Route, RouteAccess};
pub use credentials::CredentialStore;
pub use permissions::{can, tenant_scope, Capability, TenantScope};
pub use session::{Session, SessionStore};
