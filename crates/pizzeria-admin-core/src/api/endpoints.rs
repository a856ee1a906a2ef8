//! Endpoint paths, relative to the configured base URL.

/// Auth service: sessions, users, tenants
pub const AUTH_SERVICE: &str = "/api/auth";

/// Catalog service: categories, products
pub const CATALOG_SERVICE: &str = "/api/catalog";

pub const LOGIN_PATH: &str = "/api/auth/auth/login";
pub const SELF_PATH: &str = "/api/auth/auth/self";
pub const LOGOUT_PATH: &str = "/api/auth/auth/logout";
pub const REFRESH_PATH: &str = "/api/auth/auth/refresh";

pub fn users() -> String {
    format!("{}/users", AUTH_SERVICE)
}

pub fn user(id: i64) -> String {
    format!("{}/users/{}", AUTH_SERVICE, id)
}

pub fn tenants() -> String {
    format!("{}/tenants", AUTH_SERVICE)
}

pub fn tenant(id: i64) -> String {
    format!("{}/tenants/{}", AUTH_SERVICE, id)
}

pub fn categories() -> String {
    format!("{}/categories", CATALOG_SERVICE)
}

pub fn category(id: &str) -> String {
    format!("{}/categories/{}", CATALOG_SERVICE, id)
}

pub fn products() -> String {
    format!("{}/products", CATALOG_SERVICE)
}

pub fn product(id: &str) -> String {
    format!("{}/products/{}", CATALOG_SERVICE, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_scoped_by_service() {
        assert!(LOGIN_PATH.starts_with(AUTH_SERVICE));
        assert!(REFRESH_PATH.starts_with(AUTH_SERVICE));
        assert_eq!(user(7), "/api/auth/users/7");
        assert_eq!(tenant(2), "/api/auth/tenants/2");
        assert_eq!(category("65f0"), "/api/catalog/categories/65f0");
        assert_eq!(product("abc"), "/api/catalog/products/abc");
    }
}
