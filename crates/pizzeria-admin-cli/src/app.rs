//! Command execution.
//!
//! Every protected command first settles the session: bootstrap asks the
//! server who we are, and if nobody is signed in the remembered keychain
//! password (or `PIZZERIA_EMAIL`/`PIZZERIA_PASSWORD`) is used to sign in
//! silently. The route decision from `BootstrapGuard` then gates the
//! command.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use pizzeria_admin_core::api::ApiClient;
use pizzeria_admin_core::auth::{
    tenant_scope, BootstrapGuard, BootstrapState, CredentialStore, Route, RouteAccess,
    TenantScope,
};
use pizzeria_admin_core::cache::{resources, QueryCache, QueryKey};
use pizzeria_admin_core::models::{
    CreateCategory, CreateUser, ImageFile, ListQuery, LoginCredentials, ProductForm, Role,
    TenantData, UpdateUser, PAGE_SIZE,
};
use pizzeria_admin_core::utils::greeting_now;
use pizzeria_admin_core::{Config, Session, SessionStore};
use tracing::{debug, info, warn};

use crate::cli::{
    CategoriesCommand, Command, Paging, ProductsCommand, TenantsCommand, UsersCommand,
};
use crate::forms::{
    parse_attributes, parse_category_attributes, parse_price_dimensions, parse_prices,
};
use crate::output::Output;

/// Email used for non-interactive sign-in
const EMAIL_ENV: &str = "PIZZERIA_EMAIL";

/// Password used for non-interactive sign-in
const PASSWORD_ENV: &str = "PIZZERIA_PASSWORD";

pub struct App {
    config: Config,
    api: ApiClient,
    cache: QueryCache,
    guard: BootstrapGuard,
    out: Output,
}

impl App {
    pub fn new(config: Config, url: Option<String>, out: Output) -> Result<Self> {
        let store = SessionStore::new();
        let base_url = url.unwrap_or_else(|| config.base_url());
        debug!(%base_url, "Creating API client");
        let api = ApiClient::with_timeout(base_url, config.request_timeout(), store.clone())
            .context("Failed to create HTTP client")?;

        Ok(Self {
            guard: BootstrapGuard::new(store),
            config,
            api,
            cache: QueryCache::new(),
            out,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email, remember } => self.login(email, remember).await,
            Command::Logout => self.logout().await,
            Command::Whoami => {
                let session = self.ensure(Route::Home).await?;
                self.out.session(&session)
            }
            Command::Status => self.status().await,
            Command::Users(cmd) => self.users(cmd).await,
            Command::Tenants(cmd) => self.tenants(cmd).await,
            Command::Categories(cmd) => self.categories(cmd).await,
            Command::Products(cmd) => self.products(cmd).await,
        }
    }

    // ===== Session =====

    /// Settle the session and check that it may open `route`.
    async fn ensure(&mut self, route: Route) -> Result<Session> {
        if *self.guard.state() == BootstrapState::Pending {
            // A failure is reflected in the guard state and reported below
            if let Err(e) = self.guard.run(&self.api).await {
                debug!(error = %e, "Bootstrap failed");
            }
        }

        if *self.guard.state() == BootstrapState::Resolved && !self.api.session().is_authenticated()
        {
            self.silent_login().await;
        }

        match self.guard.access(route) {
            RouteAccess::Allow => self
                .api
                .session()
                .get_session()
                .ok_or_else(|| anyhow!("Not signed in")),
            RouteAccess::RedirectToLogin => {
                bail!("Not signed in. Run `pizzeria-admin login --remember` first.")
            }
            RouteAccess::Forbidden => bail!("Your role is not allowed to open {:?}", route),
            RouteAccess::LoadError(message) => bail!("Failed to load your session: {}", message),
            RouteAccess::RedirectToHome => bail!("Already signed in"),
            RouteAccess::Pending => bail!("Session check did not finish"),
        }
    }

    /// Sign in with stored credentials. Failures only log.
    async fn silent_login(&mut self) -> bool {
        let Some((email, password)) = self.stored_credentials() else {
            debug!("No stored credentials for silent sign-in");
            return false;
        };

        match self.api.login(&LoginCredentials::new(&email, password)).await {
            Ok(session) => {
                info!(user_id = session.id, "Signed in with stored credentials");
                true
            }
            Err(e) => {
                warn!(error = %e, email = %email, "Stored credentials were rejected");
                false
            }
        }
    }

    fn stored_credentials(&self) -> Option<(String, String)> {
        if let (Ok(email), Ok(password)) = (std::env::var(EMAIL_ENV), std::env::var(PASSWORD_ENV)) {
            if !email.is_empty() && !password.is_empty() {
                return Some((email, password));
            }
        }
        let email = self.config.last_email.clone()?;
        let password = CredentialStore::remembered(&email)?;
        Some((email, password))
    }

    async fn login(&mut self, email: Option<String>, remember: bool) -> Result<()> {
        let email = match email.or_else(|| std::env::var(EMAIL_ENV).ok().filter(|e| !e.is_empty())) {
            Some(email) => email,
            None => prompt_email(self.config.last_email.as_deref())?,
        };
        if email.is_empty() {
            bail!("Email is required");
        }
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(password) if !password.is_empty() => password,
            _ => rpassword::prompt_password("Password: ")?,
        };

        let session = self.api.login(&LoginCredentials::new(&email, &password)).await?;

        if remember {
            if let Err(e) = CredentialStore::store(&email, &password) {
                warn!(error = %e, "Failed to store credentials");
            }
        }
        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        self.out
            .message(&format!("{}, {}!", greeting_now(), session.display_name()));
        if self.out.is_json() {
            self.out.session(&session)?;
        }
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        // Re-establish the server session so logout can revoke it
        if self.guard.run(&self.api).await.is_ok() && !self.api.session().is_authenticated() {
            self.silent_login().await;
        }

        let result = self.api.logout().await;
        self.cache.clear().await;

        if let Some(email) = self.config.last_email.as_deref() {
            if CredentialStore::remembered(email).is_some() {
                CredentialStore::delete(email)?;
            }
        }

        result?;
        self.out.message("Signed out.");
        Ok(())
    }

    // ===== Dashboard =====

    async fn status(&mut self) -> Result<()> {
        let session = self.ensure(Route::Home).await?;
        let list_query = auth_service_query(None, None, &first_page());
        let products_query = products_query(&session, None, None, None, false, &first_page())?;

        let users_key = QueryKey::list(resources::USERS, &list_query);
        let tenants_key = QueryKey::list(resources::TENANTS, &list_query);
        let products_key = QueryKey::list(resources::PRODUCTS, &products_query);

        let api = &self.api;
        let cache = &self.cache;
        let products = cache.fetch(&products_key, || api.list_products(&products_query));

        // Managers only see the catalog of their own restaurant
        let (users, tenants, products) = if session.role == Role::Admin {
            let users = cache.fetch(&users_key, || api.list_users(&list_query));
            let tenants = cache.fetch(&tenants_key, || api.list_tenants(&list_query));
            let (users, tenants, products) = futures::try_join!(users, tenants, products)?;
            (Some(users.total), Some(tenants.total), products.total)
        } else {
            (None, None, products.await?.total)
        };

        if self.out.is_json() {
            return self.out.json(&serde_json::json!({
                "user": session,
                "users": users,
                "tenants": tenants,
                "products": products,
            }));
        }

        println!("{}, {}!", greeting_now(), session.display_name());
        if let Some(tenant) = &session.tenant {
            println!("Restaurant: {}", tenant.name);
        }
        if let Some(users) = users {
            println!("  Users:    {}", users);
        }
        if let Some(tenants) = tenants {
            println!("  Tenants:  {}", tenants);
        }
        println!("  Products: {}", products);
        Ok(())
    }

    // ===== Users =====

    async fn users(&mut self, cmd: UsersCommand) -> Result<()> {
        self.ensure(Route::Users).await?;

        match cmd {
            UsersCommand::List { q, role, paging } => {
                let query = auth_service_query(q.as_deref(), role, &paging);
                let key = QueryKey::list(resources::USERS, &query);
                let page = self.cache.fetch(&key, || self.api.list_users(&query)).await?;
                self.out.users(&page)
            }
            UsersCommand::Get { id } => {
                let user = self.api.get_user(id).await?;
                self.out.user(&user)
            }
            UsersCommand::Create {
                first_name,
                last_name,
                email,
                role,
                tenant_id,
            } => {
                if role == Role::Manager && tenant_id.is_none() {
                    bail!("Managers need a restaurant: pass --tenant-id");
                }
                let password = rpassword::prompt_password("Password for the new user: ")?;
                let user = CreateUser {
                    first_name,
                    last_name,
                    email,
                    password,
                    role,
                    tenant_id,
                };
                self.api.create_user(&user).await?;
                self.cache.invalidate(resources::USERS).await;
                self.out.message(&format!("Created user {}", user.email));
                Ok(())
            }
            UsersCommand::Update {
                id,
                first_name,
                last_name,
                role,
                tenant_id,
            } => {
                let update = UpdateUser {
                    first_name,
                    last_name,
                    role,
                    tenant_id,
                };
                if update.is_empty() {
                    bail!("Nothing to update");
                }
                self.api.update_user(id, &update).await?;
                self.cache.invalidate(resources::USERS).await;
                self.out.message(&format!("Updated user #{}", id));
                Ok(())
            }
            UsersCommand::Delete { id } => {
                self.api.delete_user(id).await?;
                self.cache.invalidate(resources::USERS).await;
                self.out.message(&format!("Deleted user #{}", id));
                Ok(())
            }
        }
    }

    // ===== Tenants =====

    async fn tenants(&mut self, cmd: TenantsCommand) -> Result<()> {
        self.ensure(Route::Tenants).await?;

        match cmd {
            TenantsCommand::List { q, paging } => {
                let query = auth_service_query(q.as_deref(), None, &paging);
                let key = QueryKey::list(resources::TENANTS, &query);
                let page = self.cache.fetch(&key, || self.api.list_tenants(&query)).await?;
                self.out.tenants(&page)
            }
            TenantsCommand::Get { id } => {
                let tenant = self.api.get_tenant(id).await?;
                self.out.tenant(&tenant)
            }
            TenantsCommand::Create { name, address } => {
                self.api
                    .create_tenant(&TenantData {
                        name: name.clone(),
                        address,
                    })
                    .await?;
                self.cache.invalidate(resources::TENANTS).await;
                self.out.message(&format!("Created restaurant {}", name));
                Ok(())
            }
            TenantsCommand::Update { id, name, address } => {
                self.api
                    .update_tenant(id, &TenantData { name, address })
                    .await?;
                self.cache.invalidate(resources::TENANTS).await;
                self.out.message(&format!("Updated restaurant #{}", id));
                Ok(())
            }
            TenantsCommand::Delete { id } => {
                self.api.delete_tenant(id).await?;
                self.cache.invalidate(resources::TENANTS).await;
                self.out.message(&format!("Deleted restaurant #{}", id));
                Ok(())
            }
        }
    }

    // ===== Catalog =====

    async fn categories(&mut self, cmd: CategoriesCommand) -> Result<()> {
        self.ensure(Route::Categories).await?;

        match cmd {
            CategoriesCommand::List => {
                let query = ListQuery::new();
                let key = QueryKey::list(resources::CATEGORIES, &query);
                let page = self
                    .cache
                    .fetch(&key, || self.api.list_categories(&query))
                    .await?;
                self.out.categories(&page)
            }
            CategoriesCommand::Get { id } => {
                let key = QueryKey::new(resources::CATEGORIES, id.as_str());
                let category = self.cache.fetch(&key, || self.api.get_category(&id)).await?;
                self.out.category(&category)
            }
            CategoriesCommand::Create {
                name,
                prices,
                attributes,
            } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    bail!("Category name is required");
                }
                let category = CreateCategory {
                    name,
                    price_configuration: parse_price_dimensions(&prices)?,
                    attributes: parse_category_attributes(&attributes)?,
                };
                self.api.create_category(&category).await?;
                self.cache.invalidate(resources::CATEGORIES).await;
                self.out.message(&format!("Created category {}", category.name));
                Ok(())
            }
        }
    }

    async fn products(&mut self, cmd: ProductsCommand) -> Result<()> {
        let session = self.ensure(Route::Products).await?;

        match cmd {
            ProductsCommand::List {
                q,
                category_id,
                tenant_id,
                published,
                paging,
            } => {
                let query = products_query(
                    &session,
                    q.as_deref(),
                    category_id.as_deref(),
                    tenant_id,
                    published,
                    &paging,
                )?;
                let key = QueryKey::list(resources::PRODUCTS, &query);
                let page = self.cache.fetch(&key, || self.api.list_products(&query)).await?;
                self.out.products(&page)
            }
            ProductsCommand::Create {
                name,
                description,
                category_id,
                tenant_id,
                published,
                prices,
                attributes,
                image,
            } => {
                let tenant_id = product_tenant(&session, tenant_id)?;
                let key = QueryKey::new(resources::CATEGORIES, category_id.as_str());
                let category = self
                    .cache
                    .fetch(&key, || self.api.get_category(&category_id))
                    .await?;

                let image = image
                    .map(|path| {
                        ImageFile::from_path(&path)
                            .with_context(|| format!("Failed to read image {}", path.display()))
                    })
                    .transpose()?;

                let form = ProductForm {
                    name,
                    description,
                    category_id: category.id.clone(),
                    tenant_id,
                    is_published: published,
                    price_configuration: parse_prices(&category, &prices)?,
                    attributes: parse_attributes(&category, &attributes)?,
                    image,
                };
                self.api.create_product(&form).await?;
                self.cache.invalidate(resources::PRODUCTS).await;
                self.out.message(&format!("Created product {}", form.name));
                Ok(())
            }
        }
    }
}

fn first_page() -> Paging {
    Paging {
        page: 1,
        per_page: None,
    }
}

/// Paging and filters for the auth service lists (users, tenants).
fn auth_service_query(q: Option<&str>, role: Option<Role>, paging: &Paging) -> ListQuery {
    ListQuery::new()
        .param("currentPage", paging.page.max(1))
        .param("pageSize", paging.per_page.unwrap_or(PAGE_SIZE))
        .opt("q", q.map(str::trim))
        .opt("role", role)
}

/// Product filters. Managers are pinned to their own restaurant.
fn products_query(
    session: &Session,
    q: Option<&str>,
    category_id: Option<&str>,
    tenant_id: Option<i64>,
    published: bool,
    paging: &Paging,
) -> Result<ListQuery> {
    let tenant_id = match tenant_scope(session) {
        TenantScope::All => tenant_id,
        TenantScope::Own(own) => {
            if tenant_id.is_some_and(|requested| requested != own) {
                bail!("Managers can only list products of their own restaurant");
            }
            Some(own)
        }
        TenantScope::Unassigned => bail!("Your account is not assigned to a restaurant"),
    };

    Ok(ListQuery::new()
        .param("page", paging.page.max(1))
        .param("limit", paging.per_page.unwrap_or(PAGE_SIZE))
        .opt("q", q.map(str::trim))
        .opt("categoryId", category_id)
        .opt("tenantId", tenant_id)
        .opt("isPublished", published.then_some(true)))
}

/// Restaurant a new product belongs to.
fn product_tenant(session: &Session, requested: Option<i64>) -> Result<i64> {
    match (tenant_scope(session), requested) {
        (TenantScope::Own(own), Some(requested)) if requested != own => {
            bail!("Managers can only add products to their own restaurant")
        }
        (TenantScope::Own(own), _) => Ok(own),
        (TenantScope::Unassigned, _) => bail!("Your account is not assigned to a restaurant"),
        (TenantScope::All, Some(requested)) => Ok(requested),
        (TenantScope::All, None) => bail!("Choose a restaurant with --tenant-id"),
    }
}

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_admin_core::models::Tenant;

    fn manager() -> Session {
        let mut session = Session::new(2, Role::Manager);
        session.tenant = Some(Tenant {
            id: 4,
            name: "Pizza Hub".to_string(),
            address: "Bandra".to_string(),
            created_at: None,
        });
        session
    }

    fn paging(page: u32) -> Paging {
        Paging {
            page,
            per_page: None,
        }
    }

    #[test]
    fn test_auth_service_query_drops_unset_filters() {
        let query = auth_service_query(Some("  "), None, &paging(2));
        assert_eq!(
            query.pairs(),
            &[
                ("currentPage".to_string(), "2".to_string()),
                ("pageSize".to_string(), "6".to_string()),
            ]
        );

        let query = auth_service_query(Some("asha"), Some(Role::Manager), &paging(0));
        assert_eq!(query.get("currentPage"), Some("1"));
        assert_eq!(query.get("q"), Some("asha"));
        assert_eq!(query.get("role"), Some("manager"));
    }

    #[test]
    fn test_products_query_pins_manager_tenant() {
        let query = products_query(&manager(), None, None, None, false, &paging(1)).unwrap();
        assert_eq!(query.get("tenantId"), Some("4"));
        assert_eq!(query.get("limit"), Some("6"));
        assert_eq!(query.get("isPublished"), None);

        assert!(products_query(&manager(), None, None, Some(9), false, &paging(1)).is_err());
    }

    #[test]
    fn test_products_query_admin_filters() {
        let admin = Session::new(1, Role::Admin);
        let query = products_query(&admin, Some("pizza"), Some("c1"), None, true, &paging(3)).unwrap();
        assert_eq!(query.get("page"), Some("3"));
        assert_eq!(query.get("categoryId"), Some("c1"));
        assert_eq!(query.get("tenantId"), None);
        assert_eq!(query.get("isPublished"), Some("true"));
    }

    #[test]
    fn test_product_tenant() {
        let admin = Session::new(1, Role::Admin);
        assert_eq!(product_tenant(&admin, Some(7)).unwrap(), 7);
        assert!(product_tenant(&admin, None).is_err());
        assert_eq!(product_tenant(&manager(), None).unwrap(), 4);
        assert!(product_tenant(&manager(), Some(9)).is_err());
    }

    #[test]
    fn test_manager_without_restaurant_is_refused() {
        let unassigned = Session::new(5, Role::Manager);
        assert!(products_query(&unassigned, None, None, None, false, &paging(1)).is_err());
        assert!(products_query(&unassigned, None, None, Some(9), false, &paging(1)).is_err());
        assert!(product_tenant(&unassigned, Some(9)).is_err());
        assert!(product_tenant(&unassigned, None).is_err());
    }
}
