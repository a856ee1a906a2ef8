//! Terminal rendering of API results: tables, or raw JSON with `--json`.

use anyhow::Result;
use comfy_table::{Cell, Table};
use pizzeria_admin_core::models::{Category, Page, Product, Tenant, User};
use pizzeria_admin_core::utils::{format_date, truncate};
use pizzeria_admin_core::Session;
use serde::Serialize;

/// Longest free-text cell (names, addresses, descriptions)
const TEXT_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn message(&self, text: &str) {
        if !self.json {
            println!("{}", text);
        }
    }

    pub fn session(&self, session: &Session) -> Result<()> {
        if self.json {
            return self.json(session);
        }
        println!("{} ({})", session.display_name(), session.role);
        if let Some(email) = &session.email {
            println!("  Email:  {}", email);
        }
        if let Some(tenant) = &session.tenant {
            println!("  Tenant: {} (#{})", tenant.name, tenant.id);
        }
        Ok(())
    }

    pub fn users(&self, page: &Page<User>) -> Result<()> {
        if self.json {
            return self.json(page);
        }
        println!("{}", users_table(&page.data));
        footer(page);
        Ok(())
    }

    pub fn user(&self, user: &User) -> Result<()> {
        if self.json {
            return self.json(user);
        }
        println!("{} (#{})", user.full_name(), user.id);
        println!("  Email:   {}", user.email);
        println!("  Role:    {}", user.role);
        if let Some(tenant) = &user.tenant {
            println!("  Tenant:  {} (#{})", tenant.name, tenant.id);
        }
        println!("  Created: {}", created(user.created_at.as_deref()));
        Ok(())
    }

    pub fn tenants(&self, page: &Page<Tenant>) -> Result<()> {
        if self.json {
            return self.json(page);
        }
        println!("{}", tenants_table(&page.data));
        footer(page);
        Ok(())
    }

    pub fn tenant(&self, tenant: &Tenant) -> Result<()> {
        if self.json {
            return self.json(tenant);
        }
        println!("{} (#{})", tenant.name, tenant.id);
        println!("  Address: {}", tenant.address);
        println!("  Created: {}", created(tenant.created_at.as_deref()));
        Ok(())
    }

    pub fn categories(&self, page: &Page<Category>) -> Result<()> {
        if self.json {
            return self.json(page);
        }
        println!("{}", categories_table(&page.data));
        Ok(())
    }

    pub fn category(&self, category: &Category) -> Result<()> {
        if self.json {
            return self.json(category);
        }
        println!("{} ({})", category.name, category.id);
        println!("  Prices:");
        for (dimension, config) in &category.price_configuration {
            println!(
                "    {} [{:?}]: {}",
                dimension,
                config.price_type,
                config.available_options.join(", ")
            );
        }
        println!("  Attributes:");
        for attribute in &category.attributes {
            println!(
                "    {} [{:?}]: {} (default {})",
                attribute.name,
                attribute.widget_type,
                attribute.available_options.join(", "),
                attribute.default_value
            );
        }
        Ok(())
    }

    pub fn products(&self, page: &Page<Product>) -> Result<()> {
        if self.json {
            return self.json(page);
        }
        println!("{}", products_table(&page.data));
        footer(page);
        Ok(())
    }
}

fn users_table(users: &[User]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Email", "Role", "Restaurant", "Created"]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(truncate(&user.full_name(), TEXT_WIDTH)),
            Cell::new(&user.email),
            Cell::new(&user.role),
            Cell::new(
                user.tenant
                    .as_ref()
                    .map(|t| truncate(&t.name, TEXT_WIDTH))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(created(user.created_at.as_deref())),
        ]);
    }
    table
}

fn tenants_table(tenants: &[Tenant]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Address", "Created"]);
    for tenant in tenants {
        table.add_row(vec![
            Cell::new(tenant.id),
            Cell::new(truncate(&tenant.name, TEXT_WIDTH)),
            Cell::new(truncate(&tenant.address, TEXT_WIDTH)),
            Cell::new(created(tenant.created_at.as_deref())),
        ]);
    }
    table
}

fn categories_table(categories: &[Category]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Prices", "Attributes"]);
    for category in categories {
        let prices: Vec<&str> = category
            .price_configuration
            .keys()
            .map(String::as_str)
            .collect();
        let attributes: Vec<&str> =
            category.attributes.iter().map(|a| a.name.as_str()).collect();
        table.add_row(vec![
            Cell::new(&category.id),
            Cell::new(truncate(&category.name, TEXT_WIDTH)),
            Cell::new(prices.join(", ")),
            Cell::new(attributes.join(", ")),
        ]);
    }
    table
}

fn products_table(products: &[Product]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Category", "Status", "Created"]);
    for product in products {
        table.add_row(vec![
            Cell::new(&product.id),
            Cell::new(truncate(&product.name, TEXT_WIDTH)),
            Cell::new(product.category_name().unwrap_or("-")),
            Cell::new(product.status_display()),
            Cell::new(created(product.created_at.as_deref())),
        ]);
    }
    table
}

fn created(date: Option<&str>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

fn footer<T>(page: &Page<T>) {
    println!(
        "\nPage {} of {} ({} total)",
        page.current_page.max(1),
        page.total_pages().max(1),
        page.total
    );
}
