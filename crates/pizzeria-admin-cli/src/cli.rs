//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pizzeria_admin_core::models::Role;

#[derive(Parser, Debug)]
#[command(name = "pizzeria-admin", version, about = "Admin client for the pizzeria platform")]
pub struct Cli {
    /// Backend URL (overrides PIZZERIA_BACKEND_URL and the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the email (and optionally the password)
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Store the password in the OS keychain
        #[arg(long)]
        remember: bool,
    },
    /// Sign out and forget the stored password
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Dashboard overview: counts of users, tenants and products
    Status,
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Tenants(TenantsCommand),
    #[command(subcommand)]
    Categories(CategoriesCommand),
    #[command(subcommand)]
    Products(ProductsCommand),
}

#[derive(Args, Debug, Clone)]
pub struct Paging {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page
    #[arg(long)]
    pub per_page: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List {
        /// Search by name or email
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[command(flatten)]
        paging: Paging,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        tenant_id: Option<i64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        tenant_id: Option<i64>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum TenantsCommand {
    List {
        #[arg(long)]
        q: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        /// Price dimension as DIMENSION:TYPE=OPTION,OPTION with TYPE base or
        /// additional, e.g. Size:base=Small,Medium,Large (repeatable)
        #[arg(long = "price", value_name = "DIMENSION:TYPE=OPTIONS")]
        prices: Vec<String>,
        /// Attribute as NAME:WIDGET=OPTION,OPTION with WIDGET switch or radio;
        /// the first option is the default (repeatable)
        #[arg(long = "attr", value_name = "NAME:WIDGET=OPTIONS")]
        attributes: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    List {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
        /// Admins only; managers are pinned to their own restaurant
        #[arg(long)]
        tenant_id: Option<i64>,
        /// Only published products
        #[arg(long)]
        published: bool,
        #[command(flatten)]
        paging: Paging,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category_id: String,
        #[arg(long)]
        tenant_id: Option<i64>,
        #[arg(long)]
        published: bool,
        /// Price as DIMENSION:OPTION=AMOUNT, e.g. Size:Small=400 (repeatable)
        #[arg(long = "price", value_name = "DIMENSION:OPTION=AMOUNT")]
        prices: Vec<String>,
        /// Attribute as NAME=VALUE; yes/no become switches (repeatable)
        #[arg(long = "attr", value_name = "NAME=VALUE")]
        attributes: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}
