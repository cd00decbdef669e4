use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::auth::Session;
use crate::store::{Database, DishOrder};

#[derive(Parser, Debug)]
#[command(name = "restaurant-records")]
#[command(version, about = "Manage restaurant dishes, reservations, staff and ingredient stock")]
pub struct Cli {
    /// SQLite database path (default: $RESTAURANT_DB or the user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Login name
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Log storage activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create missing tables and seed sample data
    Init,

    /// List all tables and their columns
    Tables,

    /// Check credentials and print the role
    Whoami,

    /// Print every row of a table
    List {
        /// dishes, reservations, staff or ingredients
        table: String,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a single row
    Show {
        table: String,
        id: i64,

        /// Print the row as JSON
        #[arg(long)]
        json: bool,
    },

    /// List dishes with sorting and a category filter
    Dishes {
        /// Sort column
        #[arg(short, long, value_enum, default_value_t = DishOrder::Id)]
        order_by: DishOrder,

        /// Sort descending
        #[arg(short, long)]
        desc: bool,

        /// Only include these categories (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        category: Option<Vec<String>>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a row (admin only)
    Add {
        table: String,

        /// Column values as field=value
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Change fields of a row (admin only)
    Update {
        table: String,
        id: i64,

        /// Column values as field=value
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Delete a row (admin only)
    Delete { table: String, id: i64 },

    /// Create a login (admin only)
    AddUser {
        new_username: String,
        new_password: String,

        /// admin or user
        role: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Log in with the global credentials; every command that touches table
    /// data needs a session, read-only ones included
    pub fn session(&self, db: &Database) -> Result<Session> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            bail!("This command needs --username and --password");
        };

        db.login(username, password)?
            .context("Invalid username or password")
    }
}
