pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod parser;
pub mod schema;
pub mod store;

pub use auth::{Role, Session, User};
pub use cli::{Cli, Commands};
pub use error::{Result, StoreError};
pub use filter::{CategorySelection, SortState};
pub use models::{Dish, Entity, IngredientStock, Reservation, Staff};
pub use store::{editable_table, Database, DishOrder, DishQuery, InitReport, Record};
