//! Simulcast-DB: persistence for title identities and canonical schedules.
//!
//! This crate provides database functionality for simulcast using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//! - `store` - [`SqliteStore`], the identity resolver and record sink used
//!   by the merge engine
//!
//! # Example
//!
//! ```
//! use simulcast_db::pool::{get_conn, init_memory_pool};
//! use simulcast_db::queries::titles;
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let first = titles::resolve_or_create(&conn, "Show X").unwrap();
//! let again = titles::resolve_or_create(&conn, "Show X").unwrap();
//! assert_eq!(first.id, again.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use store::SqliteStore;
