//! Simulcast-Common: Shared types, identifiers, and errors.
//!
//! This crate provides common functionality used across simulcast:
//!
//! - **Typed IDs**: UUID wrappers for title identities
//! - **Core Types**: The source [`Language`] tags schedules are published in
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use simulcast_common::{Error, Language, Result, TitleId};
//!
//! let id = TitleId::new();
//! let language: Language = "cht".parse().unwrap();
//! assert_eq!(language, Language::Cht);
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_time_format("7.30"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
