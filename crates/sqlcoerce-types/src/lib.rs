//! SQL type system and implicit coercion
//!
//! This crate defines the SQL type model and the rules for reconciling
//! types without an explicit cast:
//! - Type descriptors (scalar and composite kinds with nullability)
//! - Type families and family membership
//! - A configurable type factory (canonical construction, least restrictive
//!   type, DECIMAL arithmetic)
//! - Tightest common type, wider type and the implicit-cast rule table

pub mod categories;
pub mod coercion;
pub mod config;
pub mod decimal;
pub mod factory;
pub mod family;
pub mod type_system;

pub use categories::*;
pub use coercion::*;
pub use config::*;
pub use factory::*;
pub use family::*;
pub use type_system::*;
