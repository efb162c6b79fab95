//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (route lookup in declaration order)
//!     → matcher.rs (segment-boundary prefix check)
//!     → Return: matched RouteRule or no match
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Parse targets into scheme/authority/base path
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins; declaration order is part of the contract

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{RouteError, RouteRule, Router};
