//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the tool registry and the tools each profile exposes
//! - **profiles**: which catalog a server instance serves

pub mod profiles;
pub mod tools;
