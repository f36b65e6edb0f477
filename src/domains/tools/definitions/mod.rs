//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod character;
pub mod metadata;

pub use character::{CharacterCategory, CharacterInfoTool};
pub use metadata::{MetadataDiscoveryTool, MetadataDocument, metadata_document};
