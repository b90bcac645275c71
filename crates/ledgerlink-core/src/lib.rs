//! Typed resource adapters over an accounting-platform client.
//!
//! This crate contains:
//! - The generic [`ResourceAdapter`] verb surface (create/update/find/query/delete)
//! - A typed query builder with centralized escaping and identifier validation
//! - The outbound [`PlatformClient`] seam and the [`Fault`] error value
//! - Facade registry mapping attribute sets to wire entities per resource kind

pub mod adapter;
pub mod client;
pub mod connection;
pub mod entity;
pub mod error;
pub mod facade;
pub mod query;
pub mod resource;

pub use adapter::{AdapterError, AdapterErrorKind, ResourceAdapter};
pub use client::{Fault, NullClient, PlatformClient};
pub use connection::Connection;
pub use entity::{Attributes, Entity, EntityCollection, EntityId};
pub use error::ValidationError;
pub use facade::{EntityFacade, FacadeRegistry, JsonFacade};
pub use query::{Filter, Page, QueryValue, Select, DEFAULT_PAGE_LIMIT};
pub use resource::ResourceKind;
