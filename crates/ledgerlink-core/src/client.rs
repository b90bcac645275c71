//! Outbound seam to the accounting platform.
//!
//! The real transport (HTTP, authentication, token refresh, throttling) lives
//! behind [`PlatformClient`]; this crate never implements it. Adapters consume
//! the trait and treat every [`Fault`] as that call's error.

use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Entity, EntityId, Page, ResourceKind};

static FAULT_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<Message>([^<]*)</Message>").expect("hardcoded regex should be valid"));

/// Error value reported by the platform for a failed request.
///
/// Carries the raw XML response body and the HTTP status code. The adapter
/// derives exactly two things from it: a human-readable message and the
/// status passthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    status: u16,
    body: String,
}

impl Fault {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn http_status(&self) -> u16 {
        self.status
    }

    pub fn response_body(&self) -> &str {
        &self.body
    }

    /// Human-readable message extracted from the XML body, if present.
    pub fn message(&self) -> Option<String> {
        let captures = FAULT_MESSAGE.captures(&self.body)?;
        let message = captures[1].trim();
        if message.is_empty() {
            None
        } else {
            Some(message.to_owned())
        }
    }

    /// Throttling and server-side failures are worth retrying; everything
    /// else reflects the request itself.
    pub const fn is_retryable(&self) -> bool {
        self.status == 429 || self.status >= 500
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => write!(f, "platform fault (status {}): {message}", self.status),
            None => write!(f, "platform fault (status {})", self.status),
        }
    }
}

impl std::error::Error for Fault {}

/// Platform client contract consumed by resource adapters.
///
/// Implementations are synchronous and blocking, one request per call, and
/// must be shareable across threads.
pub trait PlatformClient: Send + Sync {
    fn add(&self, resource: ResourceKind, entity: &Entity) -> Result<Entity, Fault>;

    fn update(&self, resource: ResourceKind, entity: &Entity) -> Result<Entity, Fault>;

    fn delete(&self, resource: ResourceKind, entity: &Entity) -> Result<(), Fault>;

    fn find_by_id(&self, resource: ResourceKind, id: EntityId) -> Result<Option<Entity>, Fault>;

    fn query(&self, statement: &str, page: Page) -> Result<Vec<Entity>, Fault>;
}

/// Default no-op client for deterministic offline use.
///
/// Mutations echo their input back, lookups come up empty.
#[derive(Debug, Default)]
pub struct NullClient;

impl PlatformClient for NullClient {
    fn add(&self, _resource: ResourceKind, entity: &Entity) -> Result<Entity, Fault> {
        Ok(entity.clone())
    }

    fn update(&self, _resource: ResourceKind, entity: &Entity) -> Result<Entity, Fault> {
        Ok(entity.clone())
    }

    fn delete(&self, _resource: ResourceKind, _entity: &Entity) -> Result<(), Fault> {
        Ok(())
    }

    fn find_by_id(&self, _resource: ResourceKind, _id: EntityId) -> Result<Option<Entity>, Fault> {
        Ok(None)
    }

    fn query(&self, _statement: &str, _page: Page) -> Result<Vec<Entity>, Fault> {
        Ok(Vec::new())
    }
}
