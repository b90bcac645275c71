use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::{PlatformClient, ResourceAdapter, ResourceKind};

/// Injected session handle shared by every adapter.
///
/// Owns the platform client and the company (realm) the session is scoped to.
/// Constructed once per session by the caller and passed to adapters
/// explicitly; cloning is cheap and shares the client handle.
#[derive(Clone)]
pub struct Connection {
    client: Arc<dyn PlatformClient>,
    company_id: String,
}

impl Connection {
    pub fn new(client: Arc<dyn PlatformClient>, company_id: impl Into<String>) -> Self {
        Self {
            client,
            company_id: company_id.into(),
        }
    }

    pub fn client(&self) -> &Arc<dyn PlatformClient> {
        &self.client
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    /// Adapter for one resource kind, using the default facade for it.
    pub fn adapter(&self, resource: ResourceKind) -> ResourceAdapter {
        ResourceAdapter::new(self.clone(), resource)
    }
}

impl Debug for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("company_id", &self.company_id)
            .finish_non_exhaustive()
    }
}
