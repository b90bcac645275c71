//! Generic resource adapter: the verb surface over the platform client.
//!
//! Every operation resolves to exactly one client call issued through the
//! [`ResourceAdapter::dispatch`] chokepoint, which attaches a request id,
//! logs, and converts a platform [`Fault`] into that call's [`AdapterError`].
//! Adapters hold no mutable state; results are self-contained.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    Attributes, Connection, Entity, EntityCollection, EntityFacade, EntityId, Fault, Filter,
    JsonFacade, Page, PlatformClient, QueryValue, ResourceKind, Select, ValidationError,
};

/// Classification of adapter failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterErrorKind {
    /// Update/delete targeted an entity the platform does not have.
    NotFound,
    /// The platform rejected the request with a fault.
    Platform,
    /// A mutation response came back without an identifier.
    MissingIdentifier,
    /// The request failed local validation and was never dispatched.
    InvalidRequest,
}

/// Structured error for one adapter call.
///
/// A platform fault is carried whole, so its extracted message and HTTP
/// status stay available to the caller without any adapter-level state.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterError {
    kind: AdapterErrorKind,
    message: String,
    fault: Option<Fault>,
}

impl AdapterError {
    pub fn not_found(resource: ResourceKind, id: EntityId) -> Self {
        Self {
            kind: AdapterErrorKind::NotFound,
            message: format!("{} {id} does not exist on the platform", resource.as_str()),
            fault: None,
        }
    }

    pub fn platform(resource: ResourceKind, fault: Fault) -> Self {
        let message = match fault.message() {
            Some(detail) => format!("platform rejected {} request: {detail}", resource.as_str()),
            None => format!(
                "platform rejected {} request (status {})",
                resource.as_str(),
                fault.http_status()
            ),
        };
        Self {
            kind: AdapterErrorKind::Platform,
            message,
            fault: Some(fault),
        }
    }

    pub fn missing_identifier(resource: ResourceKind) -> Self {
        Self {
            kind: AdapterErrorKind::MissingIdentifier,
            message: format!(
                "platform response for {} carries no entity identifier",
                resource.as_str()
            ),
            fault: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterErrorKind::InvalidRequest,
            message: message.into(),
            fault: None,
        }
    }

    pub const fn kind(&self) -> AdapterErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The platform fault behind this error, when one exists.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// HTTP status passthrough from the platform fault.
    pub fn status_code(&self) -> Option<u16> {
        self.fault.as_ref().map(Fault::http_status)
    }

    pub fn retryable(&self) -> bool {
        self.fault.as_ref().is_some_and(Fault::is_retryable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            AdapterErrorKind::NotFound => "adapter.not_found",
            AdapterErrorKind::Platform => "adapter.platform_fault",
            AdapterErrorKind::MissingIdentifier => "adapter.missing_identifier",
            AdapterErrorKind::InvalidRequest => "adapter.invalid_request",
        }
    }
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for AdapterError {}

impl From<ValidationError> for AdapterError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

/// Generic CRUD/query adapter for one resource kind.
#[derive(Clone)]
pub struct ResourceAdapter {
    connection: Connection,
    resource: ResourceKind,
    facade: Arc<dyn EntityFacade>,
}

impl ResourceAdapter {
    /// Adapter with the default facade for `resource`.
    pub fn new(connection: Connection, resource: ResourceKind) -> Self {
        Self::with_facade(connection, resource, Arc::new(JsonFacade))
    }

    pub fn with_facade(
        connection: Connection,
        resource: ResourceKind,
        facade: Arc<dyn EntityFacade>,
    ) -> Self {
        Self {
            connection,
            resource,
            facade,
        }
    }

    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Creates an entity from `attributes` and returns its assigned
    /// identifier.
    pub fn create(&self, attributes: &Attributes) -> Result<EntityId, AdapterError> {
        let entity = self.facade.build_create(attributes)?;
        let created = self.dispatch("add", |client| client.add(self.resource, &entity))?;
        created
            .id()
            .ok_or_else(|| AdapterError::missing_identifier(self.resource))
    }

    /// Resolves the entity, merges `attributes` over it, and issues the
    /// update. A missing entity fails before any update request goes out.
    pub fn update(&self, id: EntityId, attributes: &Attributes) -> Result<EntityId, AdapterError> {
        let existing = self
            .find(id)?
            .ok_or_else(|| AdapterError::not_found(self.resource, id))?;
        let entity = self.facade.build_update(&existing, attributes)?;
        let updated = self.dispatch("update", |client| client.update(self.resource, &entity))?;
        Ok(updated.id().unwrap_or(id))
    }

    pub fn find(&self, id: EntityId) -> Result<Option<Entity>, AdapterError> {
        self.dispatch("find_by_id", |client| client.find_by_id(self.resource, id))
    }

    /// First entity whose `column` equals `value`; a single-row
    /// [`Self::query_where`].
    pub fn find_by(
        &self,
        column: &str,
        value: impl Into<QueryValue>,
    ) -> Result<Option<Entity>, AdapterError> {
        let rows = self.query_where([(column, value.into())], Page::first(1))?;
        Ok(rows.into_iter().next())
    }

    /// Fresh select bound to this adapter's resource.
    pub fn select(&self) -> Select {
        Select::from_resource(self.resource)
    }

    pub fn query(&self, select: &Select) -> Result<EntityCollection, AdapterError> {
        let page = select.page();
        if page.limit == 0 {
            return Err(ValidationError::ZeroPageLimit.into());
        }

        let statement = select.render()?;
        let entities = self.dispatch("query", |client| client.query(&statement, page))?;
        Ok(EntityCollection::new(entities))
    }

    /// Equality-AND query over an ordered sequence of conditions.
    pub fn query_where<'a, I, V>(
        &self,
        conditions: I,
        page: Page,
    ) -> Result<EntityCollection, AdapterError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<QueryValue>,
    {
        let mut filter = Filter::new();
        for (column, value) in conditions {
            filter = filter.eq(column, value);
        }

        let select = self
            .select()
            .filter(filter)
            .offset(page.offset)
            .limit(page.limit);
        self.query(&select)
    }

    /// Membership query built from the passed-in values sequence.
    pub fn query_where_in<V>(
        &self,
        column: &str,
        values: impl IntoIterator<Item = V>,
        page: Page,
    ) -> Result<EntityCollection, AdapterError>
    where
        V: Into<QueryValue>,
    {
        let select = self
            .select()
            .filter(Filter::new().is_in(column, values))
            .offset(page.offset)
            .limit(page.limit);
        self.query(&select)
    }

    /// Resolves the entity, then issues the delete with it. A missing entity
    /// fails before any delete request goes out.
    pub fn delete(&self, id: EntityId) -> Result<(), AdapterError> {
        let existing = self
            .find(id)?
            .ok_or_else(|| AdapterError::not_found(self.resource, id))?;
        self.dispatch("delete", |client| client.delete(self.resource, &existing))
    }

    /// Single chokepoint between the verb surface and the platform client.
    fn dispatch<T>(
        &self,
        operation: &'static str,
        call: impl FnOnce(&dyn PlatformClient) -> Result<T, Fault>,
    ) -> Result<T, AdapterError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(
            %request_id,
            resource = self.resource.as_str(),
            operation,
            company = self.connection.company_id(),
            "dispatching platform request"
        );

        match call(self.connection.client().as_ref()) {
            Ok(response) => Ok(response),
            Err(fault) => {
                tracing::warn!(
                    %request_id,
                    resource = self.resource.as_str(),
                    operation,
                    status = fault.http_status(),
                    "platform request failed"
                );
                Err(AdapterError::platform(self.resource, fault))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert_to_invalid_request() {
        let error = AdapterError::from(ValidationError::EmptyValueList);
        assert_eq!(error.kind(), AdapterErrorKind::InvalidRequest);
        assert_eq!(error.code(), "adapter.invalid_request");
        assert_eq!(error.status_code(), None);
        assert!(!error.retryable());
    }

    #[test]
    fn platform_error_prefers_the_extracted_fault_message() {
        let fault = Fault::new(400, "<Message>Duplicate Name Exists Error</Message>");
        let error = AdapterError::platform(ResourceKind::Class, fault);

        assert_eq!(error.kind(), AdapterErrorKind::Platform);
        assert!(error.message().contains("Duplicate Name Exists Error"));
        assert_eq!(error.status_code(), Some(400));
    }

    #[test]
    fn platform_error_falls_back_to_the_status_code() {
        let error = AdapterError::platform(ResourceKind::Class, Fault::new(502, "gateway"));
        assert!(error.message().contains("status 502"));
        assert!(error.retryable());
    }

    #[test]
    fn not_found_identifies_resource_and_id() {
        let error = AdapterError::not_found(ResourceKind::Customer, EntityId::new(42));
        assert_eq!(error.kind(), AdapterErrorKind::NotFound);
        assert!(error.message().contains("Customer"));
        assert!(error.message().contains("42"));
        assert_eq!(error.fault(), None);
    }
}
