//! Wire-entity construction per resource kind.
//!
//! Replaces the platform SDK's per-type request-object facades with a
//! capability trait selected through a registry keyed by [`ResourceKind`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{Attributes, Entity, ResourceKind, ValidationError};

/// Builds wire entities for one resource kind.
pub trait EntityFacade: Send + Sync {
    /// Assembles the creation payload from caller attributes.
    fn build_create(&self, attributes: &Attributes) -> Result<Entity, ValidationError>;

    /// Merges caller attributes over the freshly resolved entity, keeping the
    /// platform bookkeeping fields (identifier, sync token) intact.
    fn build_update(
        &self,
        existing: &Entity,
        attributes: &Attributes,
    ) -> Result<Entity, ValidationError>;
}

/// Default facade: attributes map one-to-one onto JSON fields.
#[derive(Debug, Default)]
pub struct JsonFacade;

impl JsonFacade {
    fn apply(
        payload: &mut Map<String, Value>,
        attributes: &Attributes,
    ) -> Result<(), ValidationError> {
        if attributes.is_empty() {
            return Err(ValidationError::EmptyAttributes);
        }

        for (name, value) in attributes.iter() {
            if name.is_empty() {
                return Err(ValidationError::EmptyAttributeName);
            }
            payload.insert(name.to_owned(), value.clone());
        }

        Ok(())
    }
}

impl EntityFacade for JsonFacade {
    fn build_create(&self, attributes: &Attributes) -> Result<Entity, ValidationError> {
        let mut payload = Map::new();
        Self::apply(&mut payload, attributes)?;
        Ok(Entity::new(Value::Object(payload)))
    }

    fn build_update(
        &self,
        existing: &Entity,
        attributes: &Attributes,
    ) -> Result<Entity, ValidationError> {
        let Some(base) = existing.as_value().as_object() else {
            return Err(ValidationError::EntityNotObject);
        };

        let mut payload = base.clone();
        Self::apply(&mut payload, attributes)?;
        Ok(Entity::new(Value::Object(payload)))
    }
}

/// Facade registry keyed by resource kind.
///
/// The default registration covers every [`ResourceKind`] with [`JsonFacade`];
/// callers override a kind when its payload needs bespoke assembly.
pub struct FacadeRegistry {
    facades: HashMap<ResourceKind, Arc<dyn EntityFacade>>,
}

impl Default for FacadeRegistry {
    fn default() -> Self {
        let mut facades: HashMap<ResourceKind, Arc<dyn EntityFacade>> =
            HashMap::with_capacity(ResourceKind::ALL.len());
        for kind in ResourceKind::ALL {
            facades.insert(kind, Arc::new(JsonFacade));
        }
        Self { facades }
    }
}

impl FacadeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ResourceKind, facade: Arc<dyn EntityFacade>) {
        self.facades.insert(kind, facade);
    }

    pub fn facade_for(&self, kind: ResourceKind) -> Arc<dyn EntityFacade> {
        self.facades
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Arc::new(JsonFacade))
    }
}
