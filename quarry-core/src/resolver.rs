use crate::{Entity, EntityDescriptor, Result};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock},
};

static DESCRIPTORS: LazyLock<RwLock<HashMap<TypeId, &'static EntityDescriptor>>> =
    LazyLock::new(Default::default);

/// Descriptor of `E`, validated on first use and cached for the rest of the process.
///
/// The descriptor is built while holding the write lock, so concurrent first
/// calls build it exactly once. Failures are not cached and are reported again
/// on every call.
pub fn resolve<E: Entity>() -> Result<&'static EntityDescriptor> {
    let id = TypeId::of::<E>();
    if let Some(descriptor) = DESCRIPTORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied()
    {
        return Ok(descriptor);
    }
    let mut descriptors = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(descriptor) = descriptors.get(&id).copied() {
        return Ok(descriptor);
    }
    let descriptor = EntityDescriptor::build(E::table_name(), E::field_defs()).map_err(|e| {
        log::error!("{:#}", e);
        e
    })?;
    log::debug!(
        "Resolved `{}` with {} fields",
        descriptor.table_name,
        descriptor.fields.len()
    );
    let descriptor: &'static EntityDescriptor = Box::leak(Box::new(descriptor));
    descriptors.insert(id, descriptor);
    Ok(descriptor)
}
