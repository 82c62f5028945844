use super::error::EngineError;
use super::registry::MappingRegistry;
use super::store::AssociationStore;

/// Concatenates the registry's mapping description for every bound structure.
pub fn describe_mappings<R: MappingRegistry + ?Sized>(
    store: &AssociationStore,
    registry: &R,
) -> Result<String, EngineError> {
    let mut report = String::new();
    for binding in store.bindings() {
        let description = registry.describe_mapping(binding.entry().file(), &binding.sequences())?;
        report.push_str(&description);
    }
    Ok(report)
}
