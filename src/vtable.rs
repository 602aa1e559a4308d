//! VTable registry used to over-approximate dynamic-dispatch targets.
//!
//! One `VTable` per concrete type, mapping method name to the `node_id` of
//! that type's implementation. `VTableResolver` additionally tracks which
//! types implement which named interfaces so Phase 2 can expand a dispatch
//! edge into one edge per concrete implementor.

use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct VTable {
    pub base_type: String,
    pub methods: FxHashMap<String, u32>,
}

impl VTable {
    pub fn new(base_type: impl Into<String>) -> Self {
        Self {
            base_type: base_type.into(),
            methods: FxHashMap::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct VTableResolver {
    vtables: FxHashMap<String, VTable>,
    /// interface_name -> set of implementing type names. Kept as a set
    /// (not a Vec) per the §9 open-question resolution: registration is
    /// idempotent, duplicate registrations of the same pair are no-ops.
    interface_impls: FxHashMap<String, FxHashSet<String>>,
}

impl VTableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_vtable(&mut self, vtable: VTable) {
        self.vtables
            .entry(vtable.base_type.clone())
            .or_insert_with(|| VTable::new(vtable.base_type.clone()))
            .methods
            .extend(vtable.methods);
    }

    pub fn register_implementation(&mut self, interface_name: &str, type_name: &str) {
        self.interface_impls
            .entry(interface_name.to_string())
            .or_default()
            .insert(type_name.to_string());
    }

    /// Target node ids for `method_name` across every type implementing
    /// `interface_name`. An empty `interface_name` means "unknown receiver
    /// interface" (the common case in this implementation, per §4.5) and
    /// resolves across *every* registered vtable instead.
    pub fn resolve(&self, interface_name: &str, method_name: &str) -> Vec<u32> {
        if interface_name.is_empty() {
            return self
                .vtables
                .values()
                .filter_map(|vt| vt.methods.get(method_name).copied())
                .collect();
        }

        let Some(types) = self.interface_impls.get(interface_name) else {
            return Vec::new();
        };
        types
            .iter()
            .filter_map(|type_name| self.vtables.get(type_name))
            .filter_map(|vt| vt.methods.get(method_name).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_across_all_vtables_with_empty_interface() {
        let mut resolver = VTableResolver::new();
        let mut a = VTable::new("A");
        a.methods.insert("foo".into(), 1);
        let mut b = VTable::new("B");
        b.methods.insert("foo".into(), 2);
        resolver.register_vtable(a);
        resolver.register_vtable(b);

        let mut targets = resolver.resolve("", "foo");
        targets.sort();
        assert_eq!(targets, vec![1, 2]);
    }

    #[test]
    fn test_resolve_scoped_to_interface() {
        let mut resolver = VTableResolver::new();
        let mut a = VTable::new("A");
        a.methods.insert("foo".into(), 1);
        resolver.register_vtable(a);
        resolver.register_implementation("I", "A");

        assert_eq!(resolver.resolve("I", "foo"), vec![1]);
        assert!(resolver.resolve("Other", "foo").is_empty());
    }

    #[test]
    fn test_register_implementation_is_idempotent() {
        let mut resolver = VTableResolver::new();
        resolver.register_implementation("I", "A");
        resolver.register_implementation("I", "A");
        assert_eq!(resolver.interface_impls.get("I").unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_unknown_method_returns_empty() {
        let resolver = VTableResolver::new();
        assert!(resolver.resolve("", "nonexistent").is_empty());
    }
}
