use alloc::string::String;
use core::any::TypeId;

use dx_utils::TypeIdMap;
use dx_utils::hash::{HashMap, HashSet};

use crate::registry::{GetTypeMeta, TypeMeta};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The store of reflected types, searchable by [`TypeId`], full path and
/// short name.
///
/// Short names that collide between two registered types become ambiguous
/// and are no longer resolvable by name; the full path still works.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use dx_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<Option<i32>>>();
///
/// assert!(registry.contains(TypeId::of::<Option<i32>>()));
/// assert!(registry.get_with_type_name("Vec<Option<i32>>").is_some());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a registry holding the primitive types:
    /// `bool`, `i8 - i64`, `u8 - u64`, `f32`, `f64` and `String`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // The type must not be registered yet.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    /// Registers `T` and, on first registration, its dependencies.
    pub fn register<T: GetTypeMeta>(&mut self) {
        let inserted = self.type_meta_table.try_insert(TypeId::of::<T>(), || {
            let meta = T::get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        });
        if inserted {
            T::register_dependencies(self);
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if more than one registered type has this short name.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::registry::TypeTraitDefault;

    mod first {
        crate::reflect_struct! {
            #[derive(Default)]
            pub struct Twin {
                pub a: u8,
            }
        }
    }

    mod second {
        crate::reflect_struct! {
            #[derive(Default)]
            pub struct Twin {
                pub b: u8,
            }
        }
    }

    #[test]
    fn colliding_short_names_become_ambiguous() {
        let mut registry = TypeRegistry::new();
        registry.register::<first::Twin>();
        assert!(registry.get_with_type_name("Twin").is_some());

        registry.register::<second::Twin>();
        assert!(registry.is_ambiguous("Twin"));
        assert!(registry.get_with_type_name("Twin").is_none());

        let path = core::any::type_name::<second::Twin>();
        let meta = registry.get_with_type_path(path).unwrap();
        assert!(meta.has_trait::<TypeTraitDefault>());
    }

    #[test]
    fn new_holds_primitives() {
        let registry = TypeRegistry::new();
        for name in ["bool", "i8", "u64", "f32", "String"] {
            assert!(registry.get_with_type_name(name).is_some(), "{name}");
        }
        assert_eq!(registry.len(), 12);
    }
}
