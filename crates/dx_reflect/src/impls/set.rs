use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use core::hash::{BuildHasher, Hash};

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{SetInfo, TypeInfo, Typed};
use crate::ops::Set;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry};
use crate::registry::{TypeTraitDefault, TypeTraitFromPtr};

macro_rules! impl_reflect_set {
    ({$($param:ident),+} $ty:ty, ordered = $ordered:literal, [$($bounds:tt)+]) => {
        impl<$($param),+> Typed for $ty
        where
            T: Reflect + Typed,
            $($bounds)+
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Set(SetInfo::new::<Self, T>($ordered)))
            }
        }

        impl<$($param),+> Reflect for $ty
        where
            T: Reflect + Typed,
            $($bounds)+
        {
            crate::__impl_reflect_cast_fn!(Set);
        }

        impl<$($param),+> Set for $ty
        where
            T: Reflect + Typed,
            $($bounds)+
        {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn contains(&self, value: &dyn Reflect) -> bool {
                value
                    .downcast_ref::<T>()
                    .is_some_and(|value| Self::contains(self, value))
            }

            fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, Box<dyn Reflect>> {
                let value = value.take::<T>()?;
                Ok(Self::insert(self, value))
            }

            #[inline]
            fn clear(&mut self) {
                Self::clear(self);
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(Self::iter(self).map(|v| v as &dyn Reflect))
            }
        }

        impl<$($param),+> GetTypeMeta for $ty
        where
            T: Reflect + GetTypeMeta,
            $($bounds)+
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta.insert_trait::<TypeTraitFromPtr>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }
    };
}

impl_reflect_set!(
    {T, S} std::collections::HashSet<T, S>,
    ordered = false,
    [T: Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static]
);

impl_reflect_set!(
    {T, S} dx_utils::hash::hashbrown::HashSet<T, S>,
    ordered = false,
    [T: Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static]
);

impl_reflect_set!({T} BTreeSet<T>, ordered = true, [T: Ord]);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;

    use crate::Reflect;
    use crate::ops::{ReflectMut, Set};

    #[test]
    fn insert_reports_duplicates() {
        let mut set: BTreeSet<u32> = BTreeSet::new();

        let ReflectMut::Set(view) = set.reflect_mut() else {
            panic!("not a set");
        };
        assert_eq!(view.insert(Box::new(5u32)).ok(), Some(true));
        assert_eq!(view.insert(Box::new(5u32)).ok(), Some(false));
        assert!(view.insert(Box::new(5i64)).is_err());
        assert!(view.contains(&5u32));
        assert!(!view.contains(&5u64));

        assert_eq!(set.len(), 1);
    }
}
