use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};

use dx_utils::collections::OrderedMap;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{MapInfo, TypeInfo, Typed};
use crate::ops::Map;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry};
use crate::registry::{TypeTraitDefault, TypeTraitFromPtr};

// `K` and `V` must be reflected, `$bounds` adds what the container needs.
macro_rules! impl_reflect_map {
    ({$($param:ident),+} $ty:ty, ordered = $ordered:literal, [$($bounds:tt)+]) => {
        impl<$($param),+> Typed for $ty
        where
            K: Reflect + Typed,
            V: Reflect + Typed,
            $($bounds)+
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>($ordered)))
            }
        }

        impl<$($param),+> Reflect for $ty
        where
            K: Reflect + Typed,
            V: Reflect + Typed,
            $($bounds)+
        {
            crate::__impl_reflect_cast_fn!(Map);
        }

        impl<$($param),+> Map for $ty
        where
            K: Reflect + Typed,
            V: Reflect + Typed,
            $($bounds)+
        {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
                let key = key.downcast_ref::<K>()?;
                Self::get(self, key).map(|v| v as &dyn Reflect)
            }

            fn insert(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                let key = match key.take::<K>() {
                    Ok(key) => key,
                    Err(key) => return Err((key, value)),
                };
                let value = match value.take::<V>() {
                    Ok(value) => value,
                    Err(value) => return Err((Box::new(key), value)),
                };
                Self::insert(self, key, value);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                Self::clear(self);
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(Self::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
            }
        }

        impl<$($param),+> GetTypeMeta for $ty
        where
            K: Reflect + GetTypeMeta,
            V: Reflect + GetTypeMeta,
            $($bounds)+
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta.insert_trait::<TypeTraitFromPtr>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_reflect_map!(
    {K, V, S} std::collections::HashMap<K, V, S>,
    ordered = false,
    [K: Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static]
);

impl_reflect_map!(
    {K, V, S} dx_utils::hash::hashbrown::HashMap<K, V, S>,
    ordered = false,
    [K: Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static]
);

impl_reflect_map!({K, V} BTreeMap<K, V>, ordered = true, [K: Ord]);

impl_reflect_map!({K, V} OrderedMap<K, V>, ordered = true, [K: Eq + Hash]);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use dx_utils::collections::OrderedMap;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::{Map, ReflectMut};

    #[test]
    fn ordered_map_keeps_insertion_order() {
        let mut map: OrderedMap<String, i32> = OrderedMap::new();

        let ReflectMut::Map(view) = map.reflect_mut() else {
            panic!("not a map");
        };
        assert!(view.insert(Box::new(String::from("b")), Box::new(1i32)).is_ok());
        assert!(view.insert(Box::new(String::from("a")), Box::new(2i32)).is_ok());
        assert!(view.insert(Box::new(3u8), Box::new(2i32)).is_err());

        let keys: Vec<&str> = view
            .iter()
            .filter_map(|(k, _)| k.downcast_ref::<String>())
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["b", "a"]);

        let key = String::from("a");
        assert_eq!(view.get(&key).and_then(|v| v.downcast_ref::<i32>()), Some(&2));

        let info = <OrderedMap<String, i32>>::type_info().as_map().unwrap();
        assert!(info.is_ordered());
    }
}
