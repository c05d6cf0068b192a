use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListInfo, TypeInfo, Typed};
use crate::ops::List;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry};
use crate::registry::{TypeTraitDefault, TypeTraitFromPtr};

impl<T: Reflect + Typed + Default> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed + Default> Reflect for Vec<T> {
    crate::__impl_reflect_cast_fn!(List);
}

impl<T: Reflect + Typed + Default> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        let item = value.take::<T>()?;
        Vec::push(self, item);
        Ok(())
    }

    fn push_default(&mut self) -> &mut dyn Reflect {
        let index = Vec::len(self);
        Vec::push(self, T::default());
        &mut self[index]
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(<[T]>::iter(self).map(|item| item as &dyn Reflect))
    }
}

impl<T: Reflect + GetTypeMeta + Default> GetTypeMeta for Vec<T> {
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

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::ops::{List, ReflectMut};

    #[test]
    fn push_checks_item_type() {
        let mut list: Vec<i32> = Vec::new();

        let ReflectMut::List(view) = list.reflect_mut() else {
            panic!("not a list");
        };
        assert!(view.push(Box::new(3i32)).is_ok());
        assert!(view.push(Box::new(3u8)).is_err());
        *view.push_default().downcast_mut::<i32>().unwrap() = 7;
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(1).and_then(|v| v.downcast_ref::<i32>()), Some(&7));

        assert_eq!(list, [3, 7]);
    }
}
