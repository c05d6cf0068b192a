use crate::info::Typed;

/// Builds a [`TypeTrait`](crate::registry::TypeTrait) for the type `T`.
///
/// # Example
///
/// ```
/// # use dx_reflect::registry::{TypeMeta, TypeTraitDefault, FromType};
/// let mut meta = TypeMeta::of::<String>();
///
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
/// ```
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
