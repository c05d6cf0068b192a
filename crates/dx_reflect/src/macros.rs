// -----------------------------------------------------------------------------
// Shared pieces

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_get_type_meta {
    ($ty:ty $(, $dep:ty)* $(,)?) => {
        impl $crate::registry::GetTypeMeta for $ty {
            fn get_type_meta() -> $crate::registry::TypeMeta {
                let mut meta = $crate::registry::TypeMeta::of::<Self>();
                meta.insert_trait::<$crate::registry::TypeTraitDefault>(
                    $crate::registry::FromType::<Self>::from_type(),
                );
                meta.insert_trait::<$crate::registry::TypeTraitFromPtr>(
                    $crate::registry::FromType::<Self>::from_type(),
                );
                meta
            }

            #[allow(unused_variables, reason = "opaque types have no dependencies")]
            fn register_dependencies(registry: &mut $crate::registry::TypeRegistry) {
                $( registry.register::<$dep>(); )*
            }
        }
    };
}

/// Expands to the reflected name of a field: the rename if given, else the identifier.
#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        ::core::stringify!($field)
    };
    ($field:ident, $rename:literal) => {
        $rename
    };
}

// -----------------------------------------------------------------------------
// Opaque

/// Implements reflection for types without reflected structure.
///
/// The type must implement `Default`, `Debug`, `Send` and `Sync`.
///
/// ```
/// use dx_reflect::{impl_reflect_opaque, Reflect};
/// use dx_reflect::info::ReflectKind;
///
/// #[derive(Debug, Default)]
/// struct Handle(u32);
///
/// impl_reflect_opaque!(Handle);
///
/// assert_eq!(Handle(3).reflect_kind(), ReflectKind::Opaque);
/// ```
#[macro_export]
macro_rules! impl_reflect_opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::info::Typed for $ty {
                fn type_info() -> &'static $crate::info::TypeInfo {
                    static CELL: $crate::impls::NonGenericTypeInfoCell =
                        $crate::impls::NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| {
                        $crate::info::TypeInfo::Opaque($crate::info::OpaqueInfo::new::<Self>())
                    })
                }
            }

            impl $crate::Reflect for $ty {
                $crate::__impl_reflect_cast_fn!(Opaque);

                #[inline]
                fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    ::core::fmt::Debug::fmt(self, f)
                }
            }

            $crate::__impl_get_type_meta!($ty);
        )+
    };
}

// -----------------------------------------------------------------------------
// Struct and class

/// Declares a struct and implements reflection for it.
///
/// Every field type must be reflected. A field can be renamed with
/// `field: Type => "Name"`. The struct must implement `Default`.
///
/// ```
/// use dx_reflect::reflect_struct;
/// use dx_reflect::info::Typed;
///
/// reflect_struct! {
///     #[derive(Debug, Default)]
///     pub struct Item {
///         pub id: u32 => "Id",
///         pub tags: Vec<String>,
///     }
/// }
///
/// let info = Item::type_info().as_struct().unwrap();
/// assert_eq!(info.field_names(), &["Id", "tags"]);
/// assert!(!info.is_class());
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty $(=> $rename:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $fty, )*
        }

        $crate::__impl_reflect_struct!(false, $name { $( $field : $fty $(=> $rename)? ),* });
    };
}

/// Like [`reflect_struct!`], but flags the type as a class: a struct that
/// the host model addresses by identity.
///
/// ```
/// use dx_reflect::reflect_class;
/// use dx_reflect::info::Typed;
///
/// reflect_class! {
///     #[derive(Default)]
///     pub struct Actor {
///         pub health: f32,
///     }
/// }
///
/// assert!(Actor::type_info().as_struct().unwrap().is_class());
/// ```
#[macro_export]
macro_rules! reflect_class {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty $(=> $rename:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $fty, )*
        }

        $crate::__impl_reflect_struct!(true, $name { $( $field : $fty $(=> $rename)? ),* });
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_reflect_struct {
    ($class:literal, $name:ident { $( $field:ident : $fty:ty $(=> $rename:literal)? ),* }) => {
        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Struct(
                        $crate::info::StructInfo::new::<Self>(&[
                            $( $crate::info::NamedField::new::<$fty>($crate::__field_name!($field $(, $rename)?)), )*
                        ])
                        .with_class($class),
                    )
                })
            }
        }

        impl $crate::Reflect for $name {
            $crate::__impl_reflect_cast_fn!(Struct);
        }

        impl $crate::ops::Struct for $name {
            #[allow(unused_variables, reason = "structs may have no fields")]
            fn field(&self, name: &str) -> ::core::option::Option<&dyn $crate::Reflect> {
                $(
                    if name == $crate::__field_name!($field $(, $rename)?) {
                        return ::core::option::Option::Some(&self.$field);
                    }
                )*
                ::core::option::Option::None
            }

            #[allow(unused_variables, reason = "structs may have no fields")]
            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn $crate::Reflect> {
                $(
                    if name == $crate::__field_name!($field $(, $rename)?) {
                        return ::core::option::Option::Some(&mut self.$field);
                    }
                )*
                ::core::option::Option::None
            }
        }

        $crate::__impl_get_type_meta!($name $(, $fty)*);
    };
}

// -----------------------------------------------------------------------------
// Enum

/// Declares a fieldless enum with an explicit representation and implements
/// reflection for it.
///
/// Every variant needs an explicit discriminant; a member can be renamed
/// with `Variant = 1 => "Name"`. The enum must implement `Default`.
///
/// ```
/// use dx_reflect::reflect_enum;
/// use dx_reflect::info::Typed;
/// use dx_reflect::ops::Enum;
///
/// reflect_enum! {
///     #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
///     pub enum Mode: u8 {
///         #[default]
///         Off = 0,
///         On = 2 => "Enabled",
///     }
/// }
///
/// let info = Mode::type_info().as_enum().unwrap();
/// assert!(info.is_unsigned());
/// assert_eq!(info.variant("Enabled").map(|v| v.value()), Some(2));
///
/// let mut mode = Mode::Off;
/// assert!(mode.set_discriminant(2));
/// assert_eq!(mode, Mode::On);
/// assert!(!mode.set_discriminant(1));
/// ```
#[macro_export]
macro_rules! reflect_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr $(=> $rename:literal)? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr($repr)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Enum($crate::info::EnumInfo::new::<Self>(
                        &[
                            $( $crate::info::EnumVariant::new(
                                $crate::__field_name!($variant $(, $rename)?),
                                $name::$variant as $repr as i64,
                            ), )+
                        ],
                        <$repr>::MIN == 0,
                    ))
                })
            }
        }

        impl $crate::Reflect for $name {
            $crate::__impl_reflect_cast_fn!(Enum);
        }

        impl $crate::ops::Enum for $name {
            fn discriminant(&self) -> i64 {
                match self {
                    $( $name::$variant => $name::$variant as $repr as i64, )+
                }
            }

            fn set_discriminant(&mut self, value: i64) -> bool {
                $(
                    if value == $name::$variant as $repr as i64 {
                        *self = $name::$variant;
                        return true;
                    }
                )+
                false
            }
        }

        $crate::__impl_get_type_meta!($name);
    };
}

// -----------------------------------------------------------------------------
// Flags

/// Implements reflection for a type declared with [`bitflags!`](crate::bitflags::bitflags).
///
/// The type is reflected as a flag enum; each named flag becomes a member.
///
/// ```
/// use dx_reflect::{bitflags::bitflags, impl_reflect_flags};
/// use dx_reflect::info::Typed;
///
/// bitflags! {
///     #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
///     pub struct Access: u8 {
///         const READ = 1;
///         const WRITE = 2;
///     }
/// }
///
/// impl_reflect_flags!(Access);
///
/// let info = Access::type_info().as_enum().unwrap();
/// assert!(info.is_flags());
/// assert_eq!(info.flags_name(3).as_deref(), Some("READ | WRITE"));
/// ```
#[macro_export]
macro_rules! impl_reflect_flags {
    ($ty:ty) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let variants: $crate::__macro_exports::Vec<$crate::info::EnumVariant> =
                        <$ty as $crate::bitflags::Flags>::FLAGS
                            .iter()
                            .filter(|flag| !flag.name().is_empty())
                            .map(|flag| {
                                $crate::info::EnumVariant::new(
                                    flag.name(),
                                    $crate::impls::FlagBits::to_i64(
                                        $crate::bitflags::Flags::bits(flag.value()),
                                    ),
                                )
                            })
                            .collect();
                    $crate::info::TypeInfo::Enum(
                        $crate::info::EnumInfo::new::<Self>(
                            &variants,
                            <<$ty as $crate::bitflags::Flags>::Bits as $crate::impls::FlagBits>::UNSIGNED,
                        )
                        .with_flags(true),
                    )
                })
            }
        }

        impl $crate::Reflect for $ty {
            $crate::__impl_reflect_cast_fn!(Enum);
        }

        impl $crate::ops::Enum for $ty {
            #[inline]
            fn discriminant(&self) -> i64 {
                $crate::impls::FlagBits::to_i64($crate::bitflags::Flags::bits(self))
            }

            /// Bits without a name are kept.
            fn set_discriminant(&mut self, value: i64) -> bool {
                let flags = $crate::impls::FlagBits::from_i64(value)
                    .map(<$ty as $crate::bitflags::Flags>::from_bits_retain);
                match flags {
                    ::core::option::Option::Some(flags) => {
                        *self = flags;
                        true
                    }
                    ::core::option::Option::None => false,
                }
            }
        }

        $crate::__impl_get_type_meta!($ty);
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::{Enum, ReflectMut, ReflectRef};
    use crate::registry::TypeRegistry;

    crate::reflect_struct! {
        #[derive(Debug, Default, PartialEq)]
        struct Inner {
            value: i32 => "Value",
            label: String,
        }
    }

    crate::reflect_struct! {
        #[derive(Debug, Default)]
        struct Outer {
            inner: Inner,
            items: Vec<u16>,
        }
    }

    crate::reflect_struct! {
        #[derive(Debug, Default)]
        struct Empty {}
    }

    crate::reflect_enum! {
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        enum Signed: i16 {
            #[default]
            Low = -4,
            High = 9,
        }
    }

    crate::bitflags::bitflags! {
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        struct Bits: u32 {
            const A = 1;
            const B = 4;
        }
    }

    crate::impl_reflect_flags!(Bits);

    #[test]
    fn struct_fields_by_reflected_name() {
        let mut inner = Inner { value: 5, label: String::from("x") };

        let ReflectMut::Struct(view) = inner.reflect_mut() else {
            panic!("not a struct");
        };
        *view.field_mut("Value").unwrap().downcast_mut::<i32>().unwrap() = 8;
        assert!(view.field("value").is_none());
        assert_eq!(view.field_len(), 2);
        assert_eq!(view.name_at(1), Some("label"));

        assert_eq!(inner.value, 8);
    }

    #[test]
    fn empty_struct() {
        let info = Empty::type_info().as_struct().unwrap();
        assert_eq!(info.field_len(), 0);
        assert_eq!(Empty::default().reflect_kind(), ReflectKind::Struct);
    }

    #[test]
    fn registering_registers_fields() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Outer>();

        assert!(registry.get_with_type_name("Outer").is_some());
        assert!(registry.get_with_type_name("Inner").is_some());
        assert!(registry.get_with_type_name("Vec<u16>").is_some());
        assert!(registry.get_with_type_name("u16").is_some());
        assert!(registry.get_with_type_name("String").is_some());
    }

    #[test]
    fn signed_enum() {
        let info = Signed::type_info().as_enum().unwrap();
        assert!(!info.is_unsigned());
        assert_eq!(info.variant_by_value(-4).map(|v| v.name()), Some("Low"));

        let mut value = Signed::High;
        assert_eq!(value.discriminant(), 9);
        assert_eq!(value.variant_name(), Some("High"));
        assert!(value.set_discriminant(-4));
        assert_eq!(value, Signed::Low);
    }

    #[test]
    fn flags_enum() {
        let info = Bits::type_info().as_enum().unwrap();
        assert!(info.is_flags());
        assert!(info.is_unsigned());
        assert_eq!(info.parse_flags("A | B"), Some(5));
        assert_eq!(info.flags_name(2), None);

        let mut bits = Bits::A;
        assert!(bits.set_discriminant(5));
        assert_eq!(bits, Bits::A | Bits::B);
        assert!(bits.set_discriminant(2));
        assert_eq!(bits.discriminant(), 2);
        assert_eq!(bits.variant_name(), None);

        let ReflectRef::Enum(view) = bits.reflect_ref() else {
            panic!("not an enum");
        };
        assert_eq!(view.discriminant(), 5);
    }
}
