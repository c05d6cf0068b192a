use alloc::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::diagnostic::{DcResult, DiagnosticConsumer, LogConsumer};
use crate::engine::Engine;
use crate::handlers::{setup_json_serialize_handlers, setup_pipe_serialize_handlers};
use crate::property::PropertyDesc;
use crate::reader::Reader;
use crate::registry::HandlerRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Write enums as their integral value instead of the member name.
    pub enum_as_integer: bool,
    pub max_depth: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            enum_as_integer: false,
            max_depth: 64,
        }
    }
}

/// Drives a reader into a writer, resolving handlers by the type of the
/// source value.
pub struct Serializer {
    registry: HandlerRegistry<Self>,
    options: SerializeOptions,
    consumer: Arc<dyn DiagnosticConsumer>,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            options: SerializeOptions::default(),
            consumer: Arc::new(LogConsumer),
        }
    }

    /// Writes host values as JSON.
    pub fn json() -> Self {
        let mut engine = Self::new();
        setup_json_serialize_handlers(&mut engine.registry);
        engine
    }

    pub fn pipe() -> Self {
        let mut engine = Self::new();
        setup_pipe_serialize_handlers(&mut engine.registry);
        engine
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_consumer(mut self, consumer: Arc<dyn DiagnosticConsumer>) -> Self {
        self.consumer = consumer;
        self
    }

    #[inline]
    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry<Self> {
        &mut self.registry
    }
}

impl Engine for Serializer {
    const NAME: &'static str = "serialize";

    type Options = SerializeOptions;

    #[inline]
    fn registry(&self) -> &HandlerRegistry<Self> {
        &self.registry
    }

    #[inline]
    fn options(&self) -> &SerializeOptions {
        &self.options
    }

    #[inline]
    fn max_depth(&self) -> usize {
        self.options.max_depth
    }

    #[inline]
    fn consumer(&self) -> &dyn DiagnosticConsumer {
        &*self.consumer
    }

    fn expected_property(ctx: &mut Context<'_, Self>) -> DcResult<Option<PropertyDesc>> {
        ctx.reader.peek_read_property()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;

    use dx_reflect::registry::TypeRegistry;
    use serde_json::json;

    use super::{SerializeOptions, Serializer};
    use crate::de::{DeserializeOptions, Deserializer};
    use crate::diagnostic::ErrorCode;
    use crate::driver::{deserialize_json, deserialize_json_with, serialize_json, serialize_json_with};
    use crate::fixtures::{Color, Permissions, References};
    use crate::types::{
        ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, ObjectRef,
        SoftClassRef, SparseDelegate,
    };

    fn host() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<References>();
        registry.register::<Permissions>();
        registry.register::<Vec<Color>>();
        registry.register::<BTreeMap<bool, i32>>();
        registry.register::<BTreeMap<Color, i32>>();
        registry
    }

    #[test]
    fn options_from_json() {
        let options: SerializeOptions = serde_json::from_str(r#"{"enum_as_integer": true}"#).unwrap();
        assert!(options.enum_as_integer);
        assert_eq!(options.max_depth, SerializeOptions::default().max_depth);
        assert!(Serializer::new().registry_mut().is_empty());
        assert!(!Serializer::json().registry_mut().is_empty());
    }

    #[test]
    fn reference_kinds_round_trip() {
        let registry = host();
        let value = References {
            class: ClassRef::new("/Script/Hero"),
            lazy: LazyRef::new("6F9619FF-8B86-D011-B42D-00C04FC964FF"),
            soft_class: SoftClassRef::new("/Game/Hero.Hero_C"),
            interface: InterfaceRef {
                object: ObjectRef::new("/Game/Door"),
                interface: "Openable".into(),
            },
            field: FieldPath::new("Hero:Stats.Health"),
            delegate: Delegate::new("Hero.OnHit"),
            multicast: MulticastDelegate::new("Hero.OnDeath"),
            sparse: SparseDelegate::new("Hero.OnSpawn"),
        };

        let doc = serialize_json(&registry, &value).unwrap();
        assert_eq!(doc["Class"], json!("/Script/Hero"));
        assert_eq!(
            doc["Interface"],
            json!({"object": "/Game/Door", "interface": "Openable"})
        );
        assert_eq!(doc["Sparse"], json!("Hero.OnSpawn"));

        let mut back = References::default();
        deserialize_json(&registry, &doc, &mut back).unwrap();
        assert_eq!(back, value);

        let doc = serialize_json(&registry, &References::default()).unwrap();
        assert_eq!(doc["Class"], json!(null));
        assert_eq!(doc["Interface"], json!(null));
        let mut back = value.clone();
        deserialize_json(&registry, &doc, &mut back).unwrap();
        assert_eq!(back, References::default());
    }

    #[test]
    fn flags_without_names_round_trip() {
        let registry = host();
        for flags in [
            Permissions::empty(),
            Permissions::READ | Permissions::WRITE,
            Permissions::from_bits_retain(8),
            Permissions::READ | Permissions::from_bits_retain(16),
        ] {
            let doc = serialize_json(&registry, &flags).unwrap();
            let mut back = Permissions::READ;
            deserialize_json(&registry, &doc, &mut back).unwrap();
            assert_eq!(back, flags, "{doc}");
        }
    }

    #[test]
    fn non_string_keys_round_trip() {
        let registry = host();

        let by_bool = BTreeMap::from([(true, 1), (false, 2)]);
        let doc = serialize_json(&registry, &by_bool).unwrap();
        assert_eq!(doc, json!({"false": 2, "true": 1}));
        let mut back: BTreeMap<bool, i32> = BTreeMap::new();
        deserialize_json(&registry, &doc, &mut back).unwrap();
        assert_eq!(back, by_bool);

        let by_color = BTreeMap::from([(Color::Red, 0), (Color::Blue, 2)]);
        let doc = serialize_json(&registry, &by_color).unwrap();
        assert_eq!(doc, json!({"Red": 0, "Blue": 2}));
        let mut back: BTreeMap<Color, i32> = BTreeMap::new();
        deserialize_json(&registry, &doc, &mut back).unwrap();
        assert_eq!(back, by_color);
    }

    #[test]
    fn enums_as_integers_round_trip() {
        let registry = host();
        let values = vec![Color::Blue, Color::Red, Color::Green];

        let ser = Serializer::json().with_options(SerializeOptions {
            enum_as_integer: true,
            ..SerializeOptions::default()
        });
        let doc = serialize_json_with(&ser, &registry, &values).unwrap();
        assert_eq!(doc, json!([2, 0, 1]));

        let mut back: Vec<Color> = Vec::new();
        let err = deserialize_json(&registry, &doc, &mut back).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);

        let de = Deserializer::json().with_options(DeserializeOptions {
            enum_from_integer: true,
            ..DeserializeOptions::default()
        });
        deserialize_json_with(&de, &registry, &doc, &mut back).unwrap();
        assert_eq!(back, values);
    }
}
