use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use dx_reflect::info::TypeInfo;
use dx_utils::TypeIdMap;
use dx_utils::hash::HashMap;

use crate::context::Context;
use crate::data::DataEntry;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::engine::Engine;
use crate::property::PropertyDesc;

// -----------------------------------------------------------------------------
// Handler

/// Reads one logical value from the context's reader and writes one to its
/// writer.
pub type Handler<E> = Box<dyn Fn(&mut Context<'_, E>) -> DcResult<()> + Send + Sync>;

/// Selects the handler of a predicated registration.
pub type Predicate = Box<dyn Fn(&PropertyDesc) -> bool + Send + Sync>;

/// Which table a handler was resolved from, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerTier {
    Type,
    Predicate,
    Entry,
}

impl fmt::Display for HandlerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Type => "type",
            Self::Predicate => "predicate",
            Self::Entry => "entry",
        })
    }
}

// -----------------------------------------------------------------------------
// HandlerRegistry

/// The handlers of one engine.
///
/// Resolution tries the exact type of the expected property, then the
/// predicates, then the data entry. Registering a type or an entry twice
/// replaces the earlier handler; predicates are never ordered against each
/// other, so more than one match is an error.
pub struct HandlerRegistry<E: Engine> {
    by_type: TypeIdMap<Handler<E>>,
    predicated: Vec<(Predicate, Handler<E>)>,
    by_entry: HashMap<DataEntry, Handler<E>>,
}

impl<E: Engine> Default for HandlerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> HandlerRegistry<E> {
    pub fn new() -> Self {
        Self {
            by_type: TypeIdMap::new(),
            predicated: Vec::new(),
            by_entry: HashMap::default(),
        }
    }

    pub fn register_type<T: 'static>(
        &mut self,
        handler: impl Fn(&mut Context<'_, E>) -> DcResult<()> + Send + Sync + 'static,
    ) {
        self.register_type_id(TypeId::of::<T>(), handler);
    }

    pub fn register_type_id(
        &mut self,
        type_id: TypeId,
        handler: impl Fn(&mut Context<'_, E>) -> DcResult<()> + Send + Sync + 'static,
    ) {
        self.by_type.insert(type_id, Box::new(handler));
    }

    pub fn register_entry(
        &mut self,
        entry: DataEntry,
        handler: impl Fn(&mut Context<'_, E>) -> DcResult<()> + Send + Sync + 'static,
    ) {
        self.by_entry.insert(entry, Box::new(handler));
    }

    pub fn register_predicate(
        &mut self,
        predicate: impl Fn(&PropertyDesc) -> bool + Send + Sync + 'static,
        handler: impl Fn(&mut Context<'_, E>) -> DcResult<()> + Send + Sync + 'static,
    ) {
        self.predicated.push((Box::new(predicate), Box::new(handler)));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.predicated.is_empty() && self.by_entry.is_empty()
    }

    /// Number of registered handlers across all tiers.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_type.len() + self.predicated.len() + self.by_entry.len()
    }

    /// Finds the handler for a value.
    ///
    /// `entry` keys the last tier: the expected property's entry, or the
    /// peeked entry when no property is known.
    pub fn resolve(
        &self,
        desc: Option<&PropertyDesc>,
        entry: DataEntry,
    ) -> DcResult<(&Handler<E>, HandlerTier)> {
        if let Some(desc) = desc {
            if let Some(handler) = self.by_type.get(&desc.type_id()) {
                return Ok((handler, HandlerTier::Type));
            }

            let mut matched = self.predicated.iter().filter(|(predicate, _)| predicate(desc));
            if let Some((_, handler)) = matched.next() {
                let others = matched.count();
                if others > 0 {
                    return Err(Diagnostic::new(ErrorCode::AmbiguousHandler)
                        .with_arg("type", desc.type_name())
                        .with_arg("matches", others + 1));
                }
                return Ok((handler, HandlerTier::Predicate));
            }
        }

        match self.by_entry.get(&entry) {
            Some(handler) => Ok((handler, HandlerTier::Entry)),
            // A declared struct or enum may lack a handler; a plain kind
            // without one means the built-in set is missing.
            None => Err(match desc {
                Some(desc) if matches!(desc.type_info, TypeInfo::Struct(_) | TypeInfo::Enum(_)) => {
                    Diagnostic::new(ErrorCode::NoTypeHandler)
                        .with_arg("type", desc.type_name())
                        .with_arg("entry", entry)
                }
                Some(desc) => Diagnostic::new(ErrorCode::NoHandler)
                    .with_arg("entry", entry)
                    .with_arg("type", desc.type_name()),
                None => Diagnostic::new(ErrorCode::NoHandler).with_arg("entry", entry),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use dx_reflect::info::Typed;

    use super::{HandlerRegistry, HandlerTier};
    use crate::data::DataEntry;
    use crate::de::Deserializer;
    use crate::diagnostic::{Category, ErrorCode};
    use crate::fixtures::KeyableStruct;
    use crate::property::PropertyDesc;

    #[test]
    fn tiers_in_order() {
        let mut registry = HandlerRegistry::<Deserializer>::new();
        assert!(registry.is_empty());
        registry.register_entry(DataEntry::StructRoot, |_| Ok(()));

        let desc = PropertyDesc::of(KeyableStruct::type_info()).unwrap();
        let (_, tier) = registry.resolve(Some(&desc), desc.entry).unwrap();
        assert_eq!(tier, HandlerTier::Entry);

        registry.register_predicate(|desc| desc.entry == DataEntry::StructRoot, |_| Ok(()));
        let (_, tier) = registry.resolve(Some(&desc), desc.entry).unwrap();
        assert_eq!(tier, HandlerTier::Predicate);

        registry.register_type::<KeyableStruct>(|_| Ok(()));
        let (_, tier) = registry.resolve(Some(&desc), desc.entry).unwrap();
        assert_eq!(tier, HandlerTier::Type);
        assert_eq!(registry.len(), 3);

        let (_, tier) = registry.resolve(None, DataEntry::StructRoot).unwrap();
        assert_eq!(tier, HandlerTier::Entry);
    }

    #[test]
    fn ambiguous_and_missing() {
        let mut registry = HandlerRegistry::<Deserializer>::new();
        registry.register_predicate(|desc| desc.is::<KeyableStruct>(), |_| Ok(()));
        registry.register_predicate(|desc| desc.entry == DataEntry::StructRoot, |_| Ok(()));

        let desc = PropertyDesc::of(KeyableStruct::type_info()).unwrap();
        let err = registry.resolve(Some(&desc), desc.entry).err().unwrap();
        assert_eq!(err.code(), ErrorCode::AmbiguousHandler);
        assert_eq!(err.arg("matches"), Some("2"));

        let err = registry.resolve(None, DataEntry::Bool).err().unwrap();
        assert_eq!(err.code(), ErrorCode::NoHandler);
        assert_eq!(err.arg("entry"), Some("Bool"));
        assert_eq!(err.category(), Category::Configuration);
        assert!(!err.is_recoverable());

        let plain = HandlerRegistry::<Deserializer>::new();
        let err = plain.resolve(Some(&desc), desc.entry).err().unwrap();
        assert_eq!(err.code(), ErrorCode::NoTypeHandler);
        assert_eq!(err.arg("type"), Some("KeyableStruct"));
        assert_eq!(err.category(), Category::Lookup);
        assert!(err.is_recoverable());

        let desc = PropertyDesc::of(bool::type_info()).unwrap();
        let err = plain.resolve(Some(&desc), desc.entry).err().unwrap();
        assert_eq!(err.code(), ErrorCode::NoHandler);
    }
}
