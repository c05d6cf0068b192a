use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use dx_reflect::Reflect;
use dx_reflect::info::TypeInfo;
use dx_reflect::ops::ReflectMut;

use crate::data::{DataEntry, EnumData};
use crate::datum::Datum;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::extra::AnyStruct;
use crate::host::HostModel;
use crate::property::{PropertyDesc, data_entry_of};
use crate::types::{
    Blob, ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, Name, ObjectRef,
    SoftClassRef, SoftObjectRef, SparseDelegate, Text, WeakRef,
};
use crate::writer::{Writer, null_reference, write_mismatch};

#[cold]
fn unavailable() -> Diagnostic {
    Diagnostic::new(ErrorCode::DatumUnavailable)
}

#[cold]
fn type_mismatch(expected: &TypeInfo, found: &str) -> Diagnostic {
    Diagnostic::new(ErrorCode::TypeMismatch)
        .with_arg("expected", expected.type_name())
        .with_arg("found", found)
}

fn is_nullable(info: &TypeInfo) -> bool {
    matches!(info, TypeInfo::Optional(_))
        || info.is::<ObjectRef>()
        || info.is::<ClassRef>()
        || info.is::<InterfaceRef>()
        || info.is::<AnyStruct>()
}

fn accepts(info: &TypeInfo, next: DataEntry) -> bool {
    match data_entry_of(info) {
        Ok(entry) if entry == next => true,
        Ok(_) => {
            (next == DataEntry::None && is_nullable(info))
                || (next == DataEntry::ClassRoot && info.is::<AnyStruct>())
        }
        Err(_) => false,
    }
}

fn set_null(slot: &mut dyn Reflect) -> DcResult<()> {
    if let Some(value) = slot.downcast_mut::<ObjectRef>() {
        *value = ObjectRef::null();
    } else if let Some(value) = slot.downcast_mut::<ClassRef>() {
        *value = ClassRef::default();
    } else if let Some(value) = slot.downcast_mut::<InterfaceRef>() {
        *value = InterfaceRef::default();
    } else if let Some(value) = slot.downcast_mut::<AnyStruct>() {
        value.reset();
    } else if let ReflectMut::Optional(value) = slot.reflect_mut() {
        value.set_none();
    } else {
        return Err(unavailable());
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Frames

enum Slots {
    /// `None` while waiting for a field name.
    Struct { selected: Option<&'static str> },
    List { current: Option<usize> },
    Set {
        value_info: &'static TypeInfo,
        temp: Option<Box<dyn Reflect>>,
    },
    Map {
        key_info: &'static TypeInfo,
        value_info: &'static TypeInfo,
        key: Option<Box<dyn Reflect>>,
        value: Option<Box<dyn Reflect>>,
        at_value: bool,
    },
    Optional { filled: bool },
}

struct Frame {
    /// Type of the composite this frame fills.
    info: &'static TypeInfo,
    end: DataEntry,
    /// The payload of a shared struct, built before it is shared.
    owned: Option<Box<dyn Reflect>>,
    slots: Slots,
    /// Finished set elements or map pairs.
    count: usize,
}

impl Frame {
    fn new(info: &'static TypeInfo, end: DataEntry, slots: Slots) -> Self {
        Self {
            info,
            end,
            owned: None,
            slots,
            count: 0,
        }
    }

    fn container<'s>(&'s mut self, parent: &'s mut dyn Reflect) -> &'s mut dyn Reflect {
        match &mut self.owned {
            Some(owned) => &mut **owned,
            None => parent,
        }
    }

    /// The slot being written, inside the composite reached through `parent`.
    fn slot<'s>(&'s mut self, parent: &'s mut dyn Reflect) -> DcResult<&'s mut dyn Reflect> {
        let Frame {
            info, owned, slots, ..
        } = self;
        let container: &'s mut dyn Reflect = match owned {
            Some(owned) => &mut **owned,
            None => parent,
        };

        match slots {
            Slots::Struct { selected: None } => Err(Diagnostic::new(ErrorCode::ExpectFieldName)),
            Slots::Struct {
                selected: Some(name),
            } => match container.reflect_mut() {
                ReflectMut::Struct(value) => value.field_mut(*name).ok_or_else(|| {
                    Diagnostic::new(ErrorCode::UnknownField)
                        .with_arg("type", info.type_name())
                        .with_arg("field", *name)
                }),
                _ => Err(unavailable()),
            },
            Slots::List { current: Some(index) } => match container.reflect_mut() {
                ReflectMut::List(value) => value.get_mut(*index).ok_or_else(unavailable),
                _ => Err(unavailable()),
            },
            Slots::List { current: None } => Err(unavailable()),
            Slots::Set { temp, .. } => temp.as_deref_mut().ok_or_else(unavailable),
            Slots::Map {
                key,
                value,
                at_value,
                ..
            } => {
                let slot = if *at_value { value } else { key };
                slot.as_deref_mut().ok_or_else(unavailable)
            }
            Slots::Optional { .. } => match container.reflect_mut() {
                ReflectMut::Optional(value) => value.value_mut().ok_or_else(unavailable),
                _ => Err(unavailable()),
            },
        }
    }
}

fn slot_in<'s>(root: &'s mut dyn Reflect, frames: &'s mut [Frame]) -> DcResult<&'s mut dyn Reflect> {
    let mut current = root;
    for frame in frames {
        current = frame.slot(current)?;
    }
    Ok(current)
}

// -----------------------------------------------------------------------------
// PropertyWriter

/// Fills a host value in place.
///
/// Arrays, sets and maps are cleared when their root is written. Set elements
/// and map pairs are built in default-constructed temporaries, inserted once
/// complete. Inside a struct, [`write_name`](Writer::write_name) selects the
/// field the next value goes to. A slot holding an
/// [`AnyStruct`](crate::extra::AnyStruct) accepts a struct of any type
/// registered in the host model.
///
/// A failed write may leave the value partially filled.
pub struct PropertyWriter<'a> {
    host: &'a dyn HostModel,
    root: &'a mut dyn Reflect,
    root_written: bool,
    frames: Vec<Frame>,
    /// A slot handed out through `write_datum` and not finished yet.
    pending: bool,
}

impl<'a> PropertyWriter<'a> {
    pub fn new(host: &'a dyn HostModel, value: &'a mut dyn Reflect) -> Self {
        Self {
            host,
            root: value,
            root_written: false,
            frames: Vec::new(),
            pending: false,
        }
    }

    /// Writes into the value behind a datum.
    pub fn from_datum(datum: Datum<'a>) -> Self {
        let host = datum.host();
        Self::new(host, datum.into_reflect())
    }

    /// Finishes a slot handed out by [`write_datum`](Writer::write_datum) and
    /// checks that every composite was closed.
    pub fn finish(&mut self) -> DcResult<()> {
        self.settle()?;
        match self.frames.last() {
            Some(frame) => Err(Diagnostic::new(ErrorCode::UnexpectedEnd).with_arg("open", frame.end)),
            None => Ok(()),
        }
    }

    fn settle(&mut self) -> DcResult<()> {
        if core::mem::take(&mut self.pending) {
            self.finish_slot()?;
        }
        Ok(())
    }

    fn expects_name(&self) -> bool {
        matches!(
            self.frames.last(),
            Some(Frame {
                slots: Slots::Struct { selected: None },
                ..
            })
        )
    }

    /// The static type of the next slot; `None` while a field name is expected.
    fn next_slot_info(&self) -> DcResult<Option<&'static TypeInfo>> {
        let Some(frame) = self.frames.last() else {
            if self.root_written {
                return Err(Diagnostic::new(ErrorCode::RootConsumed));
            }
            return Ok(Some(self.root.reflect_type_info()));
        };

        let info = frame.info;
        let kind_error = |_| type_mismatch(info, "composite");
        let next = match &frame.slots {
            Slots::Struct { selected: None } => return Ok(None),
            Slots::Struct {
                selected: Some(name),
            } => info
                .as_struct()
                .map_err(kind_error)?
                .field(name)
                .map(|field| field.type_info()),
            Slots::List { .. } => Some(info.as_list().map_err(kind_error)?.item_info()),
            Slots::Set { .. } => Some(info.as_set().map_err(kind_error)?.value_info()),
            Slots::Map { at_value, .. } => {
                let map = info.as_map().map_err(kind_error)?;
                Some(if *at_value {
                    map.value_info()
                } else {
                    map.key_info()
                })
            }
            Slots::Optional { .. } => Some(info.as_optional().map_err(kind_error)?.inner_info()),
        };
        Ok(next)
    }

    fn expect(&mut self, next: DataEntry) -> DcResult<()> {
        if self.peek_write(next) {
            return Ok(());
        }

        let expected = if next.is_end() {
            self.frames.last().map_or(DataEntry::Nil, |frame| frame.end)
        } else if self.expects_name() {
            DataEntry::Name
        } else {
            match self.next_slot_info()? {
                Some(info) => data_entry_of(info)?,
                None => DataEntry::Nil,
            }
        };
        Err(write_mismatch(next, expected))
    }

    fn expect_end(&self, end: DataEntry) -> DcResult<()> {
        match self.frames.last() {
            Some(frame) if frame.end == end => Ok(()),
            Some(frame) => Err(Diagnostic::new(ErrorCode::UnbalancedEnd)
                .with_arg("open", frame.end)
                .with_arg("end", end)),
            None => Err(Diagnostic::new(ErrorCode::UnbalancedEnd).with_arg("end", end)),
        }
    }

    fn current_slot(&mut self) -> DcResult<&mut dyn Reflect> {
        slot_in(&mut *self.root, &mut self.frames)
    }

    fn top_container(&mut self) -> DcResult<&mut dyn Reflect> {
        match self.frames.split_last_mut() {
            None => Ok(&mut *self.root),
            Some((top, parents)) => {
                let parent = slot_in(&mut *self.root, parents)?;
                Ok(top.container(parent))
            }
        }
    }

    /// Makes room for the next value in the innermost composite.
    fn begin_slot(&mut self) -> DcResult<()> {
        let host = self.host;
        match self.frames.last_mut().map(|frame| &mut frame.slots) {
            None if self.root_written => Err(Diagnostic::new(ErrorCode::RootConsumed)),
            None => Ok(()),
            Some(Slots::Struct { selected: None }) => {
                Err(Diagnostic::new(ErrorCode::ExpectFieldName))
            }
            Some(Slots::Struct { .. }) => Ok(()),
            Some(Slots::Set { value_info, temp }) => {
                *temp = Some(host.construct(value_info)?);
                Ok(())
            }
            Some(Slots::Map {
                key_info,
                value_info,
                key,
                value,
                at_value,
            }) => {
                if *at_value {
                    *value = Some(host.construct(value_info)?);
                } else {
                    *key = Some(host.construct(key_info)?);
                }
                Ok(())
            }
            Some(Slots::List { .. }) => {
                let index = match self.top_container()?.reflect_mut() {
                    ReflectMut::List(list) => {
                        list.push_default();
                        list.len() - 1
                    }
                    _ => return Err(unavailable()),
                };
                if let Some(Frame {
                    slots: Slots::List { current },
                    ..
                }) = self.frames.last_mut()
                {
                    *current = Some(index);
                }
                Ok(())
            }
            Some(Slots::Optional { .. }) => match self.top_container()?.reflect_mut() {
                ReflectMut::Optional(optional) => {
                    optional.insert_default();
                    Ok(())
                }
                _ => Err(unavailable()),
            },
        }
    }

    /// Completes the value written into the current slot.
    fn finish_slot(&mut self) -> DcResult<()> {
        let Some(frame) = self.frames.last_mut() else {
            self.root_written = true;
            return Ok(());
        };

        match &mut frame.slots {
            Slots::Struct { selected } => *selected = None,
            Slots::List { .. } => {}
            Slots::Optional { filled } => *filled = true,
            Slots::Set { temp, .. } => {
                let value = temp.take().ok_or_else(unavailable)?;
                frame.count += 1;
                let info = frame.info;
                match self.top_container()?.reflect_mut() {
                    ReflectMut::Set(set) => {
                        set.insert(value)
                            .map_err(|value| type_mismatch(info, value.reflect_type_info().type_name()))?;
                    }
                    _ => return Err(unavailable()),
                }
            }
            Slots::Map {
                key,
                value,
                at_value,
                ..
            } => {
                if !*at_value {
                    *at_value = true;
                    return Ok(());
                }
                *at_value = false;
                let pair = key.take().zip(value.take()).ok_or_else(unavailable)?;
                frame.count += 1;
                let info = frame.info;
                match self.top_container()?.reflect_mut() {
                    ReflectMut::Map(map) => {
                        map.insert(pair.0, pair.1).map_err(|(key, _)| {
                            type_mismatch(info, key.reflect_type_info().type_name())
                        })?;
                    }
                    _ => return Err(unavailable()),
                }
            }
        }
        Ok(())
    }

    fn write_value<T: Reflect>(&mut self, entry: DataEntry, value: T) -> DcResult<()> {
        self.settle()?;
        self.expect(entry)?;
        self.begin_slot()?;
        let slot = self.current_slot()?;
        match slot.downcast_mut::<T>() {
            Some(slot) => *slot = value,
            None => {
                let found = slot.reflect_type_info().type_name();
                return Err(Diagnostic::new(ErrorCode::TypeMismatch)
                    .with_arg("expected", found)
                    .with_arg("found", entry));
            }
        }
        self.finish_slot()
    }

    fn write_struct_like(&mut self, entry: DataEntry, name: &str) -> DcResult<()> {
        self.settle()?;
        let end = match entry {
            DataEntry::ClassRoot => DataEntry::ClassEnd,
            _ => DataEntry::StructEnd,
        };

        match self.next_slot_info()? {
            Some(info) if info.is::<AnyStruct>() => {
                let meta = self.host.type_meta_by_name(name).ok_or_else(|| {
                    Diagnostic::new(ErrorCode::TypeNotRegistered).with_arg("type", name)
                })?;
                let target = meta.type_info();
                let is_class = target
                    .as_struct()
                    .map_err(|_| type_mismatch(info, target.type_name()))?
                    .is_class();
                if is_class != (entry == DataEntry::ClassRoot) {
                    return Err(write_mismatch(entry, data_entry_of(target)?));
                }

                let owned = self.host.construct(meta.type_info())?;
                self.begin_slot()?;
                let mut frame = Frame::new(target, end, Slots::Struct { selected: None });
                frame.owned = Some(owned);
                self.frames.push(frame);
            }
            info => {
                self.expect(entry)?;
                let info = info.ok_or_else(unavailable)?;
                if !name.is_empty() && name != info.type_name() && name != info.type_path() {
                    return Err(type_mismatch(info, name));
                }
                self.begin_slot()?;
                self.frames
                    .push(Frame::new(info, end, Slots::Struct { selected: None }));
            }
        }
        Ok(())
    }

    fn write_struct_like_end(&mut self, end: DataEntry) -> DcResult<()> {
        self.settle()?;
        self.expect_end(end)?;
        let owned = self.frames.pop().and_then(|frame| frame.owned);
        if let Some(owned) = owned {
            let slot = self.current_slot()?;
            let any = slot.downcast_mut::<AnyStruct>().ok_or_else(unavailable)?;
            *any = AnyStruct::from_boxed(owned);
        }
        self.finish_slot()
    }

    /// Opens a container after clearing it.
    fn write_container_root(&mut self, entry: DataEntry) -> DcResult<()> {
        self.settle()?;
        self.expect(entry)?;
        let info = self.next_slot_info()?.ok_or_else(unavailable)?;
        let kind_error = |_| type_mismatch(info, entry.as_str());

        let (slots, end) = match entry {
            DataEntry::ArrayRoot => {
                info.as_list().map_err(kind_error)?;
                (Slots::List { current: None }, DataEntry::ArrayEnd)
            }
            DataEntry::SetRoot => {
                let set = info.as_set().map_err(kind_error)?;
                let slots = Slots::Set {
                    value_info: set.value_info(),
                    temp: None,
                };
                (slots, DataEntry::SetEnd)
            }
            DataEntry::MapRoot => {
                let map = info.as_map().map_err(kind_error)?;
                let slots = Slots::Map {
                    key_info: map.key_info(),
                    value_info: map.value_info(),
                    key: None,
                    value: None,
                    at_value: false,
                };
                (slots, DataEntry::MapEnd)
            }
            _ => {
                info.as_optional().map_err(kind_error)?;
                (Slots::Optional { filled: false }, DataEntry::OptionalEnd)
            }
        };

        self.begin_slot()?;
        match self.current_slot()?.reflect_mut() {
            ReflectMut::List(list) => list.clear(),
            ReflectMut::Set(set) => set.clear(),
            ReflectMut::Map(map) => map.clear(),
            ReflectMut::Optional(_) => {}
            _ => return Err(unavailable()),
        }
        self.frames.push(Frame::new(info, end, slots));
        Ok(())
    }

    fn write_container_end(&mut self, end: DataEntry) -> DcResult<()> {
        self.settle()?;
        self.expect_end(end)?;

        match self.frames.last().map(|frame| &frame.slots) {
            Some(Slots::Map { at_value: true, .. }) => {
                return Err(Diagnostic::new(ErrorCode::UnbalancedEnd)
                    .with_arg("end", end)
                    .with_note("map key has no value"));
            }
            Some(Slots::Optional { filled: false }) => match self.top_container()?.reflect_mut() {
                ReflectMut::Optional(optional) => optional.set_none(),
                _ => return Err(unavailable()),
            },
            _ => {}
        }

        self.frames.pop();
        self.finish_slot()
    }
}

macro_rules! value_writes {
    ($( $method:ident($arg:ty) => $entry:ident, |$value:ident| $convert:expr; )*) => {
        $(
            fn $method(&mut self, $value: $arg) -> DcResult<()> {
                self.write_value(DataEntry::$entry, $convert)
            }
        )*
    };
}

impl Writer for PropertyWriter<'_> {
    fn peek_write(&mut self, next: DataEntry) -> bool {
        if next.is_end() {
            return self.frames.last().is_some_and(|frame| frame.end == next);
        }
        if self.expects_name() {
            return next == DataEntry::Name;
        }
        if next == DataEntry::None
            && matches!(
                self.frames.last(),
                Some(Frame {
                    slots: Slots::Optional { .. },
                    ..
                })
            )
        {
            return true;
        }
        matches!(self.next_slot_info(), Ok(Some(info)) if accepts(info, next))
    }

    fn write_none(&mut self) -> DcResult<()> {
        self.settle()?;
        self.expect(DataEntry::None)?;

        let in_optional = matches!(
            self.frames.last(),
            Some(Frame {
                slots: Slots::Optional { .. },
                ..
            })
        );
        if in_optional {
            match self.top_container()?.reflect_mut() {
                ReflectMut::Optional(optional) => optional.set_none(),
                _ => return Err(unavailable()),
            }
            return self.finish_slot();
        }

        self.begin_slot()?;
        set_null(self.current_slot()?)?;
        self.finish_slot()
    }

    fn write_name(&mut self, value: &str) -> DcResult<()> {
        self.settle()?;
        if let Some(Frame {
            info,
            slots: Slots::Struct { selected },
            ..
        }) = self.frames.last_mut()
            && selected.is_none()
        {
            let field = info
                .as_struct()
                .ok()
                .and_then(|info| info.field(value))
                .ok_or_else(|| {
                    Diagnostic::new(ErrorCode::UnknownField)
                        .with_arg("type", info.type_name())
                        .with_arg("field", value)
                })?;
            *selected = Some(field.name());
            return Ok(());
        }
        self.write_value(DataEntry::Name, Name::from(value))
    }

    value_writes! {
        write_bool(bool) => Bool, |value| value;
        write_string(&str) => String, |value| String::from(value);
        write_text(&str) => Text, |value| Text::from(value);
        write_float(f32) => Float, |value| value;
        write_double(f64) => Double, |value| value;
        write_int8(i8) => Int8, |value| value;
        write_int16(i16) => Int16, |value| value;
        write_int32(i32) => Int32, |value| value;
        write_int64(i64) => Int64, |value| value;
        write_uint8(u8) => UInt8, |value| value;
        write_uint16(u16) => UInt16, |value| value;
        write_uint32(u32) => UInt32, |value| value;
        write_uint64(u64) => UInt64, |value| value;
        write_blob(&[u8]) => Blob, |value| Blob(value.to_vec());
        write_weak_object_reference(WeakRef) => WeakObjectReference, |value| value;
        write_lazy_object_reference(&str) => LazyObjectReference, |value| LazyRef::from(value);
        write_soft_object_reference(&str) => SoftObjectReference, |value| SoftObjectRef::from(value);
        write_soft_class_reference(&str) => SoftClassReference, |value| SoftClassRef::from(value);
        write_field_path(&str) => FieldPath, |value| FieldPath::from(value);
        write_delegate(&str) => Delegate, |value| Delegate::from(value);
        write_multicast_inline_delegate(&str) => MulticastInlineDelegate, |value| MulticastDelegate::from(value);
        write_multicast_sparse_delegate(&str) => MulticastSparseDelegate, |value| SparseDelegate::from(value);
    }

    fn write_object_reference(&mut self, value: &ObjectRef) -> DcResult<()> {
        if value.is_null() {
            return Err(null_reference(DataEntry::ObjectReference));
        }
        self.write_value(DataEntry::ObjectReference, value.clone())
    }

    fn write_class_reference(&mut self, value: &ClassRef) -> DcResult<()> {
        if value.is_null() {
            return Err(null_reference(DataEntry::ClassReference));
        }
        self.write_value(DataEntry::ClassReference, value.clone())
    }

    fn write_interface_reference(&mut self, value: &InterfaceRef) -> DcResult<()> {
        if value.is_null() {
            return Err(null_reference(DataEntry::InterfaceReference));
        }
        self.write_value(DataEntry::InterfaceReference, value.clone())
    }

    fn write_enum(&mut self, value: &EnumData) -> DcResult<()> {
        self.settle()?;
        self.expect(DataEntry::Enum)?;
        self.begin_slot()?;
        let ReflectMut::Enum(target) = self.current_slot()?.reflect_mut() else {
            return Err(unavailable());
        };
        if !target.set_discriminant(value.signed64) {
            return Err(Diagnostic::new(ErrorCode::EnumMemberNotFound)
                .with_arg("type", target.reflect_type_info().type_name())
                .with_arg("value", value.signed64));
        }
        self.finish_slot()
    }

    fn write_struct_root(&mut self, name: &str) -> DcResult<()> {
        self.write_struct_like(DataEntry::StructRoot, name)
    }

    fn write_struct_end(&mut self) -> DcResult<()> {
        self.write_struct_like_end(DataEntry::StructEnd)
    }

    fn write_class_root(&mut self, name: &str) -> DcResult<()> {
        self.write_struct_like(DataEntry::ClassRoot, name)
    }

    fn write_class_end(&mut self) -> DcResult<()> {
        self.write_struct_like_end(DataEntry::ClassEnd)
    }

    fn write_map_root(&mut self) -> DcResult<()> {
        self.write_container_root(DataEntry::MapRoot)
    }

    fn write_map_end(&mut self) -> DcResult<()> {
        self.write_container_end(DataEntry::MapEnd)
    }

    fn write_array_root(&mut self) -> DcResult<()> {
        self.write_container_root(DataEntry::ArrayRoot)
    }

    fn write_array_end(&mut self) -> DcResult<()> {
        self.write_container_end(DataEntry::ArrayEnd)
    }

    fn write_set_root(&mut self) -> DcResult<()> {
        self.write_container_root(DataEntry::SetRoot)
    }

    fn write_set_end(&mut self) -> DcResult<()> {
        self.write_container_end(DataEntry::SetEnd)
    }

    fn write_optional_root(&mut self) -> DcResult<()> {
        self.write_container_root(DataEntry::OptionalRoot)
    }

    fn write_optional_end(&mut self) -> DcResult<()> {
        self.write_container_end(DataEntry::OptionalEnd)
    }

    fn write_datum(&mut self) -> DcResult<Datum<'_>> {
        self.settle()?;
        self.begin_slot()?;
        self.pending = true;
        let host = self.host;
        Datum::new(host, self.current_slot()?)
    }

    fn peek_write_property(&mut self) -> DcResult<Option<PropertyDesc>> {
        match self.next_slot_info()? {
            Some(info) => PropertyDesc::of(info).map(Some),
            None => Ok(None),
        }
    }

    fn format_position(&self) -> Option<String> {
        let mut out = String::from("<host>");
        for frame in &self.frames {
            let _ = match &frame.slots {
                Slots::Struct { selected } => match selected {
                    Some(name) => write!(out, " {}.{name}", frame.info.type_name()),
                    None => write!(out, " {}", frame.info.type_name()),
                },
                Slots::List { current } => write!(out, "[{}]", current.map_or(0, |i| i)),
                Slots::Set { .. } => write!(out, "[{}]", frame.count),
                Slots::Map { at_value, .. } => {
                    let half = if *at_value { "value" } else { "key" };
                    write!(out, "{{{half}#{}}}", frame.count)
                }
                Slots::Optional { .. } => write!(out, "?"),
            };
        }
        Some(out)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use dx_reflect::registry::TypeRegistry;
    use dx_utils::collections::OrderedMap;

    use super::PropertyWriter;
    use crate::data::{DataEntry, EnumData};
    use crate::diagnostic::ErrorCode;
    use crate::extra::AnyStruct;
    use crate::fixtures::{Actor, Color, KeyableStruct};
    use crate::types::ObjectRef;
    use crate::writer::Writer;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<KeyableStruct>();
        registry.register::<Actor>();
        registry
    }

    #[test]
    fn fill_struct_by_field_name() {
        let registry = registry();
        let mut value = KeyableStruct::default();
        let mut writer = PropertyWriter::new(&registry, &mut value);

        let desc = writer.peek_write_property().unwrap().unwrap();
        assert_eq!(desc.entry, DataEntry::StructRoot);
        writer.write_struct_root("KeyableStruct").unwrap();

        assert!(writer.peek_write(DataEntry::Name));
        assert!(!writer.peek_write(DataEntry::Int16));
        assert_eq!(writer.write_int16(1).unwrap_err().code(), ErrorCode::WriteKindMismatch);
        assert_eq!(writer.write_name("Ghost").unwrap_err().code(), ErrorCode::UnknownField);

        writer.write_name("Name").unwrap();
        writer.write_name("Foo").unwrap();
        writer.write_name("Index").unwrap();
        assert_eq!(writer.format_position().unwrap(), "<host> KeyableStruct.Index");
        assert_eq!(writer.write_bool(true).unwrap_err().code(), ErrorCode::WriteKindMismatch);
        writer.write_int16(7).unwrap();
        writer.write_struct_end().unwrap();
        writer.finish().unwrap();

        assert_eq!(writer.write_struct_root("").unwrap_err().code(), ErrorCode::RootConsumed);
        assert_eq!(value.name.as_str(), "Foo");
        assert_eq!(value.index, 7);
    }

    #[test]
    fn containers_are_cleared_then_filled() {
        let registry = registry();

        let mut list = vec![9u8, 9, 9];
        let mut writer = PropertyWriter::new(&registry, &mut list);
        writer.write_array_root().unwrap();
        writer.write_uint8(1).unwrap();
        writer.write_uint8(2).unwrap();
        assert_eq!(writer.write_set_end().unwrap_err().code(), ErrorCode::UnbalancedEnd);
        writer.write_array_end().unwrap();
        assert_eq!(list, [1, 2]);

        let mut map: OrderedMap<String, i32> = OrderedMap::new();
        let mut writer = PropertyWriter::new(&registry, &mut map);
        writer.write_map_root().unwrap();
        writer.write_string("b").unwrap();
        writer.write_int32(2).unwrap();
        writer.write_string("a").unwrap();
        writer.write_int32(1).unwrap();
        writer.write_map_end().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);

        let mut set = BTreeSet::new();
        set.insert(100u16);
        let mut writer = PropertyWriter::new(&registry, &mut set);
        writer.write_set_root().unwrap();
        writer.write_uint16(3).unwrap();
        writer.write_uint16(3).unwrap();
        writer.write_set_end().unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn optionals() {
        let registry = registry();
        let mut value: Option<Color> = None;

        let mut writer = PropertyWriter::new(&registry, &mut value);
        writer.write_optional_root().unwrap();
        let data = EnumData {
            signed64: 2,
            ..EnumData::default()
        };
        writer.write_enum(&data).unwrap();
        writer.write_optional_end().unwrap();
        assert_eq!(value, Some(Color::Blue));

        let mut writer = PropertyWriter::new(&registry, &mut value);
        writer.write_optional_root().unwrap();
        writer.write_none().unwrap();
        writer.write_optional_end().unwrap();
        assert_eq!(value, None);

        let mut color = Color::Red;
        let mut writer = PropertyWriter::new(&registry, &mut color);
        let data = EnumData {
            signed64: 42,
            ..EnumData::default()
        };
        assert_eq!(writer.write_enum(&data).unwrap_err().code(), ErrorCode::EnumMemberNotFound);
    }

    #[test]
    fn references_and_shared_structs() {
        let registry = registry();
        let mut actor = Actor {
            owner: ObjectRef::new("/Game/Old"),
            ..Actor::default()
        };
        let mut writer = PropertyWriter::new(&registry, &mut actor);

        writer.write_class_root("Actor").unwrap();
        writer.write_name("Owner").unwrap();
        assert_eq!(
            writer.write_object_reference(&ObjectRef::null()).unwrap_err().code(),
            ErrorCode::NullReference
        );
        writer.write_none().unwrap();

        writer.write_name("Payload").unwrap();
        assert_eq!(
            writer.write_struct_root("Missing").unwrap_err().code(),
            ErrorCode::TypeNotRegistered
        );
        writer.write_struct_root("KeyableStruct").unwrap();
        writer.write_name("Index").unwrap();
        writer.write_int16(3).unwrap();
        writer.write_struct_end().unwrap();
        writer.write_class_end().unwrap();

        assert!(actor.owner.is_null());
        let payload = actor.payload.downcast_ref::<KeyableStruct>().unwrap();
        assert_eq!(payload.index, 3);

        let mut any = AnyStruct::new(KeyableStruct::default());
        let mut writer = PropertyWriter::new(&registry, &mut any);
        writer.write_none().unwrap();
        assert!(!any.is_valid());
    }

    #[test]
    fn datum_slots_settle_on_next_write() {
        let registry = registry();
        let mut set: BTreeSet<u16> = BTreeSet::new();
        let mut writer = PropertyWriter::new(&registry, &mut set);

        writer.write_set_root().unwrap();
        {
            let mut datum = writer.write_datum().unwrap();
            *datum.downcast_mut::<u16>().unwrap() = 4;
        }
        writer.write_set_end().unwrap();
        writer.finish().unwrap();
        assert!(set.contains(&4));

        let mut value = 0i64;
        let mut writer = PropertyWriter::new(&registry, &mut value);
        {
            let mut datum = writer.write_datum().unwrap();
            *datum.downcast_mut::<i64>().unwrap() = -8;
        }
        writer.finish().unwrap();
        assert_eq!(value, -8);
    }
}
