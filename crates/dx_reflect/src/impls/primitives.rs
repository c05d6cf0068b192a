use alloc::string::String;

crate::impl_reflect_opaque!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String);
