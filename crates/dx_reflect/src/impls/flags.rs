/// An integer type that can back a flag enum.
///
/// Values are widened to `i64` keeping their bit pattern, so `u64::MAX`
/// becomes `-1`.
pub trait FlagBits: Copy + 'static {
    const UNSIGNED: bool;

    fn to_i64(self) -> i64;

    /// Narrows a widened value, failing if it does not fit.
    fn from_i64(value: i64) -> Option<Self>;
}

macro_rules! impl_flag_bits {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FlagBits for $ty {
                const UNSIGNED: bool = <$ty>::MIN == 0;

                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }

                #[inline]
                fn from_i64(value: i64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )+
    };
}

impl_flag_bits!(u8, u16, u32, i8, i16, i32, i64);

impl FlagBits for u64 {
    const UNSIGNED: bool = true;

    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }

    #[inline]
    fn from_i64(value: i64) -> Option<Self> {
        Some(value as u64)
    }
}
