/// Fixed-width values that can be filled byte-for-byte from a stream.
///
/// Implemented for the primitive integers, floats and byte arrays: types with
/// no indirections, whose every bit pattern is valid. Bytes are taken in
/// native order, exactly as they sit in the stream; use `byteorder` on the
/// stream's `Read` impl when the encoding has an explicit endianness.
pub trait Value: Sized {
    type Bytes: AsRef<[u8]> + AsMut<[u8]>;

    fn zeroed() -> Self::Bytes;

    fn from_bytes(bytes: Self::Bytes) -> Self;

    fn width() -> usize {
        std::mem::size_of::<Self::Bytes>()
    }
}

macro_rules! impl_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl Value for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                fn zeroed() -> Self::Bytes {
                    [0; std::mem::size_of::<$t>()]
                }

                fn from_bytes(bytes: Self::Bytes) -> Self {
                    <$t>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_value!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, f32, f64);

impl<const N: usize> Value for [u8; N] {
    type Bytes = [u8; N];

    fn zeroed() -> Self::Bytes {
        [0; N]
    }

    fn from_bytes(bytes: Self::Bytes) -> Self {
        bytes
    }
}
