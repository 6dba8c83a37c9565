//! 定宽数值的编解码核心。
//!
//! # 设计概要（How）
//! - `Word` 负责“无符号机器字 <-> 字节切片”的转换，统一通过 `from_be_bytes`/`from_le_bytes`
//!   显式拼装，结果与宿主字节序无关；
//! - `Scalar` 把有符号整数与浮点映射到同宽的 `Word`（位模式不变），
//!   因此所有公开读写共享一条编解码路径；
//! - 启用 `aligned-access` 时，若切片起始指针按宽度自然对齐，则以一次宽字读写代替逐字节拷贝，
//!   再用 `to_be`/`from_le` 等做字节序换算；未对齐时退回通用路径。两条路径逐字节等价。
//!
//! 模块仅在 crate 内可见，不向调用方暴露任何指向存储的类型化视图。

use crate::order::ByteOrder;

/// 无符号机器字：`u8`/`u16`/`u32`/`u64`。
pub(crate) trait Word: Copy {
    const WIDTH: usize;

    /// 从恰好 `WIDTH` 字节的切片按 `order` 解出数值。
    fn load(src: &[u8], order: ByteOrder) -> Self;

    /// 按 `order` 写入恰好 `WIDTH` 字节的切片。
    fn store(self, dst: &mut [u8], order: ByteOrder);
}

macro_rules! impl_word {
    ($($ty:ty),* $(,)?) => {$(
        impl Word for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn load(src: &[u8], order: ByteOrder) -> Self {
                assert_eq!(src.len(), Self::WIDTH);
                #[cfg(feature = "aligned-access")]
                if src.as_ptr().cast::<$ty>().is_aligned() {
                    // SAFETY: 上方断言保证切片恰有 WIDTH 字节，指针已按该类型对齐，
                    // 任意位模式都是合法的无符号整数。
                    let native = unsafe { src.as_ptr().cast::<$ty>().read() };
                    return match order {
                        ByteOrder::BigEndian => <$ty>::from_be(native),
                        ByteOrder::LittleEndian => <$ty>::from_le(native),
                    };
                }
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(src);
                match order {
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(raw),
                }
            }

            #[inline]
            fn store(self, dst: &mut [u8], order: ByteOrder) {
                assert_eq!(dst.len(), Self::WIDTH);
                #[cfg(feature = "aligned-access")]
                if dst.as_ptr().cast::<$ty>().is_aligned() {
                    let native = match order {
                        ByteOrder::BigEndian => self.to_be(),
                        ByteOrder::LittleEndian => self.to_le(),
                    };
                    // SAFETY: 切片长度与对齐均已检查，独占借用保证没有别名。
                    unsafe { dst.as_mut_ptr().cast::<$ty>().write(native) };
                    return;
                }
                let raw = match order {
                    ByteOrder::BigEndian => self.to_be_bytes(),
                    ByteOrder::LittleEndian => self.to_le_bytes(),
                };
                dst.copy_from_slice(&raw);
            }
        }
    )*};
}

impl_word!(u8, u16, u32, u64);

/// 可以经由同宽 `Word` 读写的数值类型。
pub(crate) trait Scalar: Copy {
    type Word: Word;

    fn from_word(word: Self::Word) -> Self;

    fn into_word(self) -> Self::Word;
}

macro_rules! impl_scalar_identity {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            type Word = $ty;

            #[inline]
            fn from_word(word: $ty) -> Self {
                word
            }

            #[inline]
            fn into_word(self) -> $ty {
                self
            }
        }
    )*};
}

// 有符号整数与无符号同宽类型之间的 `as` 转换是位模式保持的二补数重解释。
macro_rules! impl_scalar_signed {
    ($($ty:ty => $word:ty),*) => {$(
        impl Scalar for $ty {
            type Word = $word;

            #[inline]
            fn from_word(word: $word) -> Self {
                word as $ty
            }

            #[inline]
            fn into_word(self) -> $word {
                self as $word
            }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($ty:ty => $word:ty),*) => {$(
        impl Scalar for $ty {
            type Word = $word;

            #[inline]
            fn from_word(word: $word) -> Self {
                <$ty>::from_bits(word)
            }

            #[inline]
            fn into_word(self) -> $word {
                self.to_bits()
            }
        }
    )*};
}

impl_scalar_identity!(u8, u16, u32, u64);
impl_scalar_signed!(i8 => u8, i16 => u16, i32 => u32);
impl_scalar_float!(f32 => u32, f64 => u64);

/// 数值占用的字节宽度。
#[inline]
pub(crate) const fn width_of<T: Scalar>() -> usize {
    <T::Word as Word>::WIDTH
}

/// 按 `order` 从切片解码一个数值。
#[inline]
pub(crate) fn decode<T: Scalar>(src: &[u8], order: ByteOrder) -> T {
    T::from_word(<T::Word as Word>::load(src, order))
}

/// 按 `order` 将数值编码进切片。
#[inline]
pub(crate) fn encode<T: Scalar>(value: T, dst: &mut [u8], order: ByteOrder) {
    value.into_word().store(dst, order);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 独立的手工字节拼装，作为编解码结果的对照。
    fn manual_be(value: u64, width: usize) -> alloc::vec::Vec<u8> {
        (0..width)
            .rev()
            .map(|i| ((value >> (8 * i)) & 0xFF) as u8)
            .collect()
    }

    #[test]
    fn encodes_match_manual_byte_assembly() {
        let mut dst = [0u8; 4];
        encode(0x1234_5678u32, &mut dst, ByteOrder::BigEndian);
        assert_eq!(dst.to_vec(), manual_be(0x1234_5678, 4));

        encode(0x1234_5678u32, &mut dst, ByteOrder::LittleEndian);
        let mut reversed = manual_be(0x1234_5678, 4);
        reversed.reverse();
        assert_eq!(dst.to_vec(), reversed);

        let mut short = [0u8; 2];
        encode(0xBEEFu16, &mut short, ByteOrder::BigEndian);
        assert_eq!(short, [0xBE, 0xEF]);
        encode(0xBEEFu16, &mut short, ByteOrder::LittleEndian);
        assert_eq!(short, [0xEF, 0xBE]);
    }

    #[test]
    fn signed_and_float_keep_bit_patterns() {
        let mut dst = [0u8; 2];
        encode(-2i16, &mut dst, ByteOrder::BigEndian);
        assert_eq!(dst, [0xFF, 0xFE]);
        assert_eq!(decode::<i16>(&dst, ByteOrder::BigEndian), -2);
        assert_eq!(decode::<u16>(&dst, ByteOrder::BigEndian), 0xFFFE);

        let mut float = [0u8; 4];
        encode(1.0f32, &mut float, ByteOrder::BigEndian);
        assert_eq!(float, [0x3F, 0x80, 0x00, 0x00]);
        encode(1.0f32, &mut float, ByteOrder::LittleEndian);
        assert_eq!(float, [0x00, 0x00, 0x80, 0x3F]);

        let mut double = [0u8; 8];
        encode(-0.5f64, &mut double, ByteOrder::BigEndian);
        assert_eq!(double, [0xBF, 0xE0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode::<f64>(&double, ByteOrder::BigEndian), -0.5);
    }

    /// 8 字节对齐的存储，保证偏移 0 是所有宽度的对齐起点。
    #[repr(align(8))]
    struct Aligned([u8; 32]);

    #[test]
    fn every_offset_decodes_identically() {
        // 在同一块存储的每个偏移上编解码，覆盖对齐与未对齐两种起点。
        let mut backing = Aligned([0u8; 32]);
        let bytes = &mut backing.0;
        for offset in 0..8 {
            for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
                let window = &mut bytes[offset..offset + 8];
                encode(0x0102_0304_0506_0708u64, window, order);
                assert_eq!(decode::<u64>(window, order), 0x0102_0304_0506_0708);
                let expected: [u8; 8] = match order {
                    ByteOrder::BigEndian => [1, 2, 3, 4, 5, 6, 7, 8],
                    ByteOrder::LittleEndian => [8, 7, 6, 5, 4, 3, 2, 1],
                };
                assert_eq!(window, &expected[..]);

                let window = &mut bytes[offset..offset + 4];
                encode(-123_456i32, window, order);
                assert_eq!(decode::<i32>(window, order), -123_456);
            }
        }
    }
}
