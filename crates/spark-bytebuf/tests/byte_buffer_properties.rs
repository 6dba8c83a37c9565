//! `ByteBuffer` 性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：以随机输入覆盖定宽读写的往返、扩容保真与越界判定，
//!   弥补示例测试只能枚举少量取值的不足。
//! - **设计手法 (How)**：
//!   1. `Value` 枚举描述一次带类型的写入，`value_strategy` 生成覆盖各类型全值域的样本；
//!   2. 影子模型 `Vec<u8>` 与缓冲并行执行随机的“定位 + 写入”序列，逐字节比较；
//!   3. 对任意长度与宽度，断言 `position + 宽度 > len` 当且仅当读取失败。
//! - **合同与边界 (What)**：生成的游标最多越过末尾 8 字节，保证零填充路径也被覆盖，
//!   同时不会触发超大分配。

use proptest::prelude::*;
use spark_bytebuf::{BufferError, ByteBuffer, ByteOrder};

#[derive(Clone, Copy, Debug)]
enum Value {
    Byte(i8),
    UnsignedByte(u8),
    Short(i16),
    UnsignedShort(u16),
    Int(i32),
    UnsignedInt(u32),
    Float(f32),
    Double(f64),
}

impl Value {
    fn width(self) -> usize {
        match self {
            Value::Byte(_) | Value::UnsignedByte(_) => 1,
            Value::Short(_) | Value::UnsignedShort(_) => 2,
            Value::Int(_) | Value::UnsignedInt(_) | Value::Float(_) => 4,
            Value::Double(_) => 8,
        }
    }

    fn write(self, buffer: &mut ByteBuffer) -> Result<(), BufferError> {
        match self {
            Value::Byte(v) => buffer.write_byte(i32::from(v)),
            Value::UnsignedByte(v) => buffer.write_unsigned_byte(u32::from(v)),
            Value::Short(v) => buffer.write_short(i32::from(v)),
            Value::UnsignedShort(v) => buffer.write_unsigned_short(v),
            Value::Int(v) => buffer.write_int(v),
            Value::UnsignedInt(v) => buffer.write_unsigned_int(v),
            Value::Float(v) => buffer.write_float(v),
            Value::Double(v) => buffer.write_double(v),
        }
    }

    /// 以同类型回读，并与写入值按位比较。
    fn read_matches(self, buffer: &mut ByteBuffer) -> Result<bool, BufferError> {
        Ok(match self {
            Value::Byte(v) => buffer.read_byte()? == v,
            Value::UnsignedByte(v) => buffer.read_unsigned_byte()? == v,
            Value::Short(v) => buffer.read_short()? == v,
            Value::UnsignedShort(v) => buffer.read_unsigned_short()? == v,
            Value::Int(v) => buffer.read_int()? == v,
            Value::UnsignedInt(v) => buffer.read_unsigned_int()? == v,
            Value::Float(v) => buffer.read_float()?.to_bits() == v.to_bits(),
            Value::Double(v) => buffer.read_double()?.to_bits() == v.to_bits(),
        })
    }

    /// 影子模型：独立于缓冲实现的字节编码。
    fn encode(self, order: ByteOrder) -> Vec<u8> {
        let (be, width): (u64, usize) = match self {
            Value::Byte(v) => (u64::from(v as u8), 1),
            Value::UnsignedByte(v) => (u64::from(v), 1),
            Value::Short(v) => (u64::from(v as u16), 2),
            Value::UnsignedShort(v) => (u64::from(v), 2),
            Value::Int(v) => (u64::from(v as u32), 4),
            Value::UnsignedInt(v) => (u64::from(v), 4),
            Value::Float(v) => (u64::from(v.to_bits()), 4),
            Value::Double(v) => (v.to_bits(), 8),
        };
        let mut bytes: Vec<u8> = (0..width).rev().map(|i| (be >> (8 * i)) as u8).collect();
        if order == ByteOrder::LittleEndian {
            bytes.reverse();
        }
        bytes
    }
}

fn order_strategy() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::BigEndian), Just(ByteOrder::LittleEndian)]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i8>().prop_map(Value::Byte),
        any::<u8>().prop_map(Value::UnsignedByte),
        any::<i16>().prop_map(Value::Short),
        any::<u16>().prop_map(Value::UnsignedShort),
        any::<i32>().prop_map(Value::Int),
        any::<u32>().prop_map(Value::UnsignedInt),
        any::<f32>().prop_map(Value::Float),
        any::<f64>().prop_map(Value::Double),
        Just(Value::Int(i32::MIN)),
        Just(Value::UnsignedInt(u32::MAX)),
    ]
}

proptest! {
    /// 任意值在任意前缀偏移、任意字节序下写入后都能原样读回。
    #[test]
    fn prop_round_trip_at_any_offset(
        value in value_strategy(),
        order in order_strategy(),
        prefix in 0usize..16,
    ) {
        let mut buffer = ByteBuffer::new();
        buffer.set_byte_order(order);
        buffer.write_bytes(&vec![0x5A; prefix]).unwrap();
        value.write(&mut buffer).unwrap();
        prop_assert_eq!(buffer.len(), prefix + value.width());
        let raw = buffer.to_vec();
        let expected = value.encode(order);
        prop_assert_eq!(&raw[prefix..], &expected[..]);

        buffer.set_position(prefix);
        prop_assert!(value.read_matches(&mut buffer).unwrap());
        prop_assert_eq!(buffer.position(), prefix + value.width());
    }

    /// 随机“定位 + 写入”序列与影子模型逐字节一致，扩容不丢数据。
    #[test]
    fn prop_writes_match_shadow_model(
        ops in prop::collection::vec((any::<prop::sample::Index>(), value_strategy()), 1..200),
        order in order_strategy(),
    ) {
        let mut buffer = ByteBuffer::new();
        buffer.set_byte_order(order);
        let mut shadow: Vec<u8> = Vec::new();

        for (pick, value) in ops {
            // 在 [0, len + 8) 内选择写入起点，覆盖覆写、追加与零填充。
            let target = pick.index(shadow.len() + 8);
            buffer.set_position(target);
            value.write(&mut buffer).unwrap();

            let encoded = value.encode(order);
            let end = target + encoded.len();
            if end > shadow.len() {
                shadow.resize(end, 0);
            }
            shadow[target..end].copy_from_slice(&encoded);

            prop_assert_eq!(buffer.position(), end);
            prop_assert_eq!(buffer.len(), shadow.len());
        }
        prop_assert_eq!(buffer.to_vec(), shadow);
        prop_assert!(buffer.capacity() >= buffer.len());
    }

    /// 读取失败当且仅当 `position + 宽度 > len`，失败时游标不变。
    #[test]
    fn prop_bounds_are_exact(
        len in 0usize..32,
        position in 0usize..40,
        value in value_strategy(),
    ) {
        let mut buffer = ByteBuffer::from_slice(&vec![0u8; len]);
        buffer.set_position(position);
        let outcome = value.read_matches(&mut buffer);
        if position + value.width() > len {
            prop_assert_eq!(
                outcome.unwrap_err(),
                BufferError::OutOfBounds { position, width: value.width(), length: len }
            );
            prop_assert_eq!(buffer.position(), position);
        } else {
            prop_assert!(outcome.is_ok());
            prop_assert_eq!(buffer.position(), position + value.width());
        }
    }

    /// 任意字节序列批量写入后可以原样批量拷出。
    #[test]
    fn prop_bytes_round_trip(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut buffer = ByteBuffer::new();
        buffer.write_bytes(&data).unwrap();
        buffer.set_position(0);
        let mut out = vec![0u8; data.len()];
        buffer.read_into_slice(&mut out).unwrap();
        prop_assert_eq!(&out, &data);
        prop_assert_eq!(buffer.bytes_available(), 0);
    }

    /// 任意合法字符串经 `write_utf_bytes` 写入后，以完整长度读回得到原文（不含 NUL 时）。
    #[test]
    fn prop_utf8_round_trip(text in "[^\\x00]{0,64}") {
        let mut buffer = ByteBuffer::new();
        buffer.write_utf_bytes(&text).unwrap();
        buffer.set_position(0);
        prop_assert_eq!(buffer.read_utf_bytes(text.len()).unwrap(), text);
    }
}
