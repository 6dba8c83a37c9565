//! `aligned_access_contract` 集成测试：对齐快路径与通用路径逐字节等价。
//!
//! # 测试目标（Why）
//! - `aligned-access` 特性在切片自然对齐时改走 unsafe 宽字读写，只有启用该特性才会编译进来；
//!   本测试目标声明了 `required-features`，确保快路径在测试中被真正执行。
//!
//! # 结构安排（How）
//! - 在 0..16 的每个起始偏移上写入各宽度数值：其中总有对齐与未对齐的起点，
//!   两条路径都会被覆盖；
//! - 原始字节与独立的手工拼装比较，再按同一字节序读回。

use spark_bytebuf::{ByteBuffer, ByteOrder};

fn manual(value: u64, width: usize, order: ByteOrder) -> Vec<u8> {
    let mut bytes: Vec<u8> = (0..width)
        .rev()
        .map(|shift| (value >> (shift * 8)) as u8)
        .collect();
    if order == ByteOrder::LittleEndian {
        bytes.reverse();
    }
    bytes
}

#[test]
fn every_start_offset_matches_manual_assembly() {
    for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        for offset in 0..16usize {
            let mut buffer = ByteBuffer::new();
            buffer.set_byte_order(order);
            buffer.set_position(offset);
            buffer.write_unsigned_short(0xA1B2).unwrap();
            buffer.write_unsigned_int(0xC3D4_E5F6).unwrap();
            buffer.write_double(f64::from_bits(0x0102_0304_0506_0708)).unwrap();

            let raw = buffer.to_vec();
            assert!(raw[..offset].iter().all(|&b| b == 0), "offset {offset}");
            let mut expected = manual(0xA1B2, 2, order);
            expected.extend(manual(0xC3D4_E5F6, 4, order));
            expected.extend(manual(0x0102_0304_0506_0708, 8, order));
            assert_eq!(&raw[offset..], &expected[..], "offset {offset}, {order}");

            buffer.set_position(offset);
            assert_eq!(buffer.read_unsigned_short().unwrap(), 0xA1B2);
            assert_eq!(buffer.read_unsigned_int().unwrap(), 0xC3D4_E5F6);
            assert_eq!(
                buffer.read_double().unwrap().to_bits(),
                0x0102_0304_0506_0708
            );
        }
    }
}

/// 有符号与浮点值在对齐起点上同样保持位模式。
#[test]
fn signed_and_float_values_survive_the_fast_path() {
    for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        let mut buffer = ByteBuffer::new();
        buffer.set_byte_order(order);
        for offset in [0usize, 8, 16, 24] {
            buffer.set_position(offset);
            buffer.write_int(-123_456).unwrap();
            buffer.write_short(-2).unwrap();
            buffer.write_float(-0.0).unwrap();

            buffer.set_position(offset);
            assert_eq!(buffer.read_int().unwrap(), -123_456);
            assert_eq!(buffer.read_short().unwrap(), -2);
            assert_eq!(buffer.read_float().unwrap().to_bits(), (-0.0f32).to_bits());
        }
    }
}
