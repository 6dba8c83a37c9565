#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_bytebuf::{BufferError, ByteBuffer, ByteOrder, NulPolicy};

/// Fuzz 用例：一串作用于同一缓冲的随机操作。
///
/// - **Why**：游标可以任意移动、字节序可以随时切换，手写用例难以穷尽组合；
///   以 `Vec<u8>` 影子模型差分比较，捕获长度簿记、零填充与越界判定的回归。
/// - **How**：每个 `Op` 对缓冲与影子模型同时生效；读操作的成败必须与模型的边界判定一致。
/// - **What**：游标限制在 `len + 64` 以内，避免 fuzzer 触发超大分配。
#[derive(Debug, Arbitrary)]
enum Op {
    Seek(u16),
    SetOrder(bool),
    SetNulPolicy(bool),
    WriteByte(i32),
    WriteShort(i32),
    WriteUnsignedInt(u32),
    WriteDouble(f64),
    WriteBytes(Vec<u8>),
    WriteUtf(String),
    ReadUnsignedShort,
    ReadInt,
    ReadDouble,
    ReadUtfBytes(u8),
    ReadUtf,
    SetLength(u16),
    SetContents(Vec<u8>),
    CopyOut { offset: u8, count: u8 },
}

/// 影子模型：仅以 `Vec<u8>` + 游标 + 字节序描述期望行为。
struct Shadow {
    bytes: Vec<u8>,
    position: usize,
    order: ByteOrder,
}

impl Shadow {
    fn write(&mut self, big_endian_bytes: &[u8]) {
        let mut encoded = big_endian_bytes.to_vec();
        if self.order == ByteOrder::LittleEndian {
            encoded.reverse();
        }
        self.write_raw(&encoded);
    }

    fn write_raw(&mut self, raw: &[u8]) {
        let end = self.position + raw.len();
        if end > self.bytes.len() {
            self.bytes.resize(end, 0);
        }
        self.bytes[self.position..end].copy_from_slice(raw);
        self.position = end;
    }

    fn readable(&self, width: usize) -> bool {
        self.position + width <= self.bytes.len()
    }
}

fn check_read<T: PartialEq + std::fmt::Debug>(
    shadow: &mut Shadow,
    width: usize,
    outcome: Result<T, BufferError>,
) {
    if shadow.readable(width) {
        assert!(outcome.is_ok(), "read of {width} at {} should succeed", shadow.position);
        shadow.position += width;
    } else {
        assert!(
            matches!(outcome, Err(BufferError::OutOfBounds { .. })),
            "read of {width} at {} past {} must fail",
            shadow.position,
            shadow.bytes.len()
        );
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut buffer = ByteBuffer::new();
    let mut shadow = Shadow {
        bytes: Vec::new(),
        position: 0,
        order: ByteOrder::BigEndian,
    };

    for op in ops {
        match op {
            Op::Seek(raw) => {
                let position = usize::from(raw) % (shadow.bytes.len() + 64);
                buffer.set_position(position);
                shadow.position = position;
            }
            Op::SetOrder(little) => {
                let order = if little {
                    ByteOrder::LittleEndian
                } else {
                    ByteOrder::BigEndian
                };
                buffer.set_byte_order(order);
                shadow.order = order;
            }
            Op::SetNulPolicy(preserve) => buffer.set_nul_policy(if preserve {
                NulPolicy::Preserve
            } else {
                NulPolicy::Terminate
            }),
            Op::WriteByte(value) => {
                buffer.write_byte(value).unwrap();
                shadow.write(&[value as u8]);
            }
            Op::WriteShort(value) => {
                buffer.write_short(value).unwrap();
                shadow.write(&(value as u16).to_be_bytes());
            }
            Op::WriteUnsignedInt(value) => {
                buffer.write_unsigned_int(value).unwrap();
                shadow.write(&value.to_be_bytes());
            }
            Op::WriteDouble(value) => {
                buffer.write_double(value).unwrap();
                shadow.write(&value.to_bits().to_be_bytes());
            }
            Op::WriteBytes(bytes) => {
                buffer.write_bytes(&bytes).unwrap();
                shadow.write_raw(&bytes);
            }
            Op::WriteUtf(text) => {
                let outcome = buffer.write_utf(&text);
                if text.len() <= usize::from(u16::MAX) {
                    outcome.unwrap();
                    shadow.write(&(text.len() as u16).to_be_bytes());
                    shadow.write_raw(text.as_bytes());
                } else {
                    assert!(outcome.is_err());
                }
            }
            Op::ReadUnsignedShort => {
                let outcome = buffer.read_unsigned_short();
                check_read(&mut shadow, 2, outcome);
            }
            Op::ReadInt => {
                let outcome = buffer.read_int();
                check_read(&mut shadow, 4, outcome);
            }
            Op::ReadDouble => {
                let outcome = buffer.read_double().map(f64::to_bits);
                check_read(&mut shadow, 8, outcome);
            }
            Op::ReadUtfBytes(len) => {
                let outcome = buffer.read_utf_bytes(usize::from(len));
                check_read(&mut shadow, usize::from(len), outcome);
            }
            Op::ReadUtf => {
                let outcome = buffer.read_utf();
                if shadow.readable(2) {
                    let prefix = [
                        shadow.bytes[shadow.position],
                        shadow.bytes[shadow.position + 1],
                    ];
                    let len = match shadow.order {
                        ByteOrder::BigEndian => u16::from_be_bytes(prefix),
                        ByteOrder::LittleEndian => u16::from_le_bytes(prefix),
                    };
                    let total = 2 + usize::from(len);
                    check_read(&mut shadow, total, outcome);
                } else {
                    check_read(&mut shadow, 2, outcome);
                }
            }
            Op::SetLength(len) => {
                let len = usize::from(len);
                buffer.set_length(len).unwrap();
                shadow.bytes.resize(len, 0);
            }
            Op::SetContents(bytes) => {
                buffer.set_contents(&bytes);
                shadow.bytes = bytes;
                shadow.position = 0;
            }
            Op::CopyOut { offset, count } => {
                let mut destination = ByteBuffer::new();
                let count = usize::from(count);
                let requested = if count == 0 {
                    shadow.bytes.len().saturating_sub(shadow.position)
                } else {
                    count
                };
                let outcome = buffer.read_bytes_into(&mut destination, usize::from(offset), count);
                let start = shadow.position;
                check_read(&mut shadow, requested, outcome);
                if shadow.position != start {
                    let copied = destination.to_vec();
                    assert_eq!(
                        &copied[usize::from(offset)..],
                        &shadow.bytes[start..shadow.position]
                    );
                }
            }
        }

        assert_eq!(buffer.len(), shadow.bytes.len());
        assert_eq!(buffer.position(), shadow.position);
        assert!(buffer.capacity() >= buffer.len());
    }

    assert_eq!(buffer.to_vec(), shadow.bytes);
});
