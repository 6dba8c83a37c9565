#![cfg_attr(not(feature = "std"), no_std)]

//! `spark-bytebuf` 提供可增长、可随机定位的二进制字节缓冲 [`ByteBuffer`]。
//!
//! # 模块定位（Why）
//! - 资源解码、网络消息编解码等上层组件需要按字节层级读写整数、浮点与 UTF-8 文本，
//!   并能在大端/小端之间切换；该 crate 只提供这一原语，并单独测试其位级正确性。
//! - 缓冲仅是内存原语，不负责压缩、对象图序列化，也不跨越文件或网络边界做流式 I/O。
//!
//! # 设计概要（How）
//! - `buffer` 模块实现 `ByteBuffer`：以 `bytes::BytesMut` 作为后备存储，`len()` 即逻辑长度，
//!   容量按块粒度向上取整扩容；所有读写均作用于游标 `position`。
//! - `scalar` 模块以显式的大端/小端字节拼装完成定宽编解码；启用 `aligned-access` 特性时，
//!   对自然对齐的切片走 unsafe 宽字快路径，两条路径的可观测结果完全一致。
//! - `text` 模块定义 UTF-8 解码时对内嵌 NUL 的处理策略 [`NulPolicy`]。
//! - `options` 模块提供构造期配置 [`ByteBufferOptions`]，`serde` 特性下可直接从 TOML 反序列化。
//!
//! # 契约说明（What）
//! - 读操作在 `position + 宽度 > len()` 时返回 [`BufferError::OutOfBounds`]，绝不越过逻辑末尾；
//! - 写操作只会因参数溢出失败（[`BufferError::InvalidArgument`]），容量增长对调用方透明；
//! - 失败的操作不修改游标、长度与内容；
//! - 公开 API 一律按值拷贝，从不借出指向内部存储的长期引用。
//!
//! ```
//! use spark_bytebuf::{ByteBuffer, ByteOrder};
//!
//! let mut buf = ByteBuffer::new();
//! buf.set_byte_order(ByteOrder::LittleEndian);
//! buf.write_unsigned_int(0x1234_5678)?;
//! assert_eq!(buf.to_vec(), [0x78, 0x56, 0x34, 0x12]);
//!
//! buf.set_position(0);
//! assert_eq!(buf.read_unsigned_int()?, 0x1234_5678);
//! # Ok::<(), spark_bytebuf::BufferError>(())
//! ```

extern crate alloc;

mod buffer;
mod error;
mod options;
mod order;
mod scalar;
mod text;

pub use buffer::ByteBuffer;
pub use error::{BufferError, Result};
pub use options::{ByteBufferOptions, DEFAULT_BLOCK_SIZE, DEFAULT_INITIAL_CAPACITY};
pub use order::{ByteOrder, DEFAULT_BYTE_ORDER, ParseByteOrderError};
pub use text::NulPolicy;
