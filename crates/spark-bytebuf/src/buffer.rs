use alloc::{format, string::String, vec::Vec};
use core::{fmt, ops::Range};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::{
    error::{BufferError, Result},
    options::{
        ByteBufferOptions, DEFAULT_BLOCK_SIZE, DEFAULT_INITIAL_CAPACITY, MAX_CAPACITY, round_up,
    },
    order::ByteOrder,
    scalar::{self, Scalar, width_of},
    text::{self, NulPolicy},
};

/// `ByteBuffer` 是可增长、可随机定位的二进制字节缓冲。
///
/// # 设计动机（Why）
/// - 资源与网络消息解码器需要按字节层级读写定宽整数、IEEE-754 浮点与 UTF-8 文本，
///   并能在任意时刻切换字节序，结果必须位级正确。
/// - 解码器经常先把完整消息拷入缓冲，再在任意偏移处回读，因此游标可以自由移动，
///   而不是只能前进的流。
///
/// # 架构关系（How）
/// - `storage` 使用 `BytesMut`，其 `len()` 就是逻辑长度，`capacity()` 是实现层预留；
/// - 扩容按 `block_size` 向上取整后一次性预留，避免逐字节写入时反复重分配；
/// - 定宽读写统一委派给 `scalar` 模块，字节序在调用时读取 `byte_order` 字段。
///
/// # 契约说明（What）
/// - 读：要求 `position + 宽度 <= len()`，否则返回 [`BufferError::OutOfBounds`]，游标不动；
/// - 写：在 `position` 处覆盖或追加，必要时把长度扩展到写入末尾；若游标停在末尾之后，
///   中间的空隙以 0 填充；写入区间之后的既有字节保持不变；
/// - 截断只缩短长度，不回收容量；
/// - 所有批量拷入/拷出都复制字节，调用方拿不到指向内部存储的引用。
///
/// # 风险与取舍（Trade-offs）
/// - 不提供内部同步：所有修改都需要 `&mut self`，跨线程共享时由调用方加锁或按所有权移交；
/// - `set_position` 不做校验，把游标放到末尾之后是合法的，后续读操作会报告越界，
///   写操作则会零填充空隙。
#[derive(Clone)]
pub struct ByteBuffer {
    storage: BytesMut,
    position: usize,
    byte_order: ByteOrder,
    nul_policy: NulPolicy,
    block_size: usize,
}

impl ByteBuffer {
    /// 创建空缓冲：长度与游标为 0，字节序为大端，预留一个块的容量。
    pub fn new() -> Self {
        let reserve = round_up(DEFAULT_INITIAL_CAPACITY, DEFAULT_BLOCK_SIZE)
            .unwrap_or(DEFAULT_INITIAL_CAPACITY);
        Self::assemble(ByteBufferOptions::default(), reserve)
    }

    /// 按配置创建空缓冲。
    ///
    /// # 契约说明（What）
    /// - 配置需通过 [`ByteBufferOptions::validate`]，否则返回 [`BufferError::InvalidArgument`]；
    /// - 初始容量为 `initial_capacity` 按 `block_size` 向上取整后的值。
    pub fn with_options(options: ByteBufferOptions) -> Result<Self> {
        options.validate()?;
        let reserve = round_up(options.initial_capacity, options.block_size).ok_or_else(|| {
            BufferError::invalid_argument("ByteBuffer::with_options", "initial capacity overflow")
        })?;
        Ok(Self::assemble(options, reserve))
    }

    /// 以给定字节的拷贝作为初始内容创建缓冲，游标位于 0。
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.set_contents(bytes);
        buffer
    }

    fn assemble(options: ByteBufferOptions, reserve: usize) -> Self {
        Self {
            storage: BytesMut::with_capacity(reserve),
            position: 0,
            byte_order: options.byte_order,
            nul_policy: options.nul_policy,
            block_size: options.block_size,
        }
    }

    /// 下一次读写的起点。
    pub fn position(&self) -> usize {
        self.position
    }

    /// 移动游标；不校验范围，越界由后续读操作报告。
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// 逻辑长度，即有效字节数。
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// 当前后备存储的容量，恒不小于 [`len`](Self::len)。
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// 从游标到逻辑末尾的可读字节数；游标位于末尾之后时为 0。
    pub fn bytes_available(&self) -> usize {
        self.storage.len().saturating_sub(self.position)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// 切换字节序，只影响之后的多字节读写。
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    pub fn nul_policy(&self) -> NulPolicy {
        self.nul_policy
    }

    pub fn set_nul_policy(&mut self, nul_policy: NulPolicy) {
        self.nul_policy = nul_policy;
    }

    /// 扩容粒度（字节）。
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// 保证后备存储至少能容纳 `n` 字节。
    ///
    /// # 契约说明（What）
    /// - `n` 不超过当前容量时什么都不做；
    /// - 否则扩容到 `n` 按块粒度向上取整后的大小，并保留 `0..len()` 的内容；
    /// - `n` 超过单次分配上限（`isize::MAX`）时返回 [`BufferError::InvalidArgument`]，缓冲不变；
    /// - 不改变长度与游标。
    pub fn ensure_capacity(&mut self, n: usize) -> Result<()> {
        if n <= self.storage.capacity() {
            return Ok(());
        }
        if n > MAX_CAPACITY {
            return Err(BufferError::invalid_argument(
                "ensure_capacity",
                format!("requested capacity {n} exceeds {MAX_CAPACITY} bytes"),
            ));
        }
        self.grow(n);
        Ok(())
    }

    /// 扩容到至少 `n` 字节；调用方保证 `n <= MAX_CAPACITY`。
    fn grow(&mut self, n: usize) {
        let old_capacity = self.storage.capacity();
        if n <= old_capacity {
            return;
        }
        // 取整后越过分配上限时退回精确请求。
        let target = round_up(n, self.block_size)
            .filter(|&rounded| rounded <= MAX_CAPACITY)
            .unwrap_or(n);
        self.storage.reserve(target - self.storage.len());
        trace!(
            requested = n,
            old_capacity,
            new_capacity = self.storage.capacity(),
            "byte buffer storage grown"
        );
    }

    /// 保证从游标起还能写入 `extra` 字节而无需再次扩容。
    ///
    /// `position + extra` 溢出 `usize` 或超过分配上限时返回 [`BufferError::InvalidArgument`]。
    pub fn ensure_writable(&mut self, extra: usize) -> Result<()> {
        let end = self.end_for_write(extra, "ensure_writable")?;
        self.ensure_capacity(end)
    }

    /// 以 `bytes` 的拷贝替换全部内容，长度设为其大小，游标归零。
    ///
    /// 之后修改 `bytes` 的来源不会影响缓冲。
    pub fn set_contents(&mut self, bytes: &[u8]) {
        self.storage.clear();
        // 切片长度本身不会超过分配上限。
        self.grow(bytes.len());
        self.storage.extend_from_slice(bytes);
        self.position = 0;
        debug!(length = bytes.len(), "byte buffer contents replaced");
    }

    /// 显式设置逻辑长度。
    ///
    /// # 契约说明（What）
    /// - 大于当前长度时在尾部补 0；小于当前长度时截断，容量保持不变；
    /// - 扩展目标超过分配上限时返回 [`BufferError::InvalidArgument`]，缓冲不变；
    /// - 游标不做调整。
    pub fn set_length(&mut self, length: usize) -> Result<()> {
        let previous = self.storage.len();
        if length > previous {
            self.ensure_capacity(length)?;
            self.storage.resize(length, 0);
        } else {
            self.storage.truncate(length);
        }
        debug!(previous, length, "byte buffer length set");
        Ok(())
    }

    /// 清空内容并将游标归零，保留容量供复用。
    pub fn clear(&mut self) {
        self.storage.clear();
        self.position = 0;
    }

    /// 拷贝出 `0..len()` 的全部内容。
    pub fn to_vec(&self) -> Vec<u8> {
        self.storage.to_vec()
    }

    /// 拷贝出 `0..len()` 的全部内容，便于交给以 `Bytes` 为载体的上层组件。
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.storage)
    }

    //=== 定宽读写 ===//

    /// 写入一个有符号字节，只使用 `value` 的低 8 位。
    pub fn write_byte(&mut self, value: i32) -> Result<()> {
        self.write_scalar(value as i8, "write_byte")
    }

    /// 读取一个有符号字节，范围 -128..=127。
    pub fn read_byte(&mut self) -> Result<i8> {
        self.read_scalar()
    }

    /// 写入一个无符号字节，`value` 按 0xFF 掩码。
    pub fn write_unsigned_byte(&mut self, value: u32) -> Result<()> {
        self.write_scalar((value & 0xFF) as u8, "write_unsigned_byte")
    }

    pub fn read_unsigned_byte(&mut self) -> Result<u8> {
        self.read_scalar()
    }

    /// 写入布尔值：`true` 为 1，`false` 为 0。
    pub fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.write_scalar(u8::from(value), "write_boolean")
    }

    /// 读取布尔值，任何非零字节都视为 `true`。
    pub fn read_boolean(&mut self) -> Result<bool> {
        self.read_scalar::<u8>().map(|byte| byte != 0)
    }

    /// 写入一个 16 位整数，只使用 `value` 的低 16 位。
    pub fn write_short(&mut self, value: i32) -> Result<()> {
        self.write_scalar(value as i16, "write_short")
    }

    pub fn read_short(&mut self) -> Result<i16> {
        self.read_scalar()
    }

    pub fn write_unsigned_short(&mut self, value: u16) -> Result<()> {
        self.write_scalar(value, "write_unsigned_short")
    }

    pub fn read_unsigned_short(&mut self) -> Result<u16> {
        self.read_scalar()
    }

    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.write_scalar(value, "write_int")
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.read_scalar()
    }

    pub fn write_unsigned_int(&mut self, value: u32) -> Result<()> {
        self.write_scalar(value, "write_unsigned_int")
    }

    pub fn read_unsigned_int(&mut self) -> Result<u32> {
        self.read_scalar()
    }

    /// 写入 IEEE-754 单精度浮点。
    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.write_scalar(value, "write_float")
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.read_scalar()
    }

    /// 写入 IEEE-754 双精度浮点。
    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.write_scalar(value, "write_double")
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.read_scalar()
    }

    //=== 批量拷贝 ===//

    /// 在游标处写入 `bytes` 的拷贝并前移游标。
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let range = self.writable_range(bytes.len(), "write_bytes")?;
        self.storage[range.clone()].copy_from_slice(bytes);
        self.position = range.end;
        Ok(())
    }

    /// 从游标处拷贝 `destination.len()` 字节到调用方切片并前移游标。
    pub fn read_into_slice(&mut self, destination: &mut [u8]) -> Result<()> {
        let range = self.readable_range(destination.len())?;
        destination.copy_from_slice(&self.storage[range.clone()]);
        self.position = range.end;
        Ok(())
    }

    /// 从游标处读取 `count` 字节，写入 `destination` 的 `offset` 处。
    ///
    /// # 契约说明（What）
    /// - `count == 0` 表示读取全部可读字节；
    /// - 要求 `position + count <= len()`，否则返回 [`BufferError::OutOfBounds`]；
    /// - `offset + count` 溢出或超过分配上限时返回 [`BufferError::InvalidArgument`]，两个缓冲均不变；
    /// - 目标长度不足时扩展到 `offset + count`，`offset` 之前的空隙补 0；目标游标不动；
    /// - 成功后本缓冲游标前移 `count`。
    pub fn read_bytes_into(
        &mut self,
        destination: &mut ByteBuffer,
        offset: usize,
        count: usize,
    ) -> Result<()> {
        let count = if count == 0 {
            self.bytes_available()
        } else {
            count
        };
        let source = self.readable_range(count)?;
        let end = offset.checked_add(count).ok_or_else(|| {
            BufferError::invalid_argument(
                "read_bytes_into",
                format!("offset {offset} + count {count} overflows usize"),
            )
        })?;
        destination.ensure_capacity(end)?;
        if end > destination.storage.len() {
            destination.storage.resize(end, 0);
        }
        destination.storage[offset..end].copy_from_slice(&self.storage[source.clone()]);
        self.position = source.end;
        Ok(())
    }

    //=== UTF-8 文本 ===//

    /// 从游标处消费恰好 `len` 字节并按 UTF-8 解码。
    ///
    /// # 契约说明（What）
    /// - 越过逻辑末尾时返回 [`BufferError::OutOfBounds`]，游标不动；
    /// - 内嵌 0x00 按当前 [`NulPolicy`] 处理，游标总是前移完整的 `len`；
    /// - 非法序列替换为 U+FFFD。
    pub fn read_utf_bytes(&mut self, len: usize) -> Result<String> {
        let range = self.readable_range(len)?;
        let value = text::decode_utf8(&self.storage[range.clone()], self.nul_policy);
        self.position = range.end;
        Ok(value)
    }

    /// 写入 `value` 的原始 UTF-8 字节，不带长度前缀。
    pub fn write_utf_bytes(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// 写入带 16 位无符号长度前缀（按当前字节序）的 UTF-8 字符串。
    ///
    /// 编码后超过 65535 字节时返回 [`BufferError::InvalidArgument`]，缓冲不变。
    pub fn write_utf(&mut self, value: &str) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| {
            BufferError::invalid_argument(
                "write_utf",
                format!("encoded length {} exceeds 65535 bytes", value.len()),
            )
        })?;
        self.ensure_writable(2 + value.len())?;
        self.write_unsigned_short(len)?;
        self.write_bytes(value.as_bytes())
    }

    /// 读取 [`write_utf`](Self::write_utf) 格式的字符串；载荷不足时游标恢复到调用前。
    pub fn read_utf(&mut self) -> Result<String> {
        let start = self.position;
        let len = self.read_unsigned_short()?;
        self.read_utf_bytes(usize::from(len)).inspect_err(|_| {
            self.position = start;
        })
    }

    //=== 内部工具 ===//

    fn read_scalar<T: Scalar>(&mut self) -> Result<T> {
        let range = self.readable_range(width_of::<T>())?;
        let value = scalar::decode(&self.storage[range.clone()], self.byte_order);
        self.position = range.end;
        Ok(value)
    }

    fn write_scalar<T: Scalar>(&mut self, value: T, operation: &'static str) -> Result<()> {
        let range = self.writable_range(width_of::<T>(), operation)?;
        scalar::encode(value, &mut self.storage[range.clone()], self.byte_order);
        self.position = range.end;
        Ok(())
    }

    /// 校验从游标起 `width` 字节全部位于逻辑长度之内。
    fn readable_range(&self, width: usize) -> Result<Range<usize>> {
        let length = self.storage.len();
        match self.position.checked_add(width) {
            Some(end) if end <= length => Ok(self.position..end),
            _ => Err(BufferError::out_of_bounds(self.position, width, length)),
        }
    }

    /// 为从游标起 `width` 字节的写入准备空间，必要时扩展长度并零填充空隙。
    fn writable_range(&mut self, width: usize, operation: &'static str) -> Result<Range<usize>> {
        let end = self.end_for_write(width, operation)?;
        self.ensure_capacity(end)?;
        if end > self.storage.len() {
            self.storage.resize(end, 0);
        }
        Ok(self.position..end)
    }

    fn end_for_write(&self, width: usize, operation: &'static str) -> Result<usize> {
        self.position.checked_add(width).ok_or_else(|| {
            BufferError::invalid_argument(
                operation,
                format!("position {} + {width} overflows usize", self.position),
            )
        })
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

/// 只比较逻辑内容，不比较游标、字节序与容量。
impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

impl Eq for ByteBuffer {}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("length", &self.storage.len())
            .field("position", &self.position)
            .field("capacity", &self.storage.capacity())
            .field("byte_order", &self.byte_order)
            .field("nul_policy", &self.nul_policy)
            .finish()
    }
}
