use alloc::format;

use crate::{
    error::{BufferError, Result},
    order::{ByteOrder, DEFAULT_BYTE_ORDER},
    text::NulPolicy,
};

/// 新建缓冲的最小容量预留（字节）。
pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

/// 容量扩张的块粒度（字节），扩容目标总是该值的整数倍。
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// 单次分配的容量上限，与 `Vec`/`BytesMut` 的布局约束一致。
pub(crate) const MAX_CAPACITY: usize = isize::MAX as usize;

/// `ByteBufferOptions` 描述 `ByteBuffer` 的构造期配置。
///
/// # 设计动机（Why）
/// - 默认字节序是逐实例配置而不是进程级全局状态，
///   同一进程中的不同解码器互不干扰。
/// - 容量粒度与初始预留影响重分配次数，资源解码器常会按典型负载调优，因此显式暴露。
///
/// # 契约说明（What）
/// - `byte_order`：初始字节序，构造后仍可通过 `set_byte_order` 修改；
/// - `initial_capacity`：初始容量预留，会按 `block_size` 向上取整；
/// - `block_size`：扩容粒度，必须是非零的 2 的幂；
/// - `nul_policy`：UTF-8 解码遇到 0x00 时的策略。
///
/// 启用 `serde` 特性后可直接从配置文件反序列化，缺省字段取默认值：
///
/// ```toml
/// byte_order = "little-endian"
/// block_size = 1024
/// nul_policy = "preserve"
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, deny_unknown_fields)
)]
pub struct ByteBufferOptions {
    pub byte_order: ByteOrder,
    pub initial_capacity: usize,
    pub block_size: usize,
    pub nul_policy: NulPolicy,
}

impl Default for ByteBufferOptions {
    fn default() -> Self {
        Self {
            byte_order: DEFAULT_BYTE_ORDER,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            block_size: DEFAULT_BLOCK_SIZE,
            nul_policy: NulPolicy::default(),
        }
    }
}

impl ByteBufferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_nul_policy(mut self, nul_policy: NulPolicy) -> Self {
        self.nul_policy = nul_policy;
        self
    }

    /// 校验配置的结构合法性。
    ///
    /// # 契约说明（What）
    /// - `block_size` 为 0 或不是 2 的幂时返回 [`BufferError::InvalidArgument`]；
    /// - `initial_capacity` 向上取整后溢出 `usize` 或超过 `isize::MAX` 时同样返回参数错误。
    pub fn validate(&self) -> Result<()> {
        if !self.block_size.is_power_of_two() {
            return Err(BufferError::invalid_argument(
                "ByteBufferOptions::validate",
                format!("block_size must be a non-zero power of two, got {}", self.block_size),
            ));
        }
        match round_up(self.initial_capacity, self.block_size) {
            Some(reserve) if reserve <= MAX_CAPACITY => {}
            _ => {
                return Err(BufferError::invalid_argument(
                    "ByteBufferOptions::validate",
                    format!(
                        "initial_capacity {} exceeds the allocation limit",
                        self.initial_capacity
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// 将 `n` 向上取整到 `block` 的整数倍；`block` 必须是 2 的幂，溢出时返回 `None`。
pub(crate) fn round_up(n: usize, block: usize) -> Option<usize> {
    debug_assert!(block.is_power_of_two());
    n.checked_add(block - 1).map(|padded| padded & !(block - 1))
}
