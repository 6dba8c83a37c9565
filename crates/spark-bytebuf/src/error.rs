//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 字节缓冲只有两类失败：读越过逻辑末尾，以及结构上非法的参数；
//!   集中定义后，上层解码器可以据此区分“数据尚未到齐”与“调用方用法错误”。
//!
//! ## 设计要求（What）
//! - 启用 `std` 时派生 `thiserror::Error`，兼容 `std::error::Error`；
//! - 关闭 `std` 时手写 `Display`，保持 `no_std + alloc` 可用；
//! - 每个变体提供稳定的字符串错误码，便于日志聚合与告警。

#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(feature = "std")]
use thiserror::Error;

use alloc::string::String;

/// 字节缓冲的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：让调用方自行决定短缓冲是“需要更多数据”（流式重组）还是硬错误，
///   因此错误中携带足够的定位信息，且库内从不重试或静默恢复。
/// - **契约 (What)**：
///   - 所有变体均为 `Send + Sync + 'static`，可安全跨线程传播；
///   - 返回错误时，缓冲的游标、长度与内容保持调用前的状态。
/// - **设计权衡 (Trade-offs)**：`InvalidArgument` 使用 `String` 保存细节，错误路径多一次堆分配，
///   换取可读的诊断信息；热路径上的 `OutOfBounds` 只携带整数。
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BufferError {
    /// 读取（定宽或批量）会越过逻辑长度。
    ///
    /// - **契约 (What)**：`position` 为尝试读取的起点，`width` 为请求的字节数，
    ///   `length` 为当时的逻辑长度；读操作从不自动扩展长度。
    #[cfg_attr(
        feature = "std",
        error(
            "ByteBuffer out of bounds read: position={position}, width={width}, length={length}"
        )
    )]
    OutOfBounds {
        position: usize,
        width: usize,
        length: usize,
    },

    /// 结构上非法的输入，例如目标区间溢出 `usize`、块粒度不是 2 的幂。
    ///
    /// - **契约 (What)**：`operation` 为触发错误的操作名，`detail` 为人类可读说明。
    #[cfg_attr(feature = "std", error("invalid argument to `{operation}`: {detail}"))]
    InvalidArgument {
        operation: &'static str,
        detail: String,
    },
}

impl BufferError {
    /// 越界错误的便捷构造。
    pub(crate) fn out_of_bounds(position: usize, width: usize, length: usize) -> Self {
        BufferError::OutOfBounds {
            position,
            width,
            length,
        }
    }

    /// 参数错误的便捷构造。
    pub(crate) fn invalid_argument(operation: &'static str, detail: impl Into<String>) -> Self {
        BufferError::InvalidArgument {
            operation,
            detail: detail.into(),
        }
    }

    /// 返回稳定错误码，命名遵循 `领域.原因` 约定。
    pub fn code(&self) -> &'static str {
        match self {
            BufferError::OutOfBounds { .. } => "buffer.out_of_bounds",
            BufferError::InvalidArgument { .. } => "buffer.invalid_argument",
        }
    }

    /// 判断是否为越界读取，流式重组场景常据此等待更多数据。
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, BufferError::OutOfBounds { .. })
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::OutOfBounds {
                position,
                width,
                length,
            } => write!(
                f,
                "ByteBuffer out of bounds read: position={position}, width={width}, length={length}"
            ),
            BufferError::InvalidArgument { operation, detail } => {
                write!(f, "invalid argument to `{operation}`: {detail}")
            }
        }
    }
}

/// crate 统一的结果别名。
pub type Result<T, E = BufferError> = core::result::Result<T, E>;
