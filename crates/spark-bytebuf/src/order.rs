use core::{fmt, str::FromStr};

/// 多字节数值在字节序列中的排列顺序。
///
/// # 契约说明（What）
/// - `BigEndian`：最高有效字节在前，`0x12345678` 编码为 `12 34 56 78`；
/// - `LittleEndian`：最低有效字节在前，编码为 `78 56 34 12`；
/// - 字节序是每个缓冲实例自己的字段，修改只影响之后的读写，不会重写已写入的数据。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

/// 新建缓冲的默认字节序，与宿主平台的字节序无关。
pub const DEFAULT_BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;

impl ByteOrder {
    /// 返回常量风格的名称，如 `BIG_ENDIAN`。
    pub const fn as_str(self) -> &'static str {
        match self {
            ByteOrder::BigEndian => "BIG_ENDIAN",
            ByteOrder::LittleEndian => "LITTLE_ENDIAN",
        }
    }

    pub const fn is_little_endian(self) -> bool {
        matches!(self, ByteOrder::LittleEndian)
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解析字节序名称失败。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseByteOrderError;

impl fmt::Display for ParseByteOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected BIG_ENDIAN, LITTLE_ENDIAN, big-endian or little-endian")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseByteOrderError {}

impl FromStr for ByteOrder {
    type Err = ParseByteOrderError;

    /// 接受常量风格（`BIG_ENDIAN`）与配置风格（`big-endian`）两种写法，大小写不敏感。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("BIG_ENDIAN") || s.eq_ignore_ascii_case("big-endian") {
            Ok(ByteOrder::BigEndian)
        } else if s.eq_ignore_ascii_case("LITTLE_ENDIAN") || s.eq_ignore_ascii_case("little-endian")
        {
            Ok(ByteOrder::LittleEndian)
        } else {
            Err(ParseByteOrderError)
        }
    }
}
