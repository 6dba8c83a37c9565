use alloc::string::String;

/// `read_utf_bytes` 遇到内嵌 NUL（0x00）时的处理策略。
///
/// # 设计背景（Why）
/// - 许多二进制资产沿用 C 字符串习惯，以 0x00 作为文本结束标记，定长字段的尾部往往以 NUL 填充；
/// - 另一些协议把 0x00 当作合法码点原样保留。两种语义无法从字节本身区分，
///   因此由缓冲实例显式选择，而不是隐含在解码实现里。
///
/// # 契约说明（What）
/// - 无论哪种策略，游标都前进调用方请求的完整字节数；
/// - 在合法 UTF-8 中 0x00 只会以单字节形式出现，不会截断多字节序列。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum NulPolicy {
    /// 解码在第一个 0x00 处停止，其后的字节被消费但不进入结果。
    #[default]
    Terminate,
    /// 0x00 解码为 U+0000 并继续。
    Preserve,
}

/// 按策略把一段原始字节解码为字符串。
///
/// 非法 UTF-8 序列替换为 U+FFFD，不会导致失败。
pub(crate) fn decode_utf8(raw: &[u8], policy: NulPolicy) -> String {
    let text = match policy {
        NulPolicy::Terminate => match raw.iter().position(|&b| b == 0) {
            Some(nul) => &raw[..nul],
            None => raw,
        },
        NulPolicy::Preserve => raw,
    };
    String::from_utf8_lossy(text).into_owned()
}
