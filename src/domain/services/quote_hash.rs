// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};

/// 计算引文的幂等键
///
/// 最小化规范化后返回SHA-256十六进制摘要。规范化规则：
/// 文本折叠空白、去首尾空白、转小写；作者名去首尾空白、
/// 转小写（缺失视为空串）；以`"{text}|{author}"`拼接。
/// 纯函数，结果必须跨实现逐字节一致，否则迁移后幂等性失效。
pub fn compute_quote_hash(text: &str, author_name: Option<&str>) -> String {
    let norm_text = collapse_whitespace(text).to_lowercase();
    let norm_author = author_name.unwrap_or("").trim().to_lowercase();
    let payload = format!("{}|{}", norm_text, norm_author);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// 将空白序列折叠为单个空格并去除首尾空白
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
