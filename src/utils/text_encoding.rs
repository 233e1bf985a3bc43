// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 字面量反转义错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnquoteError {
    #[error("缺少包围的双引号")]
    MissingQuotes,

    #[error("未转义的字符: {0:?}")]
    UnescapedCharacter(char),

    #[error("无效的转义序列: \\{0}")]
    InvalidEscape(String),

    #[error("转义序列被截断")]
    TruncatedEscape,
}

/// 将双引号包围的字符串字面量反转义
///
/// 支持的转义序列：`\a \b \f \n \r \t \v \\ \"`、`\xHH`、`\ooo`、
/// `\uHHHH` 以及 `\UHHHHHHHH`。字面量内部出现未转义的 `"` 或换行时视为失败。
/// `\x` 与八进制转义产生原始字节，最终结果按 UTF-8 有损解码。
///
/// # 参数
///
/// * `quoted` - 带有首尾双引号的字面量
///
/// # 返回值
///
/// * `Ok(String)` - 反转义后的文本
/// * `Err(UnquoteError)` - 字面量语法无效
pub fn unquote_literal(quoted: &str) -> Result<String, UnquoteError> {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(UnquoteError::MissingQuotes)?;

    // Fast path: nothing to unescape
    if !inner.contains(['\\', '"', '\n']) {
        return Ok(inner.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return Err(UnquoteError::UnescapedCharacter(c)),
            '\\' => unescape_one(&mut chars, &mut out)?,
            _ => push_char(&mut out, c),
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn unescape_one(chars: &mut std::str::Chars<'_>, out: &mut Vec<u8>) -> Result<(), UnquoteError> {
    let escape = chars.next().ok_or(UnquoteError::TruncatedEscape)?;
    match escape {
        'a' => out.push(0x07),
        'b' => out.push(0x08),
        'f' => out.push(0x0c),
        'n' => out.push(b'\n'),
        'r' => out.push(b'\r'),
        't' => out.push(b'\t'),
        'v' => out.push(0x0b),
        '\\' => out.push(b'\\'),
        '"' => out.push(b'"'),
        'x' => {
            let value = read_digits(chars, 2, 16)?;
            // Two hex digits always fit in a byte
            out.push(value as u8);
        }
        'u' | 'U' => {
            let width = if escape == 'u' { 4 } else { 8 };
            let value = read_digits(chars, width, 16)?;
            let decoded = char::from_u32(value)
                .ok_or_else(|| UnquoteError::InvalidEscape(format!("{escape}{value:x}")))?;
            push_char(out, decoded);
        }
        '0'..='7' => {
            let rest = read_digits(chars, 2, 8)?;
            let value = (escape as u32 - '0' as u32) * 64 + rest;
            if value > 0xff {
                return Err(UnquoteError::InvalidEscape(format!("{value:o}")));
            }
            out.push(value as u8);
        }
        other => return Err(UnquoteError::InvalidEscape(other.to_string())),
    }
    Ok(())
}

fn read_digits(
    chars: &mut std::str::Chars<'_>,
    count: usize,
    radix: u32,
) -> Result<u32, UnquoteError> {
    let mut value = 0u32;
    for _ in 0..count {
        let c = chars.next().ok_or(UnquoteError::TruncatedEscape)?;
        let digit = c
            .to_digit(radix)
            .ok_or_else(|| UnquoteError::InvalidEscape(c.to_string()))?;
        value = value * radix + digit;
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
