// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;
use scraper::Selector;
use thiserror::Error;

/// 选择器错误类型
#[derive(Error, Debug)]
pub enum SelectorError {
    /// CSS选择器无法解析
    #[error("Invalid CSS selector '{0}'")]
    InvalidCss(String),
    /// XPath表达式超出受支持的子集
    #[error("Unsupported XPath expression '{0}'")]
    UnsupportedXPath(String),
}

/// 选择器说明
///
/// 站点配置存储的选择器字符串是自由文本，解析为带标签的
/// 变体后再分发，避免字符串式的临时判断散落在查询处。
/// 以`/`开头或带`xpath:`前缀的字符串视为XPath，其余为CSS。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorSpec {
    /// CSS选择器
    Css(String),
    /// XPath表达式
    XPath(String),
}

impl SelectorSpec {
    /// 从配置字符串解析选择器说明
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(stripped) = trimmed.strip_prefix("xpath:") {
            SelectorSpec::XPath(stripped.trim().to_string())
        } else if trimmed.starts_with('/') {
            SelectorSpec::XPath(trimmed.to_string())
        } else {
            SelectorSpec::Css(trimmed.to_string())
        }
    }
}

/// 编译后的选择器
///
/// 两种变体统一编译为一个可执行的查询。XPath支持可等价
/// 表达为CSS的实用子集（`//tag`、`/tag`、步内`[@attr='value']`
/// 谓词），其余表达式在任务启动时即报错。
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    spec: SelectorSpec,
    css: Selector,
}

impl CompiledSelector {
    /// 编译配置字符串
    pub fn compile(raw: &str) -> Result<Self, SelectorError> {
        let spec = SelectorSpec::parse(raw);
        let css_source = match &spec {
            SelectorSpec::Css(css) => css.clone(),
            SelectorSpec::XPath(expr) => xpath_to_css(expr)?,
        };
        let css = Selector::parse(&css_source)
            .map_err(|_| SelectorError::InvalidCss(css_source.clone()))?;
        Ok(Self { spec, css })
    }

    /// 查询执行用的CSS选择器
    pub fn css(&self) -> &Selector {
        &self.css
    }

    /// 原始选择器说明
    pub fn spec(&self) -> &SelectorSpec {
        &self.spec
    }
}

/// 将受支持的XPath子集翻译为等价CSS
fn xpath_to_css(expr: &str) -> Result<String, SelectorError> {
    let step_re = Regex::new(
        r#"^([a-zA-Z][a-zA-Z0-9-]*|\*)(\[@([a-zA-Z_][a-zA-Z0-9_:.-]*)=(?:'([^']*)'|"([^"]*)")\])?$"#,
    )
    .expect("step pattern is valid");

    if !expr.starts_with('/') {
        return Err(SelectorError::UnsupportedXPath(expr.to_string()));
    }

    let mut css = String::new();
    let mut rest = expr;
    while !rest.is_empty() {
        let descendant = if let Some(r) = rest.strip_prefix("//") {
            rest = r;
            true
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
            false
        } else {
            return Err(SelectorError::UnsupportedXPath(expr.to_string()));
        };

        let end = step_boundary(rest);
        let step = &rest[..end];
        rest = &rest[end..];

        let caps = step_re
            .captures(step)
            .ok_or_else(|| SelectorError::UnsupportedXPath(expr.to_string()))?;

        if !css.is_empty() {
            css.push_str(if descendant { " " } else { " > " });
        }
        css.push_str(caps.get(1).map(|m| m.as_str()).unwrap_or("*"));
        if let Some(attr) = caps.get(3) {
            let value = caps
                .get(4)
                .or_else(|| caps.get(5))
                .map(|m| m.as_str())
                .unwrap_or("");
            css.push_str(&format!("[{}=\"{}\"]", attr.as_str(), value));
        }
    }

    if css.is_empty() {
        return Err(SelectorError::UnsupportedXPath(expr.to_string()));
    }
    Ok(css)
}

/// 找到当前步的结束位置：下一个不在引号内的`/`
fn step_boundary(rest: &str) -> usize {
    let mut in_quote: Option<char> = None;
    for (i, c) in rest.char_indices() {
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
            }
            None => match c {
                '\'' | '"' => in_quote = Some(c),
                '/' => return i,
                _ => {}
            },
        }
    }
    rest.len()
}
