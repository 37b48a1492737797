// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::site::ScrapeSite;
use crate::domain::services::quote_hash::collapse_whitespace;
use crate::domain::services::selectors::{CompiledSelector, SelectorError};
use crate::utils::url_utils;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// 站点选择器集合
///
/// 任务启动时从站点配置编译一次，整个页面循环复用。
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// 引文节点选择器
    pub quote: CompiledSelector,
    /// 作者节点选择器（配置为空时缺省）
    pub author: Option<CompiledSelector>,
    /// 下一页链接选择器（配置为空时使用回退启发式）
    pub pagination: Option<CompiledSelector>,
}

impl SiteSelectors {
    /// 编译站点配置中的选择器
    pub fn compile(site: &ScrapeSite) -> Result<Self, SelectorError> {
        let quote = CompiledSelector::compile(&site.quote_selector)?;
        let author = compile_optional(&site.author_selector)?;
        let pagination = compile_optional(&site.pagination_selector)?;
        Ok(Self {
            quote,
            author,
            pagination,
        })
    }
}

fn compile_optional(raw: &str) -> Result<Option<CompiledSelector>, SelectorError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    CompiledSelector::compile(raw).map(Some)
}

/// 引文候选
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCandidate {
    /// 可见文本，内部空白已折叠
    pub text: String,
    /// 作者名，未能解析到时缺省
    pub author: Option<String>,
}

/// 单页提取结果
#[derive(Debug, Clone)]
pub struct PageExtraction {
    /// 按文档顺序排列的候选序列
    pub candidates: Vec<QuoteCandidate>,
    /// 解析出的下一页绝对URL
    pub next_url: Option<Url>,
}

/// 提取服务
///
/// 对抓取到的页面内容应用站点选择器，产出引文候选与
/// 下一页链接。
pub struct ExtractionService;

impl ExtractionService {
    /// 提取一个页面
    ///
    /// 作者解析优先级：与引文节点同位置的独立作者节点序列，
    /// 其次在引文节点自身子树内查找，都未命中则缺省。
    pub fn extract(
        html_content: &str,
        selectors: &SiteSelectors,
        base_url: &Url,
    ) -> PageExtraction {
        let document = Html::parse_document(html_content);

        let quote_nodes: Vec<ElementRef> = document.select(selectors.quote.css()).collect();
        let author_nodes: Vec<ElementRef> = match &selectors.author {
            Some(sel) => document.select(sel.css()).collect(),
            None => Vec::new(),
        };

        let mut candidates = Vec::with_capacity(quote_nodes.len());
        for (i, qnode) in quote_nodes.iter().enumerate() {
            let text = element_text(qnode);

            let author = if i < author_nodes.len() {
                Some(element_text(&author_nodes[i]))
            } else {
                selectors
                    .author
                    .as_ref()
                    .and_then(|sel| qnode.select(sel.css()).next())
                    .map(|el| element_text(&el))
            };
            let author = author.filter(|name| !name.is_empty());

            candidates.push(QuoteCandidate { text, author });
        }

        let next_url = Self::next_page_url(&document, selectors, base_url);

        PageExtraction {
            candidates,
            next_url,
        }
    }

    /// 解析下一页链接
    ///
    /// 配置了分页选择器时取第一个匹配节点的href（或data-href），
    /// 否则回退为rel=next链接或文本为next/›/»的链接；相对地址
    /// 解析为基于站点基础URL的绝对地址。
    fn next_page_url(document: &Html, selectors: &SiteSelectors, base_url: &Url) -> Option<Url> {
        if let Some(sel) = &selectors.pagination {
            let node = document.select(sel.css()).next()?;
            let href = node
                .value()
                .attr("href")
                .or_else(|| node.value().attr("data-href"))?;
            return url_utils::resolve_url(base_url, href).ok();
        }

        let rel_next = Selector::parse(r#"a[rel="next"]"#).expect("selector is valid");
        if let Some(node) = document.select(&rel_next).next() {
            if let Some(href) = node.value().attr("href") {
                return url_utils::resolve_url(base_url, href).ok();
            }
        }

        let anchors = Selector::parse("a").expect("selector is valid");
        for node in document.select(&anchors) {
            let text = element_text(&node).to_lowercase();
            if matches!(text.as_str(), "next" | "›" | "»") {
                if let Some(href) = node.value().attr("href") {
                    return url_utils::resolve_url(base_url, href).ok();
                }
            }
        }

        None
    }
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
