// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

use crate::domain::services::url_validator::{self, DomainScope};

/// 锚点标签中双引号包裹的 href 属性
///
/// 单引号、无引号以及大写的 HREF 都不会被识别。
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a[^>]+href="(.*?)""#).expect("link pattern is valid"));

/// 链接提取器
///
/// 基于正则扫描页面原始文本，不构建DOM。
#[derive(Debug, Clone, Copy)]
pub struct LinkExtractor {
    allow_subdomains: bool,
}

impl LinkExtractor {
    pub fn new(allow_subdomains: bool) -> Self {
        Self { allow_subdomains }
    }

    /// 从页面内容中提取范围内的绝对URL
    ///
    /// # 参数
    ///
    /// * `current_url` - 当前页面的绝对URL，用于解析相对链接
    /// * `content` - 页面原始文本
    /// * `scope` - 任务的域名范围
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 去重后的绝对URL，按在页面中首次出现的顺序
    /// * `Err(url::ParseError)` - 当前页面URL本身无法解析
    pub fn extract(
        &self,
        current_url: &str,
        content: &str,
        scope: &DomainScope,
    ) -> Result<Vec<String>, url::ParseError> {
        let base = Url::parse(current_url)?;
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for capture in LINK_PATTERN.captures_iter(content) {
            let href = &capture[1];

            if url_validator::is_ignored_link(href) {
                continue;
            }
            if !url_validator::is_in_scope(href, scope, self.allow_subdomains) {
                continue;
            }

            if let Some(absolute) = resolve_link(&base, href) {
                if seen.insert(absolute.clone()) {
                    links.push(absolute);
                }
            }
        }

        Ok(links)
    }
}

/// 清理链接：去掉首尾空白并编码空格
pub fn sanitize_link(link: &str) -> String {
    link.trim().replace(' ', "%20")
}

/// 将链接解析为绝对URL，解析后缺少host的链接被丢弃
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(&sanitize_link(href)).ok()?;
    match resolved.host_str() {
        Some(host) if !host.is_empty() => Some(resolved.to_string()),
        _ => None,
    }
}
