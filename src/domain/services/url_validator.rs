// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use thiserror::Error;
use url::{ParseError, Url};

/// 不参与爬取的链接前缀（大小写不敏感）
const IGNORED_PREFIXES: [&str; 3] = ["mailto:", "javascript:", "tel:"];

/// 域名范围错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Invalid start URL: {0}")]
    InvalidStartUrl(String),
}

/// 任务的域名范围
///
/// 由起始URL的 scheme 和 host 组成，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    scheme: String,
    host: String,
}

impl DomainScope {
    /// 从起始URL提取域名范围
    ///
    /// # 参数
    ///
    /// * `start_url` - 起始URL（scheme + host + path）
    ///
    /// # 返回值
    ///
    /// * `Ok(DomainScope)` - 提取成功
    /// * `Err(ScopeError)` - URL无法解析或缺少 scheme/host
    pub fn from_start_url(start_url: &str) -> Result<Self, ScopeError> {
        parse_start_url(start_url).map(|(_, scope)| scope)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for DomainScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// 解析起始URL
///
/// 返回规范化后的URL（例如 `http://example.com` 补全为 `http://example.com/`）
/// 和对应的域名范围，使起始页与页面中指向它的链接去重为同一个URL。
pub fn parse_start_url(start_url: &str) -> Result<(String, DomainScope), ScopeError> {
    let url = Url::parse(start_url.trim())
        .map_err(|_| ScopeError::InvalidStartUrl(start_url.to_string()))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ScopeError::InvalidStartUrl(start_url.to_string()))?;

    let scope = DomainScope {
        scheme: url.scheme().to_string(),
        host: host.to_ascii_lowercase(),
    };
    Ok((url.to_string(), scope))
}

/// 链接的host解析结果
#[derive(Debug, PartialEq, Eq)]
enum LinkHost {
    Relative,
    Host(String),
    Malformed,
}

/// 判断链接是否为邮件、脚本、电话或页内锚点
///
/// 首尾空白不影响判断
pub fn is_ignored_link(link: &str) -> bool {
    let link = link.trim();
    if link.starts_with('#') {
        return true;
    }
    IGNORED_PREFIXES.iter().any(|prefix| {
        link.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// 判断链接是否在任务的域名范围内
///
/// 没有host的相对链接视为在范围内（稍后由链接提取器解析）；
/// 有host的链接必须与范围host相同，或在允许子域名时以 `.host` 结尾。
/// 格式错误的链接和被忽略的链接都不在范围内。
///
/// # 参数
///
/// * `link` - 页面中发现的链接
/// * `scope` - 任务的域名范围
/// * `allow_subdomains` - 是否允许子域名
pub fn is_in_scope(link: &str, scope: &DomainScope, allow_subdomains: bool) -> bool {
    if is_ignored_link(link) {
        return false;
    }

    match link_host(link) {
        LinkHost::Relative => true,
        LinkHost::Malformed => false,
        LinkHost::Host(host) => {
            host == scope.host
                || (allow_subdomains && host.ends_with(&format!(".{}", scope.host)))
        }
    }
}

fn link_host(link: &str) -> LinkHost {
    let link = link.trim();

    // Protocol-relative references carry a host but no scheme
    if link.starts_with("//") {
        return match Url::parse(&format!("http:{}", link)) {
            Ok(url) => url
                .host_str()
                .map(|h| LinkHost::Host(h.to_ascii_lowercase()))
                .unwrap_or(LinkHost::Malformed),
            Err(_) => LinkHost::Malformed,
        };
    }

    match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => LinkHost::Host(host.to_ascii_lowercase()),
            _ => LinkHost::Relative,
        },
        Err(ParseError::RelativeUrlWithoutBase) if !has_invalid_scheme(link) => {
            LinkHost::Relative
        }
        Err(_) => LinkHost::Malformed,
    }
}

/// 形如 `ht@tp://...` 的链接：冒号前的部分不是合法的 scheme
fn has_invalid_scheme(link: &str) -> bool {
    let Some(colon) = link.find(':') else {
        return false;
    };
    let candidate = &link[..colon];
    if candidate.contains(['/', '?', '#']) {
        return false;
    }

    let mut chars = candidate.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    !valid
}
