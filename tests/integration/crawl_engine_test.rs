// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{engine, job, page_with_links, InMemoryFetcher, SITE};
use keycrawl::domain::models::job::JobStatus;
use keycrawl::domain::services::crawl_engine::MAX_PAGES;
use std::sync::Arc;

/// 没有链接也没有命中的站点
#[tokio::test]
async fn test_single_page_without_match() {
    let fetcher = Arc::new(InMemoryFetcher::new().page(SITE, "<html><body>Nothing here</body></html>"));
    let job = job("Scenario", "security");

    let report = engine(fetcher.clone()).run(&job).await.unwrap();

    assert_eq!(report.visited, vec![SITE]);
    assert_eq!(report.matched, 0);
    assert_eq!(job.status(), JobStatus::Done);
    assert!(job.matched_urls().is_empty());
    assert_eq!(fetcher.requests(), vec![SITE]);
}

/// 搜索词只出现在子页面
#[tokio::test]
async fn test_match_on_linked_page() {
    let fetcher = Arc::new(
        InMemoryFetcher::new()
            .page(SITE, &page_with_links("Welcome", &["/about"]))
            .page("http://example.com/about", "<p>We take SECURITY seriously</p>"),
    );
    let job = job("Scenario", "security");

    let report = engine(fetcher).run(&job).await.unwrap();

    assert_eq!(report.visited, vec![SITE, "http://example.com/about"]);
    assert_eq!(job.matched_urls(), vec!["http://example.com/about"]);
    assert_eq!(job.status(), JobStatus::Done);
}

/// 链接数超过上限时恰好访问上限数量的页面
#[tokio::test]
async fn test_page_limit_is_enforced() {
    let mut fetcher = InMemoryFetcher::new().page(SITE, &page_with_links("needle root", &["/p1"]));
    for i in 1..150 {
        let next = format!("/p{}", i + 1);
        fetcher = fetcher.page(
            &format!("http://example.com/p{}", i),
            &page_with_links("needle", &[next.as_str()]),
        );
    }
    let fetcher = Arc::new(fetcher);
    let job = job("Scenario", "needle");

    let report = engine(fetcher.clone()).run(&job).await.unwrap();

    assert_eq!(report.visited.len(), MAX_PAGES);
    assert_eq!(fetcher.requests().len(), MAX_PAGES);
    assert_eq!(job.matched_urls().len(), MAX_PAGES);
    assert_eq!(job.status(), JobStatus::Done);
}

/// 失败的页面计入已访问但不会命中，遍历继续
#[tokio::test]
async fn test_failed_page_is_skipped() {
    let fetcher = Arc::new(
        InMemoryFetcher::new()
            .page(SITE, &page_with_links("home", &["/broken", "/ok"]))
            .failing("http://example.com/broken", 500)
            .page("http://example.com/ok", "security advisory"),
    );
    let job = job("Scenario", "security");

    let report = engine(fetcher).run(&job).await.unwrap();

    assert_eq!(
        report.visited,
        vec![SITE, "http://example.com/broken", "http://example.com/ok"]
    );
    assert_eq!(job.matched_urls(), vec!["http://example.com/ok"]);
    assert_eq!(job.status(), JobStatus::Done);
}

/// 每个URL只抓取一次，环和重复链接不会导致重复访问
#[tokio::test]
async fn test_cycles_are_visited_once() {
    let fetcher = Arc::new(
        InMemoryFetcher::new()
            .page(SITE, &page_with_links("root", &["/a", "/b", "/a"]))
            .page("http://example.com/a", &page_with_links("a", &["/b", "/"]))
            .page("http://example.com/b", &page_with_links("b", &["/a", SITE])),
    );
    let job = job("Scenario", "security");

    let report = engine(fetcher.clone()).run(&job).await.unwrap();

    assert_eq!(
        report.visited,
        vec![SITE, "http://example.com/a", "http://example.com/b"]
    );
    assert_eq!(fetcher.requests().len(), 3);
    assert_eq!(report.frontier_remaining, 0);
}

/// 只跟随范围内的链接
#[tokio::test]
async fn test_out_of_scope_links_are_not_followed() {
    let fetcher = Arc::new(InMemoryFetcher::new().page(
        SITE,
        &page_with_links(
            "root",
            &[
                "http://other.com/x",
                "mailto:team@example.com",
                "#top",
                "javascript:void(0)",
                "http://blog.example.com/post",
            ],
        ),
    ));
    let job = job("Scenario", "security");

    let report = engine(fetcher).run(&job).await.unwrap();

    assert_eq!(report.visited, vec![SITE, "http://blog.example.com/post"]);
}

/// 同一页面多次出现搜索词只记录一次
#[tokio::test]
async fn test_repeated_term_is_recorded_once() {
    let fetcher = Arc::new(InMemoryFetcher::new().page(SITE, "security security SECURITY"));
    let job = job("Scenario", "security");

    engine(fetcher).run(&job).await.unwrap();

    assert_eq!(job.matched_urls(), vec![SITE]);
}
