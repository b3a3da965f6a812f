// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{info, warn};

pub const JOBS_CREATED_TOTAL: &str = "keycrawl_jobs_created_total";
pub const JOBS_COMPLETED_TOTAL: &str = "keycrawl_jobs_completed_total";
pub const PAGES_FETCHED_TOTAL: &str = "keycrawl_pages_fetched_total";
pub const FETCH_FAILURES_TOTAL: &str = "keycrawl_fetch_failures_total";
pub const MATCHES_TOTAL: &str = "keycrawl_matches_total";
pub const JOB_DURATION_SECONDS: &str = "keycrawl_job_duration_seconds";

/// 初始化指标系统
///
/// 安装 Prometheus 导出器并注册指标说明。未调用时所有指标记录都是空操作。
pub fn init_metrics(port: u16) {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!(JOBS_CREATED_TOTAL, "Total number of crawl jobs created");
    describe_counter!(
        JOBS_COMPLETED_TOTAL,
        "Total number of crawl jobs that reached a terminal status"
    );
    describe_counter!(PAGES_FETCHED_TOTAL, "Total number of pages fetched successfully");
    describe_counter!(FETCH_FAILURES_TOTAL, "Total number of failed page fetches");
    describe_counter!(MATCHES_TOTAL, "Total number of pages matching a search term");
    describe_histogram!(JOB_DURATION_SECONDS, "Duration of crawl jobs in seconds");

    info!("Metrics exporter listening on {}", addr);
}
