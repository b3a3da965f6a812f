// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use keycrawl::application::use_cases::crawl_job_use_case::CrawlJobService;
use keycrawl::config::settings::{Settings, BASE_URL_ENV};
use keycrawl::presentation::routes;
use keycrawl::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting keycrawl...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    if settings.metrics.enabled {
        keycrawl::infrastructure::metrics::init_metrics(settings.metrics.port);
    }

    // A missing start URL only fails job creation, not startup
    match settings.crawler.start_url() {
        Some(url) => info!("Crawling from {}", url),
        None => warn!(
            "No start URL configured; set crawler.base_url or {} before creating jobs",
            BASE_URL_ENV
        ),
    }

    // 3. Initialize crawl service
    let service = Arc::new(CrawlJobService::from_settings(&settings.crawler)?);
    info!(
        "Worker pool started with {} workers, {} pages per job",
        service.scheduler().capacity(),
        settings.crawler.max_pages
    );

    // 4. Start HTTP server
    let app = routes::app(service);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
