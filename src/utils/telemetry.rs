// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志
///
/// 默认级别 `info,keycrawl=debug`，可通过 `RUST_LOG` 覆盖。重复调用不会panic。
pub fn init_telemetry() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,keycrawl=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
