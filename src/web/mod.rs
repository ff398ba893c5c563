//! Web 服务器模块
//!
//! 通过 HTTP 暴露翻译服务：`POST /translate-code` 和 `GET /health`

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::{TranslationError, TranslationResult, TranslationService};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    service: TranslationService,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, service: TranslationService) -> Self {
        Self { config, service }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> TranslationResult<()> {
        self.config.validate()?;

        let app = create_router(self.service.clone());

        let listener = tokio::net::TcpListener::bind(self.config.socket_addr())
            .await
            .map_err(|e| TranslationError::ConfigError(format!("failed to bind server: {}", e)))?;

        tracing::info!(
            "Web 服务器启动: http://{}，提供者链: {:?}",
            self.config.socket_addr(),
            self.service.provider_names()
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TranslationError::InternalError(format!("server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
pub fn create_router(service: TranslationService) -> Router {
    let app_state = Arc::new(AppState { service });

    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
