//! # 死活確認
//!
//! `GET /health` はプロセスが応答できることだけを返し、DB には触れない。
//! Lambda には対応する関数はない。

use axum::Json;
use serde::Serialize;

/// ログとヘルスチェックで名乗るサービス名
pub const SERVICE_NAME: &str = "package-service";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
   Healthy,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
   pub status:  HealthStatus,
   pub service: &'static str,
   pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse {
      status:  HealthStatus::Healthy,
      service: SERVICE_NAME,
      version: env!("CARGO_PKG_VERSION"),
   })
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   #[tokio::test]
   async fn test_サービス名とバージョンを返す() {
      let Json(response) = health_check().await;

      assert_eq!(
         serde_json::to_value(response).unwrap(),
         json!({
            "status": "healthy",
            "service": "package-service",
            "version": env!("CARGO_PKG_VERSION"),
         })
      );
   }
}
