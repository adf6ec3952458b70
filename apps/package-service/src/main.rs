//! # Package Service サーバー
//!
//! 梱包資材ハンドラをローカルの HTTP API として起動する。
//!
//! ## 環境変数
//!
//! 設定項目は [`catalog_package_service::config`] を参照。
//! ログは `RUST_LOG` と `LOG_FORMAT`（`json` / `pretty`）で制御する。

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use catalog_package_service::{
   app,
   config::PackageServiceConfig,
   handler::{self, SERVICE_NAME},
};
use catalog_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   init_tracing(&TracingConfig::from_env(SERVICE_NAME));

   let config = PackageServiceConfig::from_env().context("設定の読み込みに失敗しました")?;
   tracing::info!(
      "Package Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   let state = app::bootstrap(&config).await?;
   let app = handler::router(Arc::new(state));

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;
   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Package Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
