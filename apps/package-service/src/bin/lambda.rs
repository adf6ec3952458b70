//! # Package Service Lambda 関数
//!
//! 操作ごとに 1 つの関数としてデプロイする。担当する操作は
//! `PACKAGE_FUNCTION`（`create` / `get` / `update` / `delete` / `list`）で選ぶ。
//! 出力はハンドラの JSON をそのまま返す。

use std::sync::Arc;

use catalog_package_service::{
   app,
   config::{PackageFunction, PackageServiceConfig},
   handler::{self, PackageEvent, PackageState, SERVICE_NAME},
};
use catalog_shared::observability::{TracingConfig, init_tracing};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;

async fn function_handler(
   state: &PackageState,
   function: PackageFunction,
   event: LambdaEvent<PackageEvent>,
) -> Result<Value, Error> {
   let (payload, context) = event.into_parts();
   tracing::info!(request_id = %context.request_id, %function, "イベントを受信しました");

   Ok(handler::invoke(state, function, payload).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
   init_tracing(&TracingConfig::from_env(SERVICE_NAME));

   let config = PackageServiceConfig::from_env()?;
   let function = config.require_function()?;
   let state = Arc::new(app::bootstrap(&config).await?);
   tracing::info!(%function, "Lambda 関数を起動します");

   run(service_fn(move |event: LambdaEvent<PackageEvent>| {
      let state = Arc::clone(&state);
      async move { function_handler(&state, function, event).await }
   }))
   .await
}
