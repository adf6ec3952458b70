//! # HTTP アダプタ
//!
//! 梱包資材ハンドラをローカル実行用の HTTP API として公開する。
//!
//! ## エンドポイント
//!
//! - `GET /health` - ヘルスチェック
//! - `POST /packages` - 作成
//! - `GET /packages` - 一覧（クエリ文字列: `offset`, `limit`, `order`, `orderfield`, `name`, `symbol`）
//! - `GET /packages/{id}` - 取得
//! - `PUT /packages/{id}` - 更新
//! - `DELETE /packages/{id}` - 削除
//!
//! テナントは `X-Tenant-Id`、操作ユーザーは `X-User-Id` ヘッダーで受け取る。
//! レスポンスボディはサーバーレス関数の出力と同じで、失敗の分類に応じて
//! ステータスコードだけを変える。

use std::{collections::HashMap, sync::Arc};

use axum::{
   Json,
   Router,
   extract::{Path, Query, State},
   http::{HeaderMap, StatusCode},
   response::{IntoResponse, Response},
   routing::get,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tower_http::trace::TraceLayer;

use super::{
   event::PackageEvent,
   health::health_check,
   package::{self, HandlerOutput, PackageState},
};
use crate::error::ErrorKind;

/// テナント ID を渡すヘッダー
pub const TENANT_HEADER: &str = "x-tenant-id";
/// 操作ユーザーの ID を渡すヘッダー
pub const USER_HEADER: &str = "x-user-id";

/// ルーターを構築する
pub fn router(state: Arc<PackageState>) -> Router {
   Router::new()
      .route("/health", get(health_check))
      .route("/packages", get(list_packages).post(create_package))
      .route(
         "/packages/{id}",
         get(get_package).put(update_package).delete(delete_package),
      )
      .with_state(state)
      .layer(TraceLayer::new_for_http())
}

/// POST /packages
async fn create_package(
   State(state): State<Arc<PackageState>>,
   headers: HeaderMap,
   body: String,
) -> Response {
   let fields = Map::from_iter([("body".to_string(), Value::String(body))]);
   match build_event(&headers, fields) {
      Ok(event) => respond(package::create_package(&state, event).await, StatusCode::CREATED),
      Err(error) => malformed_event(error),
   }
}

/// GET /packages/{id}
async fn get_package(
   State(state): State<Arc<PackageState>>,
   headers: HeaderMap,
   Path(id): Path<String>,
) -> Response {
   let fields = Map::from_iter([("id".to_string(), Value::String(id))]);
   match build_event(&headers, fields) {
      Ok(event) => respond(package::get_package(&state, event).await, StatusCode::OK),
      Err(error) => malformed_event(error),
   }
}

/// PUT /packages/{id}
async fn update_package(
   State(state): State<Arc<PackageState>>,
   headers: HeaderMap,
   Path(id): Path<String>,
   body: String,
) -> Response {
   let fields = Map::from_iter([
      ("id".to_string(), Value::String(id)),
      ("body".to_string(), Value::String(body)),
   ]);
   match build_event(&headers, fields) {
      Ok(event) => respond(package::update_package(&state, event).await, StatusCode::OK),
      Err(error) => malformed_event(error),
   }
}

/// DELETE /packages/{id}
async fn delete_package(
   State(state): State<Arc<PackageState>>,
   headers: HeaderMap,
   Path(id): Path<String>,
) -> Response {
   let fields = Map::from_iter([("id".to_string(), Value::String(id))]);
   match build_event(&headers, fields) {
      Ok(event) => respond(package::delete_package(&state, event).await, StatusCode::OK),
      Err(error) => malformed_event(error),
   }
}

/// GET /packages
async fn list_packages(
   State(state): State<Arc<PackageState>>,
   headers: HeaderMap,
   Query(params): Query<HashMap<String, String>>,
) -> Response {
   const LIST_PARAMS: [&str; 6] = ["offset", "limit", "order", "orderfield", "name", "symbol"];

   let fields = params
      .into_iter()
      .filter(|(key, _)| LIST_PARAMS.contains(&key.as_str()))
      .map(|(key, value)| (key, Value::String(value)))
      .collect();
   match build_event(&headers, fields) {
      Ok(event) => respond(package::list_packages(&state, event).await, StatusCode::OK),
      Err(error) => malformed_event(error),
   }
}

/// ヘッダーとリクエストの値からイベントを組み立てる
fn build_event(
   headers: &HeaderMap,
   mut fields: Map<String, Value>,
) -> Result<PackageEvent, serde_json::Error> {
   if let Some(tenant_id) = header(headers, TENANT_HEADER) {
      fields.insert("empresa_id".to_string(), Value::String(tenant_id));
   }
   if let Some(user_id) = header(headers, USER_HEADER) {
      fields.insert("principal".to_string(), json!({ "id": user_id }));
   }
   serde_json::from_value(Value::Object(fields))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
   headers
      .get(name)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string)
}

fn status_for(kind: ErrorKind) -> StatusCode {
   match kind {
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
      ErrorKind::Storage | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
   }
}

fn respond<R: Serialize>(output: HandlerOutput<R>, success: StatusCode) -> Response {
   let status = output.error.map_or(success, status_for);
   (status, Json(output.payload)).into_response()
}

fn malformed_event(error: serde_json::Error) -> Response {
   tracing::warn!(error = %error, "リクエストからイベントを組み立てられません");
   (
      StatusCode::BAD_REQUEST,
      Json(json!({ "success": false, "data": null })),
   )
      .into_response()
}
