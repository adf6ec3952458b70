//! # 梱包資材ハンドラ
//!
//! 受信イベントからユースケースの入力を組み立て、結果を関数の出力に整形する。
//!
//! | 操作 | 成功 | 失敗 |
//! |------|------|------|
//! | 作成 | `{ success, msg, data }` | `{ success: false, data: null, ErrorCodes: ["entity.save.error"] }` |
//! | 取得 | `{ success, data }` | `{ success: false, data: null }` |
//! | 更新 | `{ success, msg, data }` | `{ success: false, data: null }` |
//! | 削除 | `{ success, msg }` | `{ success: false, msg }` |
//! | 一覧 | `{ success, data, limit, total, offset, columns }` | `{ success: false, data: [] }` |
//!
//! 作成・更新のボディ検証に失敗した場合は `{ success: false, ErrorCodes: [FieldError...] }` を返す。

use std::sync::Arc;

use catalog_domain::{clock::Clock, package::PackageListQuery};
use catalog_infra::{
   db::TransactionManager,
   repository::{ListFilterRepository, PackageRepository},
};
use catalog_shared::{Envelope, FieldError};
use serde::Serialize;
use serde_json::Value;

use super::{event::PackageEvent, schema::validate_package_body};
use crate::{
   config::PackageFunction,
   error::{CoreError, ErrorKind},
   usecase::{
      CreatePackageInput,
      CreatePackageUseCase,
      DeletePackageInput,
      DeletePackageUseCase,
      GetFilterInput,
      GetFilterUseCase,
      GetPackageInput,
      GetPackageUseCase,
      ListPackagesInput,
      ListPackagesUseCase,
      PackageDto,
      UpdatePackageInput,
      UpdatePackageUseCase,
      render,
   },
};

const CREATED_MSG: &str = "Embalagem cadastrada com sucesso";
const UPDATED_MSG: &str = "Embalagem alterada com sucesso";
const DELETED_MSG: &str = "Embalagem foi removida com sucesso.";
const DELETE_FAILED_MSG: &str = "Erro ao remover Embalagem";
const SAVE_ERROR_CODE: &str = "entity.save.error";

/// 梱包資材ハンドラの共有状態
pub struct PackageState {
   pub create: CreatePackageUseCase,
   pub get:    GetPackageUseCase,
   pub update: UpdatePackageUseCase,
   pub delete: DeletePackageUseCase,
   pub list:   ListPackagesUseCase,
   pub filter: GetFilterUseCase,
}

impl PackageState {
   pub fn new(
      packages: Arc<dyn PackageRepository>,
      filters: Arc<dyn ListFilterRepository>,
      tx_manager: Arc<dyn TransactionManager>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         create: CreatePackageUseCase::new(packages.clone(), tx_manager.clone(), clock.clone()),
         get:    GetPackageUseCase::new(packages.clone()),
         update: UpdatePackageUseCase::new(packages.clone(), tx_manager.clone(), clock),
         delete: DeletePackageUseCase::new(packages.clone(), tx_manager),
         list:   ListPackagesUseCase::new(packages),
         filter: GetFilterUseCase::new(filters),
      }
   }
}

// --- 出力型 ---

/// ハンドラの出力
///
/// `payload` が関数の戻り値になる。失敗の分類は HTTP ステータスの決定に使う。
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutput<R> {
   pub payload: R,
   pub error:   Option<ErrorKind>,
}

impl<R> HandlerOutput<R> {
   fn ok(payload: R) -> Self {
      Self {
         payload,
         error: None,
      }
   }

   fn failed(payload: R, kind: ErrorKind) -> Self {
      Self {
         payload,
         error: Some(kind),
      }
   }

   pub fn is_success(&self) -> bool {
      self.error.is_none()
   }
}

impl<R: Serialize> HandlerOutput<R> {
   pub fn to_value(&self) -> Result<Value, serde_json::Error> {
      serde_json::to_value(&self.payload)
   }
}

/// 作成・更新の出力
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SaveResponse {
   Saved {
      success: bool,
      msg:     &'static str,
      data:    Option<PackageDto>,
   },
   Rejected {
      success:     bool,
      #[serde(rename = "ErrorCodes")]
      error_codes: Vec<FieldError>,
   },
   Failed {
      success:     bool,
      data:        Option<PackageDto>,
      #[serde(rename = "ErrorCodes", skip_serializing_if = "Vec::is_empty")]
      error_codes: Vec<&'static str>,
   },
}

impl SaveResponse {
   fn saved(msg: &'static str, data: Option<PackageDto>) -> Self {
      Self::Saved {
         success: true,
         msg,
         data,
      }
   }

   fn rejected(error_codes: Vec<FieldError>) -> Self {
      Self::Rejected {
         success: false,
         error_codes,
      }
   }

   fn failed(error_codes: Vec<&'static str>) -> Self {
      Self::Failed {
         success: false,
         data: None,
         error_codes,
      }
   }
}

/// 削除の出力
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
   pub success: bool,
   pub msg:     &'static str,
}

/// 一覧の出力
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListResponse {
   Listed {
      success: bool,
      data:    Vec<PackageDto>,
      limit:   i64,
      total:   i64,
      offset:  i64,
      columns: Option<Value>,
   },
   Failed {
      success:     bool,
      data:        Vec<PackageDto>,
      #[serde(rename = "ErrorCodes", skip_serializing_if = "Vec::is_empty")]
      error_codes: Vec<FieldError>,
   },
}

impl ListResponse {
   fn failed(error_codes: Vec<FieldError>) -> Self {
      Self::Failed {
         success: false,
         data: Vec::new(),
         error_codes,
      }
   }
}

// --- ハンドラ ---

/// 梱包資材を作成する
#[tracing::instrument(skip_all)]
pub async fn create_package(
   state: &PackageState,
   event: PackageEvent,
) -> HandlerOutput<SaveResponse> {
   let body = match validate_package_body(event.body.as_ref()) {
      Ok(body) => body,
      Err(errors) => {
         return HandlerOutput::failed(SaveResponse::rejected(errors), ErrorKind::InvalidInput);
      }
   };
   let context = event.tenant_id().and_then(|t| Ok((t, event.user_id()?)));
   let (tenant_id, created_by) = match context {
      Ok(context) => context,
      Err(error) => {
         let kind = reject_event("create_package", error);
         return HandlerOutput::failed(SaveResponse::failed(vec![SAVE_ERROR_CODE]), kind);
      }
   };

   let response = state
      .create
      .execute(CreatePackageInput {
         tenant_id,
         name: body.name,
         symbol: body.symbol,
         created_by,
      })
      .await;

   match response.into_result() {
      Ok(data) => HandlerOutput::ok(SaveResponse::saved(CREATED_MSG, data)),
      Err(error) => {
         HandlerOutput::failed(SaveResponse::failed(vec![SAVE_ERROR_CODE]), error.kind())
      }
   }
}

/// 梱包資材を 1 件取得する
#[tracing::instrument(skip_all)]
pub async fn get_package(
   state: &PackageState,
   event: PackageEvent,
) -> HandlerOutput<Envelope<Option<PackageDto>>> {
   let response = match event.tenant_id().and_then(|t| Ok((t, event.package_id()?))) {
      Ok((tenant_id, id)) => state.get.execute(GetPackageInput { id, tenant_id }).await,
      Err(error) => render("get_package", Err(error), || None),
   };

   let kind = response.error_kind();
   let (envelope, _) = response.into_parts();
   match kind {
      None => HandlerOutput::ok(envelope),
      Some(kind) => HandlerOutput::failed(envelope, kind),
   }
}

/// 梱包資材を更新する
///
/// ボディに `symbol` がなければ略号は消える。
#[tracing::instrument(skip_all)]
pub async fn update_package(
   state: &PackageState,
   event: PackageEvent,
) -> HandlerOutput<SaveResponse> {
   let body = match validate_package_body(event.body.as_ref()) {
      Ok(body) => body,
      Err(errors) => {
         return HandlerOutput::failed(SaveResponse::rejected(errors), ErrorKind::InvalidInput);
      }
   };
   let context = event
      .tenant_id()
      .and_then(|t| Ok((t, event.package_id()?, event.user_id()?)));
   let (tenant_id, id, updated_by) = match context {
      Ok(context) => context,
      Err(error) => {
         let kind = reject_event("update_package", error);
         return HandlerOutput::failed(SaveResponse::failed(Vec::new()), kind);
      }
   };

   let response = state
      .update
      .execute(UpdatePackageInput {
         id,
         tenant_id,
         name: body.name,
         symbol: body.symbol,
         updated_by,
      })
      .await;

   match response.into_result() {
      Ok(data) => HandlerOutput::ok(SaveResponse::saved(UPDATED_MSG, data)),
      Err(error) => HandlerOutput::failed(SaveResponse::failed(Vec::new()), error.kind()),
   }
}

/// 梱包資材を削除する
#[tracing::instrument(skip_all)]
pub async fn delete_package(
   state: &PackageState,
   event: PackageEvent,
) -> HandlerOutput<DeleteResponse> {
   let failed = DeleteResponse {
      success: false,
      msg:     DELETE_FAILED_MSG,
   };
   let (tenant_id, id) = match event.tenant_id().and_then(|t| Ok((t, event.package_id()?))) {
      Ok(context) => context,
      Err(error) => return HandlerOutput::failed(failed, reject_event("delete_package", error)),
   };

   match state.delete.execute(DeletePackageInput { id, tenant_id }).await.into_result() {
      Ok(_) => HandlerOutput::ok(DeleteResponse {
         success: true,
         msg:     DELETED_MSG,
      }),
      Err(error) => HandlerOutput::failed(failed, error.kind()),
   }
}

/// 梱包資材の一覧を取得する
///
/// `columns` には一覧画面の表示設定を付ける。設定がなければ `null`。
#[tracing::instrument(skip_all)]
pub async fn list_packages(
   state: &PackageState,
   event: PackageEvent,
) -> HandlerOutput<ListResponse> {
   let tenant_id = match event.tenant_id() {
      Ok(tenant_id) => tenant_id,
      Err(error) => {
         let kind = reject_event("list_packages", error);
         return HandlerOutput::failed(ListResponse::failed(Vec::new()), kind);
      }
   };
   let input = match event.list_input(tenant_id) {
      Ok(input) => input,
      Err(errors) => {
         return HandlerOutput::failed(ListResponse::failed(errors), ErrorKind::InvalidInput);
      }
   };

   let columns = load_columns(state, &event, &input).await;
   let limit = input.limit.unwrap_or(PackageListQuery::DEFAULT_LIMIT);
   let offset = input.offset.unwrap_or(PackageListQuery::DEFAULT_OFFSET);

   let response = state.list.execute(input).await;
   let total = response
      .envelope()
      .extra("total")
      .and_then(Value::as_i64)
      .unwrap_or_default();
   match response.into_result() {
      Ok(data) => HandlerOutput::ok(ListResponse::Listed {
         success: true,
         data,
         limit,
         total,
         offset,
         columns,
      }),
      Err(error) => HandlerOutput::failed(ListResponse::failed(Vec::new()), error.kind()),
   }
}

/// 一覧画面の表示カラムを読み込む
///
/// ユーザーが特定できない場合や取得に失敗した場合は `None`。
async fn load_columns(
   state: &PackageState,
   event: &PackageEvent,
   input: &ListPackagesInput,
) -> Option<Value> {
   let user_id = event.user_id().ok().flatten()?;
   let filter = state
      .filter
      .execute(GetFilterInput::package_list(input.tenant_id.clone(), user_id))
      .await
      .into_result()
      .ok()
      .flatten()?;
   filter.columns().cloned()
}

fn reject_event(operation: &'static str, error: CoreError) -> ErrorKind {
   tracing::warn!(operation, error = %error, "イベントが不正です");
   error.kind()
}

/// 担当する操作のハンドラを呼び出し、出力を JSON にする
pub async fn invoke(
   state: &PackageState,
   function: PackageFunction,
   event: PackageEvent,
) -> Result<Value, serde_json::Error> {
   match function {
      PackageFunction::Create => create_package(state, event).await.to_value(),
      PackageFunction::Get => get_package(state, event).await.to_value(),
      PackageFunction::Update => update_package(state, event).await.to_value(),
      PackageFunction::Delete => delete_package(state, event).await.to_value(),
      PackageFunction::List => list_packages(state, event).await.to_value(),
   }
}
