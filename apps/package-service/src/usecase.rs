//! # ユースケース層
//!
//! 操作ごとに 1 つのユースケースを置き、リポジトリ呼び出しの結果を
//! 統一エンベロープ `{ success, data }` に描画する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・トランザクション管理・時刻を `Arc<dyn Trait>` で注入
//! - **失敗の描画**: 失敗は `{ success: false, data: null | [] }` に描画するが、
//!   元の [`CoreError`] は [`UseCaseResponse`] に保持する
//! - **ログ**: 失敗はユースケースで一度だけ記録する
//!
//! ## モジュール構成
//!
//! - [`package`]: 梱包資材の作成・取得・更新・削除・一覧
//! - [`filter`]: 一覧画面の表示設定の取得

pub mod filter;
pub mod package;

use catalog_domain::package::Package;
use catalog_shared::{Envelope, TransportValue, transport};
use chrono::{DateTime, Utc};
pub use filter::{GetFilterInput, GetFilterUseCase, ListFilterDto};
pub use package::{
   CreatePackageInput,
   CreatePackageUseCase,
   DeletePackageInput,
   DeletePackageUseCase,
   GetPackageInput,
   GetPackageUseCase,
   ListPackagesInput,
   ListPackagesUseCase,
   UpdatePackageInput,
   UpdatePackageUseCase,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{CoreError, ErrorKind};

/// ユースケースの描画結果
///
/// シリアライズ結果はエンベロープそのもので、エラーは出力されない。
#[derive(Debug)]
pub struct UseCaseResponse<T> {
   envelope: Envelope<T>,
   error:    Option<CoreError>,
}

impl<T> UseCaseResponse<T> {
   /// 成功レスポンス
   pub fn success(data: T) -> Self {
      Self {
         envelope: Envelope::success(data),
         error:    None,
      }
   }

   /// 失敗レスポンス
   ///
   /// `empty` には `None` や空の `Vec` を渡す。
   pub fn failure(empty: T, error: CoreError) -> Self {
      Self {
         envelope: Envelope::failure(empty),
         error:    Some(error),
      }
   }

   /// 追加フィールドを設定する
   pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
      self.envelope = self.envelope.with_extra(key, value);
      self
   }

   pub fn is_success(&self) -> bool {
      self.envelope.success
   }

   pub fn data(&self) -> &T {
      &self.envelope.data
   }

   pub fn envelope(&self) -> &Envelope<T> {
      &self.envelope
   }

   /// 失敗の原因
   pub fn error(&self) -> Option<&CoreError> {
      self.error.as_ref()
   }

   /// 失敗の分類
   pub fn error_kind(&self) -> Option<ErrorKind> {
      self.error.as_ref().map(CoreError::kind)
   }

   pub fn into_parts(self) -> (Envelope<T>, Option<CoreError>) {
      (self.envelope, self.error)
   }

   /// 成功なら `data`、失敗なら保持しているエラーを返す
   pub fn into_result(self) -> Result<T, CoreError> {
      match self.error {
         None => Ok(self.envelope.data),
         Some(error) => Err(error),
      }
   }
}

impl<T: Serialize> Serialize for UseCaseResponse<T> {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      self.envelope.serialize(serializer)
   }
}

/// ユースケースの結果を描画する
///
/// 失敗は分類に応じたレベルで記録する。
pub(crate) fn render<T>(
   operation: &'static str,
   result: Result<T, CoreError>,
   empty: impl FnOnce() -> T,
) -> UseCaseResponse<T> {
   match result {
      Ok(data) => UseCaseResponse::success(data),
      Err(error) => {
         match error.kind() {
            ErrorKind::NotFound | ErrorKind::InvalidInput => {
               tracing::warn!(operation, error = %error, "ユースケースが失敗しました");
            }
            ErrorKind::Storage | ErrorKind::Internal => {
               tracing::error!(
                  operation,
                  transient = error.is_transient(),
                  error = ?error,
                  "ユースケースが失敗しました"
               );
            }
         }
         UseCaseResponse::failure(empty(), error)
      }
   }
}

/// 梱包資材の転送用表現
///
/// テナント ID は `empresa_id` として出力する。
/// 日時は `YYYY-MM-DD HH:MM:SS` 形式になる。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDto {
   pub id:         Uuid,
   pub name:       String,
   pub symbol:     Option<String>,
   #[serde(rename = "empresa_id")]
   pub tenant_id:  Uuid,
   pub created_by: Option<Uuid>,
   pub updated_by: Option<Uuid>,
   #[serde(deserialize_with = "transport::datetime::deserialize")]
   pub created_at: DateTime<Utc>,
   #[serde(deserialize_with = "transport::datetime::deserialize")]
   pub updated_at: DateTime<Utc>,
}

impl PackageDto {
   /// 型タグ付きの転送用の値に変換する
   pub fn to_transport(&self) -> TransportValue {
      let fields = [
         ("id", TransportValue::from(self.id.to_string())),
         ("name", TransportValue::from(self.name.as_str())),
         ("symbol", TransportValue::from(self.symbol.clone())),
         ("empresa_id", TransportValue::from(self.tenant_id.to_string())),
         (
            "created_by",
            TransportValue::from(self.created_by.map(|id| id.to_string())),
         ),
         (
            "updated_by",
            TransportValue::from(self.updated_by.map(|id| id.to_string())),
         ),
         ("created_at", TransportValue::Timestamp(self.created_at)),
         ("updated_at", TransportValue::Timestamp(self.updated_at)),
      ];
      TransportValue::Map(
         fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
      )
   }
}

impl Serialize for PackageDto {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      self.to_transport().serialize(serializer)
   }
}

impl From<&Package> for PackageDto {
   fn from(package: &Package) -> Self {
      Self {
         id:         *package.id().as_uuid(),
         name:       package.name().as_str().to_string(),
         symbol:     package.symbol().map(|s| s.as_str().to_string()),
         tenant_id:  *package.tenant_id().as_uuid(),
         created_by: package.created_by().map(|id| *id.as_uuid()),
         updated_by: package.updated_by().map(|id| *id.as_uuid()),
         created_at: package.created_at(),
         updated_at: package.updated_at(),
      }
   }
}

#[cfg(test)]
mod tests {
   use catalog_domain::{
      package::{NewPackage, PackageId, PackageName, PackageSymbol},
      tenant::TenantId,
      user::UserId,
   };
   use catalog_infra::InfraError;
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   fn sample_package() -> Package {
      Package::new(NewPackage {
         id:         PackageId::from_uuid(Uuid::from_u128(1)),
         tenant_id:  TenantId::from_uuid(Uuid::from_u128(2)),
         name:       PackageName::new("Caixa").unwrap(),
         symbol:     Some(PackageSymbol::new("CX").unwrap()),
         created_by: Some(UserId::from_uuid(Uuid::from_u128(3))),
         now:        DateTime::from_timestamp(1_700_000_000, 123_000_000).unwrap(),
      })
   }

   #[test]
   fn test_dtoはテナントをempresa_idとして日時を文字列で出力する() {
      let dto = PackageDto::from(&sample_package());

      assert_eq!(
         serde_json::to_value(&dto).unwrap(),
         json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Caixa",
            "symbol": "CX",
            "empresa_id": "00000000-0000-0000-0000-000000000002",
            "created_by": "00000000-0000-0000-0000-000000000003",
            "updated_by": "00000000-0000-0000-0000-000000000003",
            "created_at": "2023-11-14 22:13:20",
            "updated_at": "2023-11-14 22:13:20",
         })
      );
   }

   #[test]
   fn test_dtoは出力した形式から読み戻せる() {
      let dto = PackageDto::from(&sample_package());
      let restored: PackageDto =
         serde_json::from_value(serde_json::to_value(&dto).unwrap()).unwrap();

      assert_eq!(restored.id, dto.id);
      assert_eq!(restored.tenant_id, dto.tenant_id);
      assert_eq!(
         restored.created_at,
         DateTime::from_timestamp(1_700_000_000, 0).unwrap()
      );
   }

   #[test]
   fn test_失敗レスポンスはエラーを保持しつつ出力には含めない() {
      let response: UseCaseResponse<Option<PackageDto>> =
         render("get", Err(CoreError::NotFound("Package".into())), || None);

      assert!(!response.is_success());
      assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
      assert_eq!(
         serde_json::to_value(&response).unwrap(),
         json!({ "success": false, "data": null })
      );
   }

   #[test]
   fn test_一覧の失敗レスポンスはdataが空配列になる() {
      let response: UseCaseResponse<Vec<PackageDto>> = render(
         "list",
         Err(CoreError::Database(InfraError::unexpected("接続断"))),
         Vec::new,
      );

      assert_eq!(response.error_kind(), Some(ErrorKind::Storage));
      assert_eq!(
         serde_json::to_value(&response).unwrap(),
         json!({ "success": false, "data": [] })
      );
   }

   #[test]
   fn test_成功レスポンスに追加フィールドを付けられる() {
      let response = render("list", Ok(Vec::<PackageDto>::new()), Vec::new).with_extra("total", 0);

      assert!(response.error().is_none());
      assert_eq!(
         serde_json::to_value(&response).unwrap(),
         json!({ "success": true, "data": [], "total": 0 })
      );
   }
}
