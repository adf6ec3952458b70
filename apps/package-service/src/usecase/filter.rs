//! 一覧フィルタ設定ユースケース
//!
//! 一覧画面の表示カラムなど、ユーザーごとの設定を取得する。

use std::sync::Arc;

use catalog_domain::{filter::ListFilter, tenant::TenantId, user::UserId};
use catalog_infra::repository::ListFilterRepository;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{UseCaseResponse, render};
use crate::error::CoreError;

/// 梱包資材一覧画面の設定キー
pub const PACKAGE_LIST_ENTITY: &str = "table-packages-list";

/// 設定取得の入力
#[derive(Debug, Clone)]
pub struct GetFilterInput {
   pub tenant_id: TenantId,
   pub user_id:   UserId,
   pub entity:    String,
}

impl GetFilterInput {
   /// 梱包資材一覧画面の設定を対象にする
   pub fn package_list(tenant_id: TenantId, user_id: UserId) -> Self {
      Self {
         tenant_id,
         user_id,
         entity: PACKAGE_LIST_ENTITY.to_string(),
      }
   }
}

/// 一覧フィルタ設定の転送用表現
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListFilterDto {
   pub id:     Uuid,
   pub entity: String,
   pub data:   Value,
}

impl ListFilterDto {
   /// 表示カラム（未設定なら `None`）
   pub fn columns(&self) -> Option<&Value> {
      self.data.get("columns").filter(|columns| !columns.is_null())
   }
}

impl From<&ListFilter> for ListFilterDto {
   fn from(filter: &ListFilter) -> Self {
      Self {
         id:     *filter.id().as_uuid(),
         entity: filter.entity().to_string(),
         data:   filter.data().clone(),
      }
   }
}

/// 一覧フィルタ設定取得ユースケース
///
/// 設定が保存されていないのは正常系で、`data: null` の成功として返す。
pub struct GetFilterUseCase {
   repository: Arc<dyn ListFilterRepository>,
}

impl GetFilterUseCase {
   pub fn new(repository: Arc<dyn ListFilterRepository>) -> Self {
      Self { repository }
   }

   pub async fn execute(&self, input: GetFilterInput) -> UseCaseResponse<Option<ListFilterDto>> {
      render("get_filter", self.get(input).await, || None)
   }

   async fn get(&self, input: GetFilterInput) -> Result<Option<ListFilterDto>, CoreError> {
      let filter = self
         .repository
         .find_by_entity(&input.tenant_id, &input.user_id, &input.entity)
         .await?;

      Ok(filter.as_ref().map(ListFilterDto::from))
   }
}

#[cfg(test)]
mod tests {
   use catalog_domain::filter::ListFilterId;
   use catalog_infra::mock::MockListFilterRepository;
   use chrono::DateTime;
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   fn saved_filter(tenant_id: &TenantId, user_id: &UserId, data: Value) -> ListFilter {
      ListFilter::new(
         ListFilterId::new(),
         tenant_id.clone(),
         user_id.clone(),
         PACKAGE_LIST_ENTITY,
         data,
         DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
      )
   }

   #[tokio::test]
   async fn test_保存済みの設定から表示カラムを取得できる() {
      let tenant_id = TenantId::new();
      let user_id = UserId::new();
      let repository = MockListFilterRepository::new();
      repository.add_filter(saved_filter(
         &tenant_id,
         &user_id,
         json!({ "columns": ["name", "symbol"] }),
      ));
      let sut = GetFilterUseCase::new(Arc::new(repository));

      let response = sut
         .execute(GetFilterInput::package_list(tenant_id, user_id))
         .await;

      assert!(response.is_success());
      let dto = response.data().clone().unwrap();
      assert_eq!(dto.entity, PACKAGE_LIST_ENTITY);
      assert_eq!(dto.columns(), Some(&json!(["name", "symbol"])));
   }

   #[tokio::test]
   async fn test_設定がなければdataはnullの成功になる() {
      let sut = GetFilterUseCase::new(Arc::new(MockListFilterRepository::new()));

      let response = sut
         .execute(GetFilterInput::package_list(TenantId::new(), UserId::new()))
         .await;

      assert!(response.is_success());
      assert_eq!(response.data(), &None);
   }

   #[tokio::test]
   async fn test_他のユーザーの設定は使わない() {
      let tenant_id = TenantId::new();
      let repository = MockListFilterRepository::new();
      repository.add_filter(saved_filter(
         &tenant_id,
         &UserId::new(),
         json!({ "columns": ["name"] }),
      ));
      let sut = GetFilterUseCase::new(Arc::new(repository));

      let response = sut
         .execute(GetFilterInput::package_list(tenant_id, UserId::new()))
         .await;

      assert_eq!(response.data(), &None);
   }

   #[test]
   fn test_columnsがnullなら未設定として扱う() {
      let filter = saved_filter(&TenantId::new(), &UserId::new(), json!({ "columns": null }));

      assert_eq!(ListFilterDto::from(&filter).columns(), None);
   }
}
