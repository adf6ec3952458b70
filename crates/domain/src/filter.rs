//! # 一覧フィルタ設定
//!
//! ユーザーごと・画面ごとに保存される一覧の表示設定。
//! `data` は画面側が自由に使う JSON で、梱包資材一覧では `columns` のみを参照する。
//!
//! ```json
//! { "columns": ["name", "symbol", "created_at"] }
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{tenant::TenantId, user::UserId};

define_uuid_id! {
   /// 一覧フィルタ設定の一意識別子
   pub struct ListFilterId => "一覧フィルタ ID";
}

/// 一覧フィルタ設定エンティティ
///
/// `(tenant_id, user_id, entity)` の組で一意になる。
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
   id:         ListFilterId,
   tenant_id:  TenantId,
   user_id:    UserId,
   entity:     String,
   data:       Value,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

/// 一覧フィルタ設定の DB 復元パラメータ
pub struct ListFilterRecord {
   pub id:         ListFilterId,
   pub tenant_id:  TenantId,
   pub user_id:    UserId,
   pub entity:     String,
   pub data:       Value,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

impl ListFilter {
   /// 新しい一覧フィルタ設定を作成する
   pub fn new(
      id: ListFilterId,
      tenant_id: TenantId,
      user_id: UserId,
      entity: impl Into<String>,
      data: Value,
      now: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         tenant_id,
         user_id,
         entity: entity.into(),
         data,
         created_at: now,
         updated_at: now,
      }
   }

   /// 既存のデータから復元する
   pub fn from_db(record: ListFilterRecord) -> Self {
      Self {
         id:         record.id,
         tenant_id:  record.tenant_id,
         user_id:    record.user_id,
         entity:     record.entity,
         data:       record.data,
         created_at: record.created_at,
         updated_at: record.updated_at,
      }
   }

   pub fn id(&self) -> &ListFilterId {
      &self.id
   }

   pub fn tenant_id(&self) -> &TenantId {
      &self.tenant_id
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   pub fn entity(&self) -> &str {
      &self.entity
   }

   pub fn data(&self) -> &Value {
      &self.data
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }

   /// 表示カラムの設定
   ///
   /// `data.columns` が存在しない、または `null` の場合は `None`。
   pub fn columns(&self) -> Option<&Value> {
      self.data.get("columns").filter(|columns| !columns.is_null())
   }
}

#[cfg(test)]
mod tests {
   use serde_json::json;

   use super::*;

   fn filter_with(data: Value) -> ListFilter {
      ListFilter::new(
         ListFilterId::new(),
         TenantId::new(),
         UserId::new(),
         "table-packages-list",
         data,
         DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
      )
   }

   #[test]
   fn test_columnsを取り出せる() {
      let filter = filter_with(json!({ "columns": ["name", "symbol"] }));

      assert_eq!(filter.columns(), Some(&json!(["name", "symbol"])));
   }

   #[test]
   fn test_columnsがなければnone() {
      assert_eq!(filter_with(json!({ "order": "asc" })).columns(), None);
      assert_eq!(filter_with(json!({ "columns": null })).columns(), None);
      assert_eq!(filter_with(json!([])).columns(), None);
   }
}
