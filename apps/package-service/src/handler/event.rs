//! # 受信イベント
//!
//! サーバーレス関数が受け取るイベントの形式。
//!
//! ```json
//! {
//!   "empresa_id": "…",
//!   "id": "…",
//!   "principal": { "id": "…" },
//!   "body": { "name": "Caixa", "symbol": "CX" },
//!   "offset": "0", "limit": "10", "order": "desc", "orderfield": "created_at",
//!   "name": "", "symbol": ""
//! }
//! ```
//!
//! 文字列で届くことが前提の項目も、数値で届いた場合は文字列として受け付ける。
//! `body` はオブジェクトのほか、JSON 文字列で届く場合もある。

use catalog_domain::{package::PackageId, tenant::TenantId, user::UserId};
use catalog_shared::FieldError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::schema::{ENTITY, python_repr};
use crate::{error::CoreError, usecase::ListPackagesInput};

/// 操作を実行したユーザー
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Principal {
   #[serde(default, deserialize_with = "lenient_string")]
   pub id: Option<String>,
}

/// 梱包資材関数の受信イベント
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageEvent {
   #[serde(default, deserialize_with = "lenient_string")]
   pub empresa_id: Option<String>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub id:         Option<String>,
   #[serde(default)]
   pub principal:  Option<Principal>,
   #[serde(default, deserialize_with = "body")]
   pub body:       Option<Value>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub offset:     Option<String>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub limit:      Option<String>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub order:      Option<String>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub orderfield: Option<String>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub name:       Option<String>,
   #[serde(default, deserialize_with = "lenient_string")]
   pub symbol:     Option<String>,
}

impl PackageEvent {
   /// テナント ID
   pub fn tenant_id(&self) -> Result<TenantId, CoreError> {
      required(self.empresa_id.as_deref(), "empresa_id")?
         .parse::<TenantId>()
         .map_err(CoreError::from)
   }

   /// 対象の梱包資材 ID
   pub fn package_id(&self) -> Result<PackageId, CoreError> {
      required(self.id.as_deref(), "id")?
         .parse::<PackageId>()
         .map_err(CoreError::from)
   }

   /// 操作したユーザー（未指定なら `None`）
   pub fn user_id(&self) -> Result<Option<UserId>, CoreError> {
      match self.principal.as_ref().and_then(|p| p.id.as_deref()) {
         None => Ok(None),
         Some(id) if id.trim().is_empty() => Ok(None),
         Some(id) => id.parse::<UserId>().map(Some).map_err(CoreError::from),
      }
   }

   /// 一覧ユースケースの入力を組み立てる
   ///
   /// 空文字の項目は既定値になる。`offset` / `limit` が整数でなければ検証エラー。
   pub fn list_input(&self, tenant_id: TenantId) -> Result<ListPackagesInput, Vec<FieldError>> {
      let mut errors = Vec::new();
      let offset = integer_param(self.offset.as_deref(), "offset", &mut errors);
      let limit = integer_param(self.limit.as_deref(), "limit", &mut errors);
      if !errors.is_empty() {
         return Err(errors);
      }

      Ok(ListPackagesInput {
         tenant_id,
         name: self.name.clone().unwrap_or_default(),
         symbol: self.symbol.clone().unwrap_or_default(),
         order_field: self.orderfield.clone(),
         order: self.order.clone(),
         limit,
         offset,
      })
   }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, CoreError> {
   value
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .ok_or_else(|| CoreError::BadRequest(format!("{name} が指定されていません")))
}

fn integer_param(value: Option<&str>, field: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
   let value = value.map(str::trim).filter(|v| !v.is_empty())?;
   match value.parse() {
      Ok(n) => Some(n),
      Err(_) => {
         errors.push(FieldError::invalid(
            ENTITY,
            field,
            format!(
               "{} is not of type 'integer'",
               python_repr(&Value::String(value.to_string()))
            ),
         ));
         None
      }
   }
}

/// 文字列・数値・真偽値を文字列として受け取る
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
   Ok(match Option::<Value>::deserialize(deserializer)? {
      None | Some(Value::Null) => None,
      Some(Value::String(s)) => Some(s),
      Some(Value::Number(n)) => Some(n.to_string()),
      Some(Value::Bool(b)) => Some(b.to_string()),
      Some(other) => Some(other.to_string()),
   })
}

/// JSON 文字列で届いたボディは展開する
///
/// 展開できない文字列はそのまま残し、スキーマ検証で弾く。
fn body<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
   Ok(match Option::<Value>::deserialize(deserializer)? {
      None | Some(Value::Null) => None,
      Some(Value::String(raw)) => {
         Some(serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw)))
      }
      Some(other) => Some(other),
   })
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::json;

   use super::*;
   use crate::error::ErrorKind;

   const TENANT: &str = "00000000-0000-0000-0000-000000000001";

   fn event(value: Value) -> PackageEvent {
      serde_json::from_value(value).unwrap()
   }

   #[test]
   fn test_文字列のボディはjsonとして展開する() {
      let sut = event(json!({ "body": "{\"name\": \"Caixa\"}" }));

      assert_eq!(sut.body, Some(json!({ "name": "Caixa" })));
   }

   #[test]
   fn test_展開できないボディは文字列のまま残す() {
      let sut = event(json!({ "body": "not json" }));

      assert_eq!(sut.body, Some(json!("not json")));
   }

   #[test]
   fn test_数値で届いた項目は文字列として受け付ける() {
      let sut = event(json!({ "offset": 20, "limit": 5, "principal": { "id": null } }));

      assert_eq!(sut.offset.as_deref(), Some("20"));
      assert_eq!(sut.limit.as_deref(), Some("5"));
      assert_eq!(sut.user_id().unwrap(), None);
   }

   #[rstest]
   #[case(json!({}))]
   #[case(json!({ "empresa_id": "" }))]
   #[case(json!({ "empresa_id": "not-a-uuid" }))]
   fn test_テナントidがないか不正なら入力エラー(#[case] value: Value) {
      let error = event(value).tenant_id().unwrap_err();

      assert_eq!(error.kind(), ErrorKind::InvalidInput);
   }

   #[test]
   fn test_一覧の空文字は未指定として扱う() {
      let sut = event(json!({
         "empresa_id": TENANT,
         "offset": "",
         "limit": "",
         "order": "",
         "orderfield": "",
         "name": "",
         "symbol": "",
      }));

      let input = sut.list_input(sut.tenant_id().unwrap()).unwrap();

      assert_eq!(input.offset, None);
      assert_eq!(input.limit, None);
      assert_eq!(input.name, "");
   }

   #[test]
   fn test_一覧のoffsetとlimitが整数でなければ検証エラー() {
      let sut = event(json!({ "empresa_id": TENANT, "offset": "abc", "limit": "1.5" }));

      let errors = sut.list_input(sut.tenant_id().unwrap()).unwrap_err();

      assert_eq!(
         errors,
         vec![
            FieldError::invalid("packages", "offset", "'abc' is not of type 'integer'"),
            FieldError::invalid("packages", "limit", "'1.5' is not of type 'integer'"),
         ]
      );
   }
}
