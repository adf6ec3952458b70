//! # 入力検証エラー記述子
//!
//! リクエストボディの検証失敗をフィールド単位で表現する。
//! ハンドラは検証失敗時に `{ "success": false, "ErrorCodes": [FieldError...] }` を返す。

use serde::{Deserialize, Serialize};

/// 検証エラーの種別（現状は `invalid` のみ）
const ERROR_TYPE_INVALID: &str = "invalid";

/// フィールド単位の検証エラー
///
/// ## JSON 形式
///
/// ```json
/// { "entity": "packages", "field": "name", "type": "invalid", "msg": "'name' is a required property" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
   pub entity:     String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub field:      Option<String>,
   #[serde(rename = "type")]
   pub error_type: String,
   pub msg:        String,
}

impl FieldError {
   /// 特定フィールドの `invalid` エラーを作成する
   pub fn invalid(
      entity: impl Into<String>,
      field: impl Into<String>,
      msg: impl Into<String>,
   ) -> Self {
      Self {
         entity:     entity.into(),
         field:      Some(field.into()),
         error_type: ERROR_TYPE_INVALID.to_string(),
         msg:        msg.into(),
      }
   }

   /// フィールドを特定できない `invalid` エラーを作成する
   ///
   /// ボディ自体がオブジェクトでない場合などに使用する。
   pub fn invalid_entity(entity: impl Into<String>, msg: impl Into<String>) -> Self {
      Self {
         entity:     entity.into(),
         field:      None,
         error_type: ERROR_TYPE_INVALID.to_string(),
         msg:        msg.into(),
      }
   }
}
