//! # レスポンスエンベロープ
//!
//! ユースケースとハンドラが返す統一レスポンス形式 `{ "success": bool, "data": T, ... }` を提供する。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 統一レスポンス型
///
/// すべてのユースケースは成功・失敗にかかわらずこの形式で結果を描画する。
/// 一覧系の `total` のような追加フィールドは `extra` に格納され、
/// シリアライズ時にトップレベルへ展開される。
///
/// ## 使用例
///
/// ```
/// use catalog_shared::Envelope;
///
/// let envelope = Envelope::success(vec!["a", "b"]).with_extra("total", 2);
/// let json = serde_json::to_value(&envelope).unwrap();
/// assert_eq!(json["total"], 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
   pub success: bool,
   pub data:    T,
   #[serde(flatten)]
   pub extra:   Map<String, Value>,
}

impl<T> Envelope<T> {
   /// 新しい `Envelope` を作成する
   pub fn new(success: bool, data: T) -> Self {
      Self {
         success,
         data,
         extra: Map::new(),
      }
   }

   /// 成功レスポンスを作成する
   pub fn success(data: T) -> Self {
      Self::new(true, data)
   }

   /// 失敗レスポンスを作成する
   ///
   /// `data` には呼び出し側が決めた空値（`None` や空の `Vec`）を渡す。
   pub fn failure(data: T) -> Self {
      Self::new(false, data)
   }

   /// 追加フィールドを設定する
   ///
   /// `success` / `data` と同名のキーはシリアライズ結果を壊すため無視する。
   pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
      let key = key.into();
      if key != "success" && key != "data" {
         self.extra.insert(key, value.into());
      }
      self
   }

   /// 追加フィールドを取得する
   pub fn extra(&self, key: &str) -> Option<&Value> {
      self.extra.get(key)
   }

   /// `data` を変換する
   pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
      Envelope {
         success: self.success,
         data:    f(self.data),
         extra:   self.extra,
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   #[test]
   fn test_成功レスポンスを正しいjson形状にする() {
      let envelope = Envelope::success("hello");
      let json = serde_json::to_value(&envelope).unwrap();

      assert_eq!(json, json!({ "success": true, "data": "hello" }));
   }

   #[test]
   fn test_失敗レスポンスはdataにnullを出力する() {
      let envelope: Envelope<Option<String>> = Envelope::failure(None);
      let json = serde_json::to_value(&envelope).unwrap();

      assert_eq!(json, json!({ "success": false, "data": null }));
   }

   #[test]
   fn test_追加フィールドはトップレベルに展開される() {
      let envelope = Envelope::success(vec![1, 2, 3]).with_extra("total", 3);
      let json = serde_json::to_value(&envelope).unwrap();

      assert_eq!(json, json!({ "success": true, "data": [1, 2, 3], "total": 3 }));
   }

   #[test]
   fn test_予約済みキーの追加フィールドは無視される() {
      let envelope = Envelope::success(1)
         .with_extra("success", false)
         .with_extra("data", 2);

      assert!(envelope.extra.is_empty());
      assert_eq!(serde_json::to_value(&envelope).unwrap(), json!({ "success": true, "data": 1 }));
   }

   #[test]
   fn test_deserializeで追加フィールドも復元される() {
      let json = r#"{"success": true, "data": [], "total": 0}"#;
      let envelope: Envelope<Vec<i32>> = serde_json::from_str(json).unwrap();

      assert!(envelope.success);
      assert_eq!(envelope.extra("total"), Some(&json!(0)));
   }

   #[test]
   fn test_mapでdataを変換しても追加フィールドが保持される() {
      let envelope = Envelope::success(2).with_extra("total", 1).map(|n| n * 10);

      assert_eq!(envelope.data, 20);
      assert_eq!(envelope.extra("total"), Some(&json!(1)));
   }
}
