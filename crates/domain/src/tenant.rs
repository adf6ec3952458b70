//! # テナント
//!
//! 梱包資材はテナント（顧客企業、リクエスト上は `empresa_id`）ごとに分離される。
//! 作成以外のすべての読み書きはテナント ID で絞り込まれ、
//! 他テナントのデータにはアクセスできない。
//!
//! ```rust
//! use catalog_domain::tenant::TenantId;
//! use uuid::Uuid;
//!
//! let uuid = Uuid::parse_str("01234567-89ab-cdef-0123-456789abcdef").unwrap();
//! let tenant_id = TenantId::from_uuid(uuid);
//! assert_eq!(tenant_id.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
//! ```

define_uuid_id! {
   /// テナント（顧客企業）の一意識別子
   pub struct TenantId => "テナント ID";
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_文字列からパースできる() {
      let id: TenantId = "01234567-89ab-cdef-0123-456789abcdef".parse().unwrap();

      assert_eq!(id.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
   }

   #[test]
   fn test_前後の空白は無視してパースする() {
      let id: TenantId = " 01234567-89ab-cdef-0123-456789abcdef ".parse().unwrap();

      assert_eq!(id.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
   }

   #[test]
   fn test_不正な文字列はバリデーションエラーになる() {
      let result = "not-a-uuid".parse::<TenantId>();

      assert!(matches!(result, Err(crate::DomainError::Validation(_))));
   }

   #[test]
   fn test_serdeでは素のuuid文字列として扱う() {
      let id: TenantId = "01234567-89ab-cdef-0123-456789abcdef".parse().unwrap();

      assert_eq!(
         serde_json::to_value(&id).unwrap(),
         serde_json::json!("01234567-89ab-cdef-0123-456789abcdef")
      );
   }
}
