//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! | エラー種別 | 用途 |
//! |-----------|------|
//! | `Validation` | 入力値の検証失敗 |
//! | `NotFound` | エンティティが存在しない |
//!
//! ## 使用例
//!
//! ```rust
//! use catalog_domain::DomainError;
//!
//! fn validate_name(name: &str) -> Result<(), DomainError> {
//!    if name.is_empty() {
//!       return Err(DomainError::Validation("名前は必須です".to_string()));
//!    }
//!    Ok(())
//! }
//!
//! let error = DomainError::NotFound {
//!    entity_type: "Package",
//!    id:          "0190f3a0-0000-7000-8000-000000000000".to_string(),
//! };
//! assert!(error.to_string().contains("Package"));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
   /// バリデーションエラー
   ///
   /// 必須項目の未入力、文字数制限の超過、一覧クエリの不正な値など。
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// エンティティが見つからない
   #[error("{entity_type} が見つかりません: {id}")]
   NotFound {
      /// エンティティの種類（"Package" など）
      entity_type: &'static str,
      /// 検索に使用した識別子
      id:          String,
   },
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_バリデーションエラーのメッセージ() {
      let error = DomainError::Validation("名前は必須です".to_string());

      assert_eq!(error.to_string(), "バリデーションエラー: 名前は必須です");
   }

   #[test]
   fn test_not_foundのメッセージにエンティティ種別とidを含む() {
      let error = DomainError::NotFound {
         entity_type: "Package",
         id:          "abc".to_string(),
      };

      assert_eq!(error.to_string(), "Package が見つかりません: abc");
   }
}
