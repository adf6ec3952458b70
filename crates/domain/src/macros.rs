//! 識別子と文字列値オブジェクトを生成するマクロ
//!
//! 検証ロジックはマクロの外の関数に置き、マクロは型の定義と委譲だけを行う。

use crate::DomainError;

/// 前後の空白を除去し、必須・最大文字数を検証する
pub(crate) fn validated_text(
   label: &str,
   max_length: usize,
   value: String,
) -> Result<String, DomainError> {
   let trimmed = value.trim();
   if trimmed.is_empty() {
      return Err(DomainError::Validation(format!("{label}は必須です")));
   }
   if trimmed.chars().count() > max_length {
      return Err(DomainError::Validation(format!(
         "{label}は {max_length} 文字以内である必要があります"
      )));
   }
   Ok(if trimmed.len() == value.len() {
      value
   } else {
      trimmed.to_string()
   })
}

/// リクエスト中の文字列を UUID として読む
pub(crate) fn parse_uuid(label: &str, value: &str) -> Result<uuid::Uuid, DomainError> {
   uuid::Uuid::parse_str(value.trim())
      .map_err(|_| DomainError::Validation(format!("{label} の形式が不正です: {value:?}")))
}

/// UUID を包む識別子型を定義する
///
/// ```rust,ignore
/// define_uuid_id! {
///    /// テナントの識別子
///    pub struct TenantId => "テナント ID";
/// }
/// ```
///
/// 新規採番は UUID v7。文字列表現は UUID のハイフン区切り形式。
macro_rules! define_uuid_id {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident => $label:literal;
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, PartialEq, Eq, Hash,
         serde::Serialize, serde::Deserialize,
         derive_more::Display, derive_more::From,
      )]
      #[serde(transparent)]
      #[display("{_0}")]
      $vis struct $Name(uuid::Uuid);

      impl $Name {
         pub fn new() -> Self {
            Self(uuid::Uuid::now_v7())
         }

         pub fn from_uuid(uuid: uuid::Uuid) -> Self {
            Self(uuid)
         }

         pub fn as_uuid(&self) -> &uuid::Uuid {
            &self.0
         }
      }

      impl Default for $Name {
         fn default() -> Self {
            Self::new()
         }
      }

      impl std::str::FromStr for $Name {
         type Err = $crate::DomainError;

         fn from_str(s: &str) -> Result<Self, Self::Err> {
            $crate::macros::parse_uuid($label, s).map(Self)
         }
      }
   };
}

/// 検証済みの文字列を包む値オブジェクトを定義する
///
/// `new` は前後の空白を除去し、空文字列と `max_length` を超える文字数を拒否する。
/// 文字数は `char` 単位で数える。
macro_rules! define_validated_string {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident {
         label: $label:expr,
         max_length: $max_length:expr $(,)?
      }
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, PartialEq, Eq,
         serde::Serialize, serde::Deserialize,
         derive_more::Display,
      )]
      #[serde(try_from = "String", into = "String")]
      #[display("{_0}")]
      $vis struct $Name(String);

      impl $Name {
         /// 前後の空白を除いた最大文字数
         pub const MAX_LENGTH: usize = $max_length;

         pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
            $crate::macros::validated_text($label, Self::MAX_LENGTH, value.into()).map(Self)
         }

         pub fn as_str(&self) -> &str {
            &self.0
         }
      }

      impl AsRef<str> for $Name {
         fn as_ref(&self) -> &str {
            &self.0
         }
      }

      impl TryFrom<String> for $Name {
         type Error = $crate::DomainError;

         fn try_from(value: String) -> Result<Self, Self::Error> {
            Self::new(value)
         }
      }

      impl From<$Name> for String {
         fn from(value: $Name) -> Self {
            value.0
         }
      }
   };
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;
   use crate::{package::PackageName, tenant::TenantId};

   #[rstest]
   #[case("abc", "abc")]
   #[case("  ab ", "ab")]
   #[case("ção", "ção")]
   fn test_前後の空白を除いて受け付ける(#[case] input: &str, #[case] expected: &str) {
      assert_eq!(validated_text("名称", 3, input.to_string()), Ok(expected.to_string()));
   }

   #[rstest]
   #[case("", "名称は必須です")]
   #[case("   ", "名称は必須です")]
   #[case("abcd", "名称は 3 文字以内である必要があります")]
   fn test_空や長すぎる文字列は拒否する(#[case] input: &str, #[case] msg: &str) {
      assert_eq!(
         validated_text("名称", 3, input.to_string()),
         Err(DomainError::Validation(msg.to_string()))
      );
   }

   #[test]
   fn test_値オブジェクトはデシリアライズでも検証される() {
      let name: PackageName = serde_json::from_str("\" Caixa \"").unwrap();

      assert_eq!(name.as_ref(), "Caixa");
      assert_eq!(String::from(name), "Caixa");
      assert!(serde_json::from_str::<PackageName>("\"  \"").is_err());
   }

   #[test]
   fn test_idは前後の空白を許して文字列から読める() {
      let id = TenantId::new();
      let restored: TenantId = format!(" {id} ").parse().unwrap();

      assert_eq!(restored, id);
      assert_eq!(TenantId::from(*id.as_uuid()), id);
   }

   #[test]
   fn test_uuidでない文字列はラベル付きのエラー() {
      assert_eq!(
         "abc".parse::<TenantId>(),
         Err(DomainError::Validation(
            "テナント ID の形式が不正です: \"abc\"".to_string()
         ))
      );
   }
}
