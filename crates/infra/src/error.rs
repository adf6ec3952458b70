//! # インフラ層エラー
//!
//! [`InfraError`] は種別 [`InfraErrorKind`] に、生成時点の [`SpanTrace`] を添えたもの。
//! `From<sqlx::Error>` と各コンストラクタがスパンを記録するので、
//! ログにはどのリポジトリメソッドで失敗したかが残る。
//!
//! sqlx のエラーは接続系（プールの枯渇・I/O・TLS）と
//! それ以外（SQL の失敗・制約違反など）に振り分ける。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// DB に到達できない
   #[error("データベースに接続できません: {0}")]
   Unavailable(#[source] sqlx::Error),

   /// SQL の実行に失敗した
   #[error("データベースエラー: {0}")]
   Database(#[source] sqlx::Error),

   #[error("シリアライズエラー: {0}")]
   Serialization(#[source] serde_json::Error),

   /// 更新・削除の対象行がない（他テナントの行を含む）
   #[error("{entity} が見つかりません: {id}")]
   NotFound { entity: &'static str, id: String },

   /// 保存済みの行がドメインの制約を満たさない
   #[error("{table}.{column} の値が不正です: {reason}")]
   CorruptRow {
      table:  &'static str,
      column: &'static str,
      reason: String,
   },

   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   fn capture(kind: InfraErrorKind) -> Self {
      Self {
         kind,
         span_trace: SpanTrace::capture(),
      }
   }

   pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
      Self::capture(InfraErrorKind::NotFound {
         entity,
         id: id.into(),
      })
   }

   pub fn corrupt_row(table: &'static str, column: &'static str, reason: impl fmt::Display) -> Self {
      Self::capture(InfraErrorKind::CorruptRow {
         table,
         column,
         reason: reason.to_string(),
      })
   }

   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self::capture(InfraErrorKind::Unexpected(msg.into()))
   }

   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   pub fn is_not_found(&self) -> bool {
      matches!(self.kind, InfraErrorKind::NotFound { .. })
   }

   /// 再試行で解消しうる失敗かどうか
   pub fn is_transient(&self) -> bool {
      matches!(self.kind, InfraErrorKind::Unavailable(_))
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      // SpanTrace の Debug は冗長なので Display で出す
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &format_args!("{}", self.span_trace))
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

impl From<sqlx::Error> for InfraError {
   fn from(source: sqlx::Error) -> Self {
      let kind = match source {
         sqlx::Error::PoolTimedOut
         | sqlx::Error::PoolClosed
         | sqlx::Error::Io(_)
         | sqlx::Error::Tls(_) => InfraErrorKind::Unavailable(source),
         other => InfraErrorKind::Database(other),
      };
      Self::capture(kind)
   }
}

impl From<serde_json::Error> for InfraError {
   fn from(source: serde_json::Error) -> Self {
      Self::capture(InfraErrorKind::Serialization(source))
   }
}

#[cfg(test)]
mod tests {
   use std::error::Error as _;

   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use tracing_subscriber::layer::SubscriberExt as _;

   use super::*;

   fn in_span<T>(name: &'static str, f: impl FnOnce() -> T) -> T {
      let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
      tracing::subscriber::with_default(subscriber, || {
         let span = tracing::info_span!("repo", method = name);
         let _enter = span.enter();
         f()
      })
   }

   #[rstest]
   #[case(sqlx::Error::PoolTimedOut, true)]
   #[case(sqlx::Error::PoolClosed, true)]
   #[case(sqlx::Error::Io(std::io::Error::other("reset")), true)]
   #[case(sqlx::Error::RowNotFound, false)]
   #[case(sqlx::Error::ColumnNotFound("name".to_string()), false)]
   fn test_sqlxのエラーを接続系とそれ以外に振り分ける(
      #[case] source: sqlx::Error,
      #[case] transient: bool,
   ) {
      let error = InfraError::from(source);

      assert_eq!(error.is_transient(), transient);
      assert!(error.source().is_some());
   }

   #[test]
   fn test_生成時のスパンが記録される() {
      let error = in_span("delete", || InfraError::not_found("Package", "PKG-001"));

      assert!(error.is_not_found());
      let trace = error.span_trace().to_string();
      assert!(trace.contains("repo"), "{trace}");
      assert!(trace.contains("delete"), "{trace}");
   }

   #[test]
   fn test_壊れた行はテーブルと列を示す() {
      let error = InfraError::corrupt_row("packages", "name", "空です");

      assert_eq!(error.to_string(), "packages.name の値が不正です: 空です");
      assert!(!error.is_not_found());
      assert!(error.source().is_none());
   }

   #[test]
   fn test_jsonのエラーはシリアライズエラーになる() {
      let source = serde_json::from_str::<String>("{").unwrap_err();

      assert!(matches!(
         InfraError::from(source).kind(),
         InfraErrorKind::Serialization(_)
      ));
   }
}
