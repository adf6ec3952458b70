//! # Package Service エラー定義
//!
//! ユースケースで発生するエラーと、その分類を定義する。
//! ユースケースは失敗を `{ success: false }` に描画するが、
//! 元のエラーは [`UseCaseResponse`](crate::usecase::UseCaseResponse) に残り、
//! ハンドラは [`CoreError::kind`] で公開内容を決める。

use catalog_domain::DomainError;
use catalog_infra::InfraError;
use thiserror::Error;

/// Package Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// 不正なリクエスト
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] InfraError),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
   /// 対象が存在しない（他テナントの行を含む）
   NotFound,
   /// 入力が不正
   InvalidInput,
   /// ストレージの失敗
   Storage,
   /// その他の内部エラー
   Internal,
}

impl CoreError {
   /// エラーの分類を返す
   pub fn kind(&self) -> ErrorKind {
      match self {
         Self::NotFound(_) => ErrorKind::NotFound,
         Self::BadRequest(_) => ErrorKind::InvalidInput,
         Self::Database(_) => ErrorKind::Storage,
         Self::Internal(_) => ErrorKind::Internal,
      }
   }

   /// 接続断など、再実行で解消しうる失敗かどうか
   pub fn is_transient(&self) -> bool {
      matches!(self, Self::Database(error) if error.is_transient())
   }

   /// 書き込み時のインフラエラーを変換する
   ///
   /// 対象行がなかった場合は `NotFound`、それ以外は `Database` にする。
   pub fn from_write(error: InfraError) -> Self {
      if error.is_not_found() {
         Self::NotFound(error.to_string())
      } else {
         Self::Database(error)
      }
   }
}

impl From<DomainError> for CoreError {
   fn from(error: DomainError) -> Self {
      match error {
         DomainError::Validation(msg) => Self::BadRequest(msg),
         DomainError::NotFound { .. } => Self::NotFound(error.to_string()),
      }
   }
}
