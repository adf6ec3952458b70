//! # Catalog 共有ユーティリティ
//!
//! このクレートは、Catalog プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, package-service）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える
//!
//! ## モジュール構成
//!
//! - [`envelope`] - `{ success, data, ... }` 形式のレスポンスエンベロープ
//! - [`field_error`] - 入力検証エラーのフィールド単位の記述子
//! - [`transport`] - 日時・固定小数点値の転送用表現への変換
//! - [`observability`] - トレーシング初期化

pub mod envelope;
pub mod field_error;
pub mod observability;
pub mod transport;

pub use envelope::Envelope;
pub use field_error::FieldError;
pub use transport::TransportValue;
