//! # ハンドラ
//!
//! 受信イベントをユースケースにつなぎ、出力を整形する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - [`package`] のハンドラはトランスポートに依存しない（Lambda と HTTP の両方から呼ぶ）
//! - ハンドラは薄く保ち、永続化の判断はユースケースに委譲する
//!
//! ## モジュール構成
//!
//! - [`event`]: 受信イベントの形式
//! - [`schema`]: 作成・更新ボディの検証
//! - [`package`]: 梱包資材ハンドラ
//! - [`health`]: ヘルスチェック
//! - [`http`]: axum によるローカル HTTP アダプタ

pub mod event;
pub mod health;
pub mod http;
pub mod package;
pub mod schema;

pub use event::{PackageEvent, Principal};
pub use health::{SERVICE_NAME, health_check};
pub use http::router;
pub use package::{
   DeleteResponse,
   HandlerOutput,
   ListResponse,
   PackageState,
   SaveResponse,
   create_package,
   delete_package,
   get_package,
   invoke,
   list_packages,
   update_package,
};
pub use schema::{PackageBody, validate_package_body};
