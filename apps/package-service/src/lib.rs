//! # Package Service ライブラリ
//!
//! 梱包資材（Embalagem）の CRUD を提供するサービス。
//!
//! ```text
//! イベント → handler → usecase → repository → PostgreSQL
//! ```
//!
//! 応答は逆向きに各層で整形される。ユースケースは結果を
//! `{ success, data }` のエンベロープに描画し、ハンドラが画面向けの
//! メッセージやページング情報を加える。
//!
//! 同じハンドラを 2 つのエントリーポイントから使う:
//!
//! - `package-service`: axum による HTTP サーバー
//! - `package-lambda`: 操作ごとにデプロイする Lambda 関数（`lambda` feature）

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
