//! # Catalog ドメイン層
//!
//! 商品カタログ（梱包資材）のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! package-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、Lambda ランタイム）に一切依存しない。
//! 永続化された行はリポジトリで [`package::Package`] に変換され、
//! ストレージのスキーマとは切り離された不変の値として扱われる。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`tenant`] - テナント（`empresa_id`）識別子
//! - [`user`] - 操作ユーザー識別子
//! - [`package`] - 梱包資材エンティティと一覧クエリ
//! - [`filter`] - 一覧画面の表示カラム設定
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use catalog_domain::{
//!    package::{NewPackage, Package, PackageId, PackageName},
//!    tenant::TenantId,
//!    user::UserId,
//! };
//!
//! let package = Package::new(NewPackage {
//!    id:         PackageId::new(),
//!    tenant_id:  TenantId::new(),
//!    name:       PackageName::new("Caixa").unwrap(),
//!    symbol:     None,
//!    created_by: Some(UserId::new()),
//!    now:        chrono::Utc::now(),
//! });
//!
//! assert_eq!(package.name().as_str(), "Caixa");
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod filter;
pub mod package;
pub mod tenant;
pub mod user;

pub use error::DomainError;
