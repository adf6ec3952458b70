//! # 梱包資材（Embalagem）
//!
//! カタログで管理する梱包資材エンティティと、その一覧取得に使うクエリ型。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Package`] | 梱包資材 | 名前と略号を持つテナント固有のマスタ |
//! | [`PackageName`] | 名称 | 必須、前後の空白を除去、255 文字以内 |
//! | [`PackageSymbol`] | 略号 | 任意、50 文字以内 |
//! | [`PackageListQuery`] | 一覧クエリ | 部分一致フィルタ、ソート、ページング |
//!
//! ## 不変条件
//!
//! - `id` は作成時に採番され、以後変わらない
//! - `tenant_id` は作成時に決まり、更新で変わらない
//! - 更新できるのは名称・略号・更新者・更新日時のみ

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{DomainError, tenant::TenantId, user::UserId};

define_uuid_id! {
   /// 梱包資材の一意識別子
   pub struct PackageId => "梱包資材 ID";
}

define_validated_string! {
   /// 梱包資材名（値オブジェクト）
   pub struct PackageName {
      label: "梱包資材名",
      max_length: 255,
   }
}

define_validated_string! {
   /// 梱包資材の略号（値オブジェクト）
   ///
   /// エンティティ上は `Option<PackageSymbol>` で保持する。
   pub struct PackageSymbol {
      label: "略号",
      max_length: 50,
   }
}

impl PackageSymbol {
   /// 任意入力の略号を変換する
   ///
   /// `None` と空白のみの文字列は「略号なし」として `None` を返す。
   pub fn optional(value: Option<impl Into<String>>) -> Result<Option<Self>, DomainError> {
      match value.map(Into::into) {
         None => Ok(None),
         Some(raw) if raw.trim().is_empty() => Ok(None),
         Some(raw) => Self::new(raw).map(Some),
      }
   }
}

/// 梱包資材エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
   id:         PackageId,
   tenant_id:  TenantId,
   name:       PackageName,
   symbol:     Option<PackageSymbol>,
   created_by: Option<UserId>,
   updated_by: Option<UserId>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

/// 梱包資材の新規作成パラメータ
pub struct NewPackage {
   pub id:         PackageId,
   pub tenant_id:  TenantId,
   pub name:       PackageName,
   pub symbol:     Option<PackageSymbol>,
   pub created_by: Option<UserId>,
   pub now:        DateTime<Utc>,
}

/// 梱包資材の DB 復元パラメータ
pub struct PackageRecord {
   pub id:         PackageId,
   pub tenant_id:  TenantId,
   pub name:       PackageName,
   pub symbol:     Option<PackageSymbol>,
   pub created_by: Option<UserId>,
   pub updated_by: Option<UserId>,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

impl Package {
   /// 新しい梱包資材を作成する
   ///
   /// 作成者は更新者としても記録される。
   pub fn new(params: NewPackage) -> Self {
      Self {
         id:         params.id,
         tenant_id:  params.tenant_id,
         name:       params.name,
         symbol:     params.symbol,
         updated_by: params.created_by.clone(),
         created_by: params.created_by,
         created_at: params.now,
         updated_at: params.now,
      }
   }

   /// 既存のデータから復元する
   pub fn from_db(record: PackageRecord) -> Self {
      Self {
         id:         record.id,
         tenant_id:  record.tenant_id,
         name:       record.name,
         symbol:     record.symbol,
         created_by: record.created_by,
         updated_by: record.updated_by,
         created_at: record.created_at,
         updated_at: record.updated_at,
      }
   }

   // Getter メソッド

   pub fn id(&self) -> &PackageId {
      &self.id
   }

   pub fn tenant_id(&self) -> &TenantId {
      &self.tenant_id
   }

   pub fn name(&self) -> &PackageName {
      &self.name
   }

   pub fn symbol(&self) -> Option<&PackageSymbol> {
      self.symbol.as_ref()
   }

   pub fn created_by(&self) -> Option<&UserId> {
      self.created_by.as_ref()
   }

   pub fn updated_by(&self) -> Option<&UserId> {
      self.updated_by.as_ref()
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }

   // 不変更新メソッド

   /// 名称と略号を更新する
   ///
   /// 略号は常に置き換えられるため、`None` を渡すと略号は消える。
   pub fn with_details(
      self,
      name: PackageName,
      symbol: Option<PackageSymbol>,
      updated_by: Option<UserId>,
      now: DateTime<Utc>,
   ) -> Self {
      Self {
         name,
         symbol,
         updated_by,
         updated_at: now,
         ..self
      }
   }
}

/// 一覧のソート対象カラム
///
/// 呼び出し側が指定したカラム名はこの許可リストを通して解決する。
/// 列挙にないカラム名はバリデーションエラーになる。
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Default,
   Display,
   EnumString,
   IntoStaticStr,
   Serialize,
   Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PackageSortColumn {
   Id,
   Name,
   Symbol,
   CreatedBy,
   UpdatedBy,
   #[default]
   CreatedAt,
   UpdatedAt,
}

impl PackageSortColumn {
   /// 許可リストからカラムを解決する
   pub fn parse(value: &str) -> Result<Self, DomainError> {
      Self::from_str(value.trim()).map_err(|_| {
         DomainError::Validation(format!("ソート対象のカラムが不正です: {value:?}"))
      })
   }

   /// `packages` テーブル上のカラム名
   pub fn column_name(self) -> &'static str {
      self.into()
   }
}

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
   #[strum(serialize = "asc")]
   Asc,
   #[default]
   #[strum(serialize = "desc")]
   Desc,
}

impl SortOrder {
   /// 文字列からソート方向を決める
   ///
   /// 大文字小文字を区別せず `desc` のときだけ降順、それ以外はすべて昇順。
   pub fn parse(value: &str) -> Self {
      if value.trim().eq_ignore_ascii_case("desc") {
         Self::Desc
      } else {
         Self::Asc
      }
   }

   /// SQL のキーワード
   pub fn as_sql(self) -> &'static str {
      match self {
         Self::Asc => "ASC",
         Self::Desc => "DESC",
      }
   }
}

/// 一覧・件数取得に共通する絞り込み条件
///
/// 名称は常に部分一致（大文字小文字を区別しない）で絞り込む。
/// 略号は空でない場合のみ絞り込みに使う。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageFilter {
   pub name:   String,
   pub symbol: String,
}

impl PackageFilter {
   pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
      Self {
         name:   name.into(),
         symbol: symbol.into(),
      }
   }

   /// 名称の絞り込み文字列（空なら全件一致）
   pub fn name(&self) -> &str {
      &self.name
   }

   /// 略号の絞り込み文字列（空なら絞り込まない）
   pub fn symbol(&self) -> Option<&str> {
      if self.symbol.is_empty() {
         None
      } else {
         Some(&self.symbol)
      }
   }
}

/// 一覧クエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageListQuery {
   pub filter: PackageFilter,
   pub sort:   PackageSortColumn,
   pub order:  SortOrder,
   pub limit:  i64,
   pub offset: i64,
}

impl PackageListQuery {
   /// 1 ページあたりの既定件数
   pub const DEFAULT_LIMIT: i64 = 10;
   /// 既定の開始位置
   pub const DEFAULT_OFFSET: i64 = 0;

   /// ページング値を検証する
   pub fn validate(&self) -> Result<(), DomainError> {
      if self.limit < 0 {
         return Err(DomainError::Validation(format!(
            "limit は 0 以上である必要があります: {}",
            self.limit
         )));
      }
      if self.offset < 0 {
         return Err(DomainError::Validation(format!(
            "offset は 0 以上である必要があります: {}",
            self.offset
         )));
      }
      Ok(())
   }
}

impl Default for PackageListQuery {
   fn default() -> Self {
      Self {
         filter: PackageFilter::default(),
         sort:   PackageSortColumn::default(),
         order:  SortOrder::default(),
         limit:  Self::DEFAULT_LIMIT,
         offset: Self::DEFAULT_OFFSET,
      }
   }
}
