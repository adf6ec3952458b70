//! 梱包資材ユースケース
//!
//! 作成・取得・更新・削除・一覧の 5 操作をそれぞれ独立したユースケースとして持つ。
//! どのユースケースも失敗を返さず、[`UseCaseResponse`] に描画する。

use std::sync::Arc;

use catalog_domain::{
   clock::Clock,
   package::{
      NewPackage,
      Package,
      PackageFilter,
      PackageId,
      PackageListQuery,
      PackageName,
      PackageSortColumn,
      PackageSymbol,
      SortOrder,
   },
   tenant::TenantId,
   user::UserId,
};
use catalog_infra::{db::TransactionManager, repository::PackageRepository};

use super::{PackageDto, UseCaseResponse, render};
use crate::error::CoreError;

const NOT_FOUND: &str = "梱包資材が見つかりません";

/// 梱包資材作成の入力
#[derive(Debug, Clone)]
pub struct CreatePackageInput {
   pub tenant_id:  TenantId,
   pub name:       String,
   pub symbol:     Option<String>,
   pub created_by: Option<UserId>,
}

/// 梱包資材取得の入力
#[derive(Debug, Clone)]
pub struct GetPackageInput {
   pub id:        PackageId,
   pub tenant_id: TenantId,
}

/// 梱包資材更新の入力
///
/// `symbol` が `None` の場合、略号は消える。
#[derive(Debug, Clone)]
pub struct UpdatePackageInput {
   pub id:         PackageId,
   pub tenant_id:  TenantId,
   pub name:       String,
   pub symbol:     Option<String>,
   pub updated_by: Option<UserId>,
}

/// 梱包資材削除の入力
#[derive(Debug, Clone)]
pub struct DeletePackageInput {
   pub id:        PackageId,
   pub tenant_id: TenantId,
}

/// 梱包資材一覧の入力
///
/// `None` と空文字はどちらも既定値として扱う。
#[derive(Debug, Clone, Default)]
pub struct ListPackagesInput {
   pub tenant_id:   TenantId,
   pub name:        String,
   pub symbol:      String,
   pub order_field: Option<String>,
   pub order:       Option<String>,
   pub limit:       Option<i64>,
   pub offset:      Option<i64>,
}

impl ListPackagesInput {
   /// リポジトリに渡すクエリを組み立てる
   ///
   /// ソート対象は許可リストで解決し、ページング値を検証する。
   fn to_query(&self) -> Result<PackageListQuery, CoreError> {
      let sort = match non_empty(self.order_field.as_deref()) {
         Some(field) => PackageSortColumn::parse(field)?,
         None => PackageSortColumn::default(),
      };
      let order = non_empty(self.order.as_deref())
         .map(SortOrder::parse)
         .unwrap_or_default();
      let query = PackageListQuery {
         filter: PackageFilter::new(self.name.as_str(), self.symbol.as_str()),
         sort,
         order,
         limit: self.limit.unwrap_or(PackageListQuery::DEFAULT_LIMIT),
         offset: self.offset.unwrap_or(PackageListQuery::DEFAULT_OFFSET),
      };
      query.validate()?;
      Ok(query)
   }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
   value.map(str::trim).filter(|v| !v.is_empty())
}

// ===== 作成 =====

/// 梱包資材作成ユースケース
pub struct CreatePackageUseCase {
   repository: Arc<dyn PackageRepository>,
   tx_manager: Arc<dyn TransactionManager>,
   clock:      Arc<dyn Clock>,
}

impl CreatePackageUseCase {
   pub fn new(
      repository: Arc<dyn PackageRepository>,
      tx_manager: Arc<dyn TransactionManager>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         repository,
         tx_manager,
         clock,
      }
   }

   /// 新しい ID と現在時刻で梱包資材を登録する
   pub async fn execute(&self, input: CreatePackageInput) -> UseCaseResponse<Option<PackageDto>> {
      render("create_package", self.create(input).await.map(Some), || None)
   }

   async fn create(&self, input: CreatePackageInput) -> Result<PackageDto, CoreError> {
      let package = Package::new(NewPackage {
         id:         PackageId::new(),
         tenant_id:  input.tenant_id,
         name:       PackageName::new(input.name)?,
         symbol:     PackageSymbol::optional(input.symbol)?,
         created_by: input.created_by,
         now:        self.clock.now(),
      });

      let mut tx = self.tx_manager.begin().await?;
      self.repository.insert(&mut tx, &package).await?;
      tx.commit().await?;

      Ok(PackageDto::from(&package))
   }
}

// ===== 取得 =====

/// 梱包資材取得ユースケース
pub struct GetPackageUseCase {
   repository: Arc<dyn PackageRepository>,
}

impl GetPackageUseCase {
   pub fn new(repository: Arc<dyn PackageRepository>) -> Self {
      Self { repository }
   }

   /// テナント内の梱包資材を 1 件取得する
   pub async fn execute(&self, input: GetPackageInput) -> UseCaseResponse<Option<PackageDto>> {
      render("get_package", self.get(input).await.map(Some), || None)
   }

   async fn get(&self, input: GetPackageInput) -> Result<PackageDto, CoreError> {
      let package = self
         .repository
         .find_by_id(&input.id, &input.tenant_id)
         .await?
         .ok_or_else(|| CoreError::NotFound(NOT_FOUND.to_string()))?;

      Ok(PackageDto::from(&package))
   }
}

// ===== 更新 =====

/// 梱包資材更新ユースケース
pub struct UpdatePackageUseCase {
   repository: Arc<dyn PackageRepository>,
   tx_manager: Arc<dyn TransactionManager>,
   clock:      Arc<dyn Clock>,
}

impl UpdatePackageUseCase {
   pub fn new(
      repository: Arc<dyn PackageRepository>,
      tx_manager: Arc<dyn TransactionManager>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         repository,
         tx_manager,
         clock,
      }
   }

   /// 名称・略号・更新者を書き換える
   pub async fn execute(&self, input: UpdatePackageInput) -> UseCaseResponse<Option<PackageDto>> {
      render("update_package", self.update(input).await.map(Some), || None)
   }

   async fn update(&self, input: UpdatePackageInput) -> Result<PackageDto, CoreError> {
      let name = PackageName::new(input.name)?;
      let symbol = PackageSymbol::optional(input.symbol)?;

      let mut tx = self.tx_manager.begin().await?;
      let package = self
         .repository
         .find_for_update(&mut tx, &input.id, &input.tenant_id)
         .await?
         .ok_or_else(|| CoreError::NotFound(NOT_FOUND.to_string()))?
         .with_details(name, symbol, input.updated_by, self.clock.now());

      self
         .repository
         .update(&mut tx, &package)
         .await
         .map_err(CoreError::from_write)?;
      tx.commit().await?;

      Ok(PackageDto::from(&package))
   }
}

// ===== 削除 =====

/// 梱包資材削除ユースケース
///
/// 削除した梱包資材を `data` として返す。
pub struct DeletePackageUseCase {
   repository: Arc<dyn PackageRepository>,
   tx_manager: Arc<dyn TransactionManager>,
}

impl DeletePackageUseCase {
   pub fn new(
      repository: Arc<dyn PackageRepository>,
      tx_manager: Arc<dyn TransactionManager>,
   ) -> Self {
      Self {
         repository,
         tx_manager,
      }
   }

   pub async fn execute(&self, input: DeletePackageInput) -> UseCaseResponse<Option<PackageDto>> {
      render("delete_package", self.delete(input).await.map(Some), || None)
   }

   async fn delete(&self, input: DeletePackageInput) -> Result<PackageDto, CoreError> {
      let mut tx = self.tx_manager.begin().await?;
      let package = self
         .repository
         .find_for_update(&mut tx, &input.id, &input.tenant_id)
         .await?
         .ok_or_else(|| CoreError::NotFound(NOT_FOUND.to_string()))?;

      self
         .repository
         .delete(&mut tx, &input.id, &input.tenant_id)
         .await
         .map_err(CoreError::from_write)?;
      tx.commit().await?;

      Ok(PackageDto::from(&package))
   }
}

// ===== 一覧 =====

/// 梱包資材一覧ユースケース
///
/// 成功時は `total` に絞り込み条件に一致する全件数を付ける。
pub struct ListPackagesUseCase {
   repository: Arc<dyn PackageRepository>,
}

impl ListPackagesUseCase {
   pub fn new(repository: Arc<dyn PackageRepository>) -> Self {
      Self { repository }
   }

   pub async fn execute(&self, input: ListPackagesInput) -> UseCaseResponse<Vec<PackageDto>> {
      match self.list(input).await {
         Ok((packages, total)) => {
            UseCaseResponse::success(packages).with_extra("total", total)
         }
         Err(error) => render("list_packages", Err(error), Vec::new),
      }
   }

   async fn list(&self, input: ListPackagesInput) -> Result<(Vec<PackageDto>, i64), CoreError> {
      let query = input.to_query()?;

      let packages = self.repository.list(&input.tenant_id, &query).await?;
      let total = self.repository.count(&input.tenant_id, &query.filter).await?;

      Ok((packages.iter().map(PackageDto::from).collect(), total))
   }
}
