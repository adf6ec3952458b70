//! # テスト用インメモリリポジトリ
//!
//! ユースケース・ハンドラのテストで使用する。
//! `test-utils` feature を有効にすると他クレートからも利用できる。
//!
//! ```toml
//! [dev-dependencies]
//! catalog-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
   cmp::Ordering,
   sync::{
      Arc,
      Mutex,
      atomic::{AtomicBool, Ordering as AtomicOrdering},
   },
};

use async_trait::async_trait;
use catalog_domain::{
   filter::ListFilter,
   package::{Package, PackageFilter, PackageId, PackageListQuery, PackageSortColumn, SortOrder},
   tenant::TenantId,
   user::UserId,
};

use crate::{
   db::{TransactionManager, TxContext},
   error::InfraError,
   repository::{ListFilterRepository, PackageRepository},
};

// ===== MockTransactionManager =====

/// 実際のトランザクションを張らない TransactionManager
pub struct MockTransactionManager;

#[async_trait]
impl TransactionManager for MockTransactionManager {
   async fn begin(&self) -> Result<TxContext, InfraError> {
      Ok(TxContext::mock())
   }
}

// ===== MockPackageRepository =====

#[derive(Clone, Default)]
pub struct MockPackageRepository {
   packages:                   Arc<Mutex<Vec<Package>>>,
   failing:                    Arc<AtomicBool>,
   reads_outside_tx_forbidden: Arc<AtomicBool>,
}

impl MockPackageRepository {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add_package(&self, package: Package) {
      self.packages.lock().unwrap().push(package);
   }

   /// 保存済みの全件（テナントを問わない）
   pub fn all(&self) -> Vec<Package> {
      self.packages.lock().unwrap().clone()
   }

   /// `true` にすると以後のすべての操作がストレージエラーを返す
   pub fn set_failing(&self, failing: bool) {
      self.failing.store(failing, AtomicOrdering::SeqCst);
   }

   /// `true` にするとトランザクション外の `find_by_id` がエラーを返す
   pub fn forbid_reads_outside_tx(&self, forbidden: bool) {
      self.reads_outside_tx_forbidden.store(forbidden, AtomicOrdering::SeqCst);
   }

   fn check_failure(&self) -> Result<(), InfraError> {
      if self.failing.load(AtomicOrdering::SeqCst) {
         return Err(InfraError::unexpected("ストレージに接続できません"));
      }
      Ok(())
   }

   fn find_in_memory(
      &self,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError> {
      Ok(self
         .packages
         .lock()
         .unwrap()
         .iter()
         .find(|p| p.id() == id && p.tenant_id() == tenant_id)
         .cloned())
   }

   fn matching(&self, tenant_id: &TenantId, filter: &PackageFilter) -> Vec<Package> {
      let name = filter.name().to_lowercase();
      let symbol = filter.symbol().map(str::to_lowercase);
      self
         .packages
         .lock()
         .unwrap()
         .iter()
         .filter(|p| p.tenant_id() == tenant_id)
         .filter(|p| p.name().as_str().to_lowercase().contains(&name))
         .filter(|p| match &symbol {
            None => true,
            Some(s) => p
               .symbol()
               .is_some_and(|own| own.as_str().to_lowercase().contains(s)),
         })
         .cloned()
         .collect()
   }
}

fn compare_by(column: PackageSortColumn, a: &Package, b: &Package) -> Ordering {
   match column {
      PackageSortColumn::Id => a.id().as_uuid().cmp(b.id().as_uuid()),
      PackageSortColumn::Name => a.name().as_str().cmp(b.name().as_str()),
      PackageSortColumn::Symbol => a
         .symbol()
         .map(|s| s.as_str())
         .cmp(&b.symbol().map(|s| s.as_str())),
      PackageSortColumn::CreatedBy => a
         .created_by()
         .map(UserId::as_uuid)
         .cmp(&b.created_by().map(UserId::as_uuid)),
      PackageSortColumn::UpdatedBy => a
         .updated_by()
         .map(UserId::as_uuid)
         .cmp(&b.updated_by().map(UserId::as_uuid)),
      PackageSortColumn::CreatedAt => a.created_at().cmp(&b.created_at()),
      PackageSortColumn::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
   }
}

#[async_trait]
impl PackageRepository for MockPackageRepository {
   async fn insert(&self, _tx: &mut TxContext, package: &Package) -> Result<(), InfraError> {
      self.check_failure()?;
      self.packages.lock().unwrap().push(package.clone());
      Ok(())
   }

   async fn update(&self, _tx: &mut TxContext, package: &Package) -> Result<(), InfraError> {
      self.check_failure()?;
      let mut packages = self.packages.lock().unwrap();
      let Some(pos) = packages
         .iter()
         .position(|p| p.id() == package.id() && p.tenant_id() == package.tenant_id())
      else {
         return Err(InfraError::not_found("Package", package.id().to_string()));
      };
      packages[pos] = package.clone();
      Ok(())
   }

   async fn delete(
      &self,
      _tx: &mut TxContext,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<(), InfraError> {
      self.check_failure()?;
      let mut packages = self.packages.lock().unwrap();
      let before = packages.len();
      packages.retain(|p| !(p.id() == id && p.tenant_id() == tenant_id));
      if packages.len() == before {
         return Err(InfraError::not_found("Package", id.to_string()));
      }
      Ok(())
   }

   async fn find_by_id(
      &self,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError> {
      self.check_failure()?;
      if self.reads_outside_tx_forbidden.load(AtomicOrdering::SeqCst) {
         return Err(InfraError::unexpected("トランザクション外で読み込みました"));
      }
      self.find_in_memory(id, tenant_id)
   }

   async fn find_for_update(
      &self,
      _tx: &mut TxContext,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError> {
      self.check_failure()?;
      self.find_in_memory(id, tenant_id)
   }

   async fn list(
      &self,
      tenant_id: &TenantId,
      query: &PackageListQuery,
   ) -> Result<Vec<Package>, InfraError> {
      self.check_failure()?;
      let mut packages = self.matching(tenant_id, &query.filter);
      packages.sort_by(|a, b| {
         let ordering = compare_by(query.sort, a, b);
         let ordering = match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
         };
         ordering.then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
      });
      let offset = usize::try_from(query.offset).unwrap_or(0);
      let limit = usize::try_from(query.limit).unwrap_or(0);
      Ok(packages.into_iter().skip(offset).take(limit).collect())
   }

   async fn count(&self, tenant_id: &TenantId, filter: &PackageFilter) -> Result<i64, InfraError> {
      self.check_failure()?;
      Ok(self.matching(tenant_id, filter).len() as i64)
   }
}

// ===== MockListFilterRepository =====

#[derive(Clone, Default)]
pub struct MockListFilterRepository {
   filters: Arc<Mutex<Vec<ListFilter>>>,
}

impl MockListFilterRepository {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add_filter(&self, filter: ListFilter) {
      self.filters.lock().unwrap().push(filter);
   }
}

#[async_trait]
impl ListFilterRepository for MockListFilterRepository {
   async fn find_by_entity(
      &self,
      tenant_id: &TenantId,
      user_id: &UserId,
      entity: &str,
   ) -> Result<Option<ListFilter>, InfraError> {
      Ok(self
         .filters
         .lock()
         .unwrap()
         .iter()
         .find(|f| f.tenant_id() == tenant_id && f.user_id() == user_id && f.entity() == entity)
         .cloned())
   }

   async fn upsert(&self, _tx: &mut TxContext, filter: &ListFilter) -> Result<(), InfraError> {
      let mut filters = self.filters.lock().unwrap();
      filters.retain(|f| {
         !(f.tenant_id() == filter.tenant_id()
            && f.user_id() == filter.user_id()
            && f.entity() == filter.entity())
      });
      filters.push(filter.clone());
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use catalog_domain::package::{NewPackage, PackageName, PackageSymbol};
   use chrono::{DateTime, Utc};

   use super::*;

   fn package(tenant_id: &TenantId, name: &str, symbol: Option<&str>, secs: i64) -> Package {
      Package::new(NewPackage {
         id:         PackageId::new(),
         tenant_id:  tenant_id.clone(),
         name:       PackageName::new(name).unwrap(),
         symbol:     PackageSymbol::optional(symbol).unwrap(),
         created_by: None,
         now:        DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
      })
   }

   #[tokio::test]
   async fn test_一覧は絞り込みとソートとページングを適用する() {
      let tenant_id = TenantId::new();
      let sut = MockPackageRepository::new();
      sut.add_package(package(&tenant_id, "Caixa P", Some("CXP"), 1));
      sut.add_package(package(&tenant_id, "Caixa G", Some("CXG"), 2));
      sut.add_package(package(&tenant_id, "Pallet", None, 3));
      sut.add_package(package(&TenantId::new(), "Caixa X", None, 4));

      let query = PackageListQuery {
         filter: PackageFilter::new("caixa", ""),
         limit: 1,
         offset: 1,
         ..Default::default()
      };
      let page = sut.list(&tenant_id, &query).await.unwrap();
      let total = sut.count(&tenant_id, &query.filter).await.unwrap();

      assert_eq!(total, 2);
      assert_eq!(page.len(), 1);
      assert_eq!(page[0].name().as_str(), "Caixa P");
   }

   #[tokio::test]
   async fn test_別テナントの行は更新できない() {
      let sut = MockPackageRepository::new();
      let stored = package(&TenantId::new(), "Caixa", None, 1);
      sut.add_package(stored.clone());

      let foreign = Package::new(NewPackage {
         id:         stored.id().clone(),
         tenant_id:  TenantId::new(),
         name:       PackageName::new("Outro").unwrap(),
         symbol:     None,
         created_by: None,
         now:        stored.created_at(),
      });
      let result = sut.update(&mut TxContext::mock(), &foreign).await;

      assert!(result.unwrap_err().is_not_found());
      assert_eq!(sut.all(), vec![stored]);
   }
}
