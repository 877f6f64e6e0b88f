//! # Supplier Repository
//!
//! Supplier records ("fornecedores"), their statements and the password of
//! the supplier portal.
//!
//! ## Registration
//! ```text
//! FormFornecedor ──► insert(supplier)
//!                      ├── validate_supplier (name, CPF, phone, e-mail, address)
//!                      ├── CPF stored as 11 digits
//!                      └── id and CPF must be unique
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use brecho_core::statement::{statement_for, SupplierStatement};
use brecho_core::types::{ConsignmentPolicy, Supplier, SupplierStatus};
use brecho_core::validation::{normalize_cpf, validate_password, validate_search_query, validate_supplier};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::SharedTables;

/// Repository for supplier operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    tables: SharedTables,
    policy: ConsignmentPolicy,
}

impl SupplierRepository {
    pub(crate) fn new(tables: SharedTables, policy: ConsignmentPolicy) -> Self {
        SupplierRepository { tables, policy }
    }

    /// All suppliers, in registration order.
    pub async fn list(&self) -> Vec<Supplier> {
        self.tables.read().await.suppliers.clone()
    }

    /// Gets a supplier by ID.
    pub async fn get(&self, id: &str) -> Option<Supplier> {
        let tables = self.tables.read().await;
        tables.suppliers.iter().find(|s| s.id == id).cloned()
    }

    /// Registers a supplier.
    ///
    /// ## Rules
    /// - The record passes [`validate_supplier`]
    /// - The CPF is stored as digits only
    /// - Neither the id nor the CPF may already exist
    pub async fn insert(&self, mut supplier: Supplier) -> StoreResult<Supplier> {
        validate_supplier(&supplier)?;
        supplier.cpf = normalize_cpf(&supplier.cpf)?;

        let mut tables = self.tables.write().await;

        if tables.suppliers.iter().any(|s| s.id == supplier.id) {
            return Err(StoreError::duplicate("id", &supplier.id));
        }
        if tables.suppliers.iter().any(|s| s.cpf == supplier.cpf) {
            return Err(StoreError::duplicate("cpf", &supplier.cpf));
        }

        info!(id = %supplier.id, name = %supplier.name, "Registering supplier");
        tables.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    /// Replaces a supplier's profile.
    ///
    /// Sales count and portal password are kept from the stored record;
    /// they only change through sales and [`SupplierRepository::set_password`].
    pub async fn update(&self, mut supplier: Supplier) -> StoreResult<Supplier> {
        validate_supplier(&supplier)?;
        supplier.cpf = normalize_cpf(&supplier.cpf)?;

        let mut tables = self.tables.write().await;

        if tables
            .suppliers
            .iter()
            .any(|s| s.id != supplier.id && s.cpf == supplier.cpf)
        {
            return Err(StoreError::duplicate("cpf", &supplier.cpf));
        }

        let stored = tables
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier.id)
            .ok_or_else(|| StoreError::not_found("Supplier", &supplier.id))?;

        supplier.sales_count = stored.sales_count;
        supplier.password_hash = stored.password_hash.take();

        debug!(id = %supplier.id, "Updating supplier");
        *stored = supplier.clone();
        Ok(supplier)
    }

    /// Activates or deactivates a supplier.
    pub async fn set_status(&self, id: &str, status: SupplierStatus) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let supplier = tables
            .suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Supplier", id))?;

        debug!(id, ?status, "Changing supplier status");
        supplier.status = status;
        Ok(())
    }

    /// Case-insensitive search over name, CPF digits and e-mail.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Supplier>> {
        let query = validate_search_query(query)?.to_lowercase();
        let tables = self.tables.read().await;

        Ok(tables
            .suppliers
            .iter()
            .filter(|s| {
                query.is_empty()
                    || s.name.to_lowercase().contains(&query)
                    || s.cpf.contains(&query)
                    || s.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }

    /// Statement ("extrato") of a supplier, or `None` when unknown.
    pub async fn statement(&self, id: &str) -> Option<SupplierStatement> {
        let tables = self.tables.read().await;
        let supplier = tables.suppliers.iter().find(|s| s.id == id)?;
        Some(statement_for(
            supplier,
            &tables.consigned,
            &tables.payouts,
            &self.policy,
        ))
    }

    /// Sets the supplier portal password. Only the argon2 hash is kept.
    pub async fn set_password(&self, id: &str, password: &str) -> StoreResult<()> {
        validate_password(password)?;
        let hash = hash_password(password)?;

        let mut tables = self.tables.write().await;
        let supplier = tables
            .suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Supplier", id))?;

        info!(id, "Portal password set");
        supplier.password_hash = Some(hash);
        Ok(())
    }

    /// Checks a portal login. Unknown suppliers and suppliers without a
    /// password never verify.
    pub async fn verify_password(&self, id: &str, password: &str) -> bool {
        // Copy the hash out so writers are not held up by argon2.
        let stored = {
            let tables = self.tables.read().await;
            tables
                .suppliers
                .iter()
                .find(|s| s.id == id)
                .and_then(|s| s.password_hash.clone())
        };
        stored.is_some_and(|hash| verify_password(password, &hash))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};
    use brecho_core::types::Address;
    use brecho_core::{CoreError, ValidationError};
    use chrono::NaiveDate;

    async fn demo_store() -> Store {
        let today = NaiveDate::from_ymd_opt(2024, 9, 15).unwrap();
        Store::open(StoreConfig::new().seed_demo(true), today).await
    }

    fn new_supplier(id: &str, cpf: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            name: "Carla Mendes".to_string(),
            cpf: cpf.to_string(),
            phone: "(11) 91234-5678".to_string(),
            email: Some("carla@example.com".to_string()),
            address: Address {
                street: "Rua Augusta".to_string(),
                number: "1500".to_string(),
                complement: None,
                district: "Consolação".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                cep: "01304-001".to_string(),
            },
            preferred_sizes: vec!["P".to_string()],
            sales_count: 0,
            status: SupplierStatus::Active,
            registered_on: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn test_insert_normalizes_cpf() {
        let store = demo_store().await;
        let saved = store
            .suppliers()
            .insert(new_supplier("f4", "123.456.789-00"))
            .await
            .unwrap();

        assert_eq!(saved.cpf, "12345678900");
        assert_eq!(store.suppliers().list().await.len(), 4);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = demo_store().await;

        let err = store
            .suppliers()
            .insert(new_supplier("f1", "12345678900"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field, .. } if field == "id"));

        let err = store
            .suppliers()
            .insert(new_supplier("f4", "111.222.333-44"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field, .. } if field == "cpf"));
    }

    #[tokio::test]
    async fn test_insert_validates() {
        let store = demo_store().await;
        let mut supplier = new_supplier("f4", "12345678900");
        supplier.name = "Al".to_string();

        let err = store.suppliers().insert(supplier).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(ValidationError::TooShort { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_sales_count() {
        let store = demo_store().await;
        let mut maria = store.suppliers().get("f1").await.unwrap();
        maria.phone = "11900001111".to_string();
        maria.sales_count = 0;

        let saved = store.suppliers().update(maria).await.unwrap();
        assert_eq!(saved.phone, "11900001111");
        assert_eq!(saved.sales_count, 15);
    }

    #[tokio::test]
    async fn test_update_unknown_supplier() {
        let store = demo_store().await;
        let err = store
            .suppliers()
            .update(new_supplier("f9", "12345678900"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search() {
        let store = demo_store().await;
        let repo = store.suppliers();

        let hits = repo.search("maria").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "f1");

        assert_eq!(repo.search("555666").await.unwrap()[0].id, "f2");
        assert_eq!(repo.search("").await.unwrap().len(), 3);
        assert!(repo.search(&"x".repeat(101)).await.is_err());
    }

    #[tokio::test]
    async fn test_statement() {
        let store = demo_store().await;
        let statement = store.suppliers().statement("f1").await.unwrap();
        assert_eq!(statement.credit_balance.cents(), 3000);
        assert_eq!(statement.cash_balance.cents(), 4000);
        assert!(store.suppliers().statement("f9").await.is_none());
    }

    #[tokio::test]
    async fn test_set_status() {
        let store = demo_store().await;
        store
            .suppliers()
            .set_status("f3", SupplierStatus::Active)
            .await
            .unwrap();
        assert_eq!(
            store.suppliers().get("f3").await.unwrap().status,
            SupplierStatus::Active
        );
    }

    #[tokio::test]
    async fn test_portal_password() {
        let store = demo_store().await;
        let repo = store.suppliers();

        assert!(!repo.verify_password("f1", "segredo1").await);
        assert!(repo.set_password("f1", "123").await.is_err());

        repo.set_password("f1", "segredo1").await.unwrap();
        assert!(repo.verify_password("f1", "segredo1").await);
        assert!(!repo.verify_password("f1", "segredo2").await);
        assert!(!repo.verify_password("f9", "segredo1").await);

        let stored = repo.get("f1").await.unwrap();
        assert!(stored.password_hash.unwrap().starts_with("$argon2"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_login_check_does_not_block_writers() {
        let store = demo_store().await;
        store.suppliers().set_password("f1", "segredo1").await.unwrap();

        let checker = store.suppliers();
        let login = tokio::spawn(async move { checker.verify_password("f1", "segredo1").await });
        let writer = store.suppliers();
        let write = writer.set_status("f2", SupplierStatus::Inactive);

        let (verified, written) = tokio::join!(login, write);
        assert!(verified.unwrap());
        written.unwrap();
        assert_eq!(
            store.suppliers().get("f2").await.unwrap().status,
            SupplierStatus::Inactive
        );
    }
}
