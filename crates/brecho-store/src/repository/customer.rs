//! # Customer Repository
//!
//! Registered customers ("clientes") and their purchase history.

use brecho_core::types::{Customer, Sale};
use brecho_core::validation::{normalize_cpf, validate_customer, validate_search_query};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::SharedTables;

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    tables: SharedTables,
}

impl CustomerRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        CustomerRepository { tables }
    }

    pub async fn list(&self) -> Vec<Customer> {
        self.tables.read().await.customers.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Customer> {
        let tables = self.tables.read().await;
        tables.customers.iter().find(|c| c.id == id).cloned()
    }

    /// Registers a customer. The CPF, when given, is stored as digits
    /// and must be unique.
    pub async fn insert(&self, mut customer: Customer) -> StoreResult<Customer> {
        validate_customer(&customer)?;
        customer.cpf = customer.cpf.as_deref().map(normalize_cpf).transpose()?;

        let mut tables = self.tables.write().await;

        if tables.customers.iter().any(|c| c.id == customer.id) {
            return Err(StoreError::duplicate("id", &customer.id));
        }
        if let Some(cpf) = &customer.cpf {
            if tables.customers.iter().any(|c| c.cpf.as_ref() == Some(cpf)) {
                return Err(StoreError::duplicate("cpf", cpf));
            }
        }

        info!(id = %customer.id, name = %customer.name, "Registering customer");
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    /// Replaces a customer's profile. Purchase history is kept from the
    /// stored record.
    pub async fn update(&self, mut customer: Customer) -> StoreResult<Customer> {
        validate_customer(&customer)?;
        customer.cpf = customer.cpf.as_deref().map(normalize_cpf).transpose()?;

        let mut tables = self.tables.write().await;
        let stored = tables
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| StoreError::not_found("Customer", &customer.id))?;

        customer.purchase_history = std::mem::take(&mut stored.purchase_history);
        debug!(id = %customer.id, "Updating customer");
        *stored = customer.clone();
        Ok(customer)
    }

    /// Case-insensitive search over name, phone and CPF.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Customer>> {
        let query = validate_search_query(query)?.to_lowercase();
        let tables = self.tables.read().await;

        Ok(tables
            .customers
            .iter()
            .filter(|c| {
                query.is_empty()
                    || c.name.to_lowercase().contains(&query)
                    || c.phone.contains(&query)
                    || c.cpf.as_deref().is_some_and(|cpf| cpf.contains(&query))
            })
            .cloned()
            .collect())
    }

    /// The customer's sales, in the order they were made. Sale ids that
    /// no longer resolve are skipped.
    pub async fn purchase_history(&self, id: &str) -> StoreResult<Vec<Sale>> {
        let tables = self.tables.read().await;
        let customer = tables
            .customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        Ok(customer
            .purchase_history
            .iter()
            .filter_map(|sale_id| tables.sales.iter().find(|s| &s.id == sale_id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};
    use chrono::NaiveDate;

    async fn demo_store() -> Store {
        let today = NaiveDate::from_ymd_opt(2024, 9, 15).unwrap();
        Store::open(StoreConfig::new().seed_demo(true), today).await
    }

    fn walk_in(id: &str, cpf: Option<&str>) -> Customer {
        Customer {
            id: id.to_string(),
            name: "Beatriz Lima".to_string(),
            cpf: cpf.map(str::to_string),
            phone: "11955554444".to_string(),
            email: None,
            address: None,
            registered_on: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
            purchase_history: vec![],
        }
    }

    #[tokio::test]
    async fn test_insert_and_duplicates() {
        let store = demo_store().await;
        let repo = store.customers();

        let saved = repo
            .insert(walk_in("c3", Some("222.333.444-55")))
            .await
            .unwrap();
        assert_eq!(saved.cpf.as_deref(), Some("22233344455"));

        assert!(matches!(
            repo.insert(walk_in("c4", Some("22233344455"))).await,
            Err(StoreError::Duplicate { .. })
        ));
        assert!(matches!(
            repo.insert(walk_in("c1", None)).await,
            Err(StoreError::Duplicate { .. })
        ));
        assert!(repo.insert(walk_in("c5", Some("123"))).await.is_err());
    }

    #[tokio::test]
    async fn test_update_keeps_history() {
        let store = demo_store().await;
        let repo = store.customers();

        let mut c1 = repo.get("c1").await.unwrap();
        c1.purchase_history.clear();
        c1.phone = "11900002222".to_string();

        let saved = repo.update(c1).await.unwrap();
        assert_eq!(saved.purchase_history, vec!["v-abc".to_string()]);
    }

    #[tokio::test]
    async fn test_purchase_history() {
        let store = demo_store().await;
        let repo = store.customers();

        let history = repo.purchase_history("c1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total.cents(), 12000);

        assert!(repo.purchase_history("c2").await.unwrap().is_empty());
        assert!(repo.purchase_history("c9").await.is_err());
    }

    #[tokio::test]
    async fn test_search() {
        let store = demo_store().await;
        let hits = store.customers().search("fidelidade").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "c1");
    }
}
