//! # Demo Data Set
//!
//! A small, coherent back office used for development and demos.
//!
//! ## Contents
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Suppliers   f1 Maria da Silva (ativa)                               │
//! │             f2 João Oliveira  (ativo)                               │
//! │             f3 Ana Souza      (inativa)                             │
//! │                                                                      │
//! │ Consigned   ic1 f1 R$ 80,00  expires today + 10  → próximo a expirar │
//! │             ic2 f1 R$ 50,00  expired 2024-09-10                      │
//! │             ic3 f2 R$ 30,00  expires today + 40  → disponível        │
//! │             ic4 f2 R$ 120,00 sold (v-abc)                            │
//! │             ic5 f1 R$ 100,00 sold (v-def)                            │
//! │             ic6 f1 R$ 70,00  returned                                │
//! │                                                                      │
//! │ Payouts     p1 f1 R$ 20,00 credit paid   (v-def)                     │
//! │             p2 f1 R$ 40,00 cash   pending (v-def)                    │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Maria's statement therefore shows R$ 30,00 of store credit and
//! R$ 40,00 of cash available.

use brecho_core::money::Money;
use brecho_core::pricing::{consigned_line, garimpo_line, SaleTotals};
use brecho_core::types::{
    Address, ConsignedItem, ConsignmentPolicy, Customer, GarimpoItem, GarimpoStatus, ItemDetails,
    ItemStatus, PaymentMethod, PayoutEntry, PayoutKind, PayoutStatus, Sale, SaleLine, Supplier,
    SupplierStatus,
};
use chrono::{Days, Months, NaiveDate};

use crate::store::Tables;

/// Builds the demo tables. Items whose expiry is relative to `today`
/// start one consignment term before it.
pub fn demo_tables(today: NaiveDate, policy: &ConsignmentPolicy) -> Tables {
    let suppliers = vec![
        supplier(
            "f1",
            "Maria da Silva",
            "11122233344",
            "11987654321",
            "maria@example.com",
            address("Rua Principal", "100", Some("Apto 10"), "Centro", "São Paulo", "SP", "01000000"),
            &["M", "G", "40"],
            15,
            SupplierStatus::Active,
            date(2024, 1, 15),
        ),
        supplier(
            "f2",
            "João Oliveira",
            "55566677788",
            "21998765432",
            "joao@example.com",
            address("Avenida Brasil", "200", None, "Jardins", "Rio de Janeiro", "RJ", "20000000"),
            &["P", "36"],
            5,
            SupplierStatus::Active,
            date(2024, 3, 20),
        ),
        supplier(
            "f3",
            "Ana Souza",
            "99988877766",
            "31912345678",
            "ana@example.com",
            address("Rua das Flores", "50", None, "Floresta", "Belo Horizonte", "MG", "30000000"),
            &["GG", "44"],
            0,
            SupplierStatus::Inactive,
            date(2024, 2, 10),
        ),
    ];

    let expiring_start = start_for_expiry(today + Days::new(10), policy);
    let fresh_start = start_for_expiry(today + Days::new(40), policy);

    let consigned = vec![
        consigned(
            "ic1", "f1", "MDS001", expiring_start, 8000, ItemStatus::Available,
            details("Farm", "M", "Vestido", "Vestido floral longo"), policy,
        ),
        consigned(
            "ic2", "f1", "MDS002", date(2024, 6, 10), 5000, ItemStatus::Expired,
            details("Levi's", "40", "Calça Jeans", "Calça jeans reta"), policy,
        ),
        consigned(
            "ic3", "f2", "JO003", fresh_start, 3000, ItemStatus::Available,
            details("C&A", "G", "Blusa", "Blusa de seda preta"), policy,
        ),
        consigned(
            "ic4", "f2", "JO004", date(2024, 7, 20), 12000, ItemStatus::Sold,
            details("Adidas", "P", "Tênis", "Tênis esportivo branco"), policy,
        ),
        consigned(
            "ic5", "f1", "MDS005", date(2024, 7, 15), 10000, ItemStatus::Sold,
            details("Amorim", "P", "Bolsa", "Bolsa de couro"), policy,
        ),
        consigned(
            "ic6", "f1", "MDS006", date(2024, 8, 1), 7000, ItemStatus::Returned,
            details("Reserva", "M", "Camiseta", "Camiseta de algodão"), policy,
        ),
    ];

    let garimpo = vec![
        GarimpoItem {
            id: "g1".to_string(),
            purchase_place: "Bazar da Esquina".to_string(),
            purchase_date: date(2024, 3, 10),
            purchase_cost: Money::from_cents(2500),
            extra_costs: Money::from_cents(500),
            margin_bps: 6000,
            sale_price: Money::from_cents(4800),
            status: GarimpoStatus::Available,
            stocked_on: date(2024, 3, 15),
            details: details("Vintage", "M", "Saia", "Saia midi florida"),
        },
        GarimpoItem {
            id: "g2".to_string(),
            purchase_place: "Feira do Bixiga".to_string(),
            purchase_date: date(2024, 5, 25),
            purchase_cost: Money::from_cents(1500),
            extra_costs: Money::from_cents(500),
            margin_bps: 15000,
            sale_price: Money::from_cents(5000),
            status: GarimpoStatus::Sold,
            stocked_on: date(2024, 6, 1),
            details: details("Anos 80", "G", "Jaqueta", "Jaqueta jeans oversized"),
        },
    ];

    let line_of = |id: &str| {
        consigned
            .iter()
            .find(|item| item.id == id)
            .map(|item| consigned_line(item, policy))
    };

    let sales = [
        (
            "v-abc",
            date(2024, 8, 2),
            Some("c1"),
            "Cliente Fidelidade 1",
            line_of("ic4"),
            PaymentMethod::Pix,
        ),
        (
            "v-def",
            date(2024, 8, 20),
            None,
            "Cliente Teste 2",
            line_of("ic5"),
            PaymentMethod::Card,
        ),
        (
            "v-xyz",
            date(2024, 7, 1),
            None,
            "Cliente Teste 3",
            Some(garimpo_line(&garimpo[1])),
            PaymentMethod::Cash,
        ),
    ]
    .into_iter()
    .filter_map(|(id, sold_on, customer_id, customer_name, line, method)| {
        line.map(|line| sale(id, sold_on, customer_id, customer_name, vec![line], method))
    })
    .collect();

    let customers = vec![
        Customer {
            id: "c1".to_string(),
            name: "Cliente Fidelidade 1".to_string(),
            cpf: Some("00011122233".to_string()),
            phone: "11988887777".to_string(),
            email: Some("cliente1@example.com".to_string()),
            address: Some(address("Rua do Cliente", "5", None, "Fidelidade", "São Paulo", "SP", "01000000")),
            registered_on: date(2023, 11, 1),
            purchase_history: vec!["v-abc".to_string()],
        },
        Customer {
            id: "c2".to_string(),
            name: "Cliente Novo".to_string(),
            cpf: None,
            phone: "21999996666".to_string(),
            email: None,
            address: None,
            registered_on: date(2024, 9, 1),
            purchase_history: vec![],
        },
    ];

    let payouts = vec![
        PayoutEntry {
            id: "p1".to_string(),
            supplier_id: "f1".to_string(),
            sale_id: Some("v-def".to_string()),
            amount: Money::from_cents(2000),
            kind: PayoutKind::Credit,
            status: PayoutStatus::Paid,
            date: Some(date(2024, 8, 25)),
        },
        PayoutEntry {
            id: "p2".to_string(),
            supplier_id: "f1".to_string(),
            sale_id: Some("v-def".to_string()),
            amount: Money::from_cents(4000),
            kind: PayoutKind::Cash,
            status: PayoutStatus::Pending,
            date: None,
        },
    ];

    Tables {
        suppliers,
        consigned,
        payouts,
        garimpo,
        sales,
        customers,
    }
}

// =============================================================================
// Builders
// =============================================================================

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn start_for_expiry(expires: NaiveDate, policy: &ConsignmentPolicy) -> NaiveDate {
    expires
        .checked_sub_months(Months::new(policy.term_months))
        .unwrap_or(expires)
}

fn address(
    street: &str,
    number: &str,
    complement: Option<&str>,
    district: &str,
    city: &str,
    state: &str,
    cep: &str,
) -> Address {
    Address {
        street: street.to_string(),
        number: number.to_string(),
        complement: complement.map(str::to_string),
        district: district.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        cep: cep.to_string(),
    }
}

fn details(brand: &str, size: &str, category: &str, description: &str) -> ItemDetails {
    ItemDetails {
        brand: Some(brand.to_string()),
        size: Some(size.to_string()),
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        photos: vec![],
    }
}

#[allow(clippy::too_many_arguments)]
fn supplier(
    id: &str,
    name: &str,
    cpf: &str,
    phone: &str,
    email: &str,
    address: Address,
    sizes: &[&str],
    sales_count: u32,
    status: SupplierStatus,
    registered_on: NaiveDate,
) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: name.to_string(),
        cpf: cpf.to_string(),
        phone: phone.to_string(),
        email: Some(email.to_string()),
        address,
        preferred_sizes: sizes.iter().map(|s| s.to_string()).collect(),
        sales_count,
        status,
        registered_on,
        password_hash: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn consigned(
    id: &str,
    supplier_id: &str,
    code: &str,
    start: NaiveDate,
    price_cents: i64,
    status: ItemStatus,
    details: ItemDetails,
    policy: &ConsignmentPolicy,
) -> ConsignedItem {
    let mut item = ConsignedItem::new(
        id,
        supplier_id,
        code,
        start,
        Money::from_cents(price_cents),
        policy,
    )
    .with_details(details);
    item.status = status;
    item
}

fn sale(
    id: &str,
    sold_on: NaiveDate,
    customer_id: Option<&str>,
    customer_name: &str,
    lines: Vec<SaleLine>,
    payment_method: PaymentMethod,
) -> Sale {
    // Lines are built above and never empty.
    let totals = SaleTotals::from_lines(&lines).unwrap_or_default();
    Sale {
        id: id.to_string(),
        sold_on,
        customer_id: customer_id.map(str::to_string),
        customer_name: customer_name.to_string(),
        lines,
        total: totals.total,
        cost: totals.cost,
        profit: totals.profit,
        payment_method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brecho_core::status::display_status;
    use brecho_core::types::DisplayStatus;
    use brecho_core::{compute_statement, LedgerSnapshot, LedgerSource};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    #[test]
    fn test_demo_statuses() {
        let tables = demo_tables(today(), &ConsignmentPolicy::default());
        let shown: Vec<DisplayStatus> = tables
            .consigned
            .iter()
            .map(|item| display_status(item, today()))
            .collect();

        assert_eq!(
            shown,
            vec![
                DisplayStatus::AboutToExpire,
                DisplayStatus::Expired,
                DisplayStatus::Available,
                DisplayStatus::Sold,
                DisplayStatus::Sold,
                DisplayStatus::Returned,
            ]
        );
    }

    #[test]
    fn test_relative_expiry_follows_today() {
        let later = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let tables = demo_tables(later, &ConsignmentPolicy::default());
        assert_eq!(tables.consigned[0].expiration_date, later + Days::new(10));
        assert_eq!(display_status(&tables.consigned[0], later), DisplayStatus::AboutToExpire);
    }

    #[test]
    fn test_maria_statement() {
        let tables = demo_tables(today(), &ConsignmentPolicy::default());
        let statement =
            compute_statement("f1", &tables.suppliers, &tables.consigned, &tables.payouts)
                .unwrap();

        let sold: Vec<&str> = statement.sold_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(sold, vec!["ic5"]);
        assert_eq!(statement.credit_balance.cents(), 3000);
        assert_eq!(statement.cash_balance.cents(), 4000);
    }

    #[test]
    fn test_sales_are_consistent() {
        let tables = demo_tables(today(), &ConsignmentPolicy::default());
        assert_eq!(tables.sales.len(), 3);

        let abc = &tables.sales[0];
        assert_eq!(abc.total.cents(), 12000);
        assert_eq!(abc.cost.cents(), 6000);
        assert_eq!(abc.profit.cents(), 6000);

        let xyz = &tables.sales[2];
        assert_eq!(xyz.profit.cents(), 3000);
    }

    #[test]
    fn test_demo_ledger_through_source() {
        let tables = demo_tables(today(), &ConsignmentPolicy::default());
        let ledger = LedgerSnapshot {
            suppliers: tables.suppliers,
            consigned_items: tables.consigned,
            payout_entries: tables.payouts,
            policy: ConsignmentPolicy::default(),
        };
        assert_eq!(ledger.statement("f2").unwrap().credit_balance.cents(), 6000);
        assert_eq!(ledger.statement("f3").unwrap().total_owed(), Money::zero());
    }
}
