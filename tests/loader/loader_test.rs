use chrono::NaiveDate;
use cubist::contract;
use cubist::dataset::{Dataset, Value};
use cubist::loader::{self, LoadError, LoadPlan, RelationPlan};
use cubist::schema::{self, SchemaError};
use cubist::warehouse::Warehouse;
use std::fs;
use tempfile::TempDir;

const SCHEMA: &str = include_str!("../../sql/warehouse_tables.sql");

fn provisioned_warehouse() -> Warehouse {
    let warehouse = Warehouse::open_in_memory().unwrap();
    warehouse.connection().execute_batch(SCHEMA).unwrap();
    warehouse
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn customers(rows: &[(i64, &str, &str)]) -> Dataset {
    Dataset {
        contract: &contract::CUSTOMERS,
        rows: rows
            .iter()
            .map(|&(id, name, region)| {
                vec![
                    Value::Integer(id),
                    Value::Text(name.to_string()),
                    Value::Text(region.to_string()),
                    date(2021, 1, 10),
                    Value::Integer(100),
                    Value::Text("Email".to_string()),
                ]
            })
            .collect(),
    }
}

fn products(rows: &[(i64, &str, &str)]) -> Dataset {
    Dataset {
        contract: &contract::PRODUCTS,
        rows: rows
            .iter()
            .map(|&(id, name, category)| {
                vec![
                    Value::Integer(id),
                    Value::Text(name.to_string()),
                    Value::Text(category.to_string()),
                    Value::Float(19.99),
                    Value::Integer(50),
                    Value::Text("Acme".to_string()),
                ]
            })
            .collect(),
    }
}

fn sales(rows: &[(i64, i64, i64, f64)]) -> Dataset {
    Dataset {
        contract: &contract::SALES,
        rows: rows
            .iter()
            .map(|&(id, customer, product, amount)| {
                vec![
                    Value::Integer(id),
                    date(2024, 6, 1),
                    Value::Integer(customer),
                    Value::Integer(product),
                    Value::Integer(401),
                    Value::Integer(0),
                    Value::Float(amount),
                    Value::Float(0.0),
                    Value::Text("Credit".to_string()),
                ]
            })
            .collect(),
    }
}

fn standard_datasets() -> Vec<Dataset> {
    vec![
        customers(&[(1, "Alice", "East"), (2, "Bob", "West")]),
        products(&[(10, "Lamp", "Home"), (11, "Pen", "Office")]),
        sales(&[(100, 1, 10, 50.0), (101, 2, 11, 25.0), (102, 1, 11, 10.0)]),
    ]
}

#[test]
fn test_load_reports_row_counts_per_relation() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();
    let report = loader::load(&mut warehouse, &plan, &standard_datasets()).unwrap();

    assert_eq!(report.rows_for("customers"), Some(2));
    assert_eq!(report.rows_for("products"), Some(2));
    assert_eq!(report.rows_for("sales"), Some(3));
    assert_eq!(report.total_rows(), 7);
    assert_eq!(warehouse.row_count("sales").unwrap(), 3);
}

#[test]
fn test_reload_is_idempotent() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();

    let first = loader::load(&mut warehouse, &plan, &standard_datasets()).unwrap();
    let second = loader::load(&mut warehouse, &plan, &standard_datasets()).unwrap();

    assert_eq!(first, second);
    assert_eq!(warehouse.row_count("customers").unwrap(), 2);
    assert_eq!(warehouse.row_count("products").unwrap(), 2);
    assert_eq!(warehouse.row_count("sales").unwrap(), 3);
}

#[test]
fn test_referential_integrity_after_load() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();
    loader::load(&mut warehouse, &plan, &standard_datasets()).unwrap();

    let orphans: i64 = warehouse
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sales s
             LEFT JOIN customers c ON s.customer_id = c.customer_id
             LEFT JOIN products p ON s.product_id = p.product_id
             WHERE c.customer_id IS NULL OR p.product_id IS NULL",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn test_column_mapping_preserves_values() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();
    loader::load(
        &mut warehouse,
        &plan,
        &vec![
            customers(&[(7, "Alice", "East")]),
            products(&[(10, "Lamp", "Home")]),
            sales(&[(100, 7, 10, 50.0)]),
        ],
    )
    .unwrap();

    let (customer_id, name): (i64, String) = warehouse
        .connection()
        .query_row("SELECT customer_id, name FROM customers", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(customer_id, 7);
    assert_eq!(name, "Alice");
}

#[test]
fn test_datasets_load_in_plan_order_regardless_of_call_order() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();

    // Facts handed over first; the plan still loads dimensions before them.
    let mut datasets = standard_datasets();
    datasets.reverse();
    let report = loader::load(&mut warehouse, &plan, &datasets).unwrap();

    assert_eq!(report.rows[0].relation, "customers");
    assert_eq!(report.rows.last().unwrap().relation, "sales");
}

#[test]
fn test_failed_load_rolls_back_to_prior_state() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();
    loader::load(&mut warehouse, &plan, &standard_datasets()).unwrap();

    // Duplicate primary key blows up mid-insert; the whole reload must
    // roll back, leaving the first load visible.
    let bad = vec![
        customers(&[(1, "Alice", "East"), (1, "Alice again", "East")]),
        products(&[(10, "Lamp", "Home")]),
        sales(&[]),
    ];
    let err = loader::load(&mut warehouse, &plan, &bad).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Insert {
            relation: "customers",
            ..
        }
    ));

    assert_eq!(warehouse.row_count("customers").unwrap(), 2);
    assert_eq!(warehouse.row_count("products").unwrap(), 2);
    assert_eq!(warehouse.row_count("sales").unwrap(), 3);
}

#[test]
fn test_contract_violating_fact_load_rolls_back() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();

    // A fact referencing a customer that the dimensions never define
    // violates the foreign key and must leave the store empty.
    let bad = vec![
        customers(&[(1, "Alice", "East")]),
        products(&[(10, "Lamp", "Home")]),
        sales(&[(100, 99, 10, 50.0)]),
    ];
    let err = loader::load(&mut warehouse, &plan, &bad).unwrap_err();
    assert!(matches!(err, LoadError::Insert { relation: "sales", .. }));

    assert_eq!(warehouse.row_count("customers").unwrap(), 0);
    assert_eq!(warehouse.row_count("sales").unwrap(), 0);
}

#[test]
fn test_missing_dataset_for_planned_relation() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::warehouse_default();
    let datasets = vec![
        customers(&[(1, "Alice", "East")]),
        products(&[(10, "Lamp", "Home")]),
    ];

    let err = loader::load(&mut warehouse, &plan, &datasets).unwrap_err();
    assert!(matches!(err, LoadError::MissingDataset("sales")));
    assert_eq!(warehouse.row_count("customers").unwrap(), 0);
}

#[test]
fn test_unplanned_dataset_is_rejected() {
    let mut warehouse = provisioned_warehouse();
    let plan = LoadPlan::new(vec![RelationPlan {
        contract: &contract::CUSTOMERS,
        depends_on: vec![],
    }]);
    let datasets = vec![
        customers(&[(1, "Alice", "East")]),
        products(&[(10, "Lamp", "Home")]),
    ];

    let err = loader::load(&mut warehouse, &plan, &datasets).unwrap_err();
    assert!(matches!(err, LoadError::UnplannedDataset("products")));
}

#[test]
fn test_provision_is_rerunnable() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.sql");
    fs::write(&schema_path, SCHEMA).unwrap();

    let warehouse = Warehouse::open_in_memory().unwrap();
    let first = schema::provision(&warehouse, &schema_path).unwrap();
    let second = schema::provision(&warehouse, &schema_path).unwrap();
    assert_eq!(first, 3);
    assert_eq!(second, 3);
    assert_eq!(warehouse.row_count("customers").unwrap(), 0);
}

#[test]
fn test_malformed_schema_statement_names_itself() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.sql");
    fs::write(&schema_path, "CREATE TABEL broken (x INTEGER);").unwrap();

    let warehouse = Warehouse::open_in_memory().unwrap();
    let err = schema::provision(&warehouse, &schema_path).unwrap_err();
    match err {
        SchemaError::StatementFailed { statement, .. } => {
            assert!(statement.contains("CREATE TABEL broken"));
        }
        other => panic!("expected statement failure, got {:?}", other),
    }
}
