//! Typed column contracts for the warehouse relations.
//!
//! Every relation has a fixed contract: the human-authored header used in
//! the prepared CSV, the snake_case warehouse column it is renamed to, and
//! the semantic type of each value. The dataset-prep stage validates this
//! contract first; the load path re-checks it before the store is mutated.

use std::fmt;

use once_cell::sync::Lazy;

/// Semantic type of a contract column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Integer,
    Float,
    Text,
    Date,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Integer => write!(f, "integer"),
            SemanticType::Float => write!(f, "float"),
            SemanticType::Text => write!(f, "text"),
            SemanticType::Date => write!(f, "date"),
        }
    }
}

/// One column of a relation contract.
///
/// `source` is the prepared CSV header; `column` is the warehouse column it
/// maps to. The pair is the whole renaming step: values pass through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub source: &'static str,
    pub column: &'static str,
    pub ty: SemanticType,
}

/// Contract for one warehouse relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContract {
    pub relation: &'static str,
    pub columns: Vec<ColumnSpec>,
}

/// A single contract breach, reported per column.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolation {
    /// An expected source column is absent from the header.
    MissingColumn { column: &'static str },
    /// The header carries a column the contract does not declare.
    UnexpectedColumn { column: String },
    /// A value failed to parse as the column's semantic type.
    TypeMismatch {
        column: &'static str,
        expected: SemanticType,
        row: usize,
        value: String,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::MissingColumn { column } => {
                write!(f, "missing expected column '{}'", column)
            }
            ContractViolation::UnexpectedColumn { column } => {
                write!(f, "unexpected column '{}'", column)
            }
            ContractViolation::TypeMismatch {
                column,
                expected,
                row,
                value,
            } => {
                write!(
                    f,
                    "column '{}' expects {} but row {} holds '{}'",
                    column, expected, row, value
                )
            }
        }
    }
}

impl TableContract {
    /// Warehouse column names, in contract order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.column).collect()
    }

    /// Check a CSV header against the contract.
    ///
    /// On success returns, for each contract column, its position in the
    /// header. The header may order columns freely; it must carry exactly
    /// the contract's source names.
    pub fn check_header(&self, header: &[String]) -> Result<Vec<usize>, Vec<ContractViolation>> {
        let mut violations = Vec::new();
        let mut positions = Vec::with_capacity(self.columns.len());

        for spec in &self.columns {
            match header.iter().position(|h| h == spec.source) {
                Some(idx) => positions.push(idx),
                None => violations.push(ContractViolation::MissingColumn {
                    column: spec.source,
                }),
            }
        }

        for name in header {
            if !self.columns.iter().any(|c| c.source == name) {
                violations.push(ContractViolation::UnexpectedColumn {
                    column: name.clone(),
                });
            }
        }

        if violations.is_empty() {
            Ok(positions)
        } else {
            Err(violations)
        }
    }
}

/// Contract for the `customers` dimension.
pub static CUSTOMERS: Lazy<TableContract> = Lazy::new(|| TableContract {
    relation: "customers",
    columns: vec![
        ColumnSpec {
            source: "CustomerID",
            column: "customer_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "Name",
            column: "name",
            ty: SemanticType::Text,
        },
        ColumnSpec {
            source: "Region",
            column: "region",
            ty: SemanticType::Text,
        },
        ColumnSpec {
            source: "JoinDate",
            column: "join_date",
            ty: SemanticType::Date,
        },
        ColumnSpec {
            source: "LoyaltyPoints",
            column: "loyalty_points",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "PreferredContactMethod",
            column: "preferred_contact_method",
            ty: SemanticType::Text,
        },
    ],
});

/// Contract for the `products` dimension.
pub static PRODUCTS: Lazy<TableContract> = Lazy::new(|| TableContract {
    relation: "products",
    columns: vec![
        ColumnSpec {
            source: "ProductID",
            column: "product_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "ProductName",
            column: "product_name",
            ty: SemanticType::Text,
        },
        ColumnSpec {
            source: "Category",
            column: "category",
            ty: SemanticType::Text,
        },
        ColumnSpec {
            source: "UnitPrice",
            column: "unit_price",
            ty: SemanticType::Float,
        },
        ColumnSpec {
            source: "StockQuantity",
            column: "stock_quantity",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "Supplier",
            column: "supplier",
            ty: SemanticType::Text,
        },
    ],
});

/// Contract for the `sales` fact table.
pub static SALES: Lazy<TableContract> = Lazy::new(|| TableContract {
    relation: "sales",
    columns: vec![
        ColumnSpec {
            source: "TransactionID",
            column: "transaction_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "SaleDate",
            column: "sale_date",
            ty: SemanticType::Date,
        },
        ColumnSpec {
            source: "CustomerID",
            column: "customer_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "ProductID",
            column: "product_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "StoreID",
            column: "store_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "CampaignID",
            column: "campaign_id",
            ty: SemanticType::Integer,
        },
        ColumnSpec {
            source: "SaleAmount",
            column: "sale_amount",
            ty: SemanticType::Float,
        },
        ColumnSpec {
            source: "DiscountPercent",
            column: "discount_percent",
            ty: SemanticType::Float,
        },
        ColumnSpec {
            source: "PaymentType",
            column: "payment_type",
            ty: SemanticType::Text,
        },
    ],
});
