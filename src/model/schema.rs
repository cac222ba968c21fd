//! Table metadata and INSERT planning.
//!
//! The registration table is not owned by this service, so the INSERT is
//! built from whatever columns the table actually has. Column names only
//! ever come from [`COLUMN_ORDER`], never from the request.
use std::collections::HashMap;

use thiserror::Error;

pub const REGISTRATION_TABLE: &str = "registration";

/// Every column the form knows how to fill, in INSERT order.
pub const COLUMN_ORDER: [&str; 10] = [
    "full_name",
    "user_id",
    "username",
    "password_hash",
    "email",
    "phone",
    "father_name",
    "mother_name",
    "address",
    "age",
];

const INTEGER_TYPES: [&str; 7] = ["integer", "bigint", "smallint", "int", "int2", "int4", "int8"];

pub fn is_integer_type(data_type: &str) -> bool {
    INTEGER_TYPES.contains(&data_type.trim().to_ascii_lowercase().as_str())
}

/// Column types that accept a TEXT parameter without a cast.
const TEXT_UDTS: [&str; 4] = ["text", "varchar", "bpchar", "name"];

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub data_type: String,
    /// Catalog type name, e.g. `numeric`, `date`, `varchar`.
    pub udt_name: String,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnMeta {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_integer(&self) -> bool {
        is_integer_type(&self.data_type)
    }

    /// Type the text placeholder must be cast to, for columns that are
    /// neither integer nor text (`numeric`, `date`, enums, ...).
    pub fn cast_type(&self) -> Option<&str> {
        let udt = self.udt_name.trim();
        if self.is_integer() || udt.is_empty() || TEXT_UDTS.contains(&udt) {
            None
        } else {
            Some(udt)
        }
    }
}

/// Columns of a table as reported by `information_schema.columns`.
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    columns: HashMap<String, ColumnMeta>,
}

impl TableSchema {
    pub fn from_columns<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (String, ColumnMeta)>,
    {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.get(name)
    }
}

/// A value taken from the form, before it is matched to a column type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
}

/// A value ready to be bound to a placeholder. NULLs stay typed so that
/// Postgres accepts them for the target column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i64>),
}

impl SqlValue {
    /// Converts a form value to the column's type. Text that does not parse
    /// as an integer for an integer column becomes NULL.
    pub fn for_column(value: Option<FieldValue>, meta: &ColumnMeta) -> Self {
        if meta.is_integer() {
            let parsed = match value {
                Some(FieldValue::Int(n)) => Some(n),
                Some(FieldValue::Text(s)) => s.trim().parse().ok(),
                None => None,
            };
            SqlValue::Int(parsed)
        } else {
            let text = match value {
                Some(FieldValue::Int(n)) => Some(n.to_string()),
                Some(FieldValue::Text(s)) => Some(s),
                None => None,
            };
            SqlValue::Text(text)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Text(None) | SqlValue::Int(None))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("No matching columns found in {0} table.")]
    NoMatchingColumns(String),

    #[error(
        "Column '{0}' is required by the database but no value was provided. \
         Provide a value in the form or alter the DB to use a default/sequence."
    )]
    MissingRequired(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub columns: Vec<&'static str>,
    pub values: Vec<SqlValue>,
    /// Per column, the catalog type its placeholder is cast to.
    pub casts: Vec<Option<String>>,
}

impl InsertPlan {
    /// Picks the columns to insert.
    ///
    /// A column is skipped when the table lacks it, or when the form gave no
    /// value and the column has a default (so e.g. a sequence fills it).
    pub fn build(
        table: &str,
        schema: &TableSchema,
        mut candidates: HashMap<&'static str, FieldValue>,
    ) -> Result<Self, PlanError> {
        let mut columns = Vec::new();
        let mut values = Vec::new();
        let mut casts = Vec::new();

        for column in COLUMN_ORDER {
            let Some(meta) = schema.column(column) else {
                continue;
            };
            let value = SqlValue::for_column(candidates.remove(column), meta);
            if value.is_null() && meta.has_default() {
                continue;
            }
            columns.push(column);
            values.push(value);
            casts.push(meta.cast_type().map(str::to_string));
        }

        if columns.is_empty() {
            return Err(PlanError::NoMatchingColumns(table.to_string()));
        }

        for (column, value) in columns.iter().zip(&values) {
            let required = schema
                .column(column)
                .map(|meta| !meta.nullable && !meta.has_default())
                .unwrap_or(false);
            if required && value.is_null() {
                return Err(PlanError::MissingRequired(column.to_string()));
            }
        }

        Ok(Self {
            columns,
            values,
            casts,
        })
    }

    /// Renders the statement. Cast targets come from the catalog and are
    /// quoted as identifiers.
    pub fn sql(&self, table: &str) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|i| match self.casts.get(i - 1).and_then(Option::as_deref) {
                Some(udt) => format!("CAST(${i} AS {})", quote_ident(udt)),
                None => format!("${i}"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            self.columns.join(", ")
        )
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(data_type: &str, nullable: bool, default: Option<&str>) -> ColumnMeta {
        let udt_name = match data_type {
            "integer" => "int4",
            "character varying" => "varchar",
            "timestamp" => "timestamp",
            other => other,
        };
        ColumnMeta {
            data_type: data_type.to_string(),
            udt_name: udt_name.to_string(),
            nullable,
            default: default.map(str::to_string),
        }
    }

    fn registration_schema() -> TableSchema {
        TableSchema::from_columns([
            ("full_name".to_string(), meta("character varying", true, None)),
            (
                "user_id".to_string(),
                meta("integer", false, Some("nextval('registration_user_id_seq'::regclass)")),
            ),
            ("username".to_string(), meta("character varying", false, None)),
            ("email".to_string(), meta("character varying", false, None)),
            ("age".to_string(), meta("integer", true, None)),
        ])
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_integer_type_detection() {
        assert!(is_integer_type("integer"));
        assert!(is_integer_type("bigint"));
        assert!(is_integer_type("smallint"));
        assert!(!is_integer_type("interval"));
        assert!(!is_integer_type("point"));
        assert!(!is_integer_type("text"));
    }

    #[test]
    fn test_plan_follows_column_order_and_skips_unknown_columns() {
        let candidates = HashMap::from([
            ("email", text("a@example.com")),
            ("username", text("alice")),
            ("full_name", text("Alice Smith")),
            ("phone", text("555-0100")),
        ]);

        let plan = InsertPlan::build(REGISTRATION_TABLE, &registration_schema(), candidates).unwrap();

        assert_eq!(plan.columns, vec!["full_name", "username", "email", "age"]);
        assert_eq!(plan.values[3], SqlValue::Int(None));
    }

    #[test]
    fn test_plan_omits_defaulted_column_without_value() {
        let candidates = HashMap::from([("username", text("alice")), ("email", text("a@example.com"))]);

        let plan = InsertPlan::build(REGISTRATION_TABLE, &registration_schema(), candidates).unwrap();

        assert!(!plan.columns.contains(&"user_id"));
    }

    #[test]
    fn test_plan_keeps_defaulted_column_with_value() {
        let candidates = HashMap::from([
            ("user_id", text("42")),
            ("username", text("alice")),
            ("email", text("a@example.com")),
        ]);

        let plan = InsertPlan::build(REGISTRATION_TABLE, &registration_schema(), candidates).unwrap();

        assert_eq!(plan.columns[1], "user_id");
        assert_eq!(plan.values[1], SqlValue::Int(Some(42)));
    }

    #[test]
    fn test_plan_rejects_missing_required_column() {
        let candidates = HashMap::from([("username", text("alice"))]);

        let err = InsertPlan::build(REGISTRATION_TABLE, &registration_schema(), candidates).unwrap_err();

        assert_eq!(err, PlanError::MissingRequired("email".to_string()));
    }

    #[test]
    fn test_plan_with_no_matching_columns() {
        let schema = TableSchema::from_columns([("created_at".to_string(), meta("timestamp", true, None))]);

        let err = InsertPlan::build(REGISTRATION_TABLE, &schema, HashMap::new()).unwrap_err();

        assert_eq!(err, PlanError::NoMatchingColumns("registration".to_string()));
    }

    #[test]
    fn test_value_coercion() {
        let int_col = meta("integer", true, None);
        let text_col = meta("text", true, None);

        assert_eq!(SqlValue::for_column(Some(text(" 7 ")), &int_col), SqlValue::Int(Some(7)));
        assert_eq!(SqlValue::for_column(Some(text("seven")), &int_col), SqlValue::Int(None));
        assert_eq!(
            SqlValue::for_column(Some(FieldValue::Int(30)), &text_col),
            SqlValue::Text(Some("30".to_string()))
        );
        assert!(SqlValue::for_column(None, &text_col).is_null());
    }

    #[test]
    fn test_sql_rendering() {
        let plan = InsertPlan {
            columns: vec!["full_name", "email"],
            values: vec![
                SqlValue::Text(Some("Alice".to_string())),
                SqlValue::Text(Some("a@example.com".to_string())),
            ],
            casts: vec![None, None],
        };

        assert_eq!(
            plan.sql(REGISTRATION_TABLE),
            "INSERT INTO registration (full_name, email) VALUES ($1, $2)"
        );
    }

    #[test]
    fn test_cast_type() {
        assert_eq!(meta("numeric", true, None).cast_type(), Some("numeric"));
        assert_eq!(meta("date", true, None).cast_type(), Some("date"));
        assert_eq!(meta("integer", true, None).cast_type(), None);
        assert_eq!(meta("character varying", true, None).cast_type(), None);
        assert_eq!(meta("text", true, None).cast_type(), None);
    }

    #[test]
    fn test_numeric_columns_are_cast_in_sql() {
        let schema = TableSchema::from_columns([
            ("username".to_string(), meta("text", false, None)),
            ("phone".to_string(), meta("numeric", true, None)),
            ("age".to_string(), meta("numeric", true, None)),
        ]);
        let candidates = HashMap::from([
            ("username", text("alice")),
            ("phone", text("5550100")),
            ("age", FieldValue::Int(21)),
        ]);

        let plan = InsertPlan::build(REGISTRATION_TABLE, &schema, candidates).unwrap();

        assert_eq!(plan.values[2], SqlValue::Text(Some("21".to_string())));
        assert_eq!(
            plan.sql(REGISTRATION_TABLE),
            "INSERT INTO registration (username, phone, age) \
             VALUES ($1, CAST($2 AS \"numeric\"), CAST($3 AS \"numeric\"))"
        );
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident(r#"odd"type"#), r#""odd""type""#);
    }
}
