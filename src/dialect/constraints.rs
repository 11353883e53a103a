//! Constraint translation.
//!
//! Spanner has no UNIQUE table constraint, so uniqueness becomes a unique
//! index. Foreign keys and single-table checks become `alter table ... add
//! constraint` statements. Anything else is rejected before execution.

use serde::Serialize;

use crate::ddl::planner::{PlannedTable, TablePlan};
use crate::error::{Result, SchemaError};
use crate::schema::naming::{
    check_name, constraint_name, foreign_key_name, INDEX_PREFIX, UNIQUE_KEY_PREFIX,
};
use crate::schema::{ConstraintKind, ConstraintSpec};

/// A translated constraint, tagged by the phase it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintDdl {
    Index { table: String, name: String, statement: String },
    ForeignKey { table: String, name: String, statement: String },
    Check { table: String, name: String, statement: String },
}

impl ConstraintDdl {
    pub fn name(&self) -> &str {
        match self {
            ConstraintDdl::Index { name, .. }
            | ConstraintDdl::ForeignKey { name, .. }
            | ConstraintDdl::Check { name, .. } => name,
        }
    }

    pub fn statement(&self) -> &str {
        match self {
            ConstraintDdl::Index { statement, .. }
            | ConstraintDdl::ForeignKey { statement, .. }
            | ConstraintDdl::Check { statement, .. } => statement,
        }
    }

    /// Indexes are the only constraint objects the drop phase removes by name.
    pub fn drop_statement(&self) -> Option<String> {
        match self {
            ConstraintDdl::Index { name, .. } => Some(format!("drop index {}", name)),
            _ => None,
        }
    }
}

fn owner<'p>(constraint: &ConstraintSpec, plan: &'p TablePlan) -> Result<&'p PlannedTable> {
    plan.get(&constraint.table).ok_or_else(|| SchemaError::UnknownTable {
        table: constraint.table.clone(),
    })
}

fn require_columns(table: &PlannedTable, columns: &[String]) -> Result<()> {
    match columns.iter().find(|c| !table.has_column(c)) {
        Some(missing) => Err(SchemaError::unknown_column(&table.name, missing)),
        None => Ok(()),
    }
}

fn index_statement(unique: bool, name: &str, table: &str, columns: &[String]) -> String {
    format!(
        "create {}index {} on {} ({})",
        if unique { "unique " } else { "" },
        name,
        table,
        columns.join(",")
    )
}

/// Translate one constraint into zero or more DDL fragments.
///
/// A unique constraint over exactly the primary key yields nothing, since the
/// key already enforces it.
///
/// # Errors
/// - `UnknownTable` / `UnknownColumn` for references the plan cannot resolve
/// - `UnsupportedConstraint` for column-less constraints, foreign keys whose
///   arity differs from the referenced key, and checks reading other tables
pub fn translate(constraint: &ConstraintSpec, plan: &TablePlan) -> Result<Vec<ConstraintDdl>> {
    let table = owner(constraint, plan)?;
    let columns = &constraint.columns;

    match &constraint.kind {
        ConstraintKind::Unique | ConstraintKind::Index => {
            if columns.is_empty() {
                return Err(SchemaError::unsupported(&table.name, "index without columns"));
            }
            require_columns(table, columns)?;

            let unique = constraint.kind == ConstraintKind::Unique;
            if unique && *columns == table.primary_key {
                return Ok(Vec::new());
            }

            let prefix = if unique { UNIQUE_KEY_PREFIX } else { INDEX_PREFIX };
            let name = constraint
                .name
                .clone()
                .unwrap_or_else(|| constraint_name(prefix, &table.name, columns));
            let statement = index_statement(unique, &name, &table.name, columns);

            Ok(vec![ConstraintDdl::Index {
                table: table.name.clone(),
                name,
                statement,
            }])
        }
        ConstraintKind::ForeignKey {
            references,
            referenced_columns,
        } => {
            if columns.is_empty() {
                return Err(SchemaError::unsupported(&table.name, "foreign key without columns"));
            }
            require_columns(table, columns)?;

            let referenced = plan.get(references).ok_or_else(|| SchemaError::UnknownTable {
                table: references.clone(),
            })?;
            let target_columns = if referenced_columns.is_empty() {
                &referenced.primary_key
            } else {
                referenced_columns
            };
            require_columns(referenced, target_columns)?;

            if target_columns.len() != columns.len() {
                return Err(SchemaError::unsupported(
                    &table.name,
                    format!(
                        "foreign key has {} columns but {} references {}",
                        columns.len(),
                        referenced.name,
                        target_columns.len()
                    ),
                ));
            }

            let name = constraint
                .name
                .clone()
                .unwrap_or_else(|| foreign_key_name(&table.name, &referenced.name, columns));
            let statement = format!(
                "alter table {} add constraint {} foreign key ({}) references {} ({})",
                table.name,
                name,
                columns.join(","),
                referenced.name,
                target_columns.join(",")
            );

            Ok(vec![ConstraintDdl::ForeignKey {
                table: table.name.clone(),
                name,
                statement,
            }])
        }
        ConstraintKind::Check { expression, tables } => {
            if let Some(other) = tables.iter().find(|t| **t != table.name) {
                return Err(SchemaError::unsupported(
                    &table.name,
                    format!("check constraint reads another table '{}'", other),
                ));
            }
            if expression.trim().is_empty() {
                return Err(SchemaError::unsupported(&table.name, "empty check expression"));
            }
            require_columns(table, columns)?;

            let name = constraint
                .name
                .clone()
                .unwrap_or_else(|| check_name(&table.name, expression));
            let statement = format!(
                "alter table {} add constraint {} check ({})",
                table.name, name, expression
            );

            Ok(vec![ConstraintDdl::Check {
                table: table.name.clone(),
                name,
                statement,
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, LogicalType, TableSpec};
    use rstest::{fixture, rstest};

    #[fixture]
    fn plan() -> TablePlan {
        TablePlan::build(&[
            TableSpec::new("Employee")
                .column(ColumnSpec::new("id", LogicalType::Int64).not_null())
                .column(ColumnSpec::new("name", LogicalType::String))
                .column(ColumnSpec::new("manager_id", LogicalType::Int64))
                .primary_key(["id"]),
            TableSpec::new("Airplane")
                .column(ColumnSpec::new("id", LogicalType::String).not_null())
                .column(ColumnSpec::new("modelName", LogicalType::String))
                .primary_key(["id"]),
        ])
        .unwrap()
    }

    fn statements(ddl: &[ConstraintDdl]) -> Vec<&str> {
        ddl.iter().map(|d| d.statement()).collect()
    }

    #[rstest]
    fn test_named_index(plan: TablePlan) {
        let ddl = translate(&ConstraintSpec::index("Employee", ["name"]).named("name_index"), &plan).unwrap();
        assert_eq!(statements(&ddl), vec!["create index name_index on Employee (name)"]);
        assert_eq!(ddl[0].drop_statement().as_deref(), Some("drop index name_index"));
    }

    #[rstest]
    fn test_unique_column_becomes_unique_index(plan: TablePlan) {
        let ddl = translate(&ConstraintSpec::unique("Airplane", ["modelName"]), &plan).unwrap();
        assert_eq!(
            statements(&ddl),
            vec!["create unique index UK_gc568wb30sampsuirwne5jqgh on Airplane (modelName)"]
        );
    }

    #[rstest]
    fn test_unique_over_primary_key_is_redundant(plan: TablePlan) {
        let ddl = translate(&ConstraintSpec::unique("Airplane", ["id"]), &plan).unwrap();
        assert!(ddl.is_empty());
    }

    #[rstest]
    fn test_self_referencing_foreign_key(plan: TablePlan) {
        let ddl = translate(&ConstraintSpec::foreign_key("Employee", ["manager_id"], "Employee"), &plan).unwrap();
        assert_eq!(
            statements(&ddl),
            vec!["alter table Employee add constraint FKiralam2duuhr33k8a10aoc2t6 foreign key (manager_id) references Employee (id)"]
        );
        assert_eq!(ddl[0].drop_statement(), None);
    }

    #[rstest]
    fn test_foreign_key_arity_mismatch(plan: TablePlan) {
        let fk = ConstraintSpec::foreign_key("Employee", ["manager_id", "name"], "Employee");
        assert!(matches!(
            translate(&fk, &plan),
            Err(SchemaError::UnsupportedConstraint { .. })
        ));
    }

    #[rstest]
    fn test_foreign_key_to_unknown_table(plan: TablePlan) {
        let fk = ConstraintSpec::foreign_key("Employee", ["manager_id"], "Manager");
        assert_eq!(
            translate(&fk, &plan).unwrap_err(),
            SchemaError::UnknownTable {
                table: "Manager".to_string()
            }
        );
    }

    #[rstest]
    fn test_index_on_unknown_column(plan: TablePlan) {
        let index = ConstraintSpec::index("Employee", ["salary"]);
        assert_eq!(
            translate(&index, &plan).unwrap_err(),
            SchemaError::unknown_column("Employee", "salary")
        );
    }

    #[rstest]
    fn test_index_without_columns(plan: TablePlan) {
        let index = ConstraintSpec::index("Employee", Vec::<String>::new());
        assert!(matches!(
            translate(&index, &plan),
            Err(SchemaError::UnsupportedConstraint { .. })
        ));
    }

    #[rstest]
    fn test_single_table_check(plan: TablePlan) {
        let check = ConstraintSpec::check("Employee", "id > 0").named("positive_id");
        let ddl = translate(&check, &plan).unwrap();
        assert_eq!(
            statements(&ddl),
            vec!["alter table Employee add constraint positive_id check (id > 0)"]
        );
    }

    #[rstest]
    fn test_multi_table_check_is_unsupported(plan: TablePlan) {
        let check = ConstraintSpec {
            kind: ConstraintKind::Check {
                expression: "id > (select count(*) from Airplane)".to_string(),
                tables: vec!["Employee".to_string(), "Airplane".to_string()],
            },
            table: "Employee".to_string(),
            columns: vec![],
            name: None,
        };
        let err = translate(&check, &plan).unwrap_err();
        assert_eq!(
            err,
            SchemaError::unsupported("Employee", "check constraint reads another table 'Airplane'")
        );
    }
}
