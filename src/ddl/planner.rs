//! Interleave hierarchy planning.
//!
//! Orders tables so every parent precedes its descendants, prefixes each
//! child's primary key with its parent's key, and renders the resulting
//! `create table` / `drop table` statements.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dialect::types::column_definition;
use crate::error::{Result, SchemaError};
use crate::schema::{ColumnSpec, TableSpec};

/// A table after planning: its key includes every ancestor's key columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTable {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub primary_key: Vec<String>,
    pub parent: Option<String>,
    pub on_delete_cascade: bool,
}

impl PlannedTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    fn is_key(&self, column: &str) -> bool {
        self.primary_key.iter().any(|k| k == column)
    }

    /// Render the `create table` statement.
    ///
    /// ```text
    /// create table Parent (grandParentId INT64 not null,parentId INT64 not null,name STRING(255)) PRIMARY KEY (grandParentId,parentId), INTERLEAVE IN PARENT GrandParent
    /// ```
    pub fn create_statement(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| column_definition(c, self.is_key(&c.name)))
            .collect::<Vec<_>>()
            .join(",");

        let mut statement = format!(
            "create table {} ({}) PRIMARY KEY ({})",
            self.name,
            columns,
            self.primary_key.join(",")
        );

        if let Some(parent) = &self.parent {
            statement.push_str(&format!(", INTERLEAVE IN PARENT {}", parent));
            if self.on_delete_cascade {
                statement.push_str(" ON DELETE CASCADE");
            }
        }

        statement
    }

    pub fn drop_statement(&self) -> String {
        format!("drop table {}", self.name)
    }
}

/// Tables in creation order.
#[derive(Debug, Clone, Default)]
pub struct TablePlan {
    tables: Vec<PlannedTable>,
    positions: HashMap<String, usize>,
}

impl TablePlan {
    /// Plan a set of tables.
    ///
    /// Roots and siblings keep their input order; a child is placed on the
    /// first pass after its parent has been placed.
    ///
    /// # Errors
    /// - `DuplicateTable` if two tables share a name
    /// - `MissingPrimaryKey` if a table declares no key columns
    /// - `UnknownColumn` if a key column is not declared on its table
    /// - `UnknownTable` if a parent is not declared
    /// - `CyclicHierarchy` if parent links form a cycle
    pub fn build(specs: &[TableSpec]) -> Result<Self> {
        let mut by_name: HashMap<&str, &TableSpec> = HashMap::new();
        let mut declared: HashSet<String> = HashSet::new();
        for spec in specs {
            // identifiers are case-insensitive on the target
            if !declared.insert(spec.name.to_lowercase()) {
                return Err(SchemaError::DuplicateTable {
                    table: spec.name.clone(),
                });
            }
            by_name.insert(spec.name.as_str(), spec);
        }

        for spec in specs {
            if spec.primary_key.is_empty() {
                return Err(SchemaError::MissingPrimaryKey {
                    table: spec.name.clone(),
                });
            }
            for key in &spec.primary_key {
                if spec.find_column(key).is_none() {
                    return Err(SchemaError::unknown_column(&spec.name, key));
                }
            }
            if let Some(parent) = &spec.parent {
                if !by_name.contains_key(parent.as_str()) {
                    return Err(SchemaError::UnknownTable {
                        table: parent.clone(),
                    });
                }
            }
        }

        if let Some(cycle) = find_cycle(specs, &by_name) {
            return Err(SchemaError::CyclicHierarchy { tables: cycle });
        }

        let mut plan = TablePlan::default();
        let mut placed: Vec<bool> = vec![false; specs.len()];
        while plan.tables.len() < specs.len() {
            let before = plan.tables.len();
            for (i, spec) in specs.iter().enumerate() {
                if placed[i] {
                    continue;
                }
                let ready = match &spec.parent {
                    None => true,
                    Some(parent) => plan.positions.contains_key(parent),
                };
                if ready {
                    let planned = plan.plan_table(spec)?;
                    plan.push(planned);
                    placed[i] = true;
                }
            }
            // unreachable once find_cycle has passed
            if plan.tables.len() == before {
                let blocked = specs
                    .iter()
                    .zip(&placed)
                    .filter(|(_, done)| !**done)
                    .map(|(s, _)| s.name.clone())
                    .collect();
                return Err(SchemaError::CyclicHierarchy { tables: blocked });
            }
        }

        Ok(plan)
    }

    fn plan_table(&self, spec: &TableSpec) -> Result<PlannedTable> {
        let primary_key = match &spec.parent {
            None => spec.primary_key.clone(),
            Some(parent) => {
                let parent_key = &self.tables[self.positions[parent]].primary_key;
                for key in parent_key {
                    if spec.find_column(key).is_none() {
                        return Err(SchemaError::unknown_column(&spec.name, key));
                    }
                }
                let mut key = parent_key.clone();
                key.extend(
                    spec.primary_key
                        .iter()
                        .filter(|k| !parent_key.contains(k))
                        .cloned(),
                );
                key
            }
        };

        debug!(table = %spec.name, key = ?primary_key, "planned table");

        Ok(PlannedTable {
            name: spec.name.clone(),
            columns: spec.columns.clone(),
            primary_key,
            parent: spec.parent.clone(),
            on_delete_cascade: spec.on_delete_cascade,
        })
    }

    fn push(&mut self, table: PlannedTable) {
        self.positions.insert(table.name.clone(), self.tables.len());
        self.tables.push(table);
    }

    /// Parents before children.
    pub fn create_order(&self) -> impl Iterator<Item = &PlannedTable> {
        self.tables.iter()
    }

    /// Exact reverse of `create_order`.
    pub fn drop_order(&self) -> impl Iterator<Item = &PlannedTable> {
        self.tables.iter().rev()
    }

    pub fn get(&self, name: &str) -> Option<&PlannedTable> {
        self.positions.get(name).map(|&i| &self.tables[i])
    }

    /// True if a planned table would clash with `name` on the target.
    pub fn declares_ignore_case(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.tables.iter().any(|t| t.name.to_lowercase() == name)
    }

    /// Index of a table in creation order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Walk parent links from every table; returns the first cycle found,
/// starting and ending with the same table.
fn find_cycle(specs: &[TableSpec], by_name: &HashMap<&str, &TableSpec>) -> Option<Vec<String>> {
    let mut cleared: HashSet<&str> = HashSet::new();

    for spec in specs {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut current = Some(spec.name.as_str());

        while let Some(name) = current {
            if cleared.contains(name) {
                break;
            }
            if !on_path.insert(name) {
                let start = path.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Some(cycle);
            }
            path.push(name);
            current = by_name
                .get(name)
                .and_then(|s| s.parent.as_deref());
        }

        cleared.extend(path);
    }

    None
}
