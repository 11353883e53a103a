//! Identity sequence emulation.
//!
//! Spanner has no auto-increment columns. Each identity requirement is backed
//! by a single-row counter table holding `next_val`, seeded once after the
//! structural batch has run.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ddl::planner::TablePlan;
use crate::dialect::types::COUNTER_TYPE;
use crate::error::{Result, SchemaError};
use crate::schema::SequenceSpec;

/// How counter values are turned into identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStrategy {
    /// Identifiers increase with the counter
    #[default]
    Sequential,
    /// Identifiers are the bit-reversed counter, spreading writes over the keyspace
    BitReversed,
}

impl SequenceStrategy {
    /// Map a counter value to the identifier handed out for it.
    ///
    /// Bit-reversed allocation reverses the low 63 bits so results stay
    /// non-negative; distinct non-negative counters give distinct identifiers.
    pub fn allocate(self, counter: i64) -> i64 {
        match self {
            SequenceStrategy::Sequential => counter,
            SequenceStrategy::BitReversed => {
                let bits = (counter as u64) & (i64::MAX as u64);
                (bits.reverse_bits() >> 1) as i64
            }
        }
    }
}

/// A counter table to create and seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterTable {
    pub table: String,
    pub initial_value: i64,
    pub strategy: SequenceStrategy,
}

impl CounterTable {
    /// ```text
    /// create table hibernate_sequence (next_val INT64) PRIMARY KEY ()
    /// ```
    pub fn create_statement(&self) -> String {
        format!(
            "create table {} (next_val {}) PRIMARY KEY ()",
            self.table, COUNTER_TYPE
        )
    }

    /// The single insert priming the counter.
    ///
    /// Shared counters and dedicated bit-reversed counters are written by
    /// different generators upstream, and their literal forms differ.
    pub fn seed_statement(&self) -> String {
        match self.strategy {
            SequenceStrategy::Sequential => format!(
                "INSERT INTO {} (next_val) VALUES({})",
                self.table, self.initial_value
            ),
            SequenceStrategy::BitReversed => format!(
                "insert into {} (next_val) values ( {} )",
                self.table, self.initial_value
            ),
        }
    }

    pub fn drop_statement(&self) -> String {
        format!("drop table {}", self.table)
    }
}

/// Distinct counter tables in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencePlan {
    counters: Vec<CounterTable>,
}

impl SequencePlan {
    /// Deduplicate sequence requirements into counter tables.
    ///
    /// Requirements naming the same counter table (ignoring case) collapse into
    /// one when they agree on strategy and initial value.
    ///
    /// # Errors
    /// - `ConflictingSequence` if they disagree
    /// - `DuplicateTable` if a counter table shares its name with an entity table
    pub fn build(sequences: &[SequenceSpec], tables: &TablePlan) -> Result<Self> {
        let mut counters: Vec<CounterTable> = Vec::new();

        for spec in sequences {
            let table = spec.counter_table();
            if tables.declares_ignore_case(table) {
                return Err(SchemaError::DuplicateTable {
                    table: table.to_string(),
                });
            }

            let counter = CounterTable {
                table: table.to_string(),
                initial_value: spec.initial_value,
                strategy: spec.strategy,
            };

            let lowered = counter.table.to_lowercase();
            match counters.iter().find(|c| c.table.to_lowercase() == lowered) {
                Some(existing)
                    if existing.strategy == counter.strategy
                        && existing.initial_value == counter.initial_value =>
                {
                    debug!(sequence = %spec.name, table, "sequence shares an existing counter table");
                }
                Some(_) => {
                    return Err(SchemaError::ConflictingSequence {
                        table: table.to_string(),
                    });
                }
                None => counters.push(counter),
            }
        }

        Ok(Self { counters })
    }

    pub fn counters(&self) -> &[CounterTable] {
        &self.counters
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
