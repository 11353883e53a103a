//! Schema description fixtures shared by command and integration tests.

/// Self-referencing foreign key, named index, shared identity counter.
pub const EMPLOYEE: &str = include_str!("schemas/employee.json");

/// Numeric column, no identity counter.
pub const ACCOUNT: &str = include_str!("schemas/account.json");

/// Dedicated bit-reversed counter starting at 50000.
pub const CUSTOMER: &str = include_str!("schemas/customer.json");

/// Three-level interleave hierarchy declared child first.
pub const INTERLEAVED: &str = include_str!("schemas/interleaved.json");

/// Unique columns and foreign keys with derived names.
pub const AIRPORT: &str = include_str!("schemas/airport.json");

/// Two tables interleaved in each other.
pub const CYCLIC: &str = include_str!("schemas/cyclic.json");

/// Absolute path of a fixture file, for arguments validated to exist.
#[macro_export]
macro_rules! fixture_path {
    ($name:literal) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/src/fixtures/schemas/", $name)
    };
}
