//! Test DSL shared by unit and integration tests.
//!
//! - `cli_parse_test!` / `cli_reject_test!` run an argument vector through
//!   `cli::Args` (the subcommand is the first argument)
//! - `output_test!`, `output_fields_test!` and `output_contains_test!` render a
//!   command result fixture in one `OutputFormat`
//! - `transcript_test!` assembles a JSON schema description and compares every
//!   statement a transport would receive, markers included
//! - `execution_test!` runs an assembled script over a `RecordingTransport`
//!   that rejects one statement
//!
//! Everything is exported, so `tests/` can use the schema macros through
//! `spanner_ddl::transcript_test!`.

/// Parse arguments into `Command::$variant` and compare the given fields.
///
/// ```ignore
/// cli_parse_test!(test_generate_defaults, ["generate", "--schema", SCHEMA], Generate {
///     action: SchemaAction::Replace,
/// });
/// ```
#[macro_export]
macro_rules! cli_parse_test {
    (
        $test_name:ident,
        [$($arg:expr),+ $(,)?],
        $variant:ident { $($field:ident : $expected:expr),+ $(,)? } $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name() {
            let parsed =
                <$crate::cli::Args as clap::Parser>::try_parse_from(["spanner_ddl", $($arg),+])
                    .unwrap_or_else(|e| panic!("arguments should parse: {e}"));
            let $crate::commands::Command::$variant(cmd) = parsed.command else {
                panic!(concat!("expected the ", stringify!($variant), " command"));
            };
            $(
                assert_eq!(cmd.$field, $expected, concat!("field ", stringify!($field)));
            )+
        }
    };
}

/// Parsing must fail; with `mentions`, clap's message must name that text.
#[macro_export]
macro_rules! cli_reject_test {
    (
        $test_name:ident,
        [$($arg:expr),+ $(,)?]
        $(, mentions: $needle:expr)? $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name() {
            let err =
                <$crate::cli::Args as clap::Parser>::try_parse_from(["spanner_ddl", $($arg),+])
                    .expect_err("arguments should be rejected");
            $(
                assert!(err.to_string().contains($needle), "{} not in: {}", $needle, err);
            )?
        }
    };
}

/// Whole-output comparison for one format.
#[macro_export]
macro_rules! output_test {
    (
        $test_name:ident,
        $fixture:ident: $fixture_type:ty,
        $format:ident,
        $expected:expr $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::{OutputFormat, Outputable};
            assert_eq!($fixture.format(OutputFormat::$format), $expected);
        }
    };
}

/// JSON output parses and carries the given top-level values.
#[macro_export]
macro_rules! output_fields_test {
    (
        $test_name:ident,
        $fixture:ident: $fixture_type:ty,
        { $($field:literal : $expected:expr),+ $(,)? } $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::{OutputFormat, Outputable};
            let parsed: serde_json::Value =
                serde_json::from_str(&$fixture.format(OutputFormat::Json))
                    .expect("JSON output should parse");
            $(
                assert_eq!(parsed[$field], $expected, concat!("JSON field ", $field));
            )+
        }
    };
}

#[macro_export]
macro_rules! output_contains_test {
    (
        $test_name:ident,
        $fixture:ident: $fixture_type:ty,
        $format:ident,
        [$($needle:expr),+ $(,)?] $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::{OutputFormat, Outputable};
            let output = $fixture.format(OutputFormat::$format);
            $(
                assert!(output.contains($needle), "{} not in:\n{}", $needle, output);
            )+
        }
    };
}

/// Assemble `$schema` (JSON) with `SchemaAction::$action` and compare the
/// transcript. `tables` / `indexes` list what already exists.
///
/// ```ignore
/// transcript_test!(test_drop_employee, EMPLOYEE, Drop,
///     tables: ["Employee"],
///     ["START BATCH DDL", "drop table Employee", "RUN BATCH"]);
/// ```
#[macro_export]
macro_rules! transcript_test {
    (
        $test_name:ident,
        $schema:expr,
        $action:ident,
        $(tables: [$($table:expr),* $(,)?],)?
        $(indexes: [$($index:expr),* $(,)?],)?
        [$($statement:expr),* $(,)?] $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name() {
            let schema = $crate::schema::SchemaDescription::from_json($schema)
                .unwrap_or_else(|e| panic!("schema description should parse: {e}"));
            let tables: &[&str] = &[$($($table),*)?];
            let indexes: &[&str] = &[$($($index),*)?];
            let existing = $crate::schema::ExistingObjects::new()
                .with_tables(tables)
                .with_indexes(indexes);

            let script =
                $crate::ddl::assemble(&schema, &existing, $crate::ddl::SchemaAction::$action)
                    .unwrap_or_else(|e| panic!("script should assemble: {e}"));

            let expected: Vec<&str> = vec![$($statement),*];
            assert_eq!(script.transcript(), expected);
        }
    };
}

/// Execute `$schema` against a transport that rejects `$failing` with
/// "test exception"; check the typed error and everything that was sent.
#[macro_export]
macro_rules! execution_test {
    (
        $test_name:ident,
        $schema:expr,
        $action:ident,
        fail_on: $failing:expr,
        [$($sent:expr),* $(,)?] $(,)?
    ) => {
        #[rstest::rstest]
        fn $test_name() {
            let schema = $crate::schema::SchemaDescription::from_json($schema)
                .unwrap_or_else(|e| panic!("schema description should parse: {e}"));
            let script = $crate::ddl::assemble(
                &schema,
                &$crate::schema::ExistingObjects::new(),
                $crate::ddl::SchemaAction::$action,
            )
            .unwrap_or_else(|e| panic!("script should assemble: {e}"));

            let mut transport =
                $crate::db::RecordingTransport::new().fail_on($failing, "test exception");
            let err = $crate::db::BatchExecutor::new(&mut transport)
                .execute(&script)
                .expect_err("execution should fail");

            assert_eq!(err, $crate::error::SchemaError::execution($failing, "test exception"));
            let expected: Vec<&str> = vec![$($sent),*];
            assert_eq!(transport.executed(), expected.as_slice());
        }
    };
}
