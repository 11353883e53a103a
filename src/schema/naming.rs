//! Deterministic constraint names.
//!
//! Names are a prefix followed by the MD5 digest of a canonical identifier
//! string, read as an unsigned big-endian integer and written in base 35.
//! Column names are sorted case-insensitively first so declaration order does
//! not change the name.

use md5::{Digest, Md5};

/// Prefix for foreign key names.
pub const FOREIGN_KEY_PREFIX: &str = "FK";
/// Prefix for unique index names.
pub const UNIQUE_KEY_PREFIX: &str = "UK_";
/// Prefix for plain index names.
pub const INDEX_PREFIX: &str = "IDX_";
/// Prefix for check constraint names.
pub const CHECK_PREFIX: &str = "CK_";

const DIGITS: &[u8; 35] = b"0123456789abcdefghijklmnopqrstuvwxy";

/// Render a 128-bit digest in base 35 using lowercase digits.
fn to_base35(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(25);
    while value > 0 {
        digits.push(DIGITS[(value % 35) as usize]);
        value /= 35;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Hash an arbitrary identifier string.
pub fn hashed_name(source: &str) -> String {
    let digest = Md5::digest(source.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(digest.as_slice());
    to_base35(u128::from_be_bytes(bytes))
}

fn push_sorted_columns(canonical: &mut String, columns: &[String]) {
    let mut sorted: Vec<&str> = columns.iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
    for column in sorted {
        canonical.push_str(&format!("column`{}`", column));
    }
}

/// Name for a unique or plain index over `columns` of `table`.
pub fn constraint_name(prefix: &str, table: &str, columns: &[String]) -> String {
    let mut canonical = format!("table`{}`", table);
    push_sorted_columns(&mut canonical, columns);
    format!("{}{}", prefix, hashed_name(&canonical))
}

/// Name for a foreign key from `table` to `referenced_table`.
pub fn foreign_key_name(table: &str, referenced_table: &str, columns: &[String]) -> String {
    let mut canonical = format!("table`{}`references`{}`", table, referenced_table);
    push_sorted_columns(&mut canonical, columns);
    format!("{}{}", FOREIGN_KEY_PREFIX, hashed_name(&canonical))
}

/// Name for a check constraint on `table`.
pub fn check_name(table: &str, expression: &str) -> String {
    let canonical = format!("table`{}`check`{}`", table, expression);
    format!("{}{}", CHECK_PREFIX, hashed_name(&canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    fn test_self_referencing_foreign_key_name() {
        assert_eq!(
            foreign_key_name("Employee", "Employee", &cols(&["manager_id"])),
            "FKiralam2duuhr33k8a10aoc2t6"
        );
    }

    #[rstest]
    #[case("Airport_Airplane", "Airplane", "airplanes_id", "FKkn0enwaxbwk7csf52x0eps73d")]
    #[case("Airport_Airplane", "Airport", "Airport_id", "FKh186t28ublke8o13fo4ppogs7")]
    fn test_join_table_foreign_key_names(
        #[case] table: &str,
        #[case] referenced: &str,
        #[case] column: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(foreign_key_name(table, referenced, &cols(&[column])), expected);
    }

    #[rstest]
    #[case("Airplane", "modelName", "UK_gc568wb30sampsuirwne5jqgh")]
    #[case("Airport_Airplane", "airplanes_id", "UK_em0lqvwoqdwt29x0b0r010be")]
    fn test_unique_key_names(#[case] table: &str, #[case] column: &str, #[case] expected: &str) {
        assert_eq!(constraint_name(UNIQUE_KEY_PREFIX, table, &cols(&[column])), expected);
    }

    #[rstest]
    fn test_column_order_does_not_change_name() {
        let a = constraint_name(INDEX_PREFIX, "Singer", &cols(&["last", "first"]));
        let b = constraint_name(INDEX_PREFIX, "Singer", &cols(&["first", "last"]));
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_names_are_stable() {
        let first = check_name("Account", "amount >= 0");
        let second = check_name("Account", "amount >= 0");
        assert_eq!(first, second);
        assert!(first.starts_with(CHECK_PREFIX));
        assert_ne!(first, check_name("Account", "amount > 0"));
    }

    #[rstest]
    #[case(0, "0")]
    #[case(34, "y")]
    #[case(35, "10")]
    #[case(35 * 35 + 1, "101")]
    fn test_base35(#[case] value: u128, #[case] expected: &str) {
        assert_eq!(to_base35(value), expected);
    }
}
