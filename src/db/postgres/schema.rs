//! Existing-object discovery through `information_schema`.

use postgres::Client;

use crate::schema::ExistingObjects;

/// User tables in the given schema.
const TABLES_QUERY: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = $1 AND table_type = 'BASE TABLE'";

/// Secondary indexes in the given schema. Primary keys are reported as
/// indexes of type `PRIMARY_KEY` and are skipped.
const INDEXES_QUERY: &str = "SELECT index_name FROM information_schema.indexes \
     WHERE table_schema = $1 AND index_type = 'INDEX'";

/// Read the tables and secondary indexes present in `schema`.
pub fn load_existing_objects(
    client: &mut Client,
    schema: &str,
) -> Result<ExistingObjects, postgres::Error> {
    let mut existing = ExistingObjects::new();

    for row in client.query(TABLES_QUERY, &[&schema])? {
        let name: String = row.try_get(0)?;
        existing.add_table(&name);
    }

    for row in client.query(INDEXES_QUERY, &[&schema])? {
        let name: String = row.try_get(0)?;
        existing.add_index(&name);
    }

    Ok(existing)
}
