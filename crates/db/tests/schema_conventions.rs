//! Schema-wide conventions every migration has to follow.
//!
//! The API layer maps database errors to HTTP statuses by constraint name
//! prefix (`uq_`, `fk_`, `ck_`), so naming is checked here as well.

use sqlx::PgPool;

/// Entity tables use BIGINT ids, lookup tables SMALLINT.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_correct_type(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        let expected = if table == "roles" || table.ends_with("_statuses") {
            "smallint"
        } else {
            "bigint"
        };
        assert_eq!(data_type, expected, "Table {table}.id");
    }
}

/// Every table carries timestamptz `created_at` / `updated_at` and the
/// trigger that keeps `updated_at` current.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps_and_trigger(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(data_type, "timestamp with time zone", "Table {table}.{col}");
        }

        // Lookup tables are seed-only and skip the trigger.
        if table == "roles" || table.ends_with("_statuses") {
            continue;
        }
        let (has_trigger,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_table = $1 AND trigger_name = 'set_updated_at'
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(has_trigger, "Table {table} has no set_updated_at trigger");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns: {rows:?}");
}

/// Every foreign key column, including each column of a composite key,
/// has an index of its own.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.table_name, kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fk_columns.is_empty());
    for (table, column) in &fk_columns {
        let (has_index,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || ')%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index, "FK column {table}.{column} has no index");
    }
}

/// No foreign key may fall back to `NO ACTION` for both rules.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_explicit_rules(pool: PgPool) {
    let fk_rules: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT rc.constraint_name, rc.delete_rule, rc.update_rule
         FROM information_schema.referential_constraints rc
         WHERE rc.constraint_schema = 'public'
         ORDER BY rc.constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (constraint, delete_rule, update_rule) in &fk_rules {
        assert!(
            delete_rule != "NO ACTION" || update_rule != "NO ACTION",
            "FK {constraint} relies on the NO ACTION default"
        );
    }
}

/// Constraint names carry the prefix the error mapper keys on.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_constraint_name_prefixes(pool: PgPool) {
    let constraints: Vec<(String, String)> = sqlx::query_as(
        "SELECT conname::TEXT, contype::TEXT
         FROM pg_constraint c
         JOIN pg_namespace n ON n.oid = c.connamespace
         WHERE n.nspname = 'public' AND contype IN ('u', 'f', 'c')
         ORDER BY conname",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (name, kind) in &constraints {
        let prefix = match kind.as_str() {
            "u" => "uq_",
            "f" => "fk_",
            _ => "ck_",
        };
        assert!(name.starts_with(prefix), "Constraint {name} should start with {prefix}");
    }

    let unique_indexes: Vec<(String,)> = sqlx::query_as(
        "SELECT indexname::TEXT FROM pg_indexes
         WHERE schemaname = 'public' AND indexdef LIKE 'CREATE UNIQUE INDEX%'
           AND indexname NOT LIKE '%_pkey'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    for (name,) in &unique_indexes {
        assert!(name.starts_with("uq_"), "Unique index {name} should start with uq_");
    }
}
