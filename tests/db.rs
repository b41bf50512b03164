use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer};

use pushkind_grounds::db::DatabaseSettings;

mod common;

#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = BigInt)]
    timeout: i64,
}

#[test]
fn creates_and_migrates_db_file() {
    let test_db = common::TestDb::new("grounds_migrated.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn pooled_connections_apply_configured_pragmas() {
    let settings = DatabaseSettings {
        wal: false,
        busy_timeout_ms: 1_500,
        max_connections: 2,
    };
    let test_db = common::TestDb::with_settings("grounds_pragmas.db", &settings);
    let mut conn = test_db.pool().get().expect("connection");

    let fk = sql_query("PRAGMA foreign_keys")
        .get_result::<ForeignKeys>(&mut conn)
        .expect("foreign_keys pragma");
    assert_eq!(fk.foreign_keys, 1);

    let busy = sql_query("PRAGMA busy_timeout")
        .get_result::<BusyTimeout>(&mut conn)
        .expect("busy_timeout pragma");
    assert_eq!(busy.timeout, 1_500);

    assert_eq!(test_db.pool().max_size(), 2);
}
