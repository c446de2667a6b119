use mandalart_core::db::open_db_in_memory;
use mandalart_core::{
    CellPos, Grid, KvRepository, PersistenceGateway, RepoError, Settings, SqliteKvRepository,
};
use rusqlite::Connection;

#[test]
fn put_overwrites_and_get_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get("mandalartData").unwrap(), None);
    repo.put("mandalartData", "first").unwrap();
    repo.put("mandalartData", "second").unwrap();
    assert_eq!(repo.get("mandalartData").unwrap().as_deref(), Some("second"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_records;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn remove_deletes_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    repo.put("k", "v").unwrap();
    repo.remove("k").unwrap();
    repo.remove("k").unwrap();
    assert_eq!(repo.get("k").unwrap(), None);
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::SchemaMissing("kv_records")));
}

#[test]
fn saved_snapshot_loads_into_identical_matrix() {
    let conn = open_db_in_memory().unwrap();
    let gateway = PersistenceGateway::new(SqliteKvRepository::try_new(&conn).unwrap());
    let grid = Grid::from_fn(|pos| {
        if pos.cell() % 2 == 0 {
            format!("b{} c{} ✓", pos.block(), pos.cell())
        } else {
            String::new()
        }
    });

    gateway.save_grid(&grid).unwrap();
    let loaded = gateway.load_grid().unwrap().unwrap();
    assert_eq!(loaded, grid);
    assert_eq!(loaded.get(CellPos::new(8, 8)), "b8 c8 ✓");
}

#[test]
fn settings_record_round_trips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let gateway = PersistenceGateway::new(SqliteKvRepository::try_new(&conn).unwrap());
    let settings = Settings {
        font_size: 20,
        background_color: "#1e293b".to_string(),
        text_color: Some("#f8fafc".to_string()),
    };

    gateway.save_settings(&settings).unwrap();
    assert_eq!(gateway.load_settings().unwrap(), Some(settings));
}
