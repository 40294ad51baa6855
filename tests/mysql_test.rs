//! Tests against a live MySQL server.
//!
//! The target database is dropped and recreated table by table, so point these
//! at a scratch schema only. Run with:
//! ```sh
//! TELECOM_DB_TEST_MYSQL=credentials/.env.test cargo test --test mysql_test -- --ignored
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Mutex;

use telecom_infra_db::config::{DatabaseConfig, Engine};
use telecom_infra_db::db::{self, Database, MySqlDatabase, SqlValue};
use telecom_infra_db::maintenance::{delete_by_country, query_by_country, DEFAULT_TABLE};
use telecom_infra_db::writer::{create_data_model, load_datasets, Dataset, DatasetOutcome};

/// Env file with the `DB_*` settings of the scratch database
fn env_file() -> PathBuf {
    std::env::var("TELECOM_DB_TEST_MYSQL")
        .map(PathBuf::from)
        .expect("TELECOM_DB_TEST_MYSQL must point to an env file for a scratch MySQL database")
}

static CONFIG: Lazy<DatabaseConfig> = Lazy::new(|| {
    let config = DatabaseConfig::load(&env_file()).expect("failed to load MySQL test config");
    assert_eq!(config.engine, Engine::MySql, "test config must select the mysql engine");
    config
});

/// Tests share one schema, so they run one at a time
static LOCK: Mutex<()> = Mutex::new(());

fn provisioned() -> MySqlDatabase {
    let mut conn = MySqlDatabase::connect(&CONFIG).expect("failed to connect");
    create_data_model(&mut conn).expect("failed to create data model");
    conn
}

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[ignore]
fn test_connect_through_dispatch() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut conn = db::connect(&CONFIG).unwrap();
    conn.table_names().unwrap();
}

#[test]
#[ignore]
fn test_provision_load_delete_query() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut conn = provisioned();
    let dir = tempfile::tempdir().unwrap();

    let poi = write_csv(
        &dir,
        "poi.csv",
        "poi_id,dataset_id,lat,lon,poi_type,country_code,is_public\n\
         p1,d1,40.41,-3.70,school,ESP,True\n\
         p2,d1,41.38,2.17,school,ESP,\n\
         p3,d2,48.85,2.35,clinic,FRA,False\n",
    );
    let nodes = write_csv(
        &dir,
        "nodes.csv",
        "node_id,lon,lat,geometry\n7,-3.7,40.4,POINT(-3.7 40.4)\n",
    );

    let report = load_datasets(
        &mut conn,
        &[
            Dataset::new("point_of_interest", poi),
            Dataset::new("fiber_path_result_node", nodes),
        ],
    )
    .unwrap();
    assert!(report.is_success(), "{:?}", report.failures());

    assert_eq!(delete_by_country(&mut conn, DEFAULT_TABLE, "ESP").unwrap(), 2);
    assert!(query_by_country(&mut conn, DEFAULT_TABLE, "ESP").unwrap().is_empty());

    let fra = query_by_country(&mut conn, DEFAULT_TABLE, "FRA").unwrap();
    assert_eq!(fra.value(0, "poi_id"), Some(&SqlValue::from("p3")));

    let geometry = conn
        .query("SELECT ST_AsText(geometry) AS wkt FROM fiber_path_result_node", &[])
        .unwrap();
    assert_eq!(geometry.value(0, "wkt"), Some(&SqlValue::from("POINT(-3.7 40.4)")));
}

#[test]
#[ignore]
fn test_enum_violation_is_rolled_back() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut conn = provisioned();
    let dir = tempfile::tempdir().unwrap();

    // Relies on the server running in strict mode, which is the MySQL default
    let cells = write_csv(
        &dir,
        "cells.csv",
        "ict_id,dataset_id,country_code,lat,lon,radio_type\n\
         c1,d1,ESP,40.0,-3.0,4G\n\
         c2,d1,ESP,40.1,-3.1,6G\n",
    );

    let report = load_datasets(&mut conn, &[Dataset::new("cell_site", cells)]).unwrap();
    assert!(matches!(
        report.datasets[0].outcome,
        DatasetOutcome::Failed { .. }
    ));
    assert!(query_by_country(&mut conn, "cell_site", "ESP").unwrap().is_empty());
}
