// AppConfig tests: parsing, defaults, validation

use machine_stats::config::AppConfig;

const GOOD_CONFIG: &str = r#"
[server]
port = 3000
host = "0.0.0.0"

[database]
path = "./machines.db"
max_pool_size = 8
query_timeout_ms = 2500

[access]
allowed_peers = ["127.0.0.1", "10.0.0.5"]

[static_files]
root = "./static"
"#;

#[test]
fn loads_valid_config() {
    let config = AppConfig::load_from_str(GOOD_CONFIG).unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.database.max_pool_size, 8);
    assert_eq!(config.database.query_timeout_ms, 2500);
    assert_eq!(config.access.allowed_peers.len(), 2);
    assert_eq!(config.static_files.root, "./static");
}

#[test]
fn query_timeout_defaults_when_absent() {
    let config = AppConfig::load_from_str(
        &GOOD_CONFIG.replace("query_timeout_ms = 2500\n", ""),
    )
    .unwrap();
    assert_eq!(config.database.query_timeout_ms, 5000);
}

#[test]
fn allowed_ips_parses_entries() {
    let config = AppConfig::load_from_str(GOOD_CONFIG).unwrap();
    let ips = config.access.allowed_ips().unwrap();
    assert!(ips.contains(&"127.0.0.1".parse().unwrap()));
    assert!(ips.contains(&"10.0.0.5".parse().unwrap()));
    assert_eq!(ips.len(), 2);
}

#[test]
fn rejects_invalid_peer_entry() {
    let bad = GOOD_CONFIG.replace("\"10.0.0.5\"", "\"not-an-ip\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("not-an-ip"));
}

#[test]
fn rejects_zero_port() {
    let bad = GOOD_CONFIG.replace("port = 3000", "port = 0");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn rejects_empty_database_path() {
    let bad = GOOD_CONFIG.replace("path = \"./machines.db\"", "path = \"\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn rejects_zero_pool_size() {
    let bad = GOOD_CONFIG.replace("max_pool_size = 8", "max_pool_size = 0");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn rejects_zero_query_timeout() {
    let bad = GOOD_CONFIG.replace("query_timeout_ms = 2500", "query_timeout_ms = 0");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn rejects_empty_static_root() {
    let bad = GOOD_CONFIG.replace("root = \"./static\"", "root = \"\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}
