use std::fs;
use std::path::PathBuf;

use bitable_cli::config::Config;

fn unique_temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "bitable-print-{}-{}-{}.toml",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

#[test]
fn missing_file_means_defaults() {
    let path = unique_temp_path("missing");
    assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    assert_eq!(Config::load(None).unwrap(), Config::default());
}

#[test]
fn file_values_are_applied() {
    let path = unique_temp_path("values");
    fs::write(
        &path,
        "[fetch]\nmax_records = 25\nretry_delay_ms = 10\n\n[print]\ntable_rows = 10\nmax_documents = 5\n",
    )
    .unwrap();
    let config = Config::load(Some(&path)).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.fetch.max_records, Some(25));
    assert_eq!(config.fetch.page_size, 200);
    let fetch = config.fetch_options().unwrap();
    assert_eq!(fetch.retry.delay.as_millis(), 10);
    assert_eq!(
        config.single_print_options().table_mode,
        bitable_print::TableMode::FirstRecords(10)
    );
    assert_eq!(config.multiple_print_options().max_records, 5);
}

#[test]
fn malformed_file_is_an_error() {
    let path = unique_temp_path("malformed");
    fs::write(&path, "[fetch\npage_size = ").unwrap();
    let err = Config::load(Some(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(format!("{err:#}").contains("parse configuration"));
}
