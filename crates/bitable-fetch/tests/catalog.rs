mod common;

use bitable_fetch::{FetchError, SourceError, all_fields, visible_fields};
use common::{FlakySource, TABLE, VIEW, snapshot};

#[tokio::test]
async fn view_catalog_follows_view_order() {
    let source = snapshot(1);
    let fields = visible_fields(&source, TABLE, VIEW).await.unwrap();
    let ids: Vec<&str> = fields.iter().map(|field| field.id.as_str()).collect();
    assert_eq!(ids, ["fldDate", "fldTitle"]);
}

#[tokio::test]
async fn table_catalog_includes_hidden_fields() {
    let source = snapshot(1);
    let fields = all_fields(&source, TABLE).await.unwrap();
    let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, ["Title", "Date", "Note"]);
}

#[tokio::test]
async fn missing_view_is_source_unavailable() {
    let source = FlakySource::new(snapshot(1));
    let err = visible_fields(&source, TABLE, "vewGone").await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::SourceUnavailable(SourceError::ViewNotFound(ref id)) if id == "vewGone"
    ));
}

#[tokio::test]
async fn missing_table_is_source_unavailable() {
    let source = snapshot(1);
    let err = all_fields(&source, "tblGone").await.unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.to_string(), "source unavailable: table not found: tblGone");
}
