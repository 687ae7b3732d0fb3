use bitable_cli::config::Config;
use bitable_cli::pipeline::{PrintMode, assemble, documents_json, fetch_records, fetch_request};
use bitable_fetch::{DoneReason, FetchSession, FetchState, NoDelay, SnapshotSource};
use bitable_print::{DataSourceKind, TemplateData};
use serde_json::json;

const ORDERS: &str = include_str!("fixtures/orders.json");

fn config() -> Config {
    Config::from_toml_str("[format]\nutc_offset_minutes = 480\n").unwrap()
}

async fn fetch(config: &Config, view: &str, max_records: Option<usize>) -> TemplateData {
    let source = SnapshotSource::from_json_str(ORDERS).unwrap();
    let mut config = config.clone();
    config.fetch.max_records = max_records;
    let request = fetch_request(&config, "tblOrders", Some(view), None);
    let mut session = FetchSession::with_delay(source, NoDelay)
        .with_options(config.fetch_options().unwrap());
    let outcome = fetch_records(&mut session, &request, |_| {}).await.unwrap();
    assert!(matches!(outcome.state, FetchState::Done(_)));
    TemplateData::new()
        .with_records(outcome.records)
        .with_fields(outcome.fields)
}

#[tokio::test]
async fn normalizes_every_rule_family() {
    let template = fetch(&config(), "vewAll", None).await;
    let outcome = assemble(PrintMode::Single, &template, &config());

    assert_eq!(outcome.source, Some(DataSourceKind::RecordData));
    assert!(outcome.report.is_valid);
    let document = documents_json(PrintMode::Single, &outcome.documents);
    assert_eq!(document["fldTitle"], json!("Desk lamp"));
    assert_eq!(document["fldAmount"], json!(129.5));
    assert_eq!(document["fldStatus"], json!("Open"));
    assert_eq!(document["fldTags"], json!("office,light"));
    assert_eq!(document["fldDue"], json!("2024/1/15 10:30:05"));
    assert_eq!(document["fldOwner"], json!("Li Lei,Han Meimei"));
    assert_eq!(document["fldNo"], json!("NO.0001"));
    assert_eq!(document["fldScan"], json!("boxLamp"));
    assert_eq!(document["table"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn degraded_values_stay_in_place() {
    let template = fetch(&config(), "vewAll", None).await;
    let chair = &template.records[1];
    assert_eq!(chair.record_id, "rec2");
    assert_eq!(chair.entry("fldDue").unwrap().value.to_json(), json!("空"));
    assert_eq!(
        chair.entry("fldNo").unwrap().value.to_json(),
        json!({"status": "pending"})
    );
    // an owner without a name cannot be rendered and becomes null
    let arm = &template.records[2];
    assert!(arm.entry("fldOwner").unwrap().value.is_null());
    assert_eq!(arm.fields.len(), 8);
}

#[tokio::test]
async fn view_order_reaches_multiple_documents() {
    let template = fetch(&config(), "vewOpen", None).await;
    let outcome = assemble(PrintMode::Multiple, &template, &config());

    assert_eq!(outcome.source, None);
    let documents = documents_json(PrintMode::Multiple, &outcome.documents);
    let titles: Vec<&str> = documents
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["fldTitle"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Monitor arm", "Desk lamp"]);
    assert!(documents[0].get("fldAmount").is_none());
    let catalog: Vec<&str> = template.fields.iter().map(|field| field.id.as_str()).collect();
    assert_eq!(catalog, ["fldNo", "fldTitle", "fldStatus", "fldDue"]);
}

#[tokio::test]
async fn record_cap_limits_documents() {
    let template = fetch(&config(), "vewAll", Some(2)).await;
    assert_eq!(template.records.len(), 2);

    let mut config = config();
    config.print.max_documents = 1;
    let outcome = assemble(PrintMode::Multiple, &template, &config);
    assert_eq!(outcome.documents.len(), 1);
}

#[tokio::test]
async fn raw_fetch_keeps_host_shapes() {
    let mut config = config();
    config.fetch.normalize = false;
    let template = fetch(&config, "vewOpen", Some(1)).await;
    let first = &template.records[0];
    assert_eq!(
        first.entry("fldStatus").unwrap().value.to_json(),
        json!({"id": "optOpen", "text": "Open"})
    );
}

#[tokio::test]
async fn single_record_fetch() {
    let source = SnapshotSource::from_json_str(ORDERS).unwrap();
    let request = fetch_request(&config(), "tblOrders", Some("vewOpen"), Some("rec1"));
    let mut session = FetchSession::with_delay(source, NoDelay);
    let mut batches = 0;
    let outcome = fetch_records(&mut session, &request, |_| batches += 1)
        .await
        .unwrap();
    assert_eq!(batches, 1);
    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.records[0].record_id, "rec1");
    assert_eq!(outcome.state, FetchState::Done(DoneReason::SingleRecord));
}

#[test]
fn samples_for_an_empty_table() {
    let source = SnapshotSource::from_json_str(ORDERS).unwrap();
    let fields = source.table("tblOrders").unwrap().fields().to_vec();
    let template = TemplateData::new().with_fields(fields);

    let mut config = config();
    config.print.generate_samples = true;
    let outcome = assemble(PrintMode::Single, &template, &config);
    assert_eq!(outcome.source, Some(DataSourceKind::FieldSample));
    let table = outcome.documents[0].table.as_ref().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[1]["fldTitle"], json!("Title示例-2"));
}
