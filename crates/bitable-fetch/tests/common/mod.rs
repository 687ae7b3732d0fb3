//! Test sources built on top of `SnapshotSource`.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bitable_fetch::{PageRequest, RecordPage, RecordSource, SnapshotSource, SourceError, SourceResult};
use bitable_model::{FieldDescriptor, RawValue};
use serde_json::{Value, json};

pub const TABLE: &str = "tbl";
pub const VIEW: &str = "vew";

/// Snapshot with `records` records `rec1..=recN` and three fields.
///
/// The view shows `fldDate` before `fldTitle` and hides `fldNote`.
pub fn snapshot(records: usize) -> SnapshotSource {
    let records: Vec<Value> = (1..=records)
        .map(|n| {
            json!({
                "id": format!("rec{n}"),
                "cells": {
                    "fldTitle": [{"type": "text", "text": format!("Item {n}")}],
                    "fldDate": 1_705_285_805_000_i64,
                    "fldNote": format!("note {n}")
                }
            })
        })
        .collect();
    let doc = json!({
        "tables": [{
            "id": TABLE,
            "name": "Orders",
            "fields": [
                {"id": "fldTitle", "name": "Title", "type": 1},
                {"id": "fldDate", "name": "Date", "type": 5},
                {"id": "fldNote", "name": "Note", "type": 1}
            ],
            "views": [{"id": VIEW, "visible_fields": ["fldDate", "fldTitle"]}],
            "records": records
        }]
    });
    SnapshotSource::from_json_str(&doc.to_string()).unwrap()
}

/// Wraps a snapshot and injects failures.
#[derive(Default)]
pub struct FlakySource {
    inner: SnapshotSource,
    /// Remaining transient failures per `(field, record)` cell.
    flaky_cells: Mutex<HashMap<(String, String), u32>>,
    gone_records: HashSet<String>,
    /// `(field, record)` cells that report their record as deleted.
    gone_cells: HashSet<(String, String)>,
    cell_delay: Option<Duration>,
    fail_listing_from_page: Option<usize>,
    listing_calls: AtomicU32,
    page_sizes: Mutex<Vec<usize>>,
    cell_calls: AtomicU32,
}

impl FlakySource {
    pub fn new(inner: SnapshotSource) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// The cell fails `times` times with a transient error before answering.
    pub fn flaky_cell(self, field_id: &str, record_id: &str, times: u32) -> Self {
        self.flaky_cells
            .lock()
            .unwrap()
            .insert((field_id.to_string(), record_id.to_string()), times);
        self
    }

    /// Every cell of the record reports the record as deleted.
    pub fn gone_record(mut self, record_id: &str) -> Self {
        self.gone_records.insert(record_id.to_string());
        self
    }

    /// Only this cell reports its record as deleted.
    pub fn gone_cell(mut self, field_id: &str, record_id: &str) -> Self {
        self.gone_cells
            .insert((field_id.to_string(), record_id.to_string()));
        self
    }

    /// Every cell read sleeps this long on the tokio timer.
    pub fn cell_delay(mut self, delay: Duration) -> Self {
        self.cell_delay = Some(delay);
        self
    }

    /// Listing calls fail from this 1-based page on.
    pub fn fail_listing_from(mut self, page: usize) -> Self {
        self.fail_listing_from_page = Some(page);
        self
    }

    pub fn page_sizes(&self) -> Vec<usize> {
        self.page_sizes.lock().unwrap().clone()
    }

    pub fn cell_calls(&self) -> u32 {
        self.cell_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for FlakySource {
    async fn visible_field_ids(&self, table_id: &str, view_id: &str) -> SourceResult<Vec<String>> {
        self.inner.visible_field_ids(table_id, view_id).await
    }

    async fn field(&self, table_id: &str, field_id: &str) -> SourceResult<FieldDescriptor> {
        self.inner.field(table_id, field_id).await
    }

    async fn fields(&self, table_id: &str) -> SourceResult<Vec<FieldDescriptor>> {
        self.inner.fields(table_id).await
    }

    async fn records(&self, table_id: &str, request: &PageRequest) -> SourceResult<RecordPage> {
        let page = self.listing_calls.fetch_add(1, Ordering::SeqCst) as usize + 1;
        self.page_sizes.lock().unwrap().push(request.page_size);
        if self.fail_listing_from_page.is_some_and(|from| page >= from) {
            return Err(SourceError::TableNotFound(table_id.to_string()));
        }
        self.inner.records(table_id, request).await
    }

    async fn cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
    ) -> SourceResult<RawValue> {
        self.cell_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.cell_delay {
            tokio::time::sleep(delay).await;
        }
        let cell = (field_id.to_string(), record_id.to_string());
        if self.gone_records.contains(record_id) || self.gone_cells.contains(&cell) {
            return Err(SourceError::RecordNotFound(record_id.to_string()));
        }
        {
            let mut flaky = self.flaky_cells.lock().unwrap();
            if let Some(remaining) = flaky.get_mut(&cell)
                && *remaining > 0
            {
                *remaining -= 1;
                return Err(SourceError::Transient("host timeout".into()));
            }
        }
        self.inner.cell_value(table_id, field_id, record_id).await
    }
}
