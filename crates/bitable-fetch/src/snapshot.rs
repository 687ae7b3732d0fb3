//! A record source backed by a JSON snapshot of one or more tables.
//!
//! ```json
//! {
//!   "tables": [{
//!     "id": "tblOrders",
//!     "name": "Orders",
//!     "fields": [{"id": "fldTitle", "name": "Title", "type": 1}],
//!     "views": [{"id": "vewAll", "visible_fields": ["fldTitle"], "record_order": ["rec2", "rec1"]}],
//!     "records": [{"id": "rec1", "cells": {"fldTitle": [{"type": "text", "text": "A"}]}}]
//!   }]
//! }
//! ```
//!
//! A view without `record_order` lists records in table order. Cells missing
//! from a record read as null. Page tokens are decimal offsets into the
//! listing order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bitable_model::{FieldDescriptor, RawValue};
use serde::Deserialize;
use thiserror::Error;

use crate::error::{SourceError, SourceResult};
use crate::source::{PageRequest, RecordPage, RecordSource};

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("view {view_id} of table {table_id} lists unknown field {field_id}")]
    UnknownViewField {
        table_id: String,
        view_id: String,
        field_id: String,
    },

    #[error("duplicate table id: {0}")]
    DuplicateTable(String),
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    tables: Vec<TableFile>,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    views: Vec<ViewFile>,
    #[serde(default)]
    records: Vec<RecordFile>,
}

#[derive(Debug, Deserialize)]
struct ViewFile {
    id: String,
    visible_fields: Vec<String>,
    #[serde(default)]
    record_order: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RecordFile {
    id: String,
    #[serde(default)]
    cells: HashMap<String, RawValue>,
}

/// A table held by a [`SnapshotSource`].
#[derive(Debug, Clone)]
pub struct SnapshotTable {
    pub id: String,
    pub name: String,
    fields: Vec<FieldDescriptor>,
    views: HashMap<String, SnapshotView>,
    record_order: Vec<String>,
    cells: HashMap<String, HashMap<String, RawValue>>,
}

#[derive(Debug, Clone)]
struct SnapshotView {
    visible_fields: Vec<String>,
    record_order: Option<Vec<String>>,
}

impl SnapshotTable {
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn record_count(&self) -> usize {
        self.record_order.len()
    }

    /// View ids, sorted.
    pub fn view_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.views.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn listing(&self, view_id: Option<&str>) -> SourceResult<&[String]> {
        match view_id {
            None => Ok(&self.record_order),
            Some(view_id) => {
                let view = self
                    .views
                    .get(view_id)
                    .ok_or_else(|| SourceError::ViewNotFound(view_id.to_string()))?;
                Ok(view
                    .record_order
                    .as_deref()
                    .unwrap_or(self.record_order.as_slice()))
            }
        }
    }
}

/// In-memory [`RecordSource`] loaded from a JSON snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    tables: Vec<SnapshotTable>,
}

impl SnapshotSource {
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            tables = source.tables.len(),
            "loaded snapshot"
        );
        Ok(source)
    }

    fn from_file(file: SnapshotFile) -> Result<Self, SnapshotError> {
        let mut tables: Vec<SnapshotTable> = Vec::with_capacity(file.tables.len());
        for table in file.tables {
            if tables.iter().any(|existing| existing.id == table.id) {
                return Err(SnapshotError::DuplicateTable(table.id));
            }
            let mut views = HashMap::with_capacity(table.views.len());
            for view in table.views {
                if let Some(unknown) = view
                    .visible_fields
                    .iter()
                    .find(|id| !table.fields.iter().any(|field| &field.id == *id))
                {
                    return Err(SnapshotError::UnknownViewField {
                        table_id: table.id.clone(),
                        view_id: view.id.clone(),
                        field_id: unknown.clone(),
                    });
                }
                views.insert(
                    view.id,
                    SnapshotView {
                        visible_fields: view.visible_fields,
                        record_order: view.record_order,
                    },
                );
            }
            let record_order = table.records.iter().map(|record| record.id.clone()).collect();
            let cells = table
                .records
                .into_iter()
                .map(|record| (record.id, record.cells))
                .collect();
            tables.push(SnapshotTable {
                name: table.name.unwrap_or_else(|| table.id.clone()),
                id: table.id,
                fields: table.fields,
                views,
                record_order,
                cells,
            });
        }
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[SnapshotTable] {
        &self.tables
    }

    pub fn table(&self, table_id: &str) -> SourceResult<&SnapshotTable> {
        self.tables
            .iter()
            .find(|table| table.id == table_id)
            .ok_or_else(|| SourceError::TableNotFound(table_id.to_string()))
    }
}

fn parse_offset(token: Option<&str>) -> SourceResult<usize> {
    match token {
        None => Ok(0),
        Some(token) => token
            .parse()
            .map_err(|_| SourceError::InvalidPageToken(token.to_string())),
    }
}

#[async_trait]
impl RecordSource for SnapshotSource {
    async fn visible_field_ids(&self, table_id: &str, view_id: &str) -> SourceResult<Vec<String>> {
        let table = self.table(table_id)?;
        table
            .views
            .get(view_id)
            .map(|view| view.visible_fields.clone())
            .ok_or_else(|| SourceError::ViewNotFound(view_id.to_string()))
    }

    async fn field(&self, table_id: &str, field_id: &str) -> SourceResult<FieldDescriptor> {
        self.table(table_id)?
            .fields
            .iter()
            .find(|field| field.id == field_id)
            .cloned()
            .ok_or_else(|| SourceError::FieldNotFound(field_id.to_string()))
    }

    async fn fields(&self, table_id: &str) -> SourceResult<Vec<FieldDescriptor>> {
        Ok(self.table(table_id)?.fields.clone())
    }

    async fn records(&self, table_id: &str, request: &PageRequest) -> SourceResult<RecordPage> {
        let listing = self.table(table_id)?.listing(request.view_id.as_deref())?;
        let offset = parse_offset(request.page_token.as_deref())?;
        if offset > listing.len() {
            return Err(SourceError::InvalidPageToken(offset.to_string()));
        }
        let end = offset.saturating_add(request.page_size.max(1)).min(listing.len());
        Ok(RecordPage {
            record_ids: listing[offset..end].to_vec(),
            page_token: (end < listing.len()).then(|| end.to_string()),
        })
    }

    async fn cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
    ) -> SourceResult<RawValue> {
        let table = self.table(table_id)?;
        if !table.fields.iter().any(|field| field.id == field_id) {
            return Err(SourceError::FieldNotFound(field_id.to_string()));
        }
        let cells = table
            .cells
            .get(record_id)
            .ok_or_else(|| SourceError::RecordNotFound(record_id.to_string()))?;
        Ok(cells.get(field_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "tables": [{
            "id": "tbl",
            "fields": [
                {"id": "fldA", "name": "A", "type": 1},
                {"id": "fldB", "name": "B", "type": 2}
            ],
            "views": [{"id": "vew", "visible_fields": ["fldB"], "record_order": ["rec3", "rec1"]}],
            "records": [
                {"id": "rec1", "cells": {"fldB": 10}},
                {"id": "rec2", "cells": {"fldB": 20}},
                {"id": "rec3"}
            ]
        }]
    }"#;

    fn page(size: usize, token: Option<&str>, view: Option<&str>) -> PageRequest {
        PageRequest {
            page_size: size,
            page_token: token.map(str::to_string),
            view_id: view.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn pages_by_offset() {
        let source = SnapshotSource::from_json_str(SNAPSHOT).unwrap();
        let first = source.records("tbl", &page(2, None, None)).await.unwrap();
        assert_eq!(first.record_ids, ["rec1", "rec2"]);
        assert_eq!(first.page_token.as_deref(), Some("2"));
        let second = source
            .records("tbl", &page(2, first.page_token.as_deref(), None))
            .await
            .unwrap();
        assert_eq!(second.record_ids, ["rec3"]);
        assert_eq!(second.page_token, None);
    }

    #[tokio::test]
    async fn view_orders_records() {
        let source = SnapshotSource::from_json_str(SNAPSHOT).unwrap();
        let listed = source.records("tbl", &page(10, None, Some("vew"))).await.unwrap();
        assert_eq!(listed.record_ids, ["rec3", "rec1"]);
    }

    #[tokio::test]
    async fn missing_cells_read_as_null() {
        let source = SnapshotSource::from_json_str(SNAPSHOT).unwrap();
        assert!(source.cell_value("tbl", "fldB", "rec3").await.unwrap().is_null());
        assert_eq!(
            source.cell_value("tbl", "fldB", "recX").await.unwrap_err(),
            SourceError::RecordNotFound("recX".into())
        );
    }

    #[tokio::test]
    async fn rejects_foreign_tokens() {
        let source = SnapshotSource::from_json_str(SNAPSHOT).unwrap();
        let err = source
            .records("tbl", &page(2, Some("next"), None))
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::InvalidPageToken("next".into()));
    }

    #[test]
    fn rejects_unknown_view_fields() {
        let json = r#"{"tables": [{"id": "t", "views": [{"id": "v", "visible_fields": ["f"]}]}]}"#;
        let err = SnapshotSource::from_json_str(json).unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownViewField { ref field_id, .. } if field_id == "f"));
    }
}
