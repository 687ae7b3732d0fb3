//! The record source capability consumed by fetch sessions.
//!
//! A source stands in for the host data API: table, view and field lookup,
//! cursor-paginated record listing, and per-cell value reads. Every call may
//! fail and must be assumed slow.

use std::sync::Arc;

use async_trait::async_trait;
use bitable_model::{FieldDescriptor, RawValue};

use crate::error::SourceResult;

/// Largest page the host serves in one listing call.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Arguments of a record listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: usize,
    /// Cursor returned by the previous page; `None` for the first page.
    pub page_token: Option<String>,
    /// Listing follows this view's record order when set.
    pub view_id: Option<String>,
}

/// One page of record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub record_ids: Vec<String>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub page_token: Option<String>,
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Field ids visible in a view, in view order.
    async fn visible_field_ids(&self, table_id: &str, view_id: &str) -> SourceResult<Vec<String>>;

    async fn field(&self, table_id: &str, field_id: &str) -> SourceResult<FieldDescriptor>;

    /// Every field of a table, in table order.
    async fn fields(&self, table_id: &str) -> SourceResult<Vec<FieldDescriptor>>;

    async fn records(&self, table_id: &str, request: &PageRequest) -> SourceResult<RecordPage>;

    /// Raw value of one cell.
    async fn cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
    ) -> SourceResult<RawValue>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn visible_field_ids(&self, table_id: &str, view_id: &str) -> SourceResult<Vec<String>> {
        (**self).visible_field_ids(table_id, view_id).await
    }

    async fn field(&self, table_id: &str, field_id: &str) -> SourceResult<FieldDescriptor> {
        (**self).field(table_id, field_id).await
    }

    async fn fields(&self, table_id: &str) -> SourceResult<Vec<FieldDescriptor>> {
        (**self).fields(table_id).await
    }

    async fn records(&self, table_id: &str, request: &PageRequest) -> SourceResult<RecordPage> {
        (**self).records(table_id, request).await
    }

    async fn cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
    ) -> SourceResult<RawValue> {
        (**self).cell_value(table_id, field_id, record_id).await
    }
}
