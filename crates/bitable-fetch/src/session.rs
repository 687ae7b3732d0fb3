//! Record fetch sessions.
//!
//! A session resolves the field catalog, then either reads a single record
//! or walks the table page by page. Pages are strictly sequential because
//! each cursor comes from the previous response; within a page every record
//! and every field is resolved concurrently and joined at the page boundary.
//!
//! Failures are graded:
//! - a field that keeps failing after retries becomes a null entry, even
//!   when the source reports its record gone;
//! - a listed record without an id is dropped from the batch;
//! - table, view, catalog and listing failures end the session.
//!
//! # Usage
//!
//! ```ignore
//! use bitable_fetch::{Batch, FetchRequest, FetchSession};
//!
//! let mut session = FetchSession::new(source);
//! let request = FetchRequest::new("tbl").with_view("vew").normalized(true).with_max_records(50);
//! let records = session
//!     .fetch(&request, &mut |batch: Batch<'_>| println!("page {}: {}", batch.page, batch.records.len()))
//!     .await?;
//! ```

use bitable_model::{FieldDescriptor, FieldValue, FieldValueEntry, Record};
use bitable_normalization::{NormalizationOptions, normalize_with};
use futures_util::future::join_all;
use tracing::Instrument;

use crate::catalog::resolve_fields;
use crate::error::{FetchError, Result};
use crate::retry::{Delay, RetryPolicy, TokioDelay, retry};
use crate::sink::{Batch, BatchSink, DiscardBatches};
use crate::source::{DEFAULT_PAGE_SIZE, PageRequest, RecordSource};

/// What a session fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub table_id: String,
    /// Limits fields to the view's visible ones and orders records by it.
    pub view_id: Option<String>,
    /// Fetch only this record.
    pub record_id: Option<String>,
    /// Store display values instead of raw values.
    pub normalize: bool,
    /// Hard cap on returned records; `None` or 0 means no cap.
    pub max_records: Option<usize>,
}

impl FetchRequest {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            ..Self::default()
        }
    }

    pub fn with_view(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    pub fn with_record(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    fn cap(&self) -> Option<usize> {
        self.max_records.filter(|cap| *cap > 0)
    }
}

/// Tuning shared by every fetch a session runs.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound for one listing call.
    pub page_size: usize,
    pub retry: RetryPolicy,
    pub normalization: NormalizationOptions,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
            normalization: NormalizationOptions::default(),
        }
    }
}

impl FetchOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationOptions) -> Self {
        self.normalization = normalization;
        self
    }
}

/// Why a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The source reported no further cursor.
    CursorExhausted,
    /// `max_records` was reached.
    CapReached,
    /// Single-record mode completed.
    SingleRecord,
}

/// Session state machine.
///
/// `Idle -> FetchingPage -> ResolvingFields -> FetchingPage | Done | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    FetchingPage { page: usize },
    ResolvingFields { page: usize },
    Done(DoneReason),
    Failed,
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Done(_) | FetchState::Failed)
    }
}

/// Runs fetches against one record source.
pub struct FetchSession<S, D = TokioDelay> {
    source: S,
    delay: D,
    options: FetchOptions,
    state: FetchState,
    fields: Vec<FieldDescriptor>,
}

impl<S: RecordSource> FetchSession<S> {
    /// Session with default options and a real timer between retries.
    pub fn new(source: S) -> Self {
        Self::with_delay(source, TokioDelay)
    }
}

impl<S: RecordSource, D: Delay> FetchSession<S, D> {
    pub fn with_delay(source: S, delay: D) -> Self {
        Self {
            source,
            delay,
            options: FetchOptions::default(),
            state: FetchState::Idle,
            fields: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Field catalog resolved by the last fetch, in entry order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fetches without streaming batches.
    pub async fn fetch_all(&mut self, request: &FetchRequest) -> Result<Vec<Record>> {
        self.fetch(request, &mut DiscardBatches).await
    }

    /// Fetches records, reporting the accumulated batch to `sink` after
    /// every page.
    ///
    /// On error, batches already delivered must be discarded by the caller.
    pub async fn fetch(
        &mut self,
        request: &FetchRequest,
        sink: &mut dyn BatchSink,
    ) -> Result<Vec<Record>> {
        self.state = FetchState::Idle;
        self.fields.clear();
        let table_id = request.table_id.as_str();

        let fields = match resolve_fields(&self.source, table_id, request.view_id.as_deref()).await
        {
            Ok(fields) => fields,
            Err(err) => {
                self.state = FetchState::Failed;
                tracing::error!(table_id, error = %err, "field catalog lookup failed");
                return Err(err);
            }
        };

        let records = match request.record_id.as_deref() {
            Some(record_id) => Ok(self.fetch_single(request, &fields, record_id, sink).await),
            None => self.fetch_pages(request, &fields, sink).await,
        };
        self.fields = fields;
        records
    }

    async fn fetch_single(
        &mut self,
        request: &FetchRequest,
        fields: &[FieldDescriptor],
        record_id: &str,
        sink: &mut dyn BatchSink,
    ) -> Vec<Record> {
        self.state = FetchState::ResolvingFields { page: 1 };
        let record = match self
            .resolve_record(&request.table_id, fields, record_id, request.normalize)
            .await
        {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "record unavailable, returning null entries");
                Record::new(record_id, fields.iter().map(FieldValueEntry::null).collect())
            }
        };
        let records = vec![record];
        sink.on_batch(Batch {
            records: &records,
            page: 1,
            is_complete: true,
        });
        self.state = FetchState::Done(DoneReason::SingleRecord);
        records
    }

    async fn fetch_pages(
        &mut self,
        request: &FetchRequest,
        fields: &[FieldDescriptor],
        sink: &mut dyn BatchSink,
    ) -> Result<Vec<Record>> {
        let table_id = request.table_id.as_str();
        let cap = request.cap();
        let mut records: Vec<Record> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let page_size = match cap {
                Some(cap) => self.options.page_size.min(cap - records.len()),
                None => self.options.page_size,
            };
            self.state = FetchState::FetchingPage { page };

            let span = tracing::info_span!("fetch_page", table_id, page);
            let listing = PageRequest {
                page_size,
                page_token: page_token.take(),
                view_id: request.view_id.clone(),
            };
            let response = match self
                .source
                .records(table_id, &listing)
                .instrument(span.clone())
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    self.state = FetchState::Failed;
                    tracing::error!(table_id, page, error = %err, "record listing failed");
                    return Err(FetchError::SourceUnavailable(err));
                }
            };

            self.state = FetchState::ResolvingFields { page };
            let this = &*self;
            let resolved = join_all(response.record_ids.iter().map(move |record_id| {
                this.resolve_record(table_id, fields, record_id, request.normalize)
            }))
            .instrument(span)
            .await;

            let listed = resolved.len();
            let mut dropped = 0usize;
            for outcome in resolved {
                match outcome {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        dropped += 1;
                        tracing::warn!(table_id, page, error = %err, "dropping record");
                    }
                }
            }
            if let Some(cap) = cap {
                records.truncate(cap);
            }

            let cap_reached = cap.is_some_and(|cap| records.len() >= cap);
            let is_complete = response.page_token.is_none() || cap_reached;
            tracing::info!(
                table_id,
                page,
                listed,
                dropped,
                total = records.len(),
                is_complete,
                "page resolved"
            );
            sink.on_batch(Batch {
                records: &records,
                page,
                is_complete,
            });

            if is_complete {
                self.state = FetchState::Done(if cap_reached {
                    DoneReason::CapReached
                } else {
                    DoneReason::CursorExhausted
                });
                return Ok(records);
            }
            page_token = response.page_token;
        }
    }

    /// Resolves every field of one record concurrently.
    ///
    /// Fails only when the listing gave no usable record id; field failures
    /// become null entries.
    async fn resolve_record(
        &self,
        table_id: &str,
        fields: &[FieldDescriptor],
        record_id: &str,
        normalize: bool,
    ) -> Result<Record> {
        if record_id.is_empty() {
            return Err(FetchError::RecordProcessingFailure {
                record_id: String::new(),
                reason: "source listed a record without id".to_string(),
            });
        }
        let entries = join_all(
            fields
                .iter()
                .map(|field| self.resolve_field(table_id, field, record_id, normalize)),
        )
        .await;
        Ok(Record::new(record_id, entries))
    }

    async fn resolve_field(
        &self,
        table_id: &str,
        field: &FieldDescriptor,
        record_id: &str,
        normalize: bool,
    ) -> FieldValueEntry {
        let source = &self.source;
        let field_id = field.id.as_str();
        let raw = retry(&self.options.retry, &self.delay, move || {
            source.cell_value(table_id, field_id, record_id)
        })
        .await;

        let raw = match raw {
            Ok(raw) => raw,
            Err(err) => {
                let failure = FetchError::FieldResolutionFailure {
                    record_id: record_id.to_string(),
                    field_id: field.id.clone(),
                    attempts: err.attempts,
                    reason: err.source.to_string(),
                };
                tracing::warn!(error = %failure, "field value unavailable, recording null");
                return FieldValueEntry::null(field);
            }
        };

        if !normalize {
            return FieldValueEntry::new(field, FieldValue::Raw(raw));
        }
        match normalize_with(&raw, field.kind, &self.options.normalization) {
            Ok(display) => FieldValueEntry::new(field, FieldValue::Display(display)),
            Err(err) => {
                let failure = FetchError::FieldResolutionFailure {
                    record_id: record_id.to_string(),
                    field_id: field.id.clone(),
                    attempts: 1,
                    reason: err.to_string(),
                };
                tracing::warn!(error = %failure, "field value malformed, recording null");
                FieldValueEntry::null(field)
            }
        }
    }
}
