//! Record fetching for bitable print data.
//!
//! The host data API is modeled as the [`RecordSource`] capability. A
//! [`FetchSession`] resolves the field catalog, walks the record cursor page
//! by page, resolves every cell with bounded retry, and streams the growing
//! batch to a [`BatchSink`].
//!
//! [`SnapshotSource`] serves the same calls from a JSON snapshot, which is
//! what the command line tool and the tests run against.

pub mod catalog;
pub mod error;
pub mod retry;
pub mod session;
pub mod sink;
pub mod snapshot;
pub mod source;

pub use catalog::{all_fields, resolve_fields, visible_fields};
pub use error::{FetchError, Result, SourceError, SourceResult};
pub use retry::{Delay, NoDelay, RetryError, RetryPolicy, TokioDelay, retry};
pub use session::{DoneReason, FetchOptions, FetchRequest, FetchSession, FetchState};
pub use sink::{Batch, BatchSink, DiscardBatches};
pub use snapshot::{SnapshotError, SnapshotSource, SnapshotTable};
pub use source::{DEFAULT_PAGE_SIZE, PageRequest, RecordPage, RecordSource};
