//! Field catalog resolution.

use bitable_model::FieldDescriptor;
use futures_util::future::try_join_all;

use crate::error::Result;
use crate::source::RecordSource;

/// Resolves the fields a fetch works on.
///
/// With a view, returns exactly the view's visible fields in view order.
/// Without one, returns every field of the table in table order.
/// Lookup failures are not retried and surface as
/// [`crate::FetchError::SourceUnavailable`].
pub async fn resolve_fields<S>(
    source: &S,
    table_id: &str,
    view_id: Option<&str>,
) -> Result<Vec<FieldDescriptor>>
where
    S: RecordSource + ?Sized,
{
    let fields = match view_id {
        Some(view_id) => {
            let field_ids = source.visible_field_ids(table_id, view_id).await?;
            try_join_all(
                field_ids
                    .iter()
                    .map(|field_id| source.field(table_id, field_id)),
            )
            .await?
        }
        None => source.fields(table_id).await?,
    };
    tracing::debug!(
        table_id,
        view_id = view_id.unwrap_or("-"),
        field_count = fields.len(),
        "resolved field catalog"
    );
    Ok(fields)
}

/// Resolves the visible fields of a view.
pub async fn visible_fields<S>(
    source: &S,
    table_id: &str,
    view_id: &str,
) -> Result<Vec<FieldDescriptor>>
where
    S: RecordSource + ?Sized,
{
    resolve_fields(source, table_id, Some(view_id)).await
}

/// Resolves every field of a table, hidden ones included.
pub async fn all_fields<S>(source: &S, table_id: &str) -> Result<Vec<FieldDescriptor>>
where
    S: RecordSource + ?Sized,
{
    resolve_fields(source, table_id, None).await
}
