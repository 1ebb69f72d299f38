use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::model::department::legacy_code;
use crate::store::{Collection, Filter, Patch, RecordStore, StoreError};

/// Collections carrying a `dept` field.
pub const DEPARTMENT_COLLECTIONS: [Collection; 4] = [
    Collection::Students,
    Collection::Advisors,
    Collection::Hods,
    Collection::LeaveApplications,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReconcileReport {
    /// Records rewritten across all collections
    #[schema(example = 3)]
    pub total: u64,
    /// Records rewritten per collection
    pub per_collection: BTreeMap<String, u64>,
}

/// Rewrites legacy free-text department names to their codes, in place.
///
/// Only values that are keys of the legacy table are touched, so running this
/// on canonical data changes nothing. A collection that cannot be read is
/// skipped; a failed write aborts.
pub async fn reconcile(store: &dyn RecordStore) -> Result<ReconcileReport, StoreError> {
    let mut report = ReconcileReport::default();

    for collection in DEPARTMENT_COLLECTIONS {
        let documents = match store.find(collection, &Filter::all()).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(%collection, error = %e, "Skipping collection during department fix");
                continue;
            }
        };

        let mut touched = 0;
        for document in documents {
            let Some(code) = document.field_str("dept").and_then(legacy_code) else {
                continue;
            };
            touched += store
                .update(collection, &Filter::by_id(&document.id), &Patch::new().set("dept", code))
                .await?;
        }

        if touched > 0 {
            info!(%collection, touched, "Department codes rewritten");
        }
        report.total += touched;
        report
            .per_collection
            .insert(collection.name().to_string(), touched);
    }

    Ok(report)
}
