//! Custom-filter operations, running through the same optimistic contract
//! as the set mutations.

use chrono::Utc;
use uuid::Uuid;

use spectra_api::SpectraService;
use spectra_core::models::{AnalysisFilter, NewCustomFilter};

use crate::sync::with_optimistic_update;
use crate::Client;

impl<S: SpectraService> Client<S> {
    /// Fetch the filter catalog (system and custom) and replace the cache.
    pub async fn load_filters(&self) -> bool {
        match self.service.list_filters().await {
            Ok(filters) => {
                self.filters.write().await.replace_all(filters);
                true
            }
            Err(err) => {
                self.op_failed("load_filters", &err);
                false
            }
        }
    }

    /// Create a custom filter. A provisional filter appears immediately and
    /// is swapped for the server entity on success, removed on failure.
    pub async fn create_custom_filter(&self, req: NewCustomFilter) -> Option<AnalysisFilter> {
        let temp_id = format!("tmp-{}", Uuid::new_v4());
        let provisional = AnalysisFilter {
            id: temp_id.clone(),
            name: req.name.clone(),
            description: None,
            prompt: Some(req.prompt.clone()),
            is_custom: true,
            created_at: Utc::now(),
        };

        let result = with_optimistic_update(
            &self.filters,
            |_| Some(temp_id.clone()),
            |st| st.insert(provisional),
            || self.service.create_custom_filter(&req),
            |st, out: &AnalysisFilter| st.reconcile_created(&temp_id, out.clone()),
            |st, tid| {
                st.remove(&tid);
            },
        )
        .await;

        match result {
            Ok(out) => out,
            Err(err) => {
                self.op_failed("create_custom_filter", &err);
                None
            }
        }
    }

    /// Delete a custom filter; re-inserted at its original position on
    /// failure. Silent no-op when the id is not cached.
    pub async fn delete_custom_filter(&self, id: &str) -> bool {
        let result = with_optimistic_update(
            &self.filters,
            |st| st.remove(id),
            |_| {},
            || self.service.delete_custom_filter(id),
            |_, _| {},
            |st, (pos, filter)| st.restore_at(pos, filter),
        )
        .await;

        match result {
            Ok(done) => done.is_some(),
            Err(err) => {
                self.op_failed("delete_custom_filter", &err);
                false
            }
        }
    }
}
