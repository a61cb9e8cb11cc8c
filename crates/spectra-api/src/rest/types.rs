//! Request/response envelopes that are not domain models.

use serde::{Deserialize, Serialize};

use crate::traits::AddChannelsOutcome;

/// Body of add/remove-channel requests.
#[derive(Debug, Serialize)]
pub struct UsernamesBody<'a> {
    pub usernames: &'a [String],
}

/// Per-item result of an add-channels request.
#[derive(Debug, Deserialize)]
pub struct ChannelAddResult {
    pub username: String,
    pub added: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /channels-sets/{id}/channels`.
#[derive(Debug, Deserialize)]
pub struct AddChannelsResponse {
    pub results: Vec<ChannelAddResult>,
}

impl AddChannelsResponse {
    pub fn into_outcome(self) -> AddChannelsOutcome {
        let mut outcome = AddChannelsOutcome::default();
        for result in self.results {
            if result.added {
                outcome.added.push(result.username);
            } else {
                outcome.failed.push(result.username);
            }
        }
        outcome
    }
}

/// Body of `POST /analysis/tasks`.
#[derive(Debug, Serialize)]
pub struct StartAnalysisBody<'a> {
    pub set_id: &'a str,
    pub filter_ids: &'a [String],
}
