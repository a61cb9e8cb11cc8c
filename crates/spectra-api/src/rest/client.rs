use reqwest::Client;
use url::Url;

use spectra_core::models::{
    AnalysisFilter, AnalysisTask, AnalysisTaskBasic, ChannelsSet, CreateSetRequest,
    NewCustomFilter, SetPatch,
};

use super::error::ApiError;
use super::types::{AddChannelsResponse, StartAnalysisBody, UsernamesBody};
use crate::traits::{AddChannelsOutcome, SpectraService};

/// SPECTRA REST API client.
pub struct RestClient {
    base: Url,
    access_token: String,
    http: Client,
}

impl RestClient {
    pub fn new(base_url: &str, access_token: String) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::BaseUrl(e.to_string()))?;
        Ok(Self {
            base,
            access_token,
            http: Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::Api {
                status,
                message: body,
            })
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let resp = self
            .http
            .get(self.url(path))
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = req.header("Authorization", self.auth_header()).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_empty(&self, req: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let resp = req.header("Authorization", self.auth_header()).send().await?;
        Self::check_response(resp).await?;
        Ok(())
    }
}

impl SpectraService for RestClient {
    type Error = ApiError;

    async fn list_sets(&self) -> Result<Vec<ChannelsSet>, ApiError> {
        self.get_json("channels-sets").await
    }

    async fn get_set(&self, id: &str) -> Result<ChannelsSet, ApiError> {
        self.get_json(&format!("channels-sets/{id}")).await
    }

    async fn create_set(&self, req: &CreateSetRequest) -> Result<ChannelsSet, ApiError> {
        tracing::debug!(name = %req.name, smart = req.build_criteria.is_some(), "create set");
        self.send_json(self.http.post(self.url("channels-sets")).json(req))
            .await
    }

    async fn update_set(&self, id: &str, patch: &SetPatch) -> Result<ChannelsSet, ApiError> {
        self.send_json(
            self.http
                .patch(self.url(&format!("channels-sets/{id}")))
                .json(patch),
        )
        .await
    }

    async fn delete_set(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(self.http.delete(self.url(&format!("channels-sets/{id}"))))
            .await
    }

    async fn add_channels(
        &self,
        id: &str,
        usernames: &[String],
    ) -> Result<AddChannelsOutcome, ApiError> {
        tracing::debug!(set = id, count = usernames.len(), "add channels");
        let resp: AddChannelsResponse = self
            .send_json(
                self.http
                    .post(self.url(&format!("channels-sets/{id}/channels")))
                    .json(&UsernamesBody { usernames }),
            )
            .await?;
        Ok(resp.into_outcome())
    }

    async fn remove_channels(&self, id: &str, usernames: &[String]) -> Result<(), ApiError> {
        self.send_empty(
            self.http
                .delete(self.url(&format!("channels-sets/{id}/channels")))
                .json(&UsernamesBody { usernames }),
        )
        .await
    }

    async fn cancel_build(&self, id: &str) -> Result<(), ApiError> {
        tracing::debug!(set = id, "cancel build");
        self.send_empty(
            self.http
                .post(self.url(&format!("channels-sets/{id}/build/cancel"))),
        )
        .await
    }

    async fn build_status(&self, id: &str) -> Result<ChannelsSet, ApiError> {
        self.get_json(&format!("channels-sets/{id}/build/status"))
            .await
    }

    async fn list_filters(&self) -> Result<Vec<AnalysisFilter>, ApiError> {
        self.get_json("analysis/filters").await
    }

    async fn create_custom_filter(&self, req: &NewCustomFilter) -> Result<AnalysisFilter, ApiError> {
        self.send_json(self.http.post(self.url("analysis/custom-filters")).json(req))
            .await
    }

    async fn delete_custom_filter(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(
            self.http
                .delete(self.url(&format!("analysis/custom-filters/{id}"))),
        )
        .await
    }

    async fn list_tasks(&self) -> Result<Vec<AnalysisTaskBasic>, ApiError> {
        self.get_json("analysis/tasks").await
    }

    async fn get_task(&self, id: &str) -> Result<AnalysisTask, ApiError> {
        self.get_json(&format!("analysis/tasks/{id}")).await
    }

    async fn start_analysis(
        &self,
        set_id: &str,
        filter_ids: &[String],
    ) -> Result<AnalysisTaskBasic, ApiError> {
        tracing::debug!(set = set_id, filters = filter_ids.len(), "start analysis");
        self.send_json(
            self.http
                .post(self.url("analysis/tasks"))
                .json(&StartAnalysisBody { set_id, filter_ids }),
        )
        .await
    }
}
