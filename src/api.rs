// API client module: a small blocking HTTP client for the results box.
// Two endpoints are used: `/series` to find the series of a patient and
// `/results` to read the named artifacts of one series.

use crate::category::AlgoType;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::models::{Page, ResultRecord, SeriesEntry, SeriesInstanceUid, SeriesSet};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

/// Query parameters in send order. A key may repeat (`name=a&name=b`).
pub type Query = Vec<(&'static str, String)>;

/// A GET that returns a JSON body. [`HttpFetcher`] is the real one; tests
/// plug in a recording fake.
pub trait Fetch {
    fn get_json(&self, url: &str, query: &[(&'static str, String)]) -> Result<Value, ApiError>;
}

/// reqwest-backed [`Fetch`] that sends `Authorization: Token <TOKEN>` on
/// every request.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.token()))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(ConfigError::Client)?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn get_json(&self, url: &str, query: &[(&'static str, String)]) -> Result<Value, ApiError> {
        let res = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = res.status();
        debug!(url, status = status.as_u16(), "GET");
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = res.bytes().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Client for the results box. Generic over the transport so the lookup
/// logic can run against a fake.
pub struct ApiClient<F = HttpFetcher> {
    fetcher: F,
    series_url: String,
    results_url: String,
}

impl ApiClient<HttpFetcher> {
    /// Create a client that talks HTTP to the box described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_fetcher(config, HttpFetcher::new(config)?))
    }
}

impl<F: Fetch> ApiClient<F> {
    pub fn with_fetcher(config: &ClientConfig, fetcher: F) -> Self {
        ApiClient {
            fetcher,
            series_url: config.endpoint("series"),
            results_url: config.endpoint("results"),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// All distinct series of a patient.
    ///
    /// Entries without a `SeriesInstanceUID` show up as a single `None`.
    pub fn resolve_series(&self, patient_id: &str) -> Result<SeriesSet, ApiError> {
        let query = vec![("PatientID", patient_id.to_string())];
        let entries: Vec<SeriesEntry> = self.get_page(&self.series_url, &query)?;

        let total = entries.len();
        let series: SeriesSet = entries
            .into_iter()
            .map(|entry| entry.series_instance_uid)
            .collect();

        if series.contains(&None) {
            warn!(
                patient = %mask_pii(patient_id),
                "series entry without SeriesInstanceUID"
            );
        }
        info!(
            patient = %mask_pii(patient_id),
            entries = total,
            distinct = series.len(),
            "resolved series"
        );
        Ok(series)
    }

    /// Result records of one series, filtered by artifact name, in the
    /// order the box returns them.
    pub fn fetch_results(
        &self,
        series_id: Option<&SeriesInstanceUid>,
        algotype: AlgoType,
    ) -> Result<Vec<ResultRecord>, ApiError> {
        let query = results_query(series_id, algotype);
        let records: Vec<ResultRecord> = self.get_page(&self.results_url, &query)?;
        debug!(
            series = series_id.map(SeriesInstanceUid::as_str).unwrap_or("<none>"),
            %algotype,
            count = records.len(),
            "fetched results"
        );
        for record in &records {
            trace!(
                name = record.name().unwrap_or("<none>"),
                value = ?record.value(),
                "result record"
            );
        }
        Ok(records)
    }

    fn get_page<T: DeserializeOwned>(&self, url: &str, query: &[(&'static str, String)]) -> Result<Vec<T>, ApiError> {
        let body = self.fetcher.get_json(url, query)?;
        let page: Page<T> = serde_json::from_value(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(page.results)
    }
}

/// Query for `GET /results`. A missing series id leaves out
/// `SeriesInstanceUID` altogether.
pub fn results_query(series_id: Option<&SeriesInstanceUid>, algotype: AlgoType) -> Query {
    let mut query = Query::new();
    if let Some(uid) = series_id {
        query.push(("SeriesInstanceUID", uid.to_string()));
    }
    query.extend(algotype.result_names().into_iter().map(|name| ("name", name.to_string())));
    query
}

/// Patient ids are PII: only the first four characters go to the logs.
pub(crate) fn mask_pii(patient_id: &str) -> String {
    if patient_id.chars().count() <= 4 {
        "****".to_string()
    } else {
        let head: String = patient_id.chars().take(4).collect();
        format!("{head}****")
    }
}
