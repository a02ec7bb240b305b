// Library root
// ------------
// Client for a CAD4TB results box: find the imaging series of a patient,
// then read the result artifacts (scores, normalized image, heatmap) of
// each series. The binary (`main.rs`) is a thin shell around `ui::run`.
//
// Module responsibilities:
// - `config`: `BOX_IP` / `TOKEN` (and `.env`) into a validated `ClientConfig`.
// - `api`: HTTP access to the `/series` and `/results` endpoints.
// - `models` / `category`: the data the box returns and the artifact names.
// - `cli`: command-line parsing.
// - `ui`: the fetch-and-print flow.
pub mod api;
pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, Fetch, HttpFetcher};
pub use category::{AlgoType, ArtifactCategory};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, UsageError};
pub use models::{ResultRecord, SeriesInstanceUid, SeriesSet};
