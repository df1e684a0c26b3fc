pub mod form;
pub mod search_client;

pub use form::{SearchForm, UploadFile};
pub use search_client::HttpSearchClient;

use std::future::Future;

use anyhow::Result;

use crate::models::Dataset;

/// Anything that can answer a search form with a dataset.
pub trait SearchBackend {
    fn search(&self, form: SearchForm) -> impl Future<Output = Result<Dataset>> + Send;
}
