use serde::Serialize;

use crate::error::ClientResult;
use crate::models::{Category, MarketplaceProject, MarketplaceQuery};
use crate::services::ApiClient;

/// Public marketplace listing with its category list
#[derive(Debug, Clone, Serialize)]
pub struct MarketplaceView {
    pub projects: Vec<MarketplaceProject>,
    pub categories: Vec<Category>,
}

impl MarketplaceView {
    pub async fn load(client: &ApiClient, query: &MarketplaceQuery) -> ClientResult<Self> {
        let api = client.marketplace();
        let (projects, categories) = futures::try_join!(api.browse(query), api.categories())?;
        Ok(Self {
            projects,
            categories: categories.categories,
        })
    }
}
