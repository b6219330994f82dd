use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::ApiKey;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertApiKeyRequest {
    pub credentials: Value,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ApiKeyList {
    #[schema(value_type = Vec<ApiKey>)]
    pub items: Vec<ApiKey>,
}
