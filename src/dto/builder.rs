use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::builder::{BuilderComponent, WidgetSpec};

#[derive(Debug, Serialize, ToSchema)]
pub struct PageLayoutResponse {
    pub store_id: Uuid,
    pub page: String,
    pub components: Vec<BuilderComponent>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveLayoutRequest {
    pub components: Vec<BuilderComponent>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddComponentRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub props: Option<Value>,
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveComponentRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComponentRequest {
    pub props: Value,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct WidgetPalette {
    #[schema(value_type = Vec<WidgetSpec>)]
    pub items: Vec<WidgetSpec>,
}
