use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::templates::Template;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TemplateQuery {
    pub category: Option<String>,
    pub feature: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TemplateList {
    #[schema(value_type = Vec<Template>)]
    pub items: Vec<Template>,
}
