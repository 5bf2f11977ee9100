use serde::Serialize;

use super::LineItem;

/// Body of the project save request.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveProjectRequest {
    pub project_name: String,
    pub project_duration: String,
    pub project_description: String,
    pub materials: Vec<LineItem>,
}
