use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorkflowForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub idea: String,
}
