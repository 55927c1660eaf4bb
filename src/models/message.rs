use serde::{Deserialize, Serialize};

/// A transcript message that met the selection criteria and has not been used yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Stars")]
    pub stars: u32,
}
