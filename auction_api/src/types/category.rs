use serde::{Deserialize, Serialize};

/// A browsable listing category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    /// Display name; also the label matched by the category filter.
    pub name: String,
    /// Icon identifier for the category card.
    pub icon: String,
    /// Advertised number of listings in the category.
    pub item_count: u32,
}
