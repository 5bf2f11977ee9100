use serde::Deserialize;

/// The two disjoint sets served by the category code catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Process,
    Product,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Process => "process",
            CategoryKind::Product => "product",
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryOption {
    pub id: i32,
    pub name: String,
    /// Process key. For products this names the process they belong to.
    pub step1: String,
    #[serde(default)]
    pub unit: Option<String>,
}
