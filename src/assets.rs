//! Static assets compiled into the binary
//!
//! Only the names listed in `StaticAsset` can be served. Request paths are
//! never joined onto the filesystem.

/// Assets served under `/static/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticAsset {
    /// Page stylesheet
    DictCss,
}

impl StaticAsset {
    /// Every servable asset
    pub const ALL: [StaticAsset; 1] = [StaticAsset::DictCss];

    /// Looks up an asset by the name it is requested under
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|asset| asset.name() == name)
    }

    /// Name under `/static/`
    pub fn name(self) -> &'static str {
        match self {
            StaticAsset::DictCss => "dict.css",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            StaticAsset::DictCss => "text/css; charset=utf-8",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            StaticAsset::DictCss => include_str!("../static/dict.css"),
        }
    }
}
