//! User-facing notices and failure messages.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};

/// Display language of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(Error::InvalidInput(format!("unsupported language: {other}"))),
        }
    }
}

/// One-time notices emitted alongside a completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Some sites are indexed more prominently than others.
    IndexingDisclaimer,
}

impl Notice {
    pub fn text(&self, language: Language) -> &'static str {
        match (self, language) {
            (Notice::IndexingDisclaimer, Language::En) => {
                "Some websites are more prominently indexed and ranked by search engines, which means you may \
                 see a higher number of results from those sites compared to others when searching. For \
                 example: Shaykh Bin Baz (رحمه الله) may have more results than that of Shaykh Luhaydan \
                 (رحمه الله)."
            }
            (Notice::IndexingDisclaimer, Language::Ar) => {
                "بعض المواقع مفهرسة ومصنفة بشكل أكثر بروزاً في محركات البحث، مما يعني أنك قد ترى عدداً أكبر من \
                 النتائج من هذه المواقع مقارنة بالمواقع الأخرى عند البحث. على سبيل المثال: الشيخ ابن باز (رحمه \
                 الله) قد يكون له نتائج أكثر من الشيخ اللحيدان (رحمه الله)."
            }
        }
    }
}

/// Message shown when a site search round fails.
pub fn search_failure(err: &Error) -> &'static str {
    match err.kind() {
        ErrorKind::Network => "Network error. Please check your internet connection and try again.",
        ErrorKind::Quota => "Search quota exceeded. Please try again in a few minutes.",
        ErrorKind::Timeout => "Search timed out. Please try again with different keywords.",
        ErrorKind::InvalidQuery => "Invalid search query. Please try different keywords.",
        ErrorKind::Generic => "Search failed. Please try again or contact support if the problem persists.",
    }
}

/// Message shown when a video search round fails.
pub fn video_failure(err: &Error) -> &'static str {
    match err.kind() {
        ErrorKind::Quota => "API quota exceeded. Please try again later.",
        _ => "Failed to perform search",
    }
}
