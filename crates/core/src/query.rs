//! Immutable query configuration passed into each aggregation round.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Optional extra domains a site search can include.
///
/// Declaration order is the configured call-issuance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialSite {
    Shamela,
    Almaany,
    Dorar,
}

impl SpecialSite {
    pub const ALL: [SpecialSite; 3] = [SpecialSite::Shamela, SpecialSite::Almaany, SpecialSite::Dorar];

    /// The hadith-grading site; its results always lead a ranked set.
    pub const HADITH_GRADING: SpecialSite = SpecialSite::Dorar;

    pub fn domain(&self) -> &'static str {
        match self {
            SpecialSite::Shamela => "shamela.ws",
            SpecialSite::Almaany => "almaany.com",
            SpecialSite::Dorar => "dorar.net",
        }
    }
}

/// Which special sites are enabled for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialSiteFlags {
    #[serde(default)]
    pub shamela: bool,
    #[serde(default)]
    pub almaany: bool,
    #[serde(default)]
    pub dorar: bool,
}

impl SpecialSiteFlags {
    pub fn is_enabled(&self, site: SpecialSite) -> bool {
        match site {
            SpecialSite::Shamela => self.shamela,
            SpecialSite::Almaany => self.almaany,
            SpecialSite::Dorar => self.dorar,
        }
    }

    /// Enabled sites in configured order.
    pub fn enabled(&self) -> Vec<SpecialSite> {
        SpecialSite::ALL
            .into_iter()
            .filter(|site| self.is_enabled(*site))
            .collect()
    }
}

/// A site search as the user configured it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteQuery {
    text: String,
    sites: Vec<String>,
    special: SpecialSiteFlags,
}

impl SiteQuery {
    /// Build a query; the text is trimmed and must not be empty.
    /// Site names are trimmed and blank ones dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for empty or whitespace-only text.
    pub fn new(text: &str, sites: Vec<String>, special: SpecialSiteFlags) -> Result<Self, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }
        let sites = sites
            .into_iter()
            .map(|site| site.trim().to_string())
            .filter(|site| !site.is_empty())
            .collect();
        Ok(Self { text: text.to_string(), sites, special })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn special(&self) -> SpecialSiteFlags {
        self.special
    }

    pub fn special_sites(&self) -> Vec<SpecialSite> {
        self.special.enabled()
    }

    /// Query text restricted to every regular site at once.
    ///
    /// `None` when no regular site is selected.
    pub fn combined_site_query(&self) -> Option<String> {
        if self.sites.is_empty() {
            return None;
        }
        let clauses = self
            .sites
            .iter()
            .map(|site| format!("site:{site}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        Some(format!("({clauses}) {}", self.text))
    }

    pub fn cache_key(&self, start: u32) -> SearchKey<'_> {
        SearchKey {
            query: &self.text,
            sites: &self.sites,
            special: self.special_sites().into_iter().map(|site| site.domain()).collect(),
            start,
        }
    }
}

/// Cache key parameters for one site search page.
#[derive(Debug, Serialize)]
pub struct SearchKey<'a> {
    pub query: &'a str,
    pub sites: &'a [String],
    pub special: Vec<&'static str>,
    pub start: u32,
}

/// Cache key parameters for one video roster page.
#[derive(Debug, Serialize)]
pub struct VideoKey<'a> {
    pub query: &'a str,
    pub channels: &'a [String],
    pub cursor: usize,
}
