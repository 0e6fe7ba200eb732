//! site_search, site_search_more and site_results tool implementations.
//!
//! Runs site search rounds for the session and renders the filtered view.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fatwa_client::RoundReport;
use fatwa_core::{Error, FilterSet, Language, RoundOutcome, SearchResult, SiteQuery, SpecialSiteFlags};

use super::{Status, json_result, parse_language};
use crate::session::Session;

/// Input parameters for site_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SiteSearchParams {
    /// Search query (required).
    pub query: String,

    /// Regular sites to search, in order. Defaults to the configured scholar sites.
    #[serde(default)]
    pub sites: Option<Vec<String>>,

    /// Also search shamela.ws (library).
    #[serde(default)]
    pub include_shamela: bool,

    /// Also search almaany.com (dictionary).
    #[serde(default)]
    pub include_almaany: bool,

    /// Also search dorar.net (hadith grading). Its results always lead.
    #[serde(default)]
    pub include_dorar: bool,

    /// Only show results from these hostnames.
    #[serde(default)]
    pub filters: Vec<String>,

    /// Notice language: en (default) or ar.
    #[serde(default)]
    pub language: Option<String>,
}

/// Input parameters for site_search_more and site_results tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SiteViewParams {
    /// Only show results from these hostnames.
    #[serde(default)]
    pub filters: Vec<String>,
}

/// Output structure for the site search tools.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSearchOutput {
    pub status: Status,
    /// Current result set after filtering.
    pub results: Vec<SearchResult>,
    /// Size of the unfiltered result set.
    pub total: usize,
    pub has_more: bool,
    pub next_start: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
    /// Hostnames available as filters.
    pub facets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

async fn render(
    session: &Session, report: Option<&RoundReport>, filters: Vec<String>, language: Language,
) -> SiteSearchOutput {
    let selection = FilterSet::new(filters);
    let snapshot = session.search.snapshot().await;
    SiteSearchOutput {
        status: if report.is_some() { Status::Completed } else { Status::Current },
        results: selection.apply(&snapshot.results),
        total: snapshot.results.len(),
        has_more: snapshot.has_more,
        next_start: session.search.next_start().await,
        from_cache: report.map(|r| r.from_cache),
        facets: session.search.facets().await,
        notice: report.and_then(|r| r.notice).map(|notice| notice.text(language)),
    }
}

async fn respond(
    session: &Session, outcome: RoundOutcome<RoundReport>, filters: Vec<String>, language: Language,
) -> Result<CallToolResult, McpError> {
    match outcome {
        RoundOutcome::Completed(report) => json_result(&render(session, Some(&report), filters, language).await),
        RoundOutcome::Superseded => json_result(&Status::superseded()),
    }
}

/// Implementation of the site_search tool.
pub async fn search_impl(session: &Session, params: SiteSearchParams) -> Result<CallToolResult, McpError> {
    let language = match params.language.as_deref() {
        Some(code) => parse_language(code)?,
        None => session.language,
    };
    let special = SpecialSiteFlags {
        shamela: params.include_shamela,
        almaany: params.include_almaany,
        dorar: params.include_dorar,
    };
    let sites = params.sites.unwrap_or_else(|| session.sites.clone());
    let query = SiteQuery::new(&params.query, sites, special)?;

    let outcome = session.search.new_search(&query).await?;
    respond(session, outcome, params.filters, language).await
}

/// Implementation of the site_search_more tool.
pub async fn more_impl(session: &Session, params: SiteViewParams) -> Result<CallToolResult, McpError> {
    let outcome = session.search.load_more().await?;
    respond(session, outcome, params.filters, session.language).await
}

/// Implementation of the site_results tool: refilter without any network call.
pub async fn results_impl(session: &Session, params: SiteViewParams) -> Result<CallToolResult, McpError> {
    if session.search.active_query().await.is_none() {
        return Err(Error::NoActiveSearch.into());
    }
    json_result(&render(session, None, params.filters, session.language).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{output_json, session};

    fn params(query: &str) -> SiteSearchParams {
        SiteSearchParams { query: query.into(), include_dorar: true, ..Default::default() }
    }

    #[tokio::test]
    async fn test_search_impl_returns_ranked_results_and_notice() {
        let (session, calls) = session();

        let result = search_impl(&session, params("wudu")).await.unwrap();
        let json = output_json(&result);

        assert_eq!(json["status"], "completed");
        assert_eq!(json["results"][0]["link"], "https://dorar.net/hadith/wudu");
        assert_eq!(json["next_start"], 11);
        assert_eq!(json["from_cache"], false);
        assert!(json["notice"].as_str().unwrap().starts_with("Some websites"));
        assert_eq!(calls.search(), 2);
    }

    #[tokio::test]
    async fn test_search_impl_arabic_notice_and_cache() {
        let (session, calls) = session();

        search_impl(&session, params("wudu")).await.unwrap();
        let again = SiteSearchParams { language: Some("ar".into()), ..params("wudu") };
        let json = output_json(&search_impl(&session, again).await.unwrap());

        assert_eq!(json["from_cache"], true);
        assert!(json["notice"].as_str().unwrap().starts_with("بعض المواقع"));
        assert_eq!(calls.search(), 2);
    }

    #[tokio::test]
    async fn test_search_impl_empty_query() {
        let (session, calls) = session();
        let err = search_impl(&session, params("   ")).await.unwrap_err();

        assert_eq!(err.code.0, -32602);
        assert_eq!(calls.search(), 0);
    }

    #[tokio::test]
    async fn test_results_impl_filters_without_network() {
        let (session, calls) = session();
        search_impl(&session, params("wudu")).await.unwrap();

        let view = SiteViewParams { filters: vec!["dorar.net".into()] };
        let json = output_json(&results_impl(&session, view).await.unwrap());

        assert_eq!(json["status"], "current");
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["total"], 2);
        assert!(json.get("notice").is_none());
        assert_eq!(calls.search(), 2);
    }

    #[tokio::test]
    async fn test_results_impl_requires_search() {
        let (session, _calls) = session();
        let err = results_impl(&session, SiteViewParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_more_impl_advances_start() {
        let (session, _calls) = session();
        search_impl(&session, params("wudu")).await.unwrap();

        let json = output_json(&more_impl(&session, SiteViewParams::default()).await.unwrap());
        assert_eq!(json["next_start"], 21);
        assert_eq!(json["total"], 4);
    }
}
