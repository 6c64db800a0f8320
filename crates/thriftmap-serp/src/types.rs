//! SerpAPI response types for the Yelp search and review engines.
//!
//! Only the fields the pipeline consumes are modeled. SerpAPI omits rather
//! than nulls most optional fields, so everything non-essential carries
//! `#[serde(default)]`.

use serde::Deserialize;

use thriftmap_core::CandidateResult;

/// Top-level response from `search.json?engine=yelp`.
#[derive(Debug, Deserialize)]
pub struct YelpSearchResponse {
    /// Ordered search hits. Absent entirely when the query matched nothing.
    #[serde(default)]
    pub organic_results: Vec<YelpOrganicResult>,
}

/// One business hit from the Yelp search engine.
#[derive(Debug, Deserialize)]
pub struct YelpOrganicResult {
    pub title: String,

    /// Link to the business's Yelp page.
    pub link: String,

    /// Phone number. Frequently absent.
    #[serde(default)]
    pub phone: Option<String>,

    /// Place identifiers for the detail lookup. Observed as a list; the
    /// first entry is the one the reviews engine accepts. Often empty.
    #[serde(default)]
    pub place_ids: Vec<String>,
}

impl YelpOrganicResult {
    /// The place ID usable for a detail lookup, if any.
    #[must_use]
    pub fn place_id(&self) -> Option<&str> {
        self.place_ids.first().map(String::as_str)
    }
}

impl From<YelpOrganicResult> for CandidateResult {
    fn from(result: YelpOrganicResult) -> Self {
        let place_id = result.place_id().map(str::to_owned);
        CandidateResult {
            title: result.title,
            yelp_page: result.link,
            phone: result.phone,
            place_id,
        }
    }
}

/// Response from `search.json?engine=yelp_reviews` — the subset carrying the
/// business's postal address and website.
#[derive(Debug, Deserialize)]
pub struct YelpBusinessResponse {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_without_results_field_is_empty() {
        let parsed: YelpSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic_results.is_empty());
    }

    #[test]
    fn organic_result_defaults_optional_fields() {
        let parsed: YelpOrganicResult = serde_json::from_str(
            r#"{"title": "Emmaus", "link": "https://www.yelp.com/biz/emmaus"}"#,
        )
        .unwrap();
        assert_eq!(parsed.title, "Emmaus");
        assert!(parsed.phone.is_none());
        assert!(parsed.place_id().is_none());
    }

    #[test]
    fn first_place_id_wins() {
        let parsed: YelpOrganicResult = serde_json::from_str(
            r#"{"title": "Emmaus", "link": "l", "place_ids": ["id-1", "id-2"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.place_id(), Some("id-1"));
    }

    #[test]
    fn conversion_to_candidate_carries_first_place_id() {
        let parsed: YelpOrganicResult = serde_json::from_str(
            r#"{"title": "Emmaus", "link": "l", "phone": "123", "place_ids": ["id-1"]}"#,
        )
        .unwrap();
        let candidate = CandidateResult::from(parsed);
        assert_eq!(candidate.title, "Emmaus");
        assert_eq!(candidate.phone.as_deref(), Some("123"));
        assert_eq!(candidate.place_id.as_deref(), Some("id-1"));
    }

    #[test]
    fn business_response_tolerates_missing_fields() {
        let parsed: YelpBusinessResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.address.is_none());
        assert!(parsed.website.is_none());
    }
}
