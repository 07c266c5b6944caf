use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, MAX_PAGE_SIZE};

/// Query parameters as they go over the wire.
pub type Params = Vec<(&'static str, String)>;

/// Identifier of a single question on the remote site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filter criteria for one search. Built through [`SearchQuery::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tagged: Vec<String>,
    min_score: u32,
    min_answers: u32,
    require_accepted: bool,
    page_size: u32,
    max_pages: u32,
}

impl SearchQuery {
    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    pub fn tagged(&self) -> &[String] {
        &self.tagged
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    pub fn min_answers(&self) -> u32 {
        self.min_answers
    }

    pub fn require_accepted(&self) -> bool {
        self.require_accepted
    }

    /// Page size as it will be transmitted, never above [`MAX_PAGE_SIZE`].
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Encodes the filter for the `/search/advanced` endpoint at `page` (1-based).
    /// `site` and `key` are left to the client.
    pub fn to_params(&self, page: u32) -> Params {
        let mut params: Params = vec![
            ("order", "desc".to_string()),
            ("sort", "votes".to_string()),
            ("pagesize", self.page_size.to_string()),
            ("page", page.to_string()),
            ("min", self.min_score.to_string()),
            ("answers", self.min_answers.to_string()),
            ("closed", "false".to_string()),
            ("migrated", "false".to_string()),
        ];
        if !self.tagged.is_empty() {
            params.push(("tagged", self.tagged.join(";")));
        }
        if self.require_accepted {
            params.push(("accepted", "true".to_string()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    tagged: Vec<String>,
    min_score: u32,
    min_answers: u32,
    require_accepted: bool,
    page_size: u32,
    max_pages: u32,
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self {
            tagged: Vec::new(),
            min_score: 0,
            min_answers: 1,
            require_accepted: false,
            page_size: MAX_PAGE_SIZE,
            max_pages: 1,
        }
    }
}

impl SearchQueryBuilder {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tagged.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tagged.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn min_score(mut self, min_score: u32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn min_answers(mut self, min_answers: u32) -> Self {
        self.min_answers = min_answers;
        self
    }

    pub fn require_accepted(mut self, require_accepted: bool) -> Self {
        self.require_accepted = require_accepted;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Validates and freezes the query. Page sizes above the service maximum are clamped.
    pub fn build(self) -> Result<SearchQuery> {
        if self.page_size == 0 {
            return Err(Error::InvalidQuery("page size must be at least 1".into()));
        }
        if self.max_pages == 0 {
            return Err(Error::InvalidQuery("max pages must be at least 1".into()));
        }

        let mut tagged = Vec::with_capacity(self.tagged.len());
        for tag in self.tagged {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            if tag.contains(';') {
                return Err(Error::InvalidQuery(format!(
                    "tag `{tag}` contains the `;` separator"
                )));
            }
            tagged.push(tag.to_string());
        }

        Ok(SearchQuery {
            tagged,
            min_score: self.min_score,
            min_answers: self.min_answers,
            require_accepted: self.require_accepted,
            page_size: self.page_size.min(MAX_PAGE_SIZE),
            max_pages: self.max_pages,
        })
    }
}

/// Ordered, duplicate-free question ids in the order they were first discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet(Vec<QuestionId>);

impl ResultSet {
    /// Keeps the first occurrence of every id.
    pub fn from_discovered<I>(discovered: I) -> Self
    where
        I: IntoIterator<Item = QuestionId>,
    {
        let mut seen = HashSet::new();
        let ids = discovered
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[QuestionId] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionId> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<QuestionId> {
        self.0
    }
}

impl IntoIterator for ResultSet {
    type Item = QuestionId;
    type IntoIter = std::vec::IntoIter<QuestionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a QuestionId;
    type IntoIter = std::slice::Iter<'a, QuestionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_page_size_is_clamped() {
        let query = SearchQuery::builder().page_size(500).build().unwrap();
        assert_eq!(query.page_size(), 100);
        assert_eq!(param(&query.to_params(1), "pagesize"), Some("100"));
    }

    #[test]
    fn test_params_full_filter() {
        let query = SearchQuery::builder()
            .tags(["python", " pandas "])
            .min_score(20)
            .min_answers(2)
            .require_accepted(true)
            .page_size(20)
            .build()
            .unwrap();
        let params = query.to_params(3);

        assert_eq!(param(&params, "order"), Some("desc"));
        assert_eq!(param(&params, "sort"), Some("votes"));
        assert_eq!(param(&params, "pagesize"), Some("20"));
        assert_eq!(param(&params, "page"), Some("3"));
        assert_eq!(param(&params, "min"), Some("20"));
        assert_eq!(param(&params, "answers"), Some("2"));
        assert_eq!(param(&params, "closed"), Some("false"));
        assert_eq!(param(&params, "migrated"), Some("false"));
        assert_eq!(param(&params, "tagged"), Some("python;pandas"));
        assert_eq!(param(&params, "accepted"), Some("true"));
    }

    #[test]
    fn test_optional_params_omitted() {
        let query = SearchQuery::builder().tag("  ").build().unwrap();
        let params = query.to_params(1);
        assert!(query.tagged().is_empty());
        assert_eq!(param(&params, "tagged"), None);
        assert_eq!(param(&params, "accepted"), None);
    }

    #[test]
    fn test_build_rejects_invalid() {
        assert!(matches!(
            SearchQuery::builder().page_size(0).build(),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            SearchQuery::builder().max_pages(0).build(),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            SearchQuery::builder().tag("c;c++").build(),
            Err(Error::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_result_set_keeps_first_seen_order() {
        let ids = [5, 3, 5, 9, 3, 1].map(QuestionId::new);
        let set = ResultSet::from_discovered(ids);
        let got: Vec<u64> = set.iter().map(|id| id.get()).collect();
        assert_eq!(got, vec![5, 3, 9, 1]);
    }
}
