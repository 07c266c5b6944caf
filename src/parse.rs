use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::query::QuestionId;
use crate::{Error, Result};

/// One page of `/search/advanced` results, reduced to the fields the searcher reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchPage {
    /// Items are decoded one at a time; a bad item never costs the rest of the page.
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<SearchItem>,
    /// Absent or `null` is read as `false`.
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_more: bool,
    pub quota_remaining: Option<u32>,
    pub quota_max: Option<u32>,
    /// Seconds the service asks us to wait before hitting the same method again.
    pub backoff: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchItem {
    /// `None` unless the item carried a positive integer id.
    pub question_id: Option<QuestionId>,
}

impl From<&Value> for SearchItem {
    fn from(value: &Value) -> Self {
        let question_id = value
            .get("question_id")
            .and_then(Value::as_u64)
            .filter(|id| *id > 0)
            .map(QuestionId::new);
        Self { question_id }
    }
}

fn lenient_items<'de, D>(deserializer: D) -> core::result::Result<Vec<SearchItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().iter().map(SearchItem::from).collect())
}

fn null_as_false<'de, D>(deserializer: D) -> core::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl SearchPage {
    /// Ids of the items that carry one, in page order.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.items.iter().filter_map(|item| item.question_id)
    }
}

/// Error wrapper the service returns instead of a page.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_id: i64,
    #[serde(default)]
    error_name: String,
    #[serde(default)]
    error_message: String,
}

impl From<ApiErrorBody> for Error {
    fn from(body: ApiErrorBody) -> Self {
        Error::Api {
            id: body.error_id,
            name: body.error_name,
            message: body.error_message,
        }
    }
}

/// Decodes a response body into a [`SearchPage`].
/// A body carrying `error_id` becomes [`Error::Api`] even when it arrived with a success status.
pub(crate) fn parse_page(body: &str) -> Result<SearchPage> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("error_id").is_some() {
        let api_err: ApiErrorBody = serde_json::from_value(value)?;
        return Err(api_err.into());
    }
    Ok(serde_json::from_value(value)?)
}

/// Turns the body of a non-success response into the most specific error available.
pub(crate) fn parse_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(api_err) => api_err.into(),
        Err(_) => Error::Status {
            status,
            body: body.chars().take(200).collect(),
        },
    }
}
