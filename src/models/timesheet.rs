use serde::{Deserialize, Deserializer, Serialize};

/// Tempo sends `null` for fields it has no value for; treat those like absent keys.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One period of the approval-status response. Only the seconds fields feed the
/// balance; the rest is kept for display and JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimesheetEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub user: Person,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub worked_seconds: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub submitted_seconds: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub required_seconds: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub required_seconds_relative_today: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub period: Period,
    #[serde(deserialize_with = "null_as_default")]
    pub smart_date_string: String,
    #[serde(deserialize_with = "null_as_default")]
    pub worklogs: Worklogs,
    pub action: Option<Action>,
}

/// Jira user reference; used for the owner, reviewer and actor alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    #[serde(rename = "self", deserialize_with = "null_as_default")]
    pub self_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    #[serde(deserialize_with = "null_as_default")]
    pub period_view: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Worklogs {
    #[serde(deserialize_with = "null_as_default")]
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub comment: Option<String>,
    pub reviewer: Option<Person>,
    pub actor: Option<Person>,
    #[serde(deserialize_with = "null_as_default")]
    pub created: String,
}
