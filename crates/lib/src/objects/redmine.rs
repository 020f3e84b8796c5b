use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::serde::{null_default, string_or_number};
use crate::time::Timestamp;
use crate::Error;

/// Reference to another tracker object such as a project, tracker, status, or user.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Reference {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

impl Reference {
    pub fn new<S: Into<String>>(id: u64, name: S) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self {
            id: None,
            name: value.to_string(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tracked work item along with its change history.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Issue {
    pub id: u64,
    pub subject: String,
    pub project: Reference,
    pub tracker: Reference,
    pub status: Reference,
    pub priority: Reference,
    pub author: Reference,
    #[serde(default)]
    pub assigned_to: Option<Reference>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub created_on: Timestamp,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub done: Option<String>,
    #[serde(default)]
    pub done_ratio: Option<u8>,
    #[serde(default, deserialize_with = "null_default")]
    pub journals: Vec<Journal>,
    #[serde(skip)]
    pub lookups: Lookups,
}

impl Issue {
    /// Attach the reference tables used to resolve ids inside journal entries.
    pub fn with_lookups(mut self, lookups: Lookups) -> Self {
        self.lookups = lookups;
        self
    }
}

impl FromStr for Issue {
    type Err = Error;

    /// Deserialize an issue from JSON, either bare or wrapped in an `issue` object.
    fn from_str(s: &str) -> crate::Result<Self> {
        let value = match serde_json::from_str(s)? {
            serde_json::Value::Object(mut map) if map.contains_key("issue") => {
                map.remove("issue").unwrap_or_default()
            }
            value => value,
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// Deserialize a list of issues from an `issues` search response.
pub fn issues_from_json(data: &str) -> crate::Result<Vec<Issue>> {
    #[derive(Deserialize)]
    struct Response {
        issues: Vec<Issue>,
    }

    let response: Response = serde_json::from_str(data)?;
    Ok(response.issues)
}

/// Status or priority entry from the tracker's enumeration endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct IssueStatus {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_closed: Option<bool>,
}

impl IssueStatus {
    pub fn new<S: Into<String>>(id: u64, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            is_closed: None,
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:<3} {}", self.id, self.name)
    }
}

/// Deserialize reference entries from an `issue_statuses` or `issue_priorities` response.
pub fn statuses_from_json(data: &str) -> crate::Result<Vec<IssueStatus>> {
    #[derive(Deserialize)]
    struct Response {
        #[serde(alias = "issue_priorities")]
        issue_statuses: Vec<IssueStatus>,
    }

    let response: Response = serde_json::from_str(data)?;
    Ok(response.issue_statuses)
}

/// Mapping of object ids to their display names.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
pub struct Lookup(IndexMap<u64, String>);

impl Lookup {
    pub fn get(&self, id: u64) -> Option<&str> {
        self.0.get(&id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u64, String)> for Lookup {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iterable: I) -> Self {
        Self(iterable.into_iter().collect())
    }
}

impl FromIterator<IssueStatus> for Lookup {
    fn from_iter<I: IntoIterator<Item = IssueStatus>>(iterable: I) -> Self {
        iterable.into_iter().map(|x| (x.id, x.name)).collect()
    }
}

impl<'a> FromIterator<&'a IssueStatus> for Lookup {
    fn from_iter<I: IntoIterator<Item = &'a IssueStatus>>(iterable: I) -> Self {
        iterable.into_iter().map(|x| (x.id, x.name.clone())).collect()
    }
}

/// References without ids are skipped since they can't be looked up.
impl FromIterator<Reference> for Lookup {
    fn from_iter<I: IntoIterator<Item = Reference>>(iterable: I) -> Self {
        iterable
            .into_iter()
            .filter_map(|x| x.id.map(|id| (id, x.name)))
            .collect()
    }
}

/// Reference tables forwarded to journal rendering.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
pub struct Lookups {
    pub statuses: Lookup,
    pub priorities: Lookup,
    pub users: Lookup,
}

/// Historical change or comment on an issue.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Journal {
    #[serde(default)]
    pub id: u64,
    pub user: Reference,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_on: Timestamp,
    #[serde(default)]
    pub private_notes: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub details: Vec<JournalDetail>,
}

/// Single field change recorded in a journal entry.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct JournalDetail {
    pub property: String,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub old_value: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub new_value: Option<String>,
}
