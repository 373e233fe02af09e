//! Review-thread metadata: where a thread is anchored and its typed properties.

use crate::anchor::{HighlightRange, ScrollHint};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::{AsRefStr, EnumIter, EnumString};

/// Property names the review backend is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, AsRefStr, EnumIter)]
pub enum KnownProperty {
    CodeReviewThreadType,
    CodeReviewPolicyType,
    CodeReviewRequiredReviewerExamplePathThatTriggered,
    CodeReviewRequiredReviewerIsRequired,
    CodeReviewRequiredReviewerUserConfiguredMessage,
    CodeReviewRequiredReviewerExampleReviewerIdentities,
    CodeReviewRequiredReviewerNumFilesThatTriggered,
    CodeReviewRequiredReviewerNumReviewers,
    #[strum(serialize = "Microsoft.TeamFoundation.Discussion.UniqueID")]
    DiscussionUniqueId,
    #[strum(serialize = "Microsoft.TeamFoundation.Discussion.SupportsMarkdown")]
    DiscussionSupportsMarkdown,
    CodeReviewRefName,
    CodeReviewRefNewCommits,
    CodeReviewRefNewCommitsCount,
    CodeReviewRefNewHeadCommit,
    CodeReviewRefUpdatedByIdentity,
    CodeReviewReviewersUpdatedAddedIdentity,
    CodeReviewReviewersUpdatedByIdentity,
    CodeReviewReviewersUpdatedNumAdded,
    CodeReviewReviewersUpdatedNumRemoved,
    CodeReviewReviewersUpdatedNumChanged,
    CodeReviewReviewersUpdatedNumDeclined,
    CodeReviewVoteResult,
    CodeReviewVotedByInitiatorIdentity,
    CodeReviewVotedByIdentity,
    CodeReviewTargetChangedByDisplayName,
    CodeReviewTargetChangedByTfId,
    BypassPolicy,
    CodeReviewStatus,
    CodeReviewStatusUpdateAssociatedCommit,
    CodeReviewStatusUpdatedByIdentity,
}

/// A property name: one of the known ones, or whatever else the backend sent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKey {
    Known(KnownProperty),
    Unknown(String),
}

impl PropertyKey {
    /// The wire name of the property.
    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::Known(known) => known.as_ref(),
            PropertyKey::Unknown(name) => name,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        KnownProperty::from_str(name)
            .map(PropertyKey::Known)
            .unwrap_or_else(|_| PropertyKey::Unknown(name.to_string()))
    }
}

impl From<KnownProperty> for PropertyKey {
    fn from(known: KnownProperty) -> Self {
        PropertyKey::Known(known)
    }
}

/// A property value, already resolved from its `$type`/`$value` envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
}

impl PropertyValue {
    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Number(_) => None,
        }
    }

    /// The value as an integer. Numeric strings are accepted, the backend
    /// ships some counters as `System.String`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            PropertyValue::Number(_) => None,
            PropertyValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PropertyEnvelope {
    #[serde(rename = "$value")]
    value: serde_json::Value,
}

impl From<PropertyEnvelope> for PropertyValue {
    fn from(envelope: PropertyEnvelope) -> Self {
        match envelope.value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(PropertyValue::Number)
                .unwrap_or_else(|| PropertyValue::Text(n.to_string())),
            serde_json::Value::String(s) => PropertyValue::Text(s),
            other => PropertyValue::Text(other.to_string()),
        }
    }
}

/// All properties attached to a thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadProperties {
    values: BTreeMap<PropertyKey, PropertyValue>,
}

impl<'de> Deserialize<'de> for ThreadProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, PropertyEnvelope>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .map(|(name, envelope)| (PropertyKey::from(name.as_str()), envelope.into()))
            .collect();
        Ok(Self { values })
    }
}

impl ThreadProperties {
    /// Look up a property.
    pub fn get(&self, key: impl Into<PropertyKey>) -> Option<&PropertyValue> {
        self.values.get(&key.into())
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<PropertyKey>, value: PropertyValue) {
        self.values.insert(key.into(), value);
    }

    /// Properties the backend sent that this crate does not know about.
    pub fn unknown(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().filter_map(|(key, value)| match key {
            PropertyKey::Unknown(name) => Some((name.as_str(), value)),
            PropertyKey::Known(_) => None,
        })
    }

    /// Thread type, e.g. `VoteUpdate` or `RefUpdate`.
    pub fn thread_type(&self) -> Option<&str> {
        self.get(KnownProperty::CodeReviewThreadType)?.as_text()
    }

    /// Vote cast in a `VoteUpdate` thread.
    pub fn vote(&self) -> Option<Vote> {
        self.get(KnownProperty::CodeReviewVoteResult)?
            .as_integer()
            .map(Vote::from)
    }

    /// Commits pushed in a `RefUpdate` thread.
    pub fn new_commits(&self) -> Vec<&str> {
        self.get(KnownProperty::CodeReviewRefNewCommits)
            .and_then(PropertyValue::as_text)
            .map(|s| s.split(';').filter(|c| !c.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// A 1-based position inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePosition {
    pub line: u32,
    pub offset: u32,
}

/// Where a review thread is anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadContext {
    pub file_path: String,
    #[serde(default)]
    pub right_file_start: Option<FilePosition>,
    #[serde(default)]
    pub right_file_end: Option<FilePosition>,
}

impl ThreadContext {
    /// The line range the thread covers on the new side, if any.
    pub fn line_range(&self) -> Option<HighlightRange> {
        let start = self.right_file_start?.line;
        let end = self.right_file_end?.line;
        HighlightRange::new(start, end).ok()
    }

    /// Anchor text in the `Line N` / `Lines N-M` form.
    pub fn anchor_text(&self) -> Option<String> {
        self.line_range().map(|range| range.to_string())
    }

    /// Build the hint a reviewer navigates with when following this thread.
    pub fn anchor(&self) -> Option<ScrollHint> {
        let hint = ScrollHint::for_file(&self.file_path)?;
        Some(match self.line_range() {
            Some(range) => hint.with_lines(range),
            None => hint,
        })
    }
}

/// A reviewer's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Approved,
    ApprovedWithSuggestions,
    NoVote,
    WaitingForAuthor,
    Rejected,
    Other(i64),
}

impl From<i64> for Vote {
    fn from(value: i64) -> Self {
        match value {
            10 => Vote::Approved,
            5 => Vote::ApprovedWithSuggestions,
            0 => Vote::NoVote,
            -5 => Vote::WaitingForAuthor,
            -10 => Vote::Rejected,
            other => Vote::Other(other),
        }
    }
}

impl Vote {
    /// Badge text.
    pub fn label(&self) -> String {
        match self {
            Vote::Approved => "Approved".to_string(),
            Vote::ApprovedWithSuggestions => "Approved with suggestions".to_string(),
            Vote::NoVote => "No vote".to_string(),
            Vote::WaitingForAuthor => "Waiting for author".to_string(),
            Vote::Rejected => "Rejected".to_string(),
            Vote::Other(value) => format!("Vote: {value}"),
        }
    }

    /// Sentence fragment describing the vote.
    pub fn action_text(&self) -> &'static str {
        match self {
            Vote::Approved => "approved this PR",
            Vote::ApprovedWithSuggestions => "approved with suggestions",
            Vote::NoVote => "reset their vote",
            Vote::WaitingForAuthor => "is waiting for the author",
            Vote::Rejected => "rejected this PR",
            Vote::Other(_) => "voted",
        }
    }
}

/// A system comment of the form `<user> voted <n>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteMessage {
    pub user: String,
    pub vote: Vote,
}

impl VoteMessage {
    /// Recognize a vote system message.
    pub fn parse(content: &str) -> Option<Self> {
        static VOTE_REGEX: OnceLock<Regex> = OnceLock::new();

        let re = VOTE_REGEX.get_or_init(|| Regex::new(r"^(.+) voted (-?\d+)$").unwrap());
        let captures = re.captures(content)?;
        let vote: i64 = captures[2].parse().ok()?;
        Some(Self {
            user: captures[1].to_string(),
            vote: Vote::from(vote),
        })
    }
}
