//! Workspace and document projections.
//!
//! These shapes are read-only on the client: the backend owns them, and the
//! only way to change one is through a mutation followed by a re-fetch.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated workspace address of the form `+name.suffix`.
///
/// The name is 1-15 lowercase ASCII letters or digits starting with a
/// letter; the suffix is non-empty. `+gardening.xxxxxxxxxxxxxxxxxxxx` and
/// `+react.123` are both valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceAddress(String);

impl WorkspaceAddress {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let Some(rest) = input.strip_prefix('+') else {
            return Err(AddressError::MissingLeadingPlus(input.to_string()));
        };
        let Some((name, suffix)) = rest.split_once('.') else {
            return Err(AddressError::MissingSuffix(input.to_string()));
        };
        if name.is_empty() || name.len() > 15 {
            return Err(AddressError::InvalidName {
                name: name.to_string(),
                reason: "must be 1-15 characters".to_string(),
            });
        }
        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return Err(AddressError::InvalidName {
                name: name.to_string(),
                reason: "must start with a lowercase letter".to_string(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(AddressError::InvalidName {
                name: name.to_string(),
                reason: "must contain only lowercase letters and digits".to_string(),
            });
        }
        if suffix.is_empty() {
            return Err(AddressError::MissingSuffix(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The human-readable name portion, without the `+` or suffix.
    pub fn name(&self) -> &str {
        let rest = self.0.trim_start_matches('+');
        rest.split_once('.').map(|(name, _)| name).unwrap_or(rest)
    }
}

impl FromStr for WorkspaceAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WorkspaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated document path: starts with `/`, no empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        if !input.starts_with('/') {
            return Err(AddressError::MalformedPath(input.to_string()));
        }
        if input.len() == 1 || input[1..].split('/').any(str::is_empty) {
            return Err(AddressError::MalformedPath(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentPath {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authoring identity attached to a fetched document, reduced to what
/// the backend exposes on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub short_name: String,
}

/// A path-addressed value with an authoring identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub path: DocumentPath,
    pub value: String,
    pub author: AuthorRef,
}

/// Read-only projection of one workspace, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    pub address: WorkspaceAddress,
    pub population: u32,
    pub documents: Vec<Document>,
}

/// Caller-held draft of a document before posting. The path is raw text
/// here; the backend rejects it distinctly when malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDraft {
    pub path: String,
    pub value: String,
}

impl DocumentDraft {
    pub fn clear(&mut self) {
        self.path.clear();
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.value.is_empty()
    }
}

/// Outcome of one workspace/pub synchronization. Opaque beyond the count:
/// merged state is only observable by re-reading the workspace list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub documents_ingested: usize,
}

/// Acknowledgement of an accepted document write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub document: Document,
}
