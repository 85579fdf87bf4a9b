//! The person being researched.

use crate::error::{Error, Result};

/// Identifies the candidate to research.
///
/// A profile URL takes precedence over a name when both are known, matching
/// how the research prompt is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A public profile page (e.g. a LinkedIn URL)
    Url(String),
    /// A name, optionally narrowed by the candidate's current organization
    Name {
        name: String,
        organization: Option<String>,
    },
}

impl Subject {
    /// Build a subject from optional caller input.
    ///
    /// Blank strings count as absent. Fails with [`Error::InvalidInput`] when
    /// neither a URL nor a name is present, so a bad invocation is rejected
    /// before the engine is ever started.
    pub fn new(
        url: Option<String>,
        name: Option<String>,
        organization: Option<String>,
    ) -> Result<Self> {
        if let Some(url) = non_blank(url) {
            return Ok(Self::Url(url));
        }
        match non_blank(name) {
            Some(name) => Ok(Self::Name {
                name,
                organization: non_blank(organization),
            }),
            None => Err(Error::InvalidInput(
                "provide either a profile URL or a name (with optional company)".to_string(),
            )),
        }
    }

    /// Research a candidate by profile URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Research a candidate by name alone.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            name: name.into(),
            organization: None,
        }
    }

    /// Narrow a name-based subject by organization. No effect on URL subjects.
    pub fn at(self, organization: impl Into<String>) -> Self {
        match self {
            Self::Name { name, .. } => Self::Name {
                name,
                organization: Some(organization.into()),
            },
            url => url,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
