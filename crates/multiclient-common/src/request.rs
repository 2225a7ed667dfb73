//! Request routing parameters.
//!
//! [`RequestParameters`] is the shape callers send (and the shape found on
//! the wire): a mode plus optional fields whose valid combinations depend on
//! the mode. [`Selection`] is the validated form consumed by the worker
//! selector; invalid combinations cannot be expressed in it.

use crate::error::{MulticlientError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a request is routed across liteservers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    /// Send to every eligible liteserver
    Broadcast,
    /// Send to one liteserver, either a requested one or a random one
    Single,
    /// Send to several liteservers, by explicit index or by count
    Multiple,
}

/// Per-request routing parameters as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParameters {
    pub mode: RequestMode,
    /// Only route to liteservers known to keep full history
    #[serde(default)]
    pub archival: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lite_server_indexes: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients_number: Option<usize>,
}

impl RequestParameters {
    pub fn broadcast() -> Self {
        Self {
            mode: RequestMode::Broadcast,
            archival: false,
            lite_server_indexes: None,
            clients_number: None,
        }
    }

    /// Single mode with a randomly chosen liteserver.
    pub fn single() -> Self {
        Self {
            mode: RequestMode::Single,
            ..Self::broadcast()
        }
    }

    /// Single mode pinned to one liteserver.
    pub fn single_at(index: usize) -> Self {
        Self {
            mode: RequestMode::Single,
            lite_server_indexes: Some(vec![index]),
            ..Self::broadcast()
        }
    }

    pub fn multiple_at(indexes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            mode: RequestMode::Multiple,
            lite_server_indexes: Some(indexes.into_iter().collect()),
            ..Self::broadcast()
        }
    }

    pub fn multiple_count(count: usize) -> Self {
        Self {
            mode: RequestMode::Multiple,
            clients_number: Some(count),
            ..Self::broadcast()
        }
    }

    pub fn with_archival(mut self, archival: bool) -> Self {
        self.archival = archival;
        self
    }

    /// Checks the mode/field combination and converts to a [`Selection`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when:
    /// - `Broadcast` carries `lite_server_indexes` or `clients_number`
    /// - `Single` carries `clients_number`, or an index list that does not
    ///   hold exactly one index
    /// - `Multiple` carries both or neither of `lite_server_indexes` and
    ///   `clients_number`
    pub fn validate(&self) -> Result<Selection> {
        let policy = match self.mode {
            RequestMode::Broadcast => {
                if self.lite_server_indexes.is_some() || self.clients_number.is_some() {
                    return Err(MulticlientError::InvalidRequest(
                        "broadcast mode takes neither liteserver indexes nor a clients number"
                            .to_string(),
                    ));
                }
                SelectionPolicy::Broadcast
            }
            RequestMode::Single if self.clients_number.is_some() => {
                return Err(MulticlientError::InvalidRequest(
                    "single mode does not take a clients number".to_string(),
                ))
            }
            RequestMode::Single => match self.lite_server_indexes.as_deref() {
                None => SelectionPolicy::Single(None),
                Some([index]) => SelectionPolicy::Single(Some(*index)),
                Some(indexes) => {
                    return Err(MulticlientError::InvalidRequest(format!(
                        "single mode takes exactly one liteserver index, got {}",
                        indexes.len()
                    )))
                }
            },
            RequestMode::Multiple => match (&self.lite_server_indexes, self.clients_number) {
                (Some(indexes), None) => {
                    SelectionPolicy::MultipleIndices(indexes.iter().copied().collect())
                }
                (None, Some(count)) => SelectionPolicy::MultipleCount(count),
                (Some(_), Some(_)) => {
                    return Err(MulticlientError::InvalidRequest(
                        "multiple mode takes either liteserver indexes or a clients number, not both"
                            .to_string(),
                    ))
                }
                (None, None) => {
                    return Err(MulticlientError::InvalidRequest(
                        "multiple mode requires liteserver indexes or a clients number".to_string(),
                    ))
                }
            },
        };

        Ok(Selection {
            policy,
            archival_required: self.archival,
        })
    }
}

/// Routing policy after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    Broadcast,
    Single(Option<usize>),
    MultipleIndices(BTreeSet<usize>),
    MultipleCount(usize),
}

/// A validated routing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub policy: SelectionPolicy,
    pub archival_required: bool,
}

impl Selection {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            archival_required: false,
        }
    }

    pub fn archival(mut self) -> Self {
        self.archival_required = true;
        self
    }
}

impl TryFrom<&RequestParameters> for Selection {
    type Error = MulticlientError;

    fn try_from(params: &RequestParameters) -> Result<Self> {
        params.validate()
    }
}
