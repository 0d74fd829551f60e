//! Command handlers for the stdio server.
//!
//! Each request line is a JSON object tagged by `"op"`. Every line produces
//! exactly one [`Response`].

use crate::error::{ServerError, ServerResult};
use crate::models::{Record, RecordKey};
use crate::services::ContactService;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single command read from stdin.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Insert { record: Record },
    Find { key: RecordKey },
    Update { key: RecordKey, new: RecordKey },
    Delete { key: RecordKey },
    List,
    Listing,
    SearchName { term: String },
    SearchPhone { term: String },
    Favorites,
    InGroup { tag: String },
    ToggleFavorite { key: RecordKey },
    SetGroups {
        key: RecordKey,
        #[serde(default)]
        groups: String,
    },
    SetPhoto {
        key: RecordKey,
        #[serde(default)]
        photo: Option<String>,
    },
    Duplicates,
    MergeDuplicates,
    Invalid,
    Stats,
}

impl Request {
    /// The protocol name of this command, for logging.
    pub fn op(&self) -> &'static str {
        match self {
            Request::Insert { .. } => "insert",
            Request::Find { .. } => "find",
            Request::Update { .. } => "update",
            Request::Delete { .. } => "delete",
            Request::List => "list",
            Request::Listing => "listing",
            Request::SearchName { .. } => "search_name",
            Request::SearchPhone { .. } => "search_phone",
            Request::Favorites => "favorites",
            Request::InGroup { .. } => "in_group",
            Request::ToggleFavorite { .. } => "toggle_favorite",
            Request::SetGroups { .. } => "set_groups",
            Request::SetPhoto { .. } => "set_photo",
            Request::Duplicates => "duplicates",
            Request::MergeDuplicates => "merge_duplicates",
            Request::Invalid => "invalid",
            Request::Stats => "stats",
        }
    }
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Dispatches requests to a [`ContactService`].
pub struct CommandHandler<S> {
    service: S,
    validate_on_insert: bool,
}

impl<S: ContactService> CommandHandler<S> {
    /// Create a handler. When `validate_on_insert` is set, `insert` and
    /// `update` reject invalid fields.
    pub fn new(service: S, validate_on_insert: bool) -> Self {
        Self {
            service,
            validate_on_insert,
        }
    }

    /// The wrapped service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Consume the handler, returning the service.
    pub fn into_service(self) -> S {
        self.service
    }

    /// Parse and run one request line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        let request = match serde_json::from_str::<Request>(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed command");
                return Response::failure(ServerError::MalformedRequest(e));
            }
        };

        let op = request.op();
        match self.dispatch(request) {
            Ok(result) => {
                tracing::debug!(op, "Command completed");
                Response::success(result)
            }
            Err(e) => {
                tracing::debug!(op, error = %e, "Command refused");
                Response::failure(e)
            }
        }
    }

    /// Run a parsed request.
    pub fn dispatch(&mut self, request: Request) -> ServerResult<Value> {
        let result = match request {
            Request::Insert { record } => {
                let key = record.key();
                if self.validate_on_insert {
                    self.service.add_contact(record)?;
                } else {
                    self.service.add_contact_unchecked(record)?;
                }
                serde_json::to_value(key)?
            }
            Request::Find { key } => serde_json::to_value(self.service.find_contact(&key)?)?,
            Request::Update { key, new } => {
                let updated = if self.validate_on_insert {
                    self.service.update_validated(&key, new)?
                } else {
                    self.service.update_checked(&key, new)?
                };
                serde_json::to_value(updated)?
            }
            Request::Delete { key } => serde_json::to_value(self.service.delete_contact(&key))?,
            Request::List => serde_json::to_value(self.service.snapshot())?,
            Request::Listing => Value::String(self.service.listing()),
            Request::SearchName { term } => {
                serde_json::to_value(self.service.search_by_name(&term))?
            }
            Request::SearchPhone { term } => {
                serde_json::to_value(self.service.search_by_phone(&term))?
            }
            Request::Favorites => serde_json::to_value(self.service.favorites())?,
            Request::InGroup { tag } => serde_json::to_value(self.service.in_group(&tag))?,
            Request::ToggleFavorite { key } => Value::Bool(self.service.toggle_favorite(&key)?),
            Request::SetGroups { key, groups } => {
                self.service.set_groups(&key, groups)?;
                Value::Null
            }
            Request::SetPhoto { key, photo } => {
                self.service.set_photo(&key, photo)?;
                Value::Null
            }
            Request::Duplicates => serde_json::to_value(self.service.find_duplicates())?,
            Request::MergeDuplicates => serde_json::to_value(self.service.merge_duplicates())?,
            Request::Invalid => serde_json::to_value(self.service.find_invalid())?,
            Request::Stats => serde_json::to_value(self.service.stats())?,
        };
        Ok(result)
    }
}
