//! Error classifier
//!
//! Maps a failed request to a user-facing disposition: a toast message
//! and optionally a redirect route. Rules apply in priority order:
//!
//! 1. 401 -> re-authenticate, redirect to sign-in
//! 2. 403 / 404 -> context-specific not-found (redirect is caller opt-in)
//! 3. any other status with a structured validation payload -> joined
//!    field messages
//! 4. request sent, no response -> network message (softer on the polling
//!    path, which only means the data may be stale)
//! 5. anything else -> the error's own message verbatim

use crate::types::ApiError;

/// Route users are sent to on 401
pub const SIGN_IN_ROUTE: &str = "/users/sign_in";

/// Error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthRequired,
    NotFound,
    Validation,
    NetworkUnavailable,
    Unexpected,
}

/// Which path produced the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Mutation,
    Polling,
}

/// How validation field messages are joined
///
/// `Or` for list types whose fields are mutually exclusive alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinWord {
    And,
    Or,
}

/// Call-site context for classification
#[derive(Debug, Clone)]
pub struct Context {
    /// Noun for not-found messages ("List" or "Lists")
    pub noun: String,
    pub surface: Surface,
    pub join: JoinWord,
    /// Route to redirect to on not-found, when the caller wants one
    pub redirect_to: Option<String>,
}

impl Context {
    pub fn mutation(noun: &str) -> Self {
        Self {
            noun: noun.to_string(),
            surface: Surface::Mutation,
            join: JoinWord::And,
            redirect_to: None,
        }
    }

    pub fn polling() -> Self {
        Self {
            noun: "Lists".to_string(),
            surface: Surface::Polling,
            join: JoinWord::And,
            redirect_to: None,
        }
    }

    pub fn with_join(mut self, join: JoinWord) -> Self {
        self.join = join;
        self
    }

    pub fn with_redirect(mut self, route: &str) -> Self {
        self.redirect_to = Some(route.to_string());
        self
    }
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: ErrorKind,
    pub message: String,
    pub redirect: Option<String>,
}

/// Classify an API error for user presentation
pub fn classify(err: &ApiError, ctx: &Context) -> Classified {
    match err {
        ApiError::Status { status: 401, .. } => Classified {
            kind: ErrorKind::AuthRequired,
            message: "You must sign in".to_string(),
            redirect: Some(SIGN_IN_ROUTE.to_string()),
        },
        ApiError::Status { status, .. } if *status == 403 || *status == 404 => Classified {
            kind: ErrorKind::NotFound,
            message: format!("{} not found", ctx.noun),
            redirect: ctx.redirect_to.clone(),
        },
        ApiError::Status {
            validation: Some(fields),
            ..
        } if !fields.is_empty() => {
            let word = match ctx.join {
                JoinWord::And => " and ",
                JoinWord::Or => " or ",
            };
            // sorted for a deterministic toast regardless of map order
            let mut parts: Vec<String> = fields
                .iter()
                .map(|(field, message)| format!("{field} {message}"))
                .collect();
            parts.sort();
            Classified {
                kind: ErrorKind::Validation,
                message: parts.join(word),
                redirect: None,
            }
        }
        ApiError::Network(_) => {
            let message = match ctx.surface {
                Surface::Mutation => "Something went wrong. Please try again.",
                Surface::Polling => {
                    "You may not be connected to the internet. Please check your connection."
                }
            };
            Classified {
                kind: ErrorKind::NetworkUnavailable,
                message: message.to_string(),
                redirect: None,
            }
        }
        other => Classified {
            kind: ErrorKind::Unexpected,
            message: other.to_string(),
            redirect: None,
        },
    }
}
