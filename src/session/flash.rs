//! One-time messages that are shown on the next page the user sees.

/// How a flash message should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    /// The action the user took worked.
    Success,
    /// Something went wrong and the user may need to try again.
    Error,
}

impl FlashKind {
    /// The name used to store the kind in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }

    /// Parse a kind stored with [FlashKind::as_str].
    pub fn parse(raw_kind: &str) -> Option<Self> {
        match raw_kind {
            "success" => Some(FlashKind::Success),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }
}

/// A message for the user that is displayed once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    /// Whether the message reports a success or an error.
    pub kind: FlashKind,
    /// The text shown to the user.
    pub message: String,
}

impl Flash {
    /// Create a new success message.
    pub fn success(message: &str) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.to_owned(),
        }
    }

    /// Create a new error message.
    pub fn error(message: &str) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.to_owned(),
        }
    }
}
