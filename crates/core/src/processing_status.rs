//! IFC file processing status values.
//!
//! Stored verbatim in `ifc_files.processing_status`. A file moves
//! pending -> processing -> completed, or to error from either of the
//! first two states.

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ERROR: &str = "error";

/// Typed view over the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    /// Parse from the database column.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            STATUS_PENDING => Some(Self::Pending),
            STATUS_PROCESSING => Some(Self::Processing),
            STATUS_COMPLETED => Some(Self::Completed),
            STATUS_ERROR => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Processing => STATUS_PROCESSING,
            Self::Completed => STATUS_COMPLETED,
            Self::Error => STATUS_ERROR,
        }
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Error)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Error)
        )
    }

    /// Completed and error are terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}
