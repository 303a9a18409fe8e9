//! The closed set of tools the adapter can dispatch.
//!
//! Every per-operation decision (endpoint, success status, labels, payload
//! shape) is an exhaustive `match` on [`Operation`], so adding a tool without
//! handling it everywhere fails to compile.

use std::fmt;
use std::str::FromStr;

/// A dispatchable tool.
///
/// `GetObject`, `CreateObject` and `UpdateObject` are deprecated aliases of
/// their `*Work` counterparts. They hit the same endpoints but keep their own
/// names and labels so existing callers see unchanged responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    GetCurrentUser,
    GetWork,
    CreateWork,
    UpdateWork,
    ListWorks,
    GetPart,
    CreatePart,
    UpdatePart,
    CreateTimelineComment,
    GetTimelineEntries,
    GetObject,
    CreateObject,
    UpdateObject,
}

impl Operation {
    /// All operations in catalog declaration order.
    pub const ALL: [Operation; 14] = [
        Operation::Search,
        Operation::GetCurrentUser,
        Operation::GetWork,
        Operation::CreateWork,
        Operation::UpdateWork,
        Operation::ListWorks,
        Operation::GetPart,
        Operation::CreatePart,
        Operation::UpdatePart,
        Operation::CreateTimelineComment,
        Operation::GetTimelineEntries,
        Operation::GetObject,
        Operation::CreateObject,
        Operation::UpdateObject,
    ];

    /// Tool name published to callers.
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::GetCurrentUser => "get_current_user",
            Operation::GetWork => "get_work",
            Operation::CreateWork => "create_work",
            Operation::UpdateWork => "update_work",
            Operation::ListWorks => "list_works",
            Operation::GetPart => "get_part",
            Operation::CreatePart => "create_part",
            Operation::UpdatePart => "update_part",
            Operation::CreateTimelineComment => "create_timeline_comment",
            Operation::GetTimelineEntries => "get_timeline_entries",
            Operation::GetObject => "get_object",
            Operation::CreateObject => "create_object",
            Operation::UpdateObject => "update_object",
        }
    }

    /// Resolve a tool name, including deprecated aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.name() == name)
    }

    /// Remote endpoint invoked by this operation.
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Operation::Search => "search.hybrid",
            Operation::GetCurrentUser => "dev-users.self",
            Operation::GetWork | Operation::GetObject => "works.get",
            Operation::CreateWork | Operation::CreateObject => "works.create",
            Operation::UpdateWork | Operation::UpdateObject => "works.update",
            Operation::ListWorks => "works.list",
            Operation::GetPart => "parts.get",
            Operation::CreatePart => "parts.create",
            Operation::UpdatePart => "parts.update",
            Operation::CreateTimelineComment => "timeline-entries.create",
            Operation::GetTimelineEntries => "timeline-entries.list",
        }
    }

    /// The status the remote API normally answers with on success: 201 for
    /// creations, 200 otherwise.
    pub const fn success_status(&self) -> u16 {
        if self.creates() { 201 } else { 200 }
    }

    /// Whether `status_code` counts as success for this operation.
    ///
    /// Timeline comments are accepted with either 200 or 201; every other
    /// operation accepts only its [`Operation::success_status`].
    pub const fn is_success(&self, status_code: u16) -> bool {
        match self {
            Operation::CreateTimelineComment => matches!(status_code, 200 | 201),
            _ => status_code == self.success_status(),
        }
    }

    pub const fn creates(&self) -> bool {
        matches!(
            self,
            Operation::CreateWork | Operation::CreateObject | Operation::CreatePart | Operation::CreateTimelineComment
        )
    }

    /// Whether the operation only reads remote state.
    pub const fn read_only(&self) -> bool {
        matches!(
            self,
            Operation::Search
                | Operation::GetCurrentUser
                | Operation::GetWork
                | Operation::GetObject
                | Operation::ListWorks
                | Operation::GetPart
                | Operation::GetTimelineEntries
        )
    }

    /// Canonical operation for deprecated aliases; identity otherwise.
    pub const fn canonical(&self) -> Operation {
        match self {
            Operation::GetObject => Operation::GetWork,
            Operation::CreateObject => Operation::CreateWork,
            Operation::UpdateObject => Operation::UpdateWork,
            other => *other,
        }
    }

    pub const fn is_deprecated_alias(&self) -> bool {
        matches!(self, Operation::GetObject | Operation::CreateObject | Operation::UpdateObject)
    }

    /// Human-readable label used in failure messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Operation::Search => "Search",
            Operation::GetCurrentUser => "Get current user",
            Operation::GetWork => "Get work",
            Operation::CreateWork => "Create work",
            Operation::UpdateWork => "Update work",
            Operation::ListWorks => "List works",
            Operation::GetPart => "Get part",
            Operation::CreatePart => "Create part",
            Operation::UpdatePart => "Update part",
            Operation::CreateTimelineComment => "Create timeline comment",
            Operation::GetTimelineEntries => "Get timeline entries",
            Operation::GetObject => "Get object",
            Operation::CreateObject => "Create object",
            Operation::UpdateObject => "Update object",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperationName(pub String);

impl fmt::Display for UnknownOperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperationName {}

impl FromStr for Operation {
    type Err = UnknownOperationName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownOperationName(s.to_string()))
    }
}
