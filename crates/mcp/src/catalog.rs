//! Declarative schema catalog.
//!
//! The catalog is built once, on first use, and never mutated. Its order is
//! the declaration order of [`Operation::ALL`].

use devrev_types::{FieldKind, FieldSpec, OperationDescriptor};
use once_cell::sync::Lazy;

use crate::operation::Operation;

const SEARCH_NAMESPACES: &[&str] = &["article", "issue", "ticket", "part", "dev_user"];
const WORK_TYPES: &[&str] = &["issue", "ticket"];
const PART_TYPES: &[&str] = &["enhancement"];

const SEARCH_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("query", FieldKind::String),
    FieldSpec::required("namespace", FieldKind::Enum(SEARCH_NAMESPACES)),
];

const GET_CURRENT_USER_CONTRACT: &[FieldSpec] = &[];

const GET_WORK_CONTRACT: &[FieldSpec] = &[FieldSpec::required("id", FieldKind::String)];

const CREATE_WORK_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("type", FieldKind::Enum(WORK_TYPES)),
    FieldSpec::required("title", FieldKind::String),
    FieldSpec::optional("body", FieldKind::String),
    FieldSpec::required("applies_to_part", FieldKind::String),
    FieldSpec::optional("owned_by", FieldKind::StringArray),
];

const UPDATE_OBJECT_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("id", FieldKind::String),
    FieldSpec::required("type", FieldKind::Enum(WORK_TYPES)),
    FieldSpec::optional("title", FieldKind::String),
    FieldSpec::optional("body", FieldKind::String),
    FieldSpec::optional("applies_to_part", FieldKind::String),
    FieldSpec::optional("owned_by", FieldKind::StringArray),
];

const UPDATE_WORK_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("id", FieldKind::String),
    FieldSpec::required("type", FieldKind::Enum(WORK_TYPES)),
    FieldSpec::optional("title", FieldKind::String),
    FieldSpec::optional("body", FieldKind::String),
    FieldSpec::optional("applies_to_part", FieldKind::String),
    FieldSpec::optional("owned_by", FieldKind::StringArray),
    FieldSpec::optional("sprint", FieldKind::String).describe("The ID of the sprint to move the work into"),
];

const LIST_WORKS_CONTRACT: &[FieldSpec] = &[
    FieldSpec::optional("type", FieldKind::EnumArray(WORK_TYPES)).describe("The type of works to list"),
    FieldSpec::optional("applies_to_part", FieldKind::StringArray).describe("The part IDs of the works to list"),
    FieldSpec::optional("created_by", FieldKind::StringArray)
        .describe("The user IDs of the creators of the works to list"),
    FieldSpec::optional("owned_by", FieldKind::StringArray).describe("The user IDs of the owners of the works to list"),
    FieldSpec::optional("stage", FieldKind::StringArray).describe("The stage names of the works to list"),
    FieldSpec::optional("state", FieldKind::StringArray).describe("The state names of the works to list"),
    FieldSpec::optional("limit", FieldKind::Integer).describe("The maximum number of works to list"),
];

const GET_PART_CONTRACT: &[FieldSpec] = &[FieldSpec::required("id", FieldKind::String)];

const CREATE_PART_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("type", FieldKind::Enum(PART_TYPES)),
    FieldSpec::required("name", FieldKind::String),
    FieldSpec::required("owned_by", FieldKind::StringArray).describe("The user IDs of the owners of the part"),
    FieldSpec::required("parent_part", FieldKind::StringArray).describe("The part IDs of the parent parts"),
    FieldSpec::optional("description", FieldKind::String).describe("The description of the part"),
];

const UPDATE_PART_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("id", FieldKind::String),
    FieldSpec::required("type", FieldKind::Enum(PART_TYPES)),
    FieldSpec::optional("name", FieldKind::String),
    FieldSpec::optional("description", FieldKind::String),
    FieldSpec::optional("owned_by", FieldKind::StringArray).describe("The user IDs of the owners of the part"),
    FieldSpec::optional("target_close_date", FieldKind::String)
        .describe("The target closed date of the part, for example: 2025-06-03T00:00:00Z"),
    FieldSpec::optional("target_start_date", FieldKind::String)
        .describe("The target start date of the part, for example: 2025-06-03T00:00:00Z"),
];

const CREATE_TIMELINE_COMMENT_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("work_id", FieldKind::String)
        .describe("The DevRev work item ID, for example: ISS-9465 or TKT-12345"),
    FieldSpec::required("body", FieldKind::String).describe("The comment text to add to the timeline"),
];

const GET_TIMELINE_ENTRIES_CONTRACT: &[FieldSpec] = &[
    FieldSpec::required("id", FieldKind::String)
        .describe("The DevRev work item ID whose timeline to read, for example: TKT-12345"),
    FieldSpec::optional("limit", FieldKind::Integer).describe("The maximum number of entries to return"),
    FieldSpec::optional("cursor", FieldKind::String)
        .describe("The next_cursor value from a previous call, to continue after it"),
];

impl Operation {
    /// Declared arguments of this operation.
    pub const fn input_contract(&self) -> &'static [FieldSpec] {
        match self {
            Operation::Search => SEARCH_CONTRACT,
            Operation::GetCurrentUser => GET_CURRENT_USER_CONTRACT,
            Operation::GetWork | Operation::GetObject => GET_WORK_CONTRACT,
            Operation::CreateWork | Operation::CreateObject => CREATE_WORK_CONTRACT,
            Operation::UpdateWork => UPDATE_WORK_CONTRACT,
            Operation::UpdateObject => UPDATE_OBJECT_CONTRACT,
            Operation::ListWorks => LIST_WORKS_CONTRACT,
            Operation::GetPart => GET_PART_CONTRACT,
            Operation::CreatePart => CREATE_PART_CONTRACT,
            Operation::UpdatePart => UPDATE_PART_CONTRACT,
            Operation::CreateTimelineComment => CREATE_TIMELINE_COMMENT_CONTRACT,
            Operation::GetTimelineEntries => GET_TIMELINE_ENTRIES_CONTRACT,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Operation::Search => "Search DevRev using the provided query",
            Operation::GetCurrentUser => "Get the current user's information",
            Operation::GetWork => "Get all information about a DevRev work item (issue or ticket) using its ID",
            Operation::CreateWork => "Create a new issue or ticket in DevRev",
            Operation::UpdateWork => "Update an existing issue or ticket in DevRev",
            Operation::ListWorks => "List all works in DevRev",
            Operation::GetPart => "Get an existing part in DevRev",
            Operation::CreatePart => "Create a new part in DevRev",
            Operation::UpdatePart => "Update an existing part in DevRev",
            Operation::CreateTimelineComment => "Add an internal comment to the timeline of a DevRev issue or ticket",
            Operation::GetTimelineEntries => {
                "Get one page of timeline entries for a DevRev issue or ticket. Pass next_cursor back as cursor to read further"
            }
            Operation::GetObject => {
                "Get all information about a DevRev issue and ticket using its ID. Deprecated: use get_work"
            }
            Operation::CreateObject => "Create a new issue or ticket in DevRev. Deprecated: use create_work",
            Operation::UpdateObject => "Update an existing issue or ticket in DevRev. Deprecated: use update_work",
        }
    }

    pub const fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor {
            name: self.name(),
            description: self.description(),
            input_contract: self.input_contract(),
        }
    }
}

static CATALOG: Lazy<Vec<OperationDescriptor>> =
    Lazy::new(|| Operation::ALL.iter().map(Operation::descriptor).collect());

/// Every operation descriptor, in declaration order.
pub fn list_operations() -> &'static [OperationDescriptor] {
    CATALOG.as_slice()
}

/// Look up a descriptor by tool name.
pub fn find_operation(name: &str) -> Option<&'static OperationDescriptor> {
    CATALOG.iter().find(|descriptor| descriptor.name == name)
}
