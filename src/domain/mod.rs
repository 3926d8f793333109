//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod descriptor;
pub mod tag;
pub mod version;

pub use commit::ConventionalCommit;
pub use descriptor::{DescriptorFile, VersionDescriptor};
pub use tag::{release_tag_name, tag_belongs_to, ReleaseTag};
pub use version::{parse_version, IncrementKind};
