//! Analysis engine for determining version increments from commits

pub mod increment_policy;

pub use increment_policy::VersionIncrementPolicy;
