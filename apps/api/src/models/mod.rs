pub mod candidate;
pub mod skills;
