// Skill-based search over the persisted candidate table.

pub mod filter;
pub mod handlers;
