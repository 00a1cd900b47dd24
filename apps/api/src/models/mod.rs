pub mod resume;
pub mod skills;
