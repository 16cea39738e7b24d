// src/filters/mod.rs
pub mod section;
pub mod skill;

pub use section::SectionFilter;
pub use skill::SkillFilter;
