pub mod analysis;
pub mod entities;
pub mod skills;
