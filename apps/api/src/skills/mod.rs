// Skill discovery: embedding similarity against the vocabulary index, then
// niche scoring over the matched names.

pub mod matcher;
pub mod niche;
