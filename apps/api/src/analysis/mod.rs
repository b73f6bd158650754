pub mod orchestrator;
pub mod pipeline;
pub mod prompts;
pub mod recommend;
