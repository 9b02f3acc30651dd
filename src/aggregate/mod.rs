pub mod engine;
pub mod service;

pub use engine::LanguageAggregator;
pub use service::SkillsService;
