pub mod db;
pub mod paper_llm;

pub use db::PgPaperStore;
pub use paper_llm::GeminiPaperAdapter;
