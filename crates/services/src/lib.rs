pub mod search;
pub mod serper;
pub mod tavily;

pub use search::{SearchOutcome, SearchProvider, SearchRouter};
pub use serper::SerperClient;
pub use tavily::TavilyClient;
