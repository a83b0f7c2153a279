pub mod crawler;
pub mod error;
pub mod export;
pub mod extractor;
pub mod store;
pub mod tree;
pub mod validator;

pub use crawler::{CrawlConfig, Crawler, LinkCallback};
pub use error::CrawlError;
pub use export::CrawlExport;
pub use tree::SiteTreeNode;
