mod cache;
mod error;
mod escape;
mod parser;

pub use cache::{
    read_cache, write_cache, write_property_set, CacheDocument, CachedBinary, CachedBundle,
    CachedPlugin, CACHE_VERSION,
};
pub use error::XmlError;
pub use escape::{escape, unescape};
pub use parser::{parse_incremental, XmlVisitor};
