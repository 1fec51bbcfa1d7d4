//! darkai-media: Media response understanding — kind sniffing, response normalization, download labels.

pub mod labels;
pub mod normalize;
pub mod processor;
pub mod sniff;

pub use normalize::{Classification, ClassifyError, classify};
pub use processor::MediaProcessor;
pub use sniff::detect_media_kind;
