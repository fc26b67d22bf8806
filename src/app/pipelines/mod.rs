pub mod bid_pipeline;

pub use bid_pipeline::BidPipeline;
