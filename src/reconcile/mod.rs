pub mod engine;
pub mod pacer;
pub mod pricing;
