pub mod dataset;
pub mod metrics;
pub mod output;
pub mod pages;
