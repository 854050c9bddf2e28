pub mod config;
pub mod convert;
pub mod events;
pub mod fetcher;
pub mod progress;
pub mod rpc;
pub mod scanner;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
