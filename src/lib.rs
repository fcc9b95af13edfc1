pub mod builder;
pub mod cli;
pub mod config;
pub mod engine;
pub mod parser;
pub mod subscription;

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
