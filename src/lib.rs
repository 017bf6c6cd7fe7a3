pub mod assembler;
pub mod config;
pub mod content;
pub mod error;
pub mod logger;
pub mod publish;
pub mod rehost;
pub mod suggest;
pub mod text_utils;
pub mod util;
mod test_data;
