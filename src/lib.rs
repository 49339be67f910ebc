pub mod api_defaults;
pub mod api_traits;
pub mod cli;
pub mod cmds;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod github;
pub mod http;
pub mod invocation;
pub mod io;
pub mod test;
pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
pub mod logging;

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate derive_builder;
