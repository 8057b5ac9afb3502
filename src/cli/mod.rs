mod add;
mod check;
mod label;
mod search;
pub mod server;

pub use add::*;
pub use check::*;
pub use label::*;
pub use search::*;
pub use server::*;

use crate::config::Opts;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}
