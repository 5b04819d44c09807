pub mod apply;
pub mod compile;
pub mod init;
pub mod paginate;

pub use apply::{apply, ApplyArgs};
pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use paginate::{paginate, PaginateArgs};
