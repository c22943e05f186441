//! Front ends for abacus experiments: the `abacus` command line and the
//! HTTP upload endpoint it can serve.
pub mod cli;
pub mod experiment;
pub mod server;
pub mod util;
