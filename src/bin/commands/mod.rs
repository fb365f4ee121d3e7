pub mod config;
pub mod install;
pub mod list;
pub mod run;
pub mod run_single;
pub mod status;
