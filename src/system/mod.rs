pub mod command;
pub mod du;
pub mod meminfo;
pub mod process;
