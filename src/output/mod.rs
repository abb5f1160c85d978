pub mod target;

pub use target::{open_output, OutputStream, STDOUT_TARGET};
