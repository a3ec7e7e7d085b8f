mod jumpers;
pub mod utils;
