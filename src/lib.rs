pub mod cli;
pub mod ctx;
pub mod error;
pub mod extract;
pub mod hypothesis;
pub mod input;
pub mod io;
pub mod math;
pub mod overview;
pub mod pipeline;
pub mod plot;
pub mod schema;
pub mod sweep;
pub mod units;
