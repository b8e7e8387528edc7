pub mod diff;
pub mod scan;
pub mod status;
