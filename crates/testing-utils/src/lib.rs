pub mod bin;
pub mod fixture;
pub mod fs;
