pub mod controls;
pub mod header;
pub mod status;
