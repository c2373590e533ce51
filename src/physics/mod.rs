pub mod atmosphere;
pub mod drag;
pub mod eddy;
pub mod gravity;
pub mod radiation;
pub mod third_body;
