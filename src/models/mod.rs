pub mod doctor;
pub mod enums;
pub mod note;
pub mod patient;

pub use doctor::*;
pub use enums::*;
pub use note::*;
pub use patient::*;
