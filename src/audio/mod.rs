pub mod transform;
pub mod writer;

pub use transform::unsigned16_to_signed;
pub use writer::StreamWriter;
