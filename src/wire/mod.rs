//! Binary encoding primitives for the simulator protocol.
//!
//! Every value on the wire is big-endian. Integers are fixed width, floats
//! are IEEE-754 bit patterns, and strings travel as a u16 byte length, the
//! UTF-8 payload, and a single NUL terminator. There are no field tags and
//! no self-description; reader and writer agree on the schema of each
//! message up front, and [`Serializer`]/[`Deserializer`] just walk that
//! schema in order.
mod deserializer;
mod serializer;

pub use deserializer::{Deserializer, WireError};
pub use serializer::Serializer;
