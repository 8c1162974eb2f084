//! Request/response protocol spoken by the simulator.
//!
//! This module defines the operations a client can ask the simulation server
//! to perform, the byte-exact encoding of each request, the typed decoding of
//! each response, and the framing used to move both over a network stream.
//!
//! # Overview
//!
//! The protocol is a strict request/response exchange: the client sends one
//! request and the server answers with exactly one response whose schema is
//! determined by the request's opcode. There is no server push, no pipelining
//! and no negotiation; compatibility rests entirely on both sides agreeing on
//! the opcode table.
//!
//! # Key Components
//!
//! - [`Request`]: one variant per server operation, encoded with
//!   [`Request::encode`].
//! - [`ProbeTable`], [`VectorReading`], [`TmpBspValues`]: typed decoded
//!   responses for the read operations.
//! - [`FrameTransport`]: one framed round trip over a bidirectional stream
//!   (e.g. TCP, or an in-memory buffer in tests).
//!
//! # Binary Format
//!
//! - Every request starts with a 4-byte opcode selecting the operation;
//!   payload fields follow in a fixed order with no tags.
//! - All integers and floats are big-endian; floats are IEEE-754.
//! - Strings carry a u16 byte length, the UTF-8 payload and a NUL terminator.
//! - Both directions are framed with a 4-byte payload length prefix.
//!
//! Responses carry no opcode echo and no error channel: the decoder knows the
//! expected schema from the request it sent, and anything that does not parse
//! against that schema is a protocol error.
mod request;
mod response;
mod transport;

pub(crate) use response::{decode_ack, decode_probe_names};

pub use request::{Opcode, Request, RequestError};
pub use response::{ProbeTable, ResponseError, TmpBspValues, VectorReading};
pub use transport::{FrameTransport, TransportError};
