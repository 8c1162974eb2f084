use thiserror::Error;

use crate::model::{DipoleVector, Matrix};
use crate::wire::Serializer;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("element count {count} does not fit the u32 the wire format carries")]
    CountOverflow { count: usize },
}

/// Operation selector, the first four bytes of every request.
///
/// The numbering is the server's dispatch table and is frozen; new
/// operations extend the set, existing values never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    GetProbesValues = 1,
    SetDipoleVector = 2,
    GetProbesNames = 3,
    CalculateValuesForVector = 4,
    CalculateValuesForRandomVectors = 5,
    SetDipoleVectorValues = 6,
    GetTmpBspValues = 7,
    SetTmpValues = 8,
    GetTmpBspValuesProbes = 9,
    GetTmpBspValuesProbes2 = 10,
}

/// One request the simulator understands, carrying the fields its opcode
/// requires. [`Request::encode`] produces the exact byte sequence the server
/// parses: opcode first, then the payload in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetProbesValues,
    SetDipoleVector(DipoleVector),
    GetProbesNames,
    CalculateValuesForVector(DipoleVector),
    CalculateValuesForRandomVectors { samples: u32, max_radius: f64 },
    SetDipoleVectorValues(Vec<DipoleVector>),
    GetTmpBspValues,
    SetTmpValues(Matrix),
    GetTmpBspValuesProbes,
    GetTmpBspValuesProbes2,
}

impl Request {
    pub fn opcode(&self) -> Opcode {
        match self {
            Request::GetProbesValues => Opcode::GetProbesValues,
            Request::SetDipoleVector(_) => Opcode::SetDipoleVector,
            Request::GetProbesNames => Opcode::GetProbesNames,
            Request::CalculateValuesForVector(_) => Opcode::CalculateValuesForVector,
            Request::CalculateValuesForRandomVectors { .. } => {
                Opcode::CalculateValuesForRandomVectors
            }
            Request::SetDipoleVectorValues(_) => Opcode::SetDipoleVectorValues,
            Request::GetTmpBspValues => Opcode::GetTmpBspValues,
            Request::SetTmpValues(_) => Opcode::SetTmpValues,
            Request::GetTmpBspValuesProbes => Opcode::GetTmpBspValuesProbes,
            Request::GetTmpBspValuesProbes2 => Opcode::GetTmpBspValuesProbes2,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, RequestError> {
        let mut ser = Serializer::new();
        ser.push_u32(self.opcode() as u32);

        match self {
            Request::GetProbesValues
            | Request::GetProbesNames
            | Request::GetTmpBspValues
            | Request::GetTmpBspValuesProbes
            | Request::GetTmpBspValuesProbes2 => {}
            Request::SetDipoleVector(vector) | Request::CalculateValuesForVector(vector) => {
                push_vector(&mut ser, vector);
            }
            Request::CalculateValuesForRandomVectors {
                samples,
                max_radius,
            } => {
                ser.push_u32(*samples);
                ser.push_double(*max_radius);
            }
            Request::SetDipoleVectorValues(vectors) => {
                ser.push_u32(wire_count(vectors.len())?);
                for vector in vectors {
                    push_vector(&mut ser, vector);
                }
            }
            Request::SetTmpValues(matrix) => {
                ser.push_u32(wire_count(matrix.rows())?);
                ser.push_u32(wire_count(matrix.cols())?);
                for value in matrix.as_slice() {
                    ser.push_double(*value);
                }
            }
        }

        Ok(ser.into_bytes())
    }
}

fn push_vector(ser: &mut Serializer, vector: &DipoleVector) {
    ser.push_double(vector.x);
    ser.push_double(vector.y);
    ser.push_double(vector.z);
}

fn wire_count(count: usize) -> Result<u32, RequestError> {
    u32::try_from(count).map_err(|_| RequestError::CountOverflow { count })
}
