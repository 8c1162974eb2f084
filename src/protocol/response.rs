use thiserror::Error;

use crate::model::{DipoleVector, Matrix};
use crate::wire::{Deserializer, WireError};

/// The single acknowledgement value mutating operations answer with.
const ACK: u8 = 1;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("server acknowledged with {found:#04x}, expected 0x01")]
    AckMismatch { found: u8 },

    #[error("response declares {total} values per reading, fewer than the 3 vector components")]
    CountUnderflow { total: u32 },

    #[error("malformed response: {0}")]
    Wire(#[from] WireError),
}

/// Probe table with its header row split out: column names, then the
/// numeric rows as a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTable {
    pub columns: Vec<String>,
    pub values: Matrix,
}

impl ProbeTable {
    /// Wire form: row count, column count, one name per column, then the
    /// numeric rows. The declared row count includes the header row, so a
    /// table of n numeric rows arrives as n + 1; counts of 0 and 1 both
    /// mean no numeric rows.
    pub(crate) fn decode(data: &[u8]) -> Result<Self, ResponseError> {
        let mut des = Deserializer::new(data);
        let rows = des.parse_u32()? as usize;
        let cols = des.parse_u32()? as usize;

        let mut columns = Vec::new();
        for _ in 0..cols {
            columns.push(des.parse_string()?);
        }

        let numeric_rows = rows.saturating_sub(1);
        let mut values = Vec::new();
        for _ in 0..numeric_rows {
            for _ in 0..cols {
                values.push(des.parse_double()?);
            }
        }
        des.finish()?;

        Ok(Self {
            columns,
            values: Matrix::from_raw(numeric_rows, cols, values),
        })
    }
}

/// Probe readings for one dipole vector, with the vector echoed back by the
/// server.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorReading {
    pub dipole: DipoleVector,
    pub probes: Vec<f64>,
}

impl VectorReading {
    /// Wire form: total value count (3 vector components + probe count),
    /// then one reading.
    pub(crate) fn decode(data: &[u8]) -> Result<Self, ResponseError> {
        let mut des = Deserializer::new(data);
        let probes = probe_count(des.parse_u32()?)?;
        let reading = Self::parse(&mut des, probes)?;
        des.finish()?;
        Ok(reading)
    }

    /// Wire form for a batch: one total value count up front, then
    /// `samples` consecutive readings. The sample count is not on the wire;
    /// it comes from the request that asked for the batch.
    pub(crate) fn decode_batch(data: &[u8], samples: u32) -> Result<Vec<Self>, ResponseError> {
        let mut des = Deserializer::new(data);
        let probes = probe_count(des.parse_u32()?)?;

        let mut readings = Vec::new();
        for _ in 0..samples {
            readings.push(Self::parse(&mut des, probes)?);
        }
        des.finish()?;
        Ok(readings)
    }

    fn parse(des: &mut Deserializer<'_>, probe_count: u32) -> Result<Self, WireError> {
        let dipole = DipoleVector::new(
            des.parse_double()?,
            des.parse_double()?,
            des.parse_double()?,
        );
        let mut probes = Vec::new();
        for _ in 0..probe_count {
            probes.push(des.parse_double()?);
        }
        Ok(Self { dipole, probes })
    }
}

fn probe_count(total: u32) -> Result<u32, ResponseError> {
    total
        .checked_sub(3)
        .ok_or(ResponseError::CountUnderflow { total })
}

/// One simulation run: transmembrane and body-surface potentials, one row
/// per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TmpBspValues {
    pub tmp: Matrix,
    pub bsp: Matrix,
}

impl TmpBspValues {
    /// Wire form: sample count, TMP column count, BSP column count, then per
    /// sample the TMP row immediately followed by the BSP row. The decoder
    /// de-interleaves into two matrices with one row per sample.
    pub(crate) fn decode(data: &[u8]) -> Result<Self, ResponseError> {
        let mut des = Deserializer::new(data);
        let samples = des.parse_u32()? as usize;
        let tmp_cols = des.parse_u32()? as usize;
        let bsp_cols = des.parse_u32()? as usize;

        let mut tmp = Vec::new();
        let mut bsp = Vec::new();
        for _ in 0..samples {
            for _ in 0..tmp_cols {
                tmp.push(des.parse_double()?);
            }
            for _ in 0..bsp_cols {
                bsp.push(des.parse_double()?);
            }
        }
        des.finish()?;

        Ok(Self {
            tmp: Matrix::from_raw(samples, tmp_cols, tmp),
            bsp: Matrix::from_raw(samples, bsp_cols, bsp),
        })
    }
}

/// Decodes the single acknowledgement byte mutating operations answer with.
///
/// Any value other than 1 is a hard error. The simulator really does answer
/// 0, for example when an uploaded TMP table's column count does not match
/// its probe set, so this path is reachable in production.
pub(crate) fn decode_ack(data: &[u8]) -> Result<(), ResponseError> {
    let mut des = Deserializer::new(data);
    let found = des.parse_u8()?;
    if found != ACK {
        return Err(ResponseError::AckMismatch { found });
    }
    des.finish()?;
    Ok(())
}

/// Decodes a count-prefixed list of probe names.
pub(crate) fn decode_probe_names(data: &[u8]) -> Result<Vec<String>, ResponseError> {
    let mut des = Deserializer::new(data);
    let count = des.parse_u32()?;

    let mut names = Vec::new();
    for _ in 0..count {
        names.push(des.parse_string()?);
    }
    des.finish()?;
    Ok(names)
}
