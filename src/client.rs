//! Blocking client for a running simulator instance.
//!
//! [`SimulatorClient`] exposes one method per server operation. Every call is
//! an independent exchange: it opens a fresh TCP connection, sends the framed
//! request, blocks for the framed response, decodes it, and closes the
//! connection. The client itself holds no connection state, so it is cheap to
//! keep around for the lifetime of a session.
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::model::{DipoleVector, Matrix};
use crate::protocol::{
    FrameTransport, ProbeTable, Request, RequestError, ResponseError, TmpBspValues,
    TransportError, VectorReading, decode_ack, decode_probe_names,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// Socket tuning for a client. The defaults reproduce plain blocking
/// behavior with no deadlines.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

pub struct SimulatorClient {
    address: SocketAddr,
    config: ClientConfig,
}

impl SimulatorClient {
    pub fn new(address: SocketAddr) -> Self {
        Self::with_config(address, ClientConfig::default())
    }

    pub fn with_config(address: SocketAddr, config: ClientConfig) -> Self {
        Self { address, config }
    }

    /// Fetches the probe table accumulated by the simulator: column names
    /// plus one numeric row per recorded step.
    pub fn get_probes_values(&self) -> Result<ProbeTable, ClientError> {
        let response = self.round_trip(&Request::GetProbesValues)?;
        Ok(ProbeTable::decode(&response)?)
    }

    /// Points the simulated dipole source at a new vector.
    pub fn set_dipole_vector(&self, vector: DipoleVector) -> Result<(), ClientError> {
        let response = self.round_trip(&Request::SetDipoleVector(vector))?;
        Ok(decode_ack(&response)?)
    }

    /// Lists the simulator's probe names in table order.
    pub fn get_probes_names(&self) -> Result<Vec<String>, ClientError> {
        let response = self.round_trip(&Request::GetProbesNames)?;
        Ok(decode_probe_names(&response)?)
    }

    /// Runs one forward calculation for the given vector and returns the
    /// probe readings, with the vector echoed back by the server.
    pub fn calculate_values_for_vector(
        &self,
        vector: DipoleVector,
    ) -> Result<VectorReading, ClientError> {
        let response = self.round_trip(&Request::CalculateValuesForVector(vector))?;
        Ok(VectorReading::decode(&response)?)
    }

    /// Runs forward calculations for `samples` random vectors drawn by the
    /// server within `max_radius`, one reading per sample.
    pub fn calculate_values_for_random_vectors(
        &self,
        samples: u32,
        max_radius: f64,
    ) -> Result<Vec<VectorReading>, ClientError> {
        let request = Request::CalculateValuesForRandomVectors {
            samples,
            max_radius,
        };
        let response = self.round_trip(&request)?;
        Ok(VectorReading::decode_batch(&response, samples)?)
    }

    /// Replaces the simulator's dipole vector sequence.
    pub fn set_dipole_vector_values(
        &self,
        vectors: Vec<DipoleVector>,
    ) -> Result<(), ClientError> {
        let response = self.round_trip(&Request::SetDipoleVectorValues(vectors))?;
        Ok(decode_ack(&response)?)
    }

    /// Fetches the transmembrane and body-surface potentials of the current
    /// run.
    pub fn get_tmp_bsp_values(&self) -> Result<TmpBspValues, ClientError> {
        let response = self.round_trip(&Request::GetTmpBspValues)?;
        Ok(TmpBspValues::decode(&response)?)
    }

    /// Uploads a transmembrane potential table for the simulator to replay.
    ///
    /// The server acknowledges with 0 when the table's column count does not
    /// match its probe set, which surfaces here as
    /// [`ResponseError::AckMismatch`].
    pub fn set_tmp_values(&self, matrix: Matrix) -> Result<(), ClientError> {
        let response = self.round_trip(&Request::SetTmpValues(matrix))?;
        Ok(decode_ack(&response)?)
    }

    /// Like [`SimulatorClient::get_tmp_bsp_values`], sampled at the probe
    /// locations.
    pub fn get_tmp_bsp_values_probes(&self) -> Result<TmpBspValues, ClientError> {
        let response = self.round_trip(&Request::GetTmpBspValuesProbes)?;
        Ok(TmpBspValues::decode(&response)?)
    }

    /// Second probe-sampled variant; same shape as
    /// [`SimulatorClient::get_tmp_bsp_values_probes`], computed from the
    /// uploaded TMP table instead of the dipole model.
    pub fn get_tmp_bsp_values_probes2(&self) -> Result<TmpBspValues, ClientError> {
        let response = self.round_trip(&Request::GetTmpBspValuesProbes2)?;
        Ok(TmpBspValues::decode(&response)?)
    }

    fn round_trip(&self, request: &Request) -> Result<Vec<u8>, ClientError> {
        let payload = request.encode()?;
        debug!(
            "sending {:?} ({} bytes) to {}",
            request.opcode(),
            payload.len(),
            self.address
        );

        let stream = self.dial()?;
        let mut transport = FrameTransport::new(stream);
        let response = transport.round_trip(&payload)?;
        debug!("received {} response bytes", response.len());

        // transport (and its stream) dropped here; the connection is closed
        // after every exchange
        Ok(response)
    }

    fn dial(&self) -> Result<TcpStream, TransportError> {
        let stream = match self.config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&self.address, timeout),
            None => TcpStream::connect(self.address),
        }
        .map_err(|source| TransportError::Connect {
            addr: self.address,
            source,
        })?;

        stream.set_read_timeout(self.config.read_timeout)?;
        stream.set_write_timeout(self.config.write_timeout)?;
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::wire::Serializer;

    /// Loopback stand-in for the simulator: answers one connection per
    /// scripted response, framing each one, and hands back the request
    /// payloads it received.
    fn serve(responses: Vec<Vec<u8>>) -> (SocketAddr, thread::JoinHandle<Vec<Vec<u8>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();

                let mut header = [0u8; 4];
                stream.read_exact(&mut header).unwrap();
                let mut request = vec![0u8; u32::from_be_bytes(header) as usize];
                stream.read_exact(&mut request).unwrap();
                requests.push(request);

                stream
                    .write_all(&(response.len() as u32).to_be_bytes())
                    .unwrap();
                stream.write_all(&response).unwrap();
            }
            requests
        });

        (address, handle)
    }

    fn encode_names(names: &[&str]) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.push_u32(names.len() as u32);
        for name in names {
            ser.push_u16(name.len() as u16);
            for byte in name.as_bytes() {
                ser.push_u8(*byte);
            }
            ser.push_u8(0);
        }
        ser.into_bytes()
    }

    #[test]
    fn probe_names_round_trip_over_tcp() {
        let (address, handle) = serve(vec![encode_names(&["V1", "V6", "LA"])]);

        let client = SimulatorClient::new(address);
        let names = client.get_probes_names().unwrap();
        assert_eq!(names, ["V1", "V6", "LA"]);

        let requests = handle.join().unwrap();
        assert_eq!(requests, [[0, 0, 0, 3]]);
    }

    #[test]
    fn set_dipole_vector_sends_payload_and_reads_ack() {
        let (address, handle) = serve(vec![vec![1]]);

        let client = SimulatorClient::new(address);
        client
            .set_dipole_vector(DipoleVector::new(1.0, 2.0, 3.0))
            .unwrap();

        let mut expected = vec![0, 0, 0, 2];
        for value in [1.0f64, 2.0, 3.0] {
            expected.extend_from_slice(&value.to_be_bytes());
        }
        assert_eq!(handle.join().unwrap(), [expected]);
    }

    #[test]
    fn rejected_ack_surfaces_as_error() {
        let (address, _handle) = serve(vec![vec![0]]);

        let client = SimulatorClient::new(address);
        let err = client.set_dipole_vector(DipoleVector::new(0.0, 0.0, 0.0));
        assert!(matches!(
            err,
            Err(ClientError::Response(ResponseError::AckMismatch {
                found: 0
            }))
        ));
    }

    #[test]
    fn every_call_dials_a_fresh_connection() {
        let (address, handle) = serve(vec![vec![1], vec![1]]);

        let client = SimulatorClient::new(address);
        client.set_dipole_vector(DipoleVector::new(1.0, 0.0, 0.0)).unwrap();
        client.set_dipole_vector(DipoleVector::new(0.0, 1.0, 0.0)).unwrap();

        // each call was accepted as its own connection
        assert_eq!(handle.join().unwrap().len(), 2);
    }

    #[test]
    fn unreachable_server_is_a_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let client = SimulatorClient::new(address);
        assert!(matches!(
            client.get_probes_names(),
            Err(ClientError::Transport(TransportError::Connect { .. }))
        ));
    }

    #[test]
    fn read_timeout_cuts_off_a_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        // accepts the call, swallows the request, never answers; exits once
        // the timed-out client hangs up
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut sink = Vec::new();
            let _ = stream.read_to_end(&mut sink);
        });

        let config = ClientConfig {
            read_timeout: Some(Duration::from_millis(50)),
            ..ClientConfig::default()
        };
        let client = SimulatorClient::with_config(address, config);
        assert!(matches!(
            client.get_probes_names(),
            Err(ClientError::Transport(TransportError::Io(_)))
        ));
        handle.join().unwrap();
    }
}
