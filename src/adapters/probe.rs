//! HTTP reachability probe.
//!
//! Implements [`ProbePort`] over blocking `std::net` sockets (lwIP on
//! ESP-IDF): resolve the host, connect to the first address that accepts,
//! send a `Connection: close` GET and drain the response.  The probe
//! succeeds only when the peer closes the stream cleanly, and the whole
//! response must arrive within the deadline measured from connect.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use log::debug;

use crate::app::ports::ProbePort;
use crate::config::NodeConfig;
use crate::connectivity::ProbeError;

const USER_AGENT: &str = "firenode/0.1 esp32";

pub struct HttpProbe {
    host: heapless::String<64>,
    port: u16,
    path: heapless::String<64>,
    timeout: Duration,
    deadline: Duration,
}

impl HttpProbe {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            host: config.probe_host.clone(),
            port: config.probe_port,
            path: config.probe_path.clone(),
            timeout: config.probe_timeout(),
            deadline: config.probe_deadline(),
        }
    }

    fn resolve(&self) -> Result<heapless::Vec<SocketAddr, 4>, ProbeError> {
        let addrs: heapless::Vec<SocketAddr, 4> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| ProbeError::DnsFailed)?
            .take(4)
            .collect();
        if addrs.is_empty() {
            return Err(ProbeError::DnsFailed);
        }
        debug!("PROBE: {} resolved to {}", self.host, addrs[0]);
        Ok(addrs)
    }

    fn connect(&self, addrs: &[SocketAddr]) -> Result<TcpStream, ProbeError> {
        let stream = addrs
            .iter()
            .find_map(|addr| TcpStream::connect_timeout(addr, self.timeout).ok())
            .ok_or(ProbeError::ConnectFailed)?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|()| stream.set_write_timeout(Some(self.timeout)))
            .map_err(|_| ProbeError::ConnectFailed)?;
        Ok(stream)
    }

    fn request(&self) -> std::string::String {
        format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n\r\n",
            self.path, self.host, USER_AGENT
        )
    }
}

impl ProbePort for HttpProbe {
    fn probe(&mut self) -> Result<(), ProbeError> {
        let addrs = self.resolve()?;
        let mut stream = self.connect(&addrs)?;
        let deadline = Instant::now() + self.deadline;

        stream
            .write_all(self.request().as_bytes())
            .map_err(|_| ProbeError::SendFailed)?;

        let mut buf = [0u8; 128];
        let mut received = 0usize;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("PROBE: deadline passed after {} bytes", received);
                return Err(ProbeError::ReadFailed);
            }
            stream
                .set_read_timeout(Some(remaining.min(self.timeout)))
                .map_err(|_| ProbeError::ReadFailed)?;
            match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => received += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return Err(ProbeError::ReadFailed),
            }
        }
        debug!("PROBE: {} bytes before close", received);
        Ok(())
    }
}
