use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::AgentStream;

/// TCP transport to a Zabbix agent.
pub struct TcpTransport;

impl TcpTransport {
    /// Connect to `host:port`, bounding connection establishment by `timeout`.
    ///
    /// Every resolved address is tried in order; the error from the last
    /// attempt is returned when none succeeds. The timeout applies to each
    /// attempt, not to reads or writes on the returned stream.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<AgentStream> {
        if port == 0 {
            return Err(TransportError::InvalidPort(port));
        }

        let addr = join_host_port(host, port);
        let lookup = host.trim_start_matches('[').trim_end_matches(']');
        let candidates: Vec<SocketAddr> = (lookup, port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                addr: addr.clone(),
                source,
            })?
            .collect();

        let mut last_err = None;
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(stream) => {
                    debug!(%addr, peer = %candidate, "connected to agent");
                    return Ok(AgentStream::from(stream));
                }
                Err(err) => {
                    debug!(%addr, peer = %candidate, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        match last_err {
            Some(source) => Err(TransportError::Connect { addr, source }),
            None => Err(TransportError::NoAddresses { addr }),
        }
    }
}

/// Join host and port, bracketing bare IPv6 literals.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connects_to_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let stream = TcpTransport::connect("127.0.0.1", port, Duration::from_secs(1)).unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[test]
    fn refused_connection_is_connect_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = TcpTransport::connect("127.0.0.1", port, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }

    #[test]
    fn port_zero_rejected() {
        let err = TcpTransport::connect("127.0.0.1", 0, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TransportError::InvalidPort(0)));
    }

    #[test]
    fn join_host_port_brackets_ipv6() {
        assert_eq!(join_host_port("localhost", 10050), "localhost:10050");
        assert_eq!(join_host_port("::1", 10050), "[::1]:10050");
        assert_eq!(join_host_port("[::1]", 10050), "[::1]:10050");
    }

    #[test]
    fn timeout_classification() {
        let err = TransportError::Connect {
            addr: "192.0.2.1:10050".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::TimedOut),
        };
        assert!(err.is_timeout());
        assert!(!TransportError::InvalidPort(0).is_timeout());
    }
}
