// Listener module
// Binds the serving socket before the runtime starts accepting

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind `addr` and hand the socket to tokio.
///
/// `SO_REUSEADDR` keeps quick restarts from tripping over a socket in
/// TIME_WAIT. Any failure here is fatal to startup; there is no address to
/// fall back to.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_an_ephemeral_port() {
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.port() > 0);
    }

    #[tokio::test]
    async fn bind_to_taken_port_fails() {
        let first = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = first.local_addr().unwrap();

        // SO_REUSEADDR does not allow two live listeners on one port
        let second = bind_listener(addr);
        assert!(second.is_err());
    }
}
