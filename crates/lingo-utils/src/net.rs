use listenfd::ListenFd;
use std::io;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

/// Binds the listener, preferring a socket passed in by the supervisor
/// (systemd socket activation) when neither host nor port was given.
pub async fn create_listener(
    (host, port): (Option<IpAddr>, Option<u16>),
    (default_host, default_port): (IpAddr, u16),
) -> io::Result<TcpListener> {
    if host.is_none() && port.is_none()
        && let Some(listener) = ListenFd::from_env().take_tcp_listener(0)?
    {
        listener.set_nonblocking(true)?;
        tracing::debug!("using inherited listener");
        return TcpListener::from_std(listener);
    }

    let address = SocketAddr::from((host.unwrap_or(default_host), port.unwrap_or(default_port)));
    tracing::debug!(%address, "binding listener");
    TcpListener::bind(address).await
}
