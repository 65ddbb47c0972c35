use crate::{error, info, log};
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

/// Upper bound for one inbound frame; subscribers only send small commands.
pub const MAX_FRAME_LEN: u32 = 64 * 1024;

/// Reads one `u32` big-endian length-prefixed frame.
pub async fn read_frame<R: AsyncRead + Unpin>(socket: &mut R) -> Result<Vec<u8>, std::io::Error> {
    let length = socket.read_u32().await?;
    if length > MAX_FRAME_LEN {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("frame of {length} bytes exceeds {MAX_FRAME_LEN}"),
        ));
    }
    let mut buffer = vec![0u8; length as usize];
    socket.read_exact(&mut buffer).await?;
    Ok(buffer)
}

/// Writes one length-prefixed frame.
#[allow(clippy::cast_possible_truncation)]
pub async fn write_frame<W: AsyncWrite + Unpin>(
    socket: &mut W,
    payload: &[u8],
) -> Result<(), std::io::Error> {
    socket.write_u32(payload.len() as u32).await?;
    socket.write_all(payload).await?;
    socket.flush().await
}

/// Listens for subscribers and hands every accepted connection to a session.
pub struct ConsoleEndpoint {
    listener: TcpListener,
}

impl ConsoleEndpoint {
    pub async fn bind(addr: &str) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        info!("Subscriber endpoint listening on {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> { self.listener.local_addr() }

    /// Accepts until `token` is cancelled, spawning `session` per connection
    /// with a child token.
    pub async fn serve<S, Fut>(self, token: CancellationToken, session: S)
    where
        S: Fn(TcpStream, CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        loop {
            let accept = tokio::select! {
                accept = self.listener.accept() => accept,
                () = token.cancelled() => break,
            };
            match accept {
                Ok((socket, peer)) => {
                    log!("Subscriber {peer} connected");
                    tokio::spawn(session(socket, token.child_token()));
                }
                Err(e) => {
                    error!("Accepting a subscriber failed: {e}");
                    break;
                }
            }
        }
        log!("Subscriber endpoint closed");
    }
}
