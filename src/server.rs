//! Connection handling for the handshake listener.
//!
//! The server is strictly sequential: one accepted client at a time, every
//! native call blocking. Anything that fails here is fatal for the
//! connection, never for the process.

use std::io::Write;
use std::net::TcpStream;

use crate::error::ServerError;
use crate::hello::HelloPacket;

/// Default TCP port the listener binds to.
pub const DEFAULT_PORT: u16 = 6666;

/// Sends the handshake record to a freshly accepted client.
///
/// The packet is gathered fresh for every connection and written raw; the
/// client reads exactly [`HelloPacket::WIRE_LEN`] bytes.
pub fn greet_client(stream: &mut TcpStream) -> Result<(), ServerError> {
    let hello = HelloPacket::gather()?;
    stream.write_all(&hello.to_bytes())?;

    Ok(())
}
