// file: src/protocol/connection.rs
// version: 1.0.0
// guid: f94d60a3-8b1e-4c57-d20f-5e386ab417c0

//! Buffered TCP connection to ds-server

use super::{Command, ServerEvent, ServerRecord};
use crate::{DsClientError, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// A line-oriented protocol connection to a ds-server instance
pub struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    /// Connect to the server with a timeout
    pub async fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<Self> {
        debug!("Connecting to {}:{}", host, port);

        let stream = match timeout(connect_timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(DsClientError::ConnectionError(format!(
                    "Failed to connect to {}:{}: {}",
                    host, port, e
                )))
            }
            Err(_) => {
                return Err(DsClientError::ConnectionError(format!(
                    "Connection to {}:{} timed out after {:?}",
                    host, port, connect_timeout
                )))
            }
        };

        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();

        debug!("Connected to {}:{}", host, port);
        Ok(Connection {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Send one command as a newline-terminated line
    pub async fn send(&mut self, command: &Command) -> Result<()> {
        let line = command.to_string();
        trace!("send: {}", line);

        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line, stripped of its terminator
    pub async fn recv_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(DsClientError::ConnectionError(
                "connection closed by server".to_string(),
            ));
        }

        let line = line.trim_end().to_string();
        trace!("recv: {}", line);
        Ok(line)
    }

    /// Send a command and receive the single-line reply
    pub async fn exchange(&mut self, command: &Command) -> Result<String> {
        self.send(command).await?;
        self.recv_line().await
    }

    /// Send a command and fail unless the server replies `OK`
    pub async fn expect_ok(&mut self, command: &Command) -> Result<()> {
        let reply = self.exchange(command).await?;
        if reply != "OK" {
            return Err(DsClientError::ProtocolError(format!(
                "expected OK in reply to '{}', got: {}",
                command, reply
            )));
        }
        Ok(())
    }

    /// Perform the HELO/AUTH handshake
    pub async fn handshake(&mut self, user: &str) -> Result<()> {
        self.expect_ok(&Command::Helo).await?;
        self.expect_ok(&Command::Auth(user.to_string())).await?;
        debug!("Handshake complete, authenticated as {}", user);
        Ok(())
    }

    /// Send `REDY` and parse the next simulation event
    pub async fn ready(&mut self) -> Result<ServerEvent> {
        let reply = self.exchange(&Command::Redy).await?;
        ServerEvent::parse(&reply)
    }

    /// Run a `GETS` data-block exchange and return the parsed records
    ///
    /// The server announces `DATA <n> <len>`, the client acknowledges with
    /// `OK`, the server sends `n` record lines, the client acknowledges
    /// again, and the server terminates the block with `.`.
    pub async fn server_records(&mut self, command: &Command) -> Result<Vec<ServerRecord>> {
        let header = self.exchange(command).await?;

        let mut fields = header.split_whitespace();
        if fields.next() != Some("DATA") {
            return Err(DsClientError::ProtocolError(format!(
                "expected DATA header in reply to '{}', got: {}",
                command, header
            )));
        }
        let count: usize = super::next_field(&mut fields, "nRecs", &header)?;

        self.send_raw("OK").await?;

        // The header's count is unvalidated input; cap the pre-allocation
        let mut records = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let line = self.recv_line().await?;
            records.push(ServerRecord::parse(&line)?);
        }

        self.send_raw("OK").await?;
        let terminator = self.recv_line().await?;
        if terminator != "." {
            return Err(DsClientError::ProtocolError(format!(
                "expected '.' terminating DATA block, got: {}",
                terminator
            )));
        }

        Ok(records)
    }

    /// Query the estimated wait time for a server via `EJWT`
    pub async fn estimated_wait(&mut self, server_type: &str, server_id: u32) -> Result<u64> {
        let command = Command::Ejwt {
            server_type: server_type.to_string(),
            server_id,
        };
        let reply = self.exchange(&command).await?;
        reply.trim().parse().map_err(|_| {
            DsClientError::ProtocolError(format!(
                "expected integer wait time in reply to '{}', got: {}",
                command, reply
            ))
        })
    }

    /// Terminate the session with `QUIT`
    pub async fn quit(&mut self) -> Result<()> {
        let reply = self.exchange(&Command::Quit).await?;
        if reply != "QUIT" {
            return Err(DsClientError::ProtocolError(format!(
                "expected QUIT acknowledgement, got: {}",
                reply
            )));
        }
        debug!("Session terminated");
        Ok(())
    }

    // Raw acknowledgements inside a DATA block are not Commands
    async fn send_raw(&mut self, line: &str) -> Result<()> {
        trace!("send: {}", line);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
