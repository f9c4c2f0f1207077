//! JSONL codec: one serialized message per newline-terminated line.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::DaemonError;

/// Write one message as a JSON line and flush.
pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), DaemonError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line =
        serde_json::to_string(msg).map_err(|e| DaemonError::ProtocolError(e.to_string()))?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one message. Returns `Ok(None)` on a cleanly closed stream.
pub async fn read_message<R, T>(reader: &mut R) -> Result<Option<T>, DaemonError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Ok(None);
    }
    let msg =
        serde_json::from_str(line.trim()).map_err(|e| DaemonError::ProtocolError(e.to_string()))?;
    Ok(Some(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{ClientMessage, DaemonMessage};
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let mut buf = Vec::new();
        let msg = ClientMessage::Ping {
            id: "req-1".to_string(),
        };
        write_message(&mut buf, &msg).await.unwrap();
        assert!(buf.ends_with(b"\n"));

        let mut reader = BufReader::new(buf.as_slice());
        let parsed: ClientMessage = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(parsed.id(), "req-1");
    }

    #[tokio::test]
    async fn test_read_eof_returns_none() {
        let mut reader = BufReader::new(&b""[..]);
        let msg: Option<DaemonMessage> = read_message(&mut reader).await.unwrap();
        assert!(msg.is_none());
    }

    #[tokio::test]
    async fn test_read_garbage_is_protocol_error() {
        let mut reader = BufReader::new(&b"this is not json\n"[..]);
        let result: Result<Option<ClientMessage>, _> = read_message(&mut reader).await;
        assert!(matches!(result, Err(DaemonError::ProtocolError(_))));
    }

    #[tokio::test]
    async fn test_read_consumes_one_line_at_a_time() {
        let data = b"{\"type\":\"ping\",\"id\":\"1\"}\n{\"type\":\"ping\",\"id\":\"2\"}\n";
        let mut reader = BufReader::new(&data[..]);
        let first: ClientMessage = read_message(&mut reader).await.unwrap().unwrap();
        let second: ClientMessage = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(first.id(), "1");
        assert_eq!(second.id(), "2");
    }
}
