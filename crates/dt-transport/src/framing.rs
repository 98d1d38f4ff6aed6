//! Message framing for the LSP Base Protocol (Content-Length headers).

use dt_protocol::{JsonRpcRequest, JsonRpcResponse};
use std::collections::HashMap;
use std::io::{self, Read, Write};

/// Read one LSP message from a buffered reader.
///
/// Returns `Ok(None)` only on EOF or a framing-level error (missing/invalid
/// `Content-Length`) from which the byte stream cannot be resynchronized. A
/// frame whose body fails to parse as JSON is logged and skipped internally
/// — the header told us exactly how many bytes to consume, so the stream
/// stays in sync and the next frame is read instead. Returns `Err` only for
/// I/O errors, which are not recoverable.
pub fn read_message<R: io::BufRead>(reader: &mut R) -> io::Result<Option<JsonRpcRequest>> {
    loop {
        let mut headers = HashMap::new();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(": ") {
                headers.insert(key.to_string(), value.to_string());
            }
        }

        let Some(content_length) = headers.get("Content-Length") else {
            return Ok(None);
        };
        let Ok(length) = content_length.parse::<usize>() else {
            return Ok(None);
        };

        let mut content = vec![0u8; length];
        reader.read_exact(&mut content)?;

        match serde_json::from_slice(&content) {
            Ok(request) => return Ok(Some(request)),
            Err(err) => {
                tracing::warn!(error = %err, "malformed JSON-RPC frame, dropping");
                continue;
            }
        }
    }
}

/// Write a framed JSON-RPC response.
pub fn write_message<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    write_value(writer, &serde_json::to_value(response)?)
}

/// Write a framed JSON-RPC notification (server -> client).
pub fn write_notification<W: Write>(
    writer: &mut W,
    method: &str,
    params: serde_json::Value,
) -> io::Result<()> {
    write_value(writer, &dt_protocol::jsonrpc::notification(method, params))
}

fn write_value<W: Write>(writer: &mut W, value: &serde_json::Value) -> io::Result<()> {
    let content = serde_json::to_string(value)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", content.len(), content)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Cursor};

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
    }

    #[test]
    fn reads_a_single_request() {
        let raw = frame(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#);
        let mut reader = Cursor::new(raw.into_bytes());
        let request = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(request.method, "initialize");
        assert_eq!(request.id, Some(serde_json::json!(1)));
    }

    #[test]
    fn returns_none_on_clean_eof() {
        let mut reader = Cursor::new(Vec::new());
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn skips_a_malformed_frame_and_reads_the_next_one() {
        let mut raw = frame("{not valid json");
        raw.push_str(&frame(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown","params":null}"#));
        let mut reader = Cursor::new(raw.into_bytes());
        let request = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(request.method, "shutdown");
    }

    #[test]
    fn notification_has_no_id() {
        let raw = frame(r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#);
        let mut reader = Cursor::new(raw.into_bytes());
        let request = read_message(&mut reader).unwrap().unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn write_message_round_trips_through_read_message() {
        let response = JsonRpcResponse::success(Some(serde_json::json!(7)), serde_json::json!({"ok": true}));
        let mut buf = Vec::new();
        write_message(&mut buf, &response).unwrap();

        let mut reader = Cursor::new(buf);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert!(line.starts_with("Content-Length: "));
    }
}
