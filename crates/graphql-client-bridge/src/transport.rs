//! JSON-RPC framing over the server's stdio.
//!
//! Messages are framed as `Content-Length: N\r\n\r\n{json}`. Logs never go
//! through here; the server writes those to stderr.

use std::io::{self, BufRead, Write};

/// Write one framed JSON-RPC message.
pub(crate) fn write_message(writer: &mut impl Write, payload: &serde_json::Value) -> io::Result<()> {
    let body = payload.to_string();
    write!(writer, "Content-Length: {}\r\n\r\n{body}", body.len())?;
    writer.flush()
}

/// Read one framed JSON-RPC message.
///
/// Returns `Ok(None)` on a clean EOF at a message boundary (the server
/// closed its stdout). Unknown headers are skipped.
pub(crate) fn read_message(reader: &mut impl BufRead) -> io::Result<Option<serde_json::Value>> {
    let mut content_length: Option<usize> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            if content_length.is_none() {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed mid-header",
            ));
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Length:") {
            content_length = value.trim().parse().ok();
        }
    }

    let Some(length) = content_length else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "missing Content-Length header",
        ));
    };

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body)?;
    let message = serde_json::from_slice(&body)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(message))
}
