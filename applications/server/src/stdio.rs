//! Line-delimited JSON transport
//!
//! One request envelope per input line, one response line per request.
//! `ping` answers with an empty line; failures answer with the error
//! envelope and the loop keeps going.

use crate::{
    error::{Result, ServiceError},
    service::RequestService,
};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Serve requests from `reader` until end of input
pub fn run_stdio<R, W>(service: &RequestService, reader: R, mut writer: W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = respond(service, line.as_bytes());
        writeln!(writer, "{}", response)?;
        writer.flush()?;
    }
    debug!("stdin closed");
    Ok(())
}

/// Response line for a single raw request
pub fn respond(service: &RequestService, raw: &[u8]) -> String {
    match service.handle_json(raw).and_then(|reply| render(reply.to_json())) {
        Ok(Some(body)) => body.to_string(),
        Ok(None) => String::new(),
        Err(e) => {
            warn!(kind = %e.kind(), "request failed: {}", e);
            match serde_json::to_string(&e.envelope()) {
                Ok(body) => body,
                Err(_) => String::from(r#"{"error":{"kind":"Internal","message":"unserializable error"}}"#),
            }
        }
    }
}

/// One-shot `release` answer for `dir` and whether it succeeded
///
/// A failure renders the error envelope, so the output is always JSON.
pub fn release_once(service: &RequestService, dir: &str, pretty: bool) -> (String, bool) {
    let params = serde_json::json!({ "dir": dir });
    let (value, ok) = match service
        .handle("release", &params)
        .and_then(|reply| render(reply.to_json()))
    {
        Ok(body) => (body.unwrap_or(Value::Null), true),
        Err(e) => {
            warn!(kind = %e.kind(), "release failed: {}", e);
            (serde_json::to_value(e.envelope()).unwrap_or(Value::Null), false)
        }
    };
    let text = if pretty {
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    };
    (text, ok)
}

fn render(json: serde_json::Result<Option<Value>>) -> Result<Option<Value>> {
    json.map_err(|e| ServiceError::Internal(format!("failed to serialize reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdreader_tags::{Assembler, ExtractLimits, ExtractionPool};
    use std::{io::Cursor, sync::Arc};

    fn service() -> RequestService {
        let pool = Arc::new(ExtractionPool::new(1).unwrap());
        RequestService::new(Assembler::new(pool, ExtractLimits::default()))
    }

    #[test]
    fn one_line_per_request() {
        let input = "{\"cmd\":\"ping\"}\n\n{\"cmd\":\"info\"}\nnot json\n";
        let mut output = Vec::new();
        run_stdio(&service(), Cursor::new(input), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "");

        let info: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(info["name"], "mdreader");

        let error: Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(error["error"]["kind"], "InvalidParams");
    }

    #[test]
    fn missing_directory_is_reported_inline() {
        let line = respond(
            &service(),
            br#"{"cmd":"release","params":{"dir":"/nonexistent/mdreader/album"}}"#,
        );
        let error: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(error["error"]["kind"], "DirectoryNotFound");
    }

    #[test]
    fn one_shot_failure_prints_error_envelope() {
        let (body, ok) = release_once(&service(), "/nonexistent/mdreader/album", true);
        assert!(!ok);
        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"]["kind"], "DirectoryNotFound");
        assert!(body.contains('\n'));
    }
}
