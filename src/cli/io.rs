//! JSON output for the CLI
//!
//! One JSON object per invocation on stdout, UTF-8 only.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn print_response(data: Value) -> CliResult<()> {
    write_response(&mut io::stdout(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_one_json_line() {
        let mut buf = Vec::new();
        write_response(&mut buf, serde_json::json!({"count": 3})).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["count"], 3);
    }
}
