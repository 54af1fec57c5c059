//! JSON output for crawl results and task outcomes

use crate::output::OutputResult;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serializes a value as pretty-printed JSON
pub fn to_json_string<T: Serialize>(value: &T) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes a value as pretty-printed JSON to `path`, or to stdout when `None`
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> OutputResult<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_json_to_file() {
        let file = NamedTempFile::new().unwrap();
        let value = json!({ "success": true, "pages_scraped": 2 });

        write_json(&value, Some(file.path())).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(written, value);
    }

    #[test]
    fn test_to_json_string_is_pretty() {
        let text = to_json_string(&json!({ "a": 1 })).unwrap();
        assert!(text.contains('\n'));
    }
}
