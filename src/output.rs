// Results writer: one {"product_name", "listings"} object per line
use crate::model::{Listing, MatchResult, OutputError};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ProductMatches<'a> {
    pub product_name: &'a str,
    pub listings: &'a [Listing],
}

/// Writes every non-empty group of `result` to `writer`, ordered by product id.
pub fn write_results<W: Write>(writer: &mut W, result: &MatchResult) -> Result<usize, OutputError> {
    let mut written = 0;
    for (product_id, listings) in &result.groups {
        if listings.is_empty() {
            continue;
        }
        let line = ProductMatches {
            product_name: product_id,
            listings,
        };
        serde_json::to_writer(&mut *writer, &line)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    Ok(written)
}

/// Creates (or truncates) `path` and writes the results into it.
pub fn save_results(path: &Path, result: &MatchResult) -> Result<usize, OutputError> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    let written = write_results(&mut writer, result)?;
    writer.flush().map_err(|source| io_error(path, source))?;
    info!(path = %path.display(), products = written, "Results saved");
    Ok(written)
}

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn one_line_per_matched_product() {
        let mut result = MatchResult::default();
        let mut listing = Listing::new("Canon EOS5D", "Canon");
        listing.extra.insert("price".into(), Value::String("1299.99".into()));
        result.groups.insert("P1".into(), vec![listing]);
        result.groups.insert("P2".into(), vec![]);

        let mut buf = Vec::new();
        let written = write_results(&mut buf, &result).unwrap();

        assert_eq!(written, 1);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["product_name"], "P1");
        assert_eq!(value["listings"][0]["title"], "Canon EOS5D");
        assert_eq!(value["listings"][0]["price"], "1299.99");
    }
}
