use std::fs;

use crate::report::types::InputRef;
use crate::util::hash::sha256_hex;

pub(crate) fn read_file_bytes(path: &str) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("Unable to read bytes from {path}: {e}"))
}

pub(crate) fn read_file_text(path: &str) -> Result<String, String> {
    let bytes = read_file_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| format!("Unable to read text from {path}: {e}"))
}

/// Reads an input file once, returning its text and a provenance entry for the report.
pub(crate) fn read_input(label: &str, path: &str) -> Result<(String, InputRef), String> {
    let bytes = read_file_bytes(path)?;
    let input = InputRef {
        label: label.to_string(),
        path: path.to_string(),
        sha256: sha256_hex(&bytes),
    };
    let text =
        String::from_utf8(bytes).map_err(|e| format!("Unable to read text from {path}: {e}"))?;
    Ok((text, input))
}

#[cfg(test)]
mod tests {
    use super::{read_file_text, read_input};
    use uuid::Uuid;

    #[test]
    fn input_refs_hash_the_file_bytes() {
        let tmp = std::env::temp_dir().join(format!("insights-assets-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&tmp).expect("tmp");
        let path = tmp.join("survey.json");
        std::fs::write(&path, "abc").expect("write");
        let path_str = path.to_string_lossy().to_string();
        let (text, input) = read_input("Survey", &path_str).expect("read");
        assert_eq!(text, "abc");
        assert_eq!(
            input.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let _ = std::fs::remove_dir_all(tmp);
    }

    #[test]
    fn missing_files_report_the_path() {
        let err = read_file_text("/definitely/not/here.json").expect_err("missing");
        assert!(err.contains("/definitely/not/here.json"));
    }
}
