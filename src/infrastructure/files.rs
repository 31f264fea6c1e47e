use crate::domain::errors::CallError;
use std::path::Path;

/// Reads the extra JSON payload file given with `--json-file`.
pub fn read_payload_file(path: &Path) -> Result<String, CallError> {
    std::fs::read_to_string(path).map_err(|source| CallError::PayloadRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Persists exactly the bytes that were displayed.
pub fn write_output_file(path: &Path, bytes: &[u8]) -> Result<(), CallError> {
    std::fs::write(path, bytes).map_err(|source| CallError::Output {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_payload_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        let err = read_payload_file(&path).unwrap_err();
        assert!(err.to_string().contains("body.json"));
        assert!(err.is_configuration());
    }

    #[test]
    fn output_file_gets_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output_file(&path, b"{\n  \"a\": 1\n}").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"{\n  \"a\": 1\n}");
    }

    #[test]
    fn unwritable_output_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_output_file(&dir.path().join("missing/out.json"), b"x").unwrap_err();
        assert!(matches!(err, CallError::Output { .. }));
    }
}
