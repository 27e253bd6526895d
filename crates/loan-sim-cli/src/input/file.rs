use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a simulation request from a JSON file. Relative paths resolve
/// against the working directory.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let path = Path::new(path);
    if !path.is_file() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }

    let file = File::open(path).map_err(|e| format!("Cannot open '{}': {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Invalid request JSON in '{}': {e}", path.display()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_missing_file() {
        let err = read_json::<Value>("no/such/request.json").unwrap_err();
        assert!(err.to_string().starts_with("Input file not found"));
    }

    #[test]
    fn test_reads_request_file() {
        let path = std::env::temp_dir().join(format!("loansim-request-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"value": 50000, "payment_deadline": 24}"#).unwrap();
        let request: Value = read_json(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(request["payment_deadline"], 24);
    }
}
