//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (VIEWER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot read the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Invalid parameters: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file from `$VIEWER_SW_ROOT/params/{param_file_path}`.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    let params_dir = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?
        .join("params");

    load_path(params_dir.join(param_file_path))
}

/// Load a parameter file from an explicit path.
pub fn load_path<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>,
{
    let params_str = read_to_string(path).map_err(LoadError::FileLoadError)?;

    from_str(&params_str)
}

/// Parse parameters from a TOML string.
///
/// Parameter structs use `#[serde(default)]`, so an empty string gives the
/// defaults.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TestParams {
        rate: u32,
        range_m: [f64; 2],
    }

    #[test]
    fn test_from_str() {
        let p: TestParams = from_str("rate = 3\nrange_m = [0.5, 120.0]").unwrap();
        assert_eq!(p.rate, 3);
        assert_eq!(p.range_m, [0.5, 120.0]);

        match from_str::<TestParams>("rate = \"three\"") {
            Err(LoadError::DeserialiseError(_)) => (),
            r => panic!("Expected a deserialise error, got {:?}", r)
        }
    }

    #[test]
    fn test_load_path_missing() {
        match load_path::<TestParams, _>("/this/file/does/not/exist.toml") {
            Err(LoadError::FileLoadError(_)) => (),
            r => panic!("Expected a file load error, got {:?}", r)
        }
    }
}
