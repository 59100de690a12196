use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use crate::input::ArtifactError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let reader = open_maybe_gz(path)?;
    serde_json::from_reader(reader).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}
