//! Repository adapters for persistence layer

use lotkeeper_infra::persistence::{FileStateRepository, FileTariffRepository};
use lotkeeper_types::Result;

use crate::config::Config;

/// Open file-based snapshot repository
pub fn open_state_repo(config: &Config) -> Result<FileStateRepository> {
    Ok(FileStateRepository::new(config.state_path()?))
}

/// Open file-based tariff repository
pub fn open_tariff_repo(config: &Config) -> Result<FileTariffRepository> {
    Ok(FileTariffRepository::new(config.tariff_path()?))
}
