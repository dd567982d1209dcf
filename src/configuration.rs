use crate::{calendar::BusinessHours, error::ConfigError};
use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn password(&self) -> String;
    fn data_file(&self) -> Option<PathBuf>;
    fn port(&self) -> String;
    fn business_hours(&self) -> Result<BusinessHours, ConfigError>;
}
