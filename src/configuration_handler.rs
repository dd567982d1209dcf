use crate::{calendar::BusinessHours, configuration::Configuration, error::ConfigError};
use chrono::Weekday;
use clap::Parser;
use std::path::PathBuf;

/// Single-provider appointment scheduler.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(long, env = "SCHEDULER_PORT", default_value = "3000")]
    port: String,

    /// Password required in the `x-admin-password` header for admin routes
    #[arg(long, env = "SCHEDULER_ADMIN_PASSWORD")]
    password: String,

    /// JSON file the appointments are kept in. Appointments are lost on
    /// shutdown if omitted.
    #[arg(long, env = "SCHEDULER_DATA_FILE")]
    data_file: Option<PathBuf>,

    #[arg(long, env = "SCHEDULER_OPEN_HOUR", default_value_t = 7)]
    open_hour: u32,

    #[arg(long, env = "SCHEDULER_CLOSE_HOUR", default_value_t = 19)]
    close_hour: u32,

    /// Weekly rest day, e.g. `sunday` or `mon`
    #[arg(long, env = "SCHEDULER_CLOSED_DAY", default_value = "sunday")]
    closed_day: Weekday,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn password(&self) -> String {
        self.password.clone()
    }

    fn data_file(&self) -> Option<PathBuf> {
        self.data_file.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn business_hours(&self) -> Result<BusinessHours, ConfigError> {
        BusinessHours::new(self.open_hour, self.close_hour, self.closed_day)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let configuration =
            ConfigurationHandler::try_parse_from(["scheduler", "--password", "secret"]).unwrap();
        assert_eq!(configuration.port(), "3000");
        assert_eq!(configuration.password(), "secret");
        assert_eq!(configuration.data_file(), None);
        assert_eq!(
            configuration.business_hours().unwrap(),
            BusinessHours::default()
        );
    }

    #[test]
    fn test_custom_business_hours() {
        let configuration = ConfigurationHandler::try_parse_from([
            "scheduler",
            "--password",
            "secret",
            "--open-hour",
            "9",
            "--close-hour",
            "17",
            "--closed-day",
            "mon",
            "--data-file",
            "/tmp/appointments.json",
        ])
        .unwrap();
        let hours = configuration.business_hours().unwrap();
        assert_eq!(hours.open_hour(), 9);
        assert_eq!(hours.close_hour(), 17);
        assert_eq!(hours.closed_day(), Weekday::Mon);
        assert_eq!(
            configuration.data_file(),
            Some(PathBuf::from("/tmp/appointments.json"))
        );
    }

    #[test]
    fn test_invalid_business_hours() {
        let configuration = ConfigurationHandler::try_parse_from([
            "scheduler",
            "--password",
            "secret",
            "--open-hour",
            "19",
            "--close-hour",
            "7",
        ])
        .unwrap();
        assert_eq!(
            configuration.business_hours(),
            Err(ConfigError::InvalidBusinessHours {
                open_hour: 19,
                close_hour: 7
            })
        );

        ConfigurationHandler::try_parse_from([
            "scheduler",
            "--password",
            "secret",
            "--closed-day",
            "someday",
        ])
        .unwrap_err();
    }
}
