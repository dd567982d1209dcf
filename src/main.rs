use std::{process, sync::Arc};

use appointment_scheduler::{
    booking::BookingValidator, catalog::ServiceCatalog, clock::SystemClock,
    configuration::Configuration, configuration_handler::ConfigurationHandler, http::create_app,
    local_appointments::LocalAppointments,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#########################");
    println!("# Appointment Scheduler #");
    println!("#########################");

    let configuration = ConfigurationHandler::parse_arguments();

    let hours = match configuration.business_hours() {
        Ok(hours) => hours,
        Err(err) => {
            error!(%err, "Invalid business hours");
            process::exit(1);
        }
    };
    let validator = BookingValidator::new(ServiceCatalog::default(), hours);

    let backend = match configuration.data_file() {
        Some(data_file) => match LocalAppointments::with_data_file(validator.clone(), &data_file) {
            Ok(backend) => backend,
            Err(err) => {
                error!(?err, path = %data_file.display(), "Failed to load appointments");
                process::exit(1);
            }
        },
        None => {
            info!("No data file configured. Appointments are kept in memory only");
            LocalAppointments::new(validator.clone())
        }
    };

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(?err, %address, "Failed to bind listener");
            process::exit(1);
        }
    };
    info!(%address, "Accessible");

    let app = create_app(backend, configuration, validator, Arc::new(SystemClock));
    if let Err(err) = axum::serve(listener, app).await {
        error!(?err, "Server stopped");
        process::exit(1);
    }
}
