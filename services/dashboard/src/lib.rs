mod cli;
mod datasets;
mod demo;
mod infra;

use roi_dashboard::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
