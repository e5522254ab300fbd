use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::scrape::extract_user_key;
use crate::tempo_api::{Session, Timesheet};

/// Outcome of one login → scrape → fetch → aggregate run.
#[derive(Debug, Clone)]
pub struct Report {
    pub user_key: String,
    pub number_of_periods: u32,
    pub timesheet: Timesheet,
}

/// Run the whole pipeline. Stops at the first failing stage.
pub fn run(config: &Config) -> Result<Report> {
    let (session, page) = Session::login(config)?;

    let user_key = extract_user_key(&page.body);
    if user_key.is_empty() {
        // Usually means the credentials were rejected. The fetch still goes out with
        // an empty key and the server decides what to answer.
        warn!(
            status = page.status,
            "No Tempo user key in login response, continuing without one"
        );
    } else {
        info!("Found UserID: {}", user_key);
    }

    let timesheet = session.fetch_and_aggregate(&user_key, config.number_of_periods)?;

    Ok(Report {
        user_key,
        number_of_periods: config.number_of_periods,
        timesheet,
    })
}
