use tracing::{debug, info};

use crate::balance::{self, Balance};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::TimesheetEntry;

const LOGIN_PATH: &str = "/login.jsp";
const APPROVAL_STATUSES_PATH: &str =
    "/rest/tempo-timesheets/4/timesheet-approval/approval-statuses";
const LOGIN_DESTINATION: &str = "/secure/Tempo.jspa";
const LOGIN_BUTTON: &str = "Anmelden";

/// A cookie-carrying HTTP agent bound to one Jira instance.
pub struct Session {
    agent: ureq::Agent,
    base_url: String,
}

/// Whatever the login form submission ended on, after redirects.
#[derive(Debug, Clone)]
pub struct LoginPage {
    pub status: u16,
    pub body: String,
}

/// Fetched periods together with their aggregated balance.
#[derive(Debug, Clone)]
pub struct Timesheet {
    pub entries: Vec<TimesheetEntry>,
    pub balance: Balance,
}

impl Session {
    pub fn new(base_url: &str) -> Self {
        // Non-2xx responses are handed back as-is: the login page is scraped whatever
        // its status, and a failed fetch surfaces as a decode error on its body.
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Session {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open a session and submit the Jira login form.
    ///
    /// The session keeps whatever cookies the server sets. Success is not checked
    /// here; bad credentials show up later as a page without a user key.
    pub fn login(config: &Config) -> Result<(Session, LoginPage)> {
        let session = Session::new(&config.base_url);
        let page = session.submit_login(&config.username, &config.password)?;
        Ok((session, page))
    }

    pub fn submit_login(&self, username: &str, password: &str) -> Result<LoginPage> {
        let url = self.url(LOGIN_PATH);
        info!("Logging in");

        let mut response = self
            .agent
            .post(&url)
            .send_form([
                ("os_username", username),
                ("os_password", password),
                ("os_destination", LOGIN_DESTINATION),
                ("user_role", ""),
                ("atl_token", ""),
                ("login", LOGIN_BUTTON),
            ])
            .map_err(|source| Error::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        debug!(status, "login response");

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|source| Error::Network { url, source })?;

        Ok(LoginPage { status, body })
    }

    /// GET the approval statuses of the last `periods` periods for `user_key`.
    pub fn fetch_approval_statuses(
        &self,
        user_key: &str,
        periods: u32,
    ) -> Result<Vec<TimesheetEntry>> {
        let url = self.url(APPROVAL_STATUSES_PATH);
        info!("Fetching Timesheets");

        let mut response = self
            .agent
            .get(&url)
            .query("userKey", user_key)
            .query("numberOfPeriods", periods.to_string())
            .call()
            .map_err(|source| Error::Network {
                url: url.clone(),
                source,
            })?;

        debug!(status = response.status().as_u16(), "approval-statuses response");

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|source| Error::Network {
                url: url.clone(),
                source,
            })?;

        let entries: Vec<TimesheetEntry> =
            serde_json::from_str(&body).map_err(|source| Error::Decode { url, source })?;
        debug!(count = entries.len(), "decoded approval statuses");
        Ok(entries)
    }

    pub fn fetch_and_aggregate(&self, user_key: &str, periods: u32) -> Result<Timesheet> {
        let entries = self.fetch_approval_statuses(user_key, periods)?;
        let balance = balance::aggregate(&entries);
        Ok(Timesheet { entries, balance })
    }
}
