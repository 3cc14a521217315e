use crate::models::report::StatusReport;
use askama::Template;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub report: StatusReport,
    pub current_year: i32,
}

/// Trimmed layout for small screens, same data as the dashboard.
#[derive(Template)]
#[template(path = "dashboard_mini.html")]
pub struct MiniDashboardTemplate {
    pub report: StatusReport,
}

#[derive(Template)]
#[template(path = "backgrounds.html")]
pub struct BackgroundsTemplate {
    pub files: Vec<String>,
}
