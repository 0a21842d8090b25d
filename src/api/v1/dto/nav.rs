use serde::Serialize;

use crate::services::nav::MenuItem;

/// Sidebar entries the signed-in user may see, in menu order.
#[derive(Debug, Serialize)]
pub struct NavResponse<'a> {
    pub role: Option<&'a str>,
    pub items: Vec<&'a MenuItem>,
}
