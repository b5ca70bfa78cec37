//! Issue/grievance (IGM) and support ticket endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::Connection;

/// What the issue is about, in the complainant's words.
#[derive(Debug, Clone, Serialize)]
pub struct IssueDescriptor {
    /// One-line summary.
    pub short_desc: String,
    /// Longer description, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<String>,
}

/// Contact details of the person raising the issue.
#[derive(Debug, Clone, Serialize)]
pub struct IssueCustomer {
    /// Customer name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
}

/// Reference to an order line the issue concerns.
#[derive(Debug, Clone, Serialize)]
pub struct IssueItemRef {
    /// Item id.
    pub id: String,
    /// Affected quantity.
    pub quantity: u32,
}

/// Body of the issue creation call.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    /// Order the issue concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Network-defined issue category.
    pub category: String,
    /// Issue description.
    pub descriptor: IssueDescriptor,
    /// Complainant contact details.
    pub customer: IssueCustomer,
    /// Affected items, when the issue is item-specific.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<IssueItemRef>,
    /// URLs of uploaded evidence images (see [`crate::api::assets`]).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Acknowledgement of a created issue.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueAck {
    /// Server-assigned issue id.
    pub issue_id: String,
}

/// Files a new issue with the grievance system.
pub async fn create_issue(conn: &Connection, request: &CreateIssueRequest) -> Result<CreateIssueAck> {
    conn.post("issues/create", request).await
}

/// One row of the ticket list.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketSummary {
    /// Ticket id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Current status.
    pub status: String,
    /// One-line summary.
    #[serde(default)]
    pub short_desc: Option<String>,
    /// When the ticket was opened.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A status transition on a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketAction {
    /// Status after this action.
    pub status: String,
    /// Respondent comment, if any.
    #[serde(default)]
    pub comment: Option<String>,
    /// When the action happened.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full ticket detail.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketDetail {
    /// Ticket id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Current status.
    pub status: String,
    /// One-line summary.
    #[serde(default)]
    pub short_desc: Option<String>,
    /// Action history, oldest first.
    #[serde(default)]
    pub actions: Vec<TicketAction>,
}

/// Fetches the user's tickets.
pub async fn list_tickets(conn: &Connection) -> Result<Vec<TicketSummary>> {
    conn.get("tickets", &[("action", "list".to_owned())]).await
}

/// Fetches one ticket in full.
pub async fn ticket_detail(conn: &Connection, ticket_id: &str) -> Result<TicketDetail> {
    conn.get(
        "tickets",
        &[
            ("action", "detail".to_owned()),
            ("ticketId", ticket_id.to_owned()),
        ],
    )
    .await
}
