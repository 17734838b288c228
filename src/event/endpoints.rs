use actix_web::web::{Data, Form, Json, Query};
use actix_web::{get, post, Either, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::employee::EmployeeId;
use crate::error::Error;

use super::db::RecordedEvent;
use super::{manager, EventId, EventType};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrackQuery {
    pub email: String,
    pub campaign_id: CampaignId,
    // Some tracking links carry the employee id; the recorder resolves the
    // employee by email either way.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrackSubmittedBody {
    pub email: String,
    pub campaign_id: CampaignId,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventFilterQuery {
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrackStatusBody {
    pub status: &'static str,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventBody {
    pub id: EventId,
    pub email: String,
    pub ip: String,
    pub event_type: EventType,
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub employee_id: EmployeeId,
    pub timestamp: DateTime<Utc>,
}

impl EventBody {
    pub fn render(recorded: RecordedEvent) -> EventBody {
        EventBody {
            id: recorded.event.id,
            email: recorded.event.email,
            ip: recorded.event.ip,
            event_type: recorded.event.event_type,
            campaign_id: recorded.event.campaign_id,
            campaign_name: recorded.campaign_name,
            employee_id: recorded.event.employee_id,
            timestamp: recorded.event.timestamp,
        }
    }
}

fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_owned()
}

#[get("/events/track_open")]
#[tracing::instrument(skip(db, req))]
async fn track_open(
    db: Data<Box<dyn Database>>,
    query: Query<TrackQuery>,
    req: HttpRequest,
) -> Result<Json<TrackStatusBody>, Error> {
    let query = query.into_inner();
    let ip = client_ip(&req);

    manager::record_event(
        db.get_ref().as_ref(),
        query.campaign_id,
        &query.email,
        EventType::Open,
        &ip,
    )
    .await?;

    Ok(Json(TrackStatusBody { status: "success" }))
}

/// Records the click and hands the recipient a fake data-collection form
/// whose submit posts back to the submitted-tracking endpoint.
#[get("/events/track_click")]
#[tracing::instrument(skip(db, req))]
async fn track_click(
    db: Data<Box<dyn Database>>,
    query: Query<TrackQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, Error> {
    let query = query.into_inner();
    let ip = client_ip(&req);

    let event = manager::record_event(
        db.get_ref().as_ref(),
        query.campaign_id,
        &query.email,
        EventType::Click,
        &ip,
    )
    .await?;

    let page = render_fake_form(&query.email, query.campaign_id, event.employee_id);
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(page))
}

// The fake form posts JSON when scripting is available and falls back to
// a plain urlencoded submit otherwise; both shapes land here.
#[post("/events/track_submitted")]
#[tracing::instrument(skip(db, body, req))]
async fn track_submitted(
    db: Data<Box<dyn Database>>,
    body: Either<Json<TrackSubmittedBody>, Form<TrackSubmittedBody>>,
    req: HttpRequest,
) -> Result<Json<TrackStatusBody>, Error> {
    let body = body.into_inner();
    let ip = client_ip(&req);

    manager::record_event(
        db.get_ref().as_ref(),
        body.campaign_id,
        &body.email,
        EventType::Submitted,
        &ip,
    )
    .await?;

    Ok(Json(TrackStatusBody { status: "success" }))
}

#[get("/events/track_reported")]
#[tracing::instrument(skip(db, req))]
async fn track_reported(
    db: Data<Box<dyn Database>>,
    query: Query<TrackQuery>,
    req: HttpRequest,
) -> Result<Json<TrackStatusBody>, Error> {
    let query = query.into_inner();
    let ip = client_ip(&req);

    manager::record_event(
        db.get_ref().as_ref(),
        query.campaign_id,
        &query.email,
        EventType::Reported,
        &ip,
    )
    .await?;

    Ok(Json(TrackStatusBody { status: "success" }))
}

#[get("/events/track_downloaded")]
#[tracing::instrument(skip(db, req))]
async fn track_downloaded(
    db: Data<Box<dyn Database>>,
    query: Query<TrackQuery>,
    req: HttpRequest,
) -> Result<Json<TrackStatusBody>, Error> {
    let query = query.into_inner();
    let ip = client_ip(&req);

    manager::record_event(
        db.get_ref().as_ref(),
        query.campaign_id,
        &query.email,
        EventType::DownloadedAttachment,
        &ip,
    )
    .await?;

    Ok(Json(TrackStatusBody { status: "success" }))
}

#[get("/events")]
#[tracing::instrument(skip(db))]
async fn get_events(
    db: Data<Box<dyn Database>>,
    query: Query<EventFilterQuery>,
) -> Result<Json<Vec<EventBody>>, Error> {
    let query = query.into_inner();

    let events =
        manager::get_events(db.get_ref().as_ref(), query.campaign_id, query.employee_id).await?;

    Ok(Json(events.into_iter().map(EventBody::render).collect()))
}

fn render_fake_form(email: &str, campaign_id: CampaignId, employee_id: EmployeeId) -> String {
    let email_attr = escape_html(email);
    // JSON string rendering doubles as a JS string literal; '<' is escaped
    // too so a '</script>' in the value cannot end the script block.
    let email_js = serde_json::Value::String(email.to_owned())
        .to_string()
        .replace('<', "\\u003c");

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Account Verification</title></head>
<body>
<h2>Verify your account</h2>
<p>Please confirm your details to continue.</p>
<form method="post" action="/events/track_submitted" id="verify">
  <input type="hidden" name="email" value="{email_attr}">
  <input type="hidden" name="campaign_id" value="{campaign_id}">
  <input type="hidden" name="employee_id" value="{employee_id}">
  <label>Username <input type="text" name="username"></label><br>
  <label>Password <input type="password" name="password"></label><br>
  <button type="submit">Submit</button>
</form>
<script>
document.getElementById("verify").addEventListener("submit", function (e) {{
  e.preventDefault();
  fetch("/events/track_submitted", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{
      email: {email_js},
      campaign_id: {campaign_id},
      employee_id: {employee_id}
    }}),
  }}).then(function () {{
    document.body.innerHTML = "<p>Thank you. Your account has been verified.</p>";
  }});
}});
</script>
</body>
</html>
"#
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_form_escapes_the_email() {
        let page = render_fake_form(
            r#""><script>alert(1)</script>@example.com"#,
            CampaignId::from_raw(3),
            EmployeeId::from_raw(7),
        );

        assert!(!page.contains(r#"value=""><script>"#));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("email: \"\\\">\\u003cscript>alert(1)\\u003c/script>@example.com\""));
    }

    #[test]
    fn fake_form_posts_back_to_the_submitted_endpoint() {
        let page = render_fake_form(
            "ada.lovelace@example.com",
            CampaignId::from_raw(3),
            EmployeeId::from_raw(7),
        );

        assert!(page.contains(r#"action="/events/track_submitted""#));
        assert!(page.contains("campaign_id: 3"));
        assert!(page.contains("employee_id: 7"));
    }
}
