use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::error::Error;

use super::{Lure, LureContext, LureGenerator};

/// Writes lure emails with a chat-completion model. The generated body is
/// plain paragraphs of HTML; the tracking pixel and report-phishing footer
/// are stitched in afterwards so the model never sees the open URL.
pub struct OpenAiLureGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiLureGenerator {
    pub fn new(api_key: String, model: String) -> OpenAiLureGenerator {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        OpenAiLureGenerator { client, model }
    }

    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|err| Error::LureGenerationFailed(err.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(message)])
            .build()
            .map_err(|err| Error::LureGenerationFailed(err.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|err| Error::LureGenerationFailed(err.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(Error::LureGenerationFailed(
                "model returned an empty completion".to_owned(),
            ));
        }

        Ok(content)
    }
}

#[async_trait]
impl LureGenerator for OpenAiLureGenerator {
    #[tracing::instrument(skip(self, context), fields(email = %context.target.email))]
    async fn generate_lure(&self, context: &LureContext) -> Result<Lure, Error> {
        let body_text = self.complete(&body_prompt(context)).await?;

        let subject = self
            .complete(&format!(
                "Write the subject for this email in 5 words or fewer. \
                 Reply with the subject only, no quotes: {body_text}"
            ))
            .await?;
        let subject = subject.trim().trim_matches('"').to_owned();

        let body_html = wrap_html(&body_text, context);

        Ok(Lure {
            subject,
            body_text,
            body_html,
        })
    }
}

/// Stands in when no model is configured; launches fail upstream instead
/// of at startup, so tracking-only deployments still serve.
pub struct UnconfiguredLureGenerator;

#[async_trait]
impl LureGenerator for UnconfiguredLureGenerator {
    async fn generate_lure(&self, _context: &LureContext) -> Result<Lure, Error> {
        Err(Error::LureGenerationFailed(
            "no generation model configured".to_owned(),
        ))
    }
}

fn body_prompt(context: &LureContext) -> String {
    let target = &context.target;
    let (deadline_date, deadline_time) = deadline_phrase();

    format!(
        "Compose a professional email in {language} to {first_name} {last_name} \
         from the {team_name} team. The email should address the following topic: {reason}. \
         The email should include the following elements: \
         1. A clear explanation of why {reason} is critical, with specific consequences if no action is taken. \
         2. A specific call to action requiring the recipient to click this link: <a href=\"{click_url}\">{link}</a> \
         3. Include a deadline of {deadline_date} at {deadline_time}. \
         4. Ensure the tone is professional and not overly alarming to avoid suspicion. \
         Remember to: \
         - Use realistic and natural-sounding language throughout, avoiding repetitive or template-like phrases. \
         - Keep the tone professional and approachable, like a helpful colleague. \
         - Make the email appear tailored specifically for the recipient ({first_name} {last_name}). \
         - Format the result as an HTML body text with only <p> tags to subdivide in paragraphs. \
         - Format the date and time between <strong> tags to highlight it. \
         - Only write the body of the email. Do not include headers or signatures.",
        language = target.language,
        first_name = target.first_name,
        last_name = target.last_name,
        team_name = target.team_name,
        reason = context.reason,
        click_url = context.tracking.click_url,
        link = context.link,
    )
}

/// A near-future business-hours deadline, weekends excluded.
fn deadline_phrase() -> (String, String) {
    let mut rng = rand::thread_rng();

    let mut date = Utc::now() + Duration::days(rng.gen_range(1..=30));
    while matches!(
        date.format("%A").to_string().as_str(),
        "Saturday" | "Sunday"
    ) {
        date += Duration::days(1);
    }

    let hour = rng.gen_range(8..=17);
    let minutes = ["00", "15", "30", "45"][rng.gen_range(0..4)];

    (
        date.format("%A, %B %d, %Y").to_string(),
        format!("{hour}:{minutes} ET"),
    )
}

/// Wraps the generated paragraphs with the open-tracking pixel and a
/// footer that links the report-phishing endpoint.
pub fn wrap_html(body: &str, context: &LureContext) -> String {
    format!(
        r#"<html>
<head><meta http-equiv="Content-Type" content="text/html; charset=UTF-8"></head>
<body>
{body}
<img src="{open_url}" alt="" width="1" height="1" style="display:none">
<hr style="border: none; border-top: 1px solid #ddd;">
<p style="font-size: 10px; color: #666;">
This email and any attachments are confidential and intended solely for the
use of the intended recipient(s). If you are not the intended recipient,
please delete this email immediately and notify the sender.
<a style="color: #666;" href="{report_url}">Report phishing</a>.
Please consider the environment before printing this email.
</p>
</body>
</html>
"#,
        open_url = context.tracking.open_url,
        report_url = context.tracking.report_url,
    )
}

#[cfg(test)]
mod tests {
    use crate::campaign::CampaignId;
    use crate::launch::{Target, TrackingLinks};

    use super::*;

    fn sample_context() -> LureContext {
        LureContext {
            target: Target {
                email: "ada.lovelace@example.com".to_owned(),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                business_unit: "Engineering".to_owned(),
                team_name: "Compilers".to_owned(),
                language: "English".to_owned(),
            },
            reason: "Mandatory Account Verification".to_owned(),
            link: "https://verify.example-account.com".to_owned(),
            tracking: TrackingLinks::build(
                "http://localhost:8080",
                CampaignId::from_raw(2),
                "ada.lovelace@example.com",
            ),
        }
    }

    #[test]
    fn body_prompt_carries_the_click_link_and_recipient() {
        let prompt = body_prompt(&sample_context());

        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("Mandatory Account Verification"));
        assert!(prompt.contains("/events/track_click?email=ada.lovelace%40example.com&campaign_id=2"));
    }

    #[test]
    fn wrapped_html_embeds_pixel_and_report_link() {
        let context = sample_context();
        let html = wrap_html("<p>Hello</p>", &context);

        assert!(html.contains(&context.tracking.open_url));
        assert!(html.contains(&context.tracking.report_url));
        assert!(html.contains("<p>Hello</p>"));
    }

    #[test]
    fn deadlines_land_on_business_days() {
        for _ in 0..50 {
            let (date, time) = deadline_phrase();
            assert!(!date.starts_with("Saturday"));
            assert!(!date.starts_with("Sunday"));
            assert!(time.ends_with(" ET"));
        }
    }
}
