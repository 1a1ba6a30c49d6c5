use std::fmt::Write;

use hyoka_core::{DispatchRequest, DispatchResponse, Feedback, FEEDBACK_PATH};
use serde_json::json;
use worker::wasm_bindgen::JsValue;
use worker::*;

const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_MAIL_FROM: &str = "Hyoka Feedback <onboarding@resend.dev>";

#[event(fetch)]
pub async fn main(mut req: Request, env: Env, _ctx: Context) -> Result<Response> {
    if req.path() != FEEDBACK_PATH {
        return Response::error("not found", 404);
    }
    if req.method() != Method::Post {
        return Response::error("method not allowed", 405);
    }

    let request: DispatchRequest = match req.json().await {
        Ok(request) => request,
        Err(_) => return Response::error("invalid request body", 400),
    };
    let feedback = match Feedback::new(
        request.rating,
        &request.comment,
        request.contact.as_deref().unwrap_or(""),
    ) {
        Ok(feedback) => feedback,
        Err(error) => return Response::error(format!("invalid feedback: {error}"), 400),
    };

    let delivered = match deliver(&env, &feedback).await {
        Ok(delivered) => delivered,
        Err(error) => {
            console_log!("mail delivery failed: {error}");
            false
        }
    };

    let response = Response::from_json(&DispatchResponse { delivered })?;
    if delivered {
        Ok(response)
    } else {
        Ok(response.with_status(502))
    }
}

// One outbound message per call; a non-2xx provider answer counts as not
// delivered.
async fn deliver(env: &Env, feedback: &Feedback) -> Result<bool> {
    let api_key = env.secret("MAIL_API_KEY")?.to_string();
    let recipient = env.var("FEEDBACK_RECIPIENT")?.to_string();
    let api_url = env
        .var("MAIL_API_URL")
        .map(|value| value.to_string())
        .unwrap_or_else(|_| DEFAULT_MAIL_API_URL.to_string());
    let from = env
        .var("MAIL_FROM")
        .map(|value| value.to_string())
        .unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string());

    let payload = json!({
        "from": from,
        "to": recipient,
        "subject": mail_subject(feedback.rating),
        "text": mail_body(feedback),
    });
    let body = serde_json::to_string(&payload)?;

    let mut headers = Headers::new();
    headers.set("Authorization", &format!("Bearer {api_key}"))?;
    headers.set("Content-Type", "application/json")?;

    let mut init = RequestInit::new();
    init.with_method(Method::Post)
        .with_headers(headers)
        .with_body(Some(JsValue::from_str(&body)));
    let request = Request::new_with_init(&api_url, &init)?;
    let response = Fetch::Request(request).send().await?;
    Ok((200..300).contains(&response.status_code()))
}

fn mail_subject(rating: u8) -> String {
    format!("New feedback - {rating} stars")
}

fn mail_body(feedback: &Feedback) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "Rating: {} / 5", feedback.rating);
    let _ = writeln!(body);
    let _ = writeln!(body, "{}", feedback.comment);
    if let Some(contact) = &feedback.contact {
        let _ = writeln!(body);
        let _ = writeln!(body, "Contact: {contact}");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_carries_the_rating() {
        assert_eq!(mail_subject(2), "New feedback - 2 stars");
    }

    #[test]
    fn body_carries_comment_and_contact() {
        let feedback = Feedback::new(1, "slow service", "555-0199").expect("valid feedback");
        let body = mail_body(&feedback);
        assert!(body.contains("Rating: 1 / 5"));
        assert!(body.contains("slow service"));
        assert!(body.contains("Contact: 555-0199"));
    }

    #[test]
    fn body_omits_missing_contact() {
        let feedback = Feedback::new(3, "meh", "").expect("valid feedback");
        let body = mail_body(&feedback);
        assert!(!body.contains("Contact:"));
    }
}
