//! Contact and job application submissions.

#![allow(clippy::unwrap_used)]

use grab_eat_integration_tests::TestContext;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn application(resume: Option<Part>) -> Form {
    let form = Form::new()
        .text("firstName", "Sam")
        .text("lastName", "Janssens")
        .text("email", "sam@example.com")
        .text("phone", "+32 470 00 00 00")
        .text("position", "Cook")
        .text("experience", "3 years");
    match resume {
        Some(part) => form.part("resume", part),
        None => form,
    }
}

fn pdf(bytes: Vec<u8>) -> Part {
    Part::bytes(bytes)
        .file_name("cv.pdf")
        .mime_str("application/pdf")
        .unwrap()
}

#[tokio::test]
async fn test_contact_message_is_forwarded() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/contact/create"))
        .and(body_partial_json(json!({
            "name": "Sam",
            "email": "sam@example.com",
            "subject": "Allergens"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&ctx.food_api)
        .await;

    let (status, body) = ctx
        .post_json(
            "/api/contact",
            &json!({
                "name": " Sam ",
                "email": "sam@example.com",
                "phone": "+32 123 456 789",
                "subject": "Allergens",
                "message": "Do the fries contain gluten?"
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_invalid_contact_is_not_sent() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/contact/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.food_api)
        .await;

    let (status, body) = ctx
        .post_json("/api/contact", &json!({ "name": "Sam", "email": "nope" }))
        .await;
    assert_eq!(status, 422);
    assert!(body["errors"]["email"].is_string());
    assert!(body["errors"]["message"].is_string());
}

#[tokio::test]
async fn test_positions_are_listed() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx.get_json("/api/careers/positions").await;
    assert_eq!(status, 200);
    assert!(body.as_array().unwrap().contains(&Value::from("Cook")));
}

#[tokio::test]
async fn test_application_with_resume_is_forwarded() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/job-applications/create"))
        .and(body_partial_json(json!({
            "firstName": "Sam",
            "position": "Cook",
            "resumeBase64": "data:application/pdf;base64,JVBERi0xLjQ="
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&ctx.food_api)
        .await;

    let resp = ctx
        .client
        .post(ctx.url("/api/careers/apply"))
        .multipart(application(Some(pdf(b"%PDF-1.4".to_vec()))))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn test_resume_must_be_a_small_pdf() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/job-applications/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.food_api)
        .await;

    let word = Part::bytes(b"PK".to_vec())
        .file_name("cv.docx")
        .mime_str("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        .unwrap();
    let resp = ctx
        .client
        .post(ctx.url("/api/careers/apply"))
        .multipart(application(Some(word)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["resume"], "Please upload a PDF file only");

    let oversized = pdf(vec![b'%'; 5 * 1024 * 1024 + 1]);
    let resp = ctx
        .client
        .post(ctx.url("/api/careers/apply"))
        .multipart(application(Some(oversized)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["resume"], "File size must be less than 5MB");
}
