//! # Form Submission Tests
//!
//! End-to-end tests of `POST /`: a complete submission loads the table and
//! shows the generated query, while a submission missing either the file or the
//! question touches neither the store nor the model.

mod common;

use anyhow::Result;
use common::{completion, csv_form, form_without_file, TestApp, COMPLETIONS_PATH};
use httpmock::Method;
use reqwest::multipart::Form;
use serde_json::json;
use sqlsolver::constants::DEFAULT_TABLE_NAME;
use sqlsolver_test_utils::{MockAiProvider, CITIES_CSV, EMPLOYEES_CSV};

#[tokio::test]
async fn test_complete_submission_shows_generated_query() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path(COMPLETIONS_PATH)
            .body_contains("Who earns the most?");
        then.status(200).json_body(completion(
            "```sql\nSELECT name FROM tableQ ORDER BY salary DESC LIMIT 1\n```",
        ));
    });

    // Act
    let response = app
        .submit(csv_form(EMPLOYEES_CSV, "Who earns the most?"))
        .await?;

    // Assert
    assert!(response.status().is_success());
    let body = response.text().await?;
    assert!(body.contains(
        "<pre class=\"result\">SELECT name FROM tableQ ORDER BY salary DESC LIMIT 1</pre>"
    ));
    assert!(body.contains(">Who earns the most?</textarea>"));
    mock.assert();

    let columns = app.storage_provider.column_names(DEFAULT_TABLE_NAME).await?;
    assert_eq!(columns, vec!["name", "department", "age", "salary"]);
    assert_eq!(app.storage_provider.row_count(DEFAULT_TABLE_NAME).await?, 3);

    Ok(())
}

#[tokio::test]
async fn test_file_without_question_does_nothing() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path(COMPLETIONS_PATH);
        then.status(200).json_body(completion("SELECT 1"));
    });

    // Act
    let response = app.submit(csv_form(EMPLOYEES_CSV, "")).await?;

    // Assert
    assert!(response.status().is_success());
    let body = response.text().await?;
    assert!(!body.contains("class=\"result\""));
    assert_eq!(mock.hits(), 0);
    assert!(!app.storage_provider.table_exists(DEFAULT_TABLE_NAME).await?);

    Ok(())
}

#[tokio::test]
async fn test_question_without_file_does_nothing() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path(COMPLETIONS_PATH);
        then.status(200).json_body(completion("SELECT 1"));
    });

    // Act: once with the empty file part a browser sends, once with no part at all.
    let with_empty_part = app.submit(form_without_file("How many rows?")).await?;
    let without_part = app
        .submit(Form::new().text("question", "How many rows?"))
        .await?;

    // Assert
    for response in [with_empty_part, without_part] {
        assert!(response.status().is_success());
        let body = response.text().await?;
        assert!(!body.contains("class=\"result\""));
        assert!(body.contains(">How many rows?</textarea>"));
    }
    assert_eq!(mock.hits(), 0);
    assert!(!app.storage_provider.table_exists(DEFAULT_TABLE_NAME).await?);

    Ok(())
}

#[tokio::test]
async fn test_resubmission_replaces_table() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path(COMPLETIONS_PATH);
        then.status(200).json_body(completion("SELECT * FROM tableQ"));
    });

    // Act
    app.submit(csv_form(EMPLOYEES_CSV, "Show everything"))
        .await?
        .error_for_status()?;
    app.submit(csv_form(CITIES_CSV, "Show everything"))
        .await?
        .error_for_status()?;

    // Assert
    assert_eq!(
        app.storage_provider.column_names(DEFAULT_TABLE_NAME).await?,
        vec!["city", "country"]
    );
    let rows: serde_json::Value =
        serde_json::from_str(&app.storage_provider.rows_as_json(DEFAULT_TABLE_NAME).await?)?;
    assert_eq!(
        rows,
        json!([
            {"city": "Oslo", "country": "Norway"},
            {"city": "Lima", "country": "Peru"}
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_api_failure_is_shown_as_output() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path(COMPLETIONS_PATH);
        then.status(500).body("upstream exploded");
    });

    // Act
    let response = app.submit(csv_form(EMPLOYEES_CSV, "Average age?")).await?;

    // Assert
    assert!(response.status().is_success());
    let body = response.text().await?;
    assert!(body.contains("OpenAI API Error: Error code: 500 - upstream exploded"));

    Ok(())
}

#[tokio::test]
async fn test_generated_query_is_html_escaped() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_provider(Box::new(MockAiProvider::new(
        "SELECT name FROM tableQ WHERE age < 40",
    )))
    .await?;

    // Act
    let body = app
        .submit(csv_form(EMPLOYEES_CSV, "Who is under 40?"))
        .await?
        .text()
        .await?;

    // Assert
    assert!(body.contains("SELECT name FROM tableQ WHERE age &lt; 40"));

    Ok(())
}

#[tokio::test]
async fn test_question_is_sent_as_user_message() -> Result<()> {
    // Arrange
    let ai = MockAiProvider::new("SELECT COUNT(*) FROM tableQ");
    let app = TestApp::spawn_with_provider(Box::new(ai.clone())).await?;

    // Act
    app.submit(csv_form(EMPLOYEES_CSV, "How many employees?"))
        .await?
        .error_for_status()?;

    // Assert
    let calls = ai.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "How many employees?");
    assert!(calls[0].0.contains("You are given the following database schema:"));

    Ok(())
}

#[tokio::test]
async fn test_malformed_csv_is_rejected() -> Result<()> {
    // Arrange
    let ai = MockAiProvider::default();
    let app = TestApp::spawn_with_provider(Box::new(ai.clone())).await?;

    // Act
    let response = app
        .submit(csv_form("a,b\n1,2,3\n", "Anything?"))
        .await?;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await?;
    let error_message = body["error"].as_str().unwrap();
    assert!(error_message.starts_with("Failed to load CSV"));
    assert!(ai.get_calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_rejected_key_is_reported_with_api_prefix() -> Result<()> {
    // Arrange
    let ai = MockAiProvider::failing(401, "invalid api key");
    let app = TestApp::spawn_with_provider(Box::new(ai.clone())).await?;

    // Act
    let body = app
        .submit(csv_form(CITIES_CSV, "Which cities are in Peru?"))
        .await?
        .text()
        .await?;

    // Assert
    assert!(body.contains("<pre class=\"result\">OpenAI API Error: Error code: 401 - invalid api key</pre>"));
    assert_eq!(ai.get_calls().len(), 1);
    assert_eq!(app.storage_provider.row_count(DEFAULT_TABLE_NAME).await?, 2);

    Ok(())
}
