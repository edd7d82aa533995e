//! # Form Page
//!
//! Renders the single page of the app: the upload form and, after a submission,
//! the generated query. All user-supplied text is HTML-escaped.

pub const PAGE_TITLE: &str = "SQL Solver";
pub const FILE_LABEL: &str = "Upload a CSV file";
pub const QUESTION_LABEL: &str = "Enter your SQL query: ";
pub const SUBMIT_LABEL: &str = "SQL Solver";

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
h1{text-align:center}\
label{display:block;margin-top:1rem}\
textarea{width:100%;min-height:6rem}\
button{margin-top:1rem}\
pre.result{background:#f4f4f4;padding:1rem;white-space:pre-wrap}";

/// Renders the page with the last question in the text area and, if present,
/// the result of the submission below the form.
pub fn render_page(question: &str, result: Option<&str>) -> String {
    let result_block = result
        .map(|text| format!("<pre class=\"result\">{}</pre>\n", escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
<form method="post" action="/" enctype="multipart/form-data">
<label for="file">{FILE_LABEL}</label>
<input type="file" id="file" name="file" accept=".csv,text/csv">
<label for="question">{question_label}</label>
<textarea id="question" name="question">{question}</textarea>
<button type="submit">{SUBMIT_LABEL}</button>
</form>
{result_block}</body>
</html>
"#,
        question_label = escape_html(QUESTION_LABEL),
        question = escape_html(question),
    )
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
