//! HTML pages for the admin verification link

use axum::response::Html;

const PAGE_STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        }
        .container {
            background: white;
            border-radius: 10px;
            padding: 40px;
            max-width: 500px;
            text-align: center;
            box-shadow: 0 10px 40px rgba(0,0,0,0.2);
        }
        .icon { font-size: 64px; margin-bottom: 20px; }
        .success { color: #28a745; }
        .failure { color: #dc3545; }
        h1 { color: #333; margin: 0 0 10px 0; }
        p { color: #666; line-height: 1.6; margin: 20px 0; }
        .email {
            background: #f8f9fa;
            padding: 10px;
            border-radius: 5px;
            font-family: monospace;
            color: #495057;
        }
"#;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{PAGE_STYLE}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#
    ))
}

/// Minimal escaping for text placed inside HTML elements
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn verified_page(email: &str) -> Html<String> {
    page(
        "RSVP Verified",
        &format!(
            r#"        <div class="icon success">&#10003;</div>
        <h1>RSVP Verified!</h1>
        <p>The RSVP for <strong class="email">{}</strong> has been successfully verified.</p>
        <p>A confirmation email has been sent to the guest.</p>
        <p>You can close this window now.</p>"#,
            escape(email)
        ),
    )
}

pub fn error_page(message: &str) -> Html<String> {
    page(
        "Verification Error",
        &format!(
            r#"        <div class="icon failure">&#10007;</div>
        <h1>Verification Failed</h1>
        <p>{}</p>
        <p>Please contact the administrator if you believe this is an error.</p>"#,
            escape(message)
        ),
    )
}
