use crate::application::services::HttpRequest;
use crate::domain::entities::Response;
use bytes::Bytes;
use colored::Colorize;
use hyper::HeaderMap;
use hyper::header::AUTHORIZATION;
use serde_json::Value;
use std::borrow::Cow;
use std::io::{self, Write};

/// Display flags given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub pretty: bool,
    pub raw: bool,
    pub json_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Body only. Wins over every other flag.
    JsonOnly,
    /// Body only
    Raw,
    /// Status line, headers, blank line, body
    Full,
}

impl DisplayOptions {
    pub fn mode(&self) -> RenderMode {
        if self.json_only {
            RenderMode::JsonOnly
        } else if self.raw {
            RenderMode::Raw
        } else {
            RenderMode::Full
        }
    }
}

/// Renders the final response according to [`DisplayOptions`]
pub struct ResponseRenderer {
    options: DisplayOptions,
}

impl ResponseRenderer {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    /// The body bytes to show: pretty JSON when requested and applicable,
    /// otherwise the body untouched.
    pub fn display_body<'r>(&self, response: &'r Response) -> Cow<'r, [u8]> {
        if self.options.pretty && is_json(response) {
            if let Some(pretty) = pretty_json(&response.body) {
                return Cow::Owned(pretty);
            }
        }
        Cow::Borrowed(&response.body[..])
    }

    /// Writes the rendering to `out` and returns the displayed body bytes,
    /// which are what `--out` persists.
    pub fn render<W: Write>(&self, response: &Response, out: &mut W) -> io::Result<Bytes> {
        let body = self.display_body(response);

        if self.options.mode() == RenderMode::Full {
            writeln!(out, "{}", "=== Response ===".bold())?;
            writeln!(out, "{}", format!("Status: {}", response.status).cyan())?;
            write_headers(out, &response.headers)?;
            writeln!(out)?;
        }
        out.write_all(&body)?;
        writeln!(out)?;
        out.flush()?;

        Ok(Bytes::copy_from_slice(&body))
    }
}

/// Content-Type starts with `application/json`, ignoring case.
fn is_json(response: &Response) -> bool {
    response
        .content_type()
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
}

/// Two-space indented JSON, or `None` when the body is not valid JSON.
/// Numbers keep their original text.
fn pretty_json(body: &[u8]) -> Option<Vec<u8>> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    serde_json::to_vec_pretty(&value).ok()
}

fn write_headers<W: Write>(out: &mut W, headers: &HeaderMap) -> io::Result<()> {
    for name in headers.keys() {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        writeln!(out, "{}: {}", name, values.join(", "))?;
    }
    Ok(())
}

/// Prints the request that is about to be sent. Credentials are masked.
pub fn render_request_preview<W: Write>(
    request: &HttpRequest,
    body: Option<&Bytes>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{}", "=== Request ===".bold())?;
    writeln!(out, "{} {}", request.method(), request.uri())?;
    for (name, value) in request.headers() {
        if *name == AUTHORIZATION {
            writeln!(out, "{name}: (set)")?;
        } else {
            writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
        }
    }
    if let Some(body) = body.filter(|b| !b.is_empty()) {
        writeln!(out)?;
        writeln!(out, "Body:")?;
        out.write_all(body)?;
        writeln!(out)?;
    }
    Ok(())
}
