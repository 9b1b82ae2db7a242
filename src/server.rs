//! Minimal HTTP/1.1 front for a [`GamificationService`].
//!
//! Serves the same routes [`HttpGamification`](crate::rewards::http::HttpGamification)
//! calls, one connection at a time.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::QuizResult;
use crate::rewards::GamificationService;
use crate::rewards::http::{ExperienceRequest, RESULTS_PATH, USERS_PATH};

const MAX_BODY_BYTES: usize = 1_000_000;

struct HttpRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Preflight,
    Health,
    SaveResult,
    User { user_id: String, action: UserAction },
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Experience,
    Streak,
    Achievements,
    Badges,
    Quests,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct StoredBody {
    stored: bool,
}

/// Accepts connections forever
pub fn serve<G: GamificationService>(listener: TcpListener, service: &G) {
    if let Ok(addr) = listener.local_addr() {
        info!("rewards server listening on http://{addr}");
    }

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = handle_connection(stream, service) {
                    warn!("connection error: {err}");
                }
            }
            Err(err) => error!("accept failed: {err}"),
        }
    }
}

fn handle_connection<G: GamificationService>(
    mut stream: TcpStream,
    service: &G,
) -> Result<(), String> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .map_err(|e| e.to_string())?;

    let request = match read_http_request(&mut stream) {
        Ok(req) => req,
        Err(err) => {
            write_json_response(&mut stream, 400, &ErrorBody { error: err });
            return Ok(());
        }
    };
    debug!("{} {}", request.method, request.path);

    match route(&request.method, &request.path) {
        Route::Preflight => write_empty_response(&mut stream, 204),
        Route::Health => write_text_response(&mut stream, 200, "ok"),
        Route::NotFound => write_text_response(&mut stream, 404, "not found"),
        Route::SaveResult => {
            if let Some(result) = parse_json::<QuizResult>(&mut stream, &request) {
                match service.save_result(&result) {
                    Ok(()) => write_json_response(&mut stream, 200, &StoredBody { stored: true }),
                    Err(err) => write_service_error(&mut stream, err),
                }
            }
        }
        Route::User { user_id, action } => {
            handle_user_action(&mut stream, service, &request, &user_id, action)
        }
    }
    Ok(())
}

fn handle_user_action<G: GamificationService>(
    stream: &mut TcpStream,
    service: &G,
    request: &HttpRequest,
    user_id: &str,
    action: UserAction,
) {
    match action {
        UserAction::Experience => {
            let Some(body) = parse_json::<ExperienceRequest>(stream, request) else {
                return;
            };
            respond(stream, service.add_experience(user_id, body.amount, &body.reason));
        }
        UserAction::Streak => respond(stream, service.update_streak(user_id)),
        UserAction::Achievements => {
            if let Some(result) = parse_json::<QuizResult>(stream, request) {
                respond(stream, service.check_achievements(user_id, &result));
            }
        }
        UserAction::Badges => {
            if let Some(result) = parse_json::<QuizResult>(stream, request) {
                respond(stream, service.check_badges(user_id, &result));
            }
        }
        UserAction::Quests => {
            if let Some(result) = parse_json::<QuizResult>(stream, request) {
                respond(stream, service.update_quest_progress(user_id, &result));
            }
        }
    }
}

fn respond<T: Serialize>(stream: &mut TcpStream, outcome: crate::error::Result<T>) {
    match outcome {
        Ok(value) => write_json_response(stream, 200, &value),
        Err(err) => write_service_error(stream, err),
    }
}

fn write_service_error(stream: &mut TcpStream, err: crate::error::Error) {
    error!("service error: {err}");
    write_json_response(
        stream,
        500,
        &ErrorBody {
            error: err.to_string(),
        },
    );
}

/// Checks the content type and decodes the body, answering 415/400 itself on failure
fn parse_json<T: DeserializeOwned>(stream: &mut TcpStream, request: &HttpRequest) -> Option<T> {
    let is_json = request
        .header("content-type")
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        write_json_response(
            stream,
            415,
            &ErrorBody {
                error: "only Content-Type: application/json is accepted".into(),
            },
        );
        return None;
    }

    match serde_json::from_slice(&request.body) {
        Ok(value) => Some(value),
        Err(err) => {
            write_json_response(
                stream,
                400,
                &ErrorBody {
                    error: format!("invalid JSON: {err}"),
                },
            );
            None
        }
    }
}

fn route(method: &str, path: &str) -> Route {
    let path = path.split('?').next().unwrap_or(path);

    match (method, path) {
        ("OPTIONS", _) => return Route::Preflight,
        ("GET", "/health") => return Route::Health,
        ("POST", p) if p == RESULTS_PATH => return Route::SaveResult,
        ("POST", _) => {}
        _ => return Route::NotFound,
    }

    let Some(rest) = path
        .strip_prefix(USERS_PATH)
        .and_then(|r| r.strip_prefix('/'))
    else {
        return Route::NotFound;
    };
    let Some((raw_user, action)) = rest.split_once('/') else {
        return Route::NotFound;
    };
    let Some(user_id) = urlencoding::decode(raw_user)
        .ok()
        .map(|u| u.into_owned())
        .filter(|u| !u.is_empty())
    else {
        return Route::NotFound;
    };

    let action = match action {
        "experience" => UserAction::Experience,
        "streak" => UserAction::Streak,
        "achievements/check" => UserAction::Achievements,
        "badges/check" => UserAction::Badges,
        "quests/progress" => UserAction::Quests,
        _ => return Route::NotFound,
    };
    Route::User { user_id, action }
}

fn read_http_request(stream: &mut TcpStream) -> Result<HttpRequest, String> {
    let mut buffer = Vec::with_capacity(4096);
    let mut temp = [0_u8; 1024];

    loop {
        let n = stream
            .read(&mut temp)
            .map_err(|e| format!("could not read request: {e}"))?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&temp[..n]);

        if find_header_end(&buffer).is_some() {
            break;
        }
        if buffer.len() > MAX_BODY_BYTES {
            return Err("headers too large".into());
        }
    }

    let header_end = find_header_end(&buffer).ok_or_else(|| "incomplete headers".to_string())?;
    let header_text = std::str::from_utf8(&buffer[..header_end])
        .map_err(|_| "headers are not valid UTF-8".to_string())?;

    let mut lines = header_text.split("\r\n");
    let request_line = lines.next().ok_or_else(|| "missing request line".to_string())?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| "missing HTTP method".to_string())?
        .to_string();
    let path = parts
        .next()
        .ok_or_else(|| "missing HTTP path".to_string())?
        .to_string();

    let mut headers = HashMap::new();
    for line in lines.filter(|l| !l.is_empty()) {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| format!("malformed header: {line}"))?;
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    let expected_len = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    if expected_len > MAX_BODY_BYTES {
        return Err("body too large".into());
    }

    let mut body = buffer[(header_end + 4)..].to_vec();
    while body.len() < expected_len {
        let n = stream
            .read(&mut temp)
            .map_err(|e| format!("could not read body: {e}"))?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&temp[..n]);
    }
    if body.len() < expected_len {
        return Err("incomplete body".into());
    }
    body.truncate(expected_len);

    Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

impl HttpRequest {
    fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|s| s.as_str())
    }
}

fn write_empty_response(stream: &mut TcpStream, status: u16) {
    write_http_response(stream, status, "text/plain", "")
}

fn write_text_response(stream: &mut TcpStream, status: u16, body: &str) {
    write_http_response(stream, status, "text/plain; charset=utf-8", body)
}

fn write_json_response<T: Serialize>(stream: &mut TcpStream, status: u16, body: &T) {
    match serde_json::to_string(body) {
        Ok(json) => write_http_response(stream, status, "application/json", &json),
        Err(err) => write_http_response(
            stream,
            500,
            "text/plain; charset=utf-8",
            &format!("could not serialize response: {err}"),
        ),
    }
}

fn write_http_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let status_text = match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        415 => "Unsupported Media Type",
        500 => "Internal Server Error",
        _ => "OK",
    };

    let response = format!(
        "HTTP/1.1 {status} {status_text}\r\nContent-Type: {content_type}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: POST, GET, OPTIONS\r\nAccess-Control-Allow-Headers: Content-Type\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );

    if let Err(err) = stream
        .write_all(response.as_bytes())
        .and_then(|()| stream.flush())
    {
        warn!("could not write {status} response: {err}");
    }
}
