//! Drives the full pipeline against a loopback HTTP listener serving scripted replies.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tempo_balance::config::parse;
use tempo_balance::workflow::run;
use tempo_balance::{Config, Error};

struct Recorded {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct Reply {
    status: u16,
    content_type: &'static str,
    extra_headers: Vec<String>,
    body: String,
}

fn html(status: u16, body: &str, extra_headers: Vec<String>) -> Reply {
    Reply {
        status,
        content_type: "text/html;charset=UTF-8",
        extra_headers,
        body: body.to_string(),
    }
}

fn json(status: u16, body: &str) -> Reply {
    Reply {
        status,
        content_type: "application/json;charset=UTF-8",
        extra_headers: Vec::new(),
        body: body.to_string(),
    }
}

fn read_request(stream: &TcpStream) -> Recorded {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_ascii_lowercase(), v.trim().to_string()));
        }
    }

    let mut body = Vec::new();
    let chunked = headers
        .iter()
        .any(|(k, v)| k == "transfer-encoding" && v.eq_ignore_ascii_case("chunked"));
    if chunked {
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line).unwrap();
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    } else {
        let len = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        body.resize(len, 0);
        reader.read_exact(&mut body).unwrap();
    }

    Recorded {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8(body).unwrap(),
    }
}

fn write_reply(mut stream: &TcpStream, reply: &Reply) {
    let reason = if reply.status < 400 { "OK" } else { "Error" };
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reason,
        reply.content_type,
        reply.body.len()
    );
    for h in &reply.extra_headers {
        head.push_str(h);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes()).unwrap();
    stream.write_all(reply.body.as_bytes()).unwrap();
    stream.flush().unwrap();
}

/// Answer one connection per reply, in order. Returns the base URL and the recorded requests.
fn serve(replies: Vec<Reply>) -> (String, Receiver<Recorded>) {
    serve_with(|_| replies)
}

/// Like `serve`, for replies that need to know the listener's base URL.
fn serve_with(
    make_replies: impl FnOnce(&str) -> Vec<Reply>,
) -> (String, Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let replies = make_replies(&base_url);
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for reply in replies {
            let (stream, _) = listener.accept().unwrap();
            let recorded = read_request(&stream);
            write_reply(&stream, &reply);
            if tx.send(recorded).is_err() {
                return;
            }
        }
    });
    (base_url, rx)
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                out.push(u8::from_str_radix(&s[i + 1..i + 3], 16).unwrap());
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out).unwrap()
}

fn form_decode(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k), percent_decode(v))
        })
        .collect()
}

fn next(rx: &Receiver<Recorded>) -> Recorded {
    rx.recv_timeout(Duration::from_secs(10)).unwrap()
}

fn config_for(base_url: &str) -> Config {
    parse(&format!(
        "username = \"alice\"\npassword = \"p&ss word\"\nurl = \"{base_url}/\"\nnumberOfPeriods = \"4\"\n"
    ))
    .unwrap()
}

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<meta name="ajs-remote-user" content="alice">
<meta name="ajs-tempo-user-key" content="JIRAUSER10000">
</head><body>Tempo</body></html>"#;

const TWO_PERIODS: &str = r#"[
  {"user": {"name": "alice", "key": "JIRAUSER10000"}, "status": "open",
   "workedSeconds": 0, "submittedSeconds": 0, "requiredSeconds": 144000,
   "requiredSecondsRelativeToday": 0, "smartDateString": "Next week",
   "period": {"periodView": "PERIOD", "dateFrom": "2024-03-11", "dateTo": "2024-03-17"}},
  {"user": {"name": "alice", "key": "JIRAUSER10000"}, "status": "open",
   "workedSeconds": 28800, "submittedSeconds": 0, "requiredSeconds": 144000,
   "requiredSecondsRelativeToday": 28800, "smartDateString": "This week",
   "period": {"periodView": "PERIOD", "dateFrom": "2024-03-04", "dateTo": "2024-03-10"},
   "action": null}
]"#;

#[test]
fn full_run_nets_out_to_zero() {
    let (base_url, rx) = serve(vec![
        html(
            200,
            LOGIN_PAGE,
            vec!["Set-Cookie: JSESSIONID=abc123; Path=/".to_string()],
        ),
        json(200, TWO_PERIODS),
    ]);

    let report = run(&config_for(&base_url)).unwrap();
    assert_eq!(report.user_key, "JIRAUSER10000");
    assert_eq!(report.number_of_periods, 4);
    assert_eq!(report.timesheet.entries.len(), 2);
    assert_eq!(report.timesheet.balance.seconds(), 0);
    assert_eq!(report.timesheet.balance.to_string(), "0s");

    let login = next(&rx);
    assert_eq!(login.request_line, "POST /login.jsp HTTP/1.1");
    assert!(
        login
            .header("content-type")
            .unwrap()
            .starts_with("application/x-www-form-urlencoded")
    );
    let fields = form_decode(&login.body);
    for (key, value) in [
        ("os_username", "alice"),
        ("os_password", "p&ss word"),
        ("os_destination", "/secure/Tempo.jspa"),
        ("user_role", ""),
        ("atl_token", ""),
        ("login", "Anmelden"),
    ] {
        assert!(
            fields.contains(&(key.to_string(), value.to_string())),
            "missing {key}={value} in {}",
            login.body
        );
    }

    let fetch = next(&rx);
    assert!(
        fetch
            .request_line
            .starts_with("GET /rest/tempo-timesheets/4/timesheet-approval/approval-statuses?"),
        "{}",
        fetch.request_line
    );
    assert!(fetch.request_line.contains("userKey=JIRAUSER10000"));
    assert!(fetch.request_line.contains("numberOfPeriods=4"));
    assert!(
        fetch
            .header("cookie")
            .is_some_and(|c| c.contains("JSESSIONID=abc123")),
        "session cookie not sent"
    );
}

#[test]
fn login_redirect_is_followed_with_session_cookie() {
    let (base_url, rx) = serve_with(|base| {
        vec![
            html(
                302,
                "",
                vec![
                    format!("Location: {base}/secure/Tempo.jspa"),
                    "Set-Cookie: JSESSIONID=redirected42; Path=/".to_string(),
                ],
            ),
            html(200, LOGIN_PAGE, Vec::new()),
            json(200, TWO_PERIODS),
        ]
    });

    let report = run(&config_for(&base_url)).unwrap();
    assert_eq!(report.user_key, "JIRAUSER10000");
    assert_eq!(report.timesheet.balance.to_string(), "0s");

    let login = next(&rx);
    assert_eq!(login.request_line, "POST /login.jsp HTTP/1.1");

    let landing = next(&rx);
    assert_eq!(landing.request_line, "GET /secure/Tempo.jspa HTTP/1.1");
    assert!(
        landing
            .header("cookie")
            .is_some_and(|c| c.contains("JSESSIONID=redirected42")),
        "session cookie not sent after redirect"
    );

    let fetch = next(&rx);
    assert!(fetch.request_line.contains("userKey=JIRAUSER10000"));
    assert!(
        fetch
            .header("cookie")
            .is_some_and(|c| c.contains("JSESSIONID=redirected42")),
        "session cookie not sent on fetch"
    );
}

#[test]
fn rejected_login_fetches_with_empty_user_key() {
    let (base_url, rx) = serve(vec![
        html(401, "<html><form id=\"login-form\"></form></html>", Vec::new()),
        json(200, "[]"),
    ]);

    let report = run(&config_for(&base_url)).unwrap();
    assert_eq!(report.user_key, "");
    assert_eq!(report.timesheet.balance.to_string(), "0s");

    let _login = next(&rx);
    let fetch = next(&rx);
    assert!(fetch.request_line.contains("userKey=&"), "{}", fetch.request_line);
    assert!(!fetch.request_line.contains("userKey=J"));
}

#[test]
fn malformed_json_is_a_decode_error() {
    let (base_url, _rx) = serve(vec![
        html(200, LOGIN_PAGE, Vec::new()),
        json(200, "[{\"workedSeconds\": 1"),
    ]);

    let err = run(&config_for(&base_url)).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[test]
fn server_error_page_is_a_decode_error() {
    let (base_url, _rx) = serve(vec![
        html(200, LOGIN_PAGE, Vec::new()),
        html(500, "<html>Internal Server Error</html>", Vec::new()),
    ]);

    let err = run(&config_for(&base_url)).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[test]
fn unreachable_host_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = run(&config_for(&base_url)).unwrap_err();
    match err {
        Error::Network { url, .. } => assert!(url.ends_with("/login.jsp")),
        other => panic!("expected network error, got {other:?}"),
    }
}
