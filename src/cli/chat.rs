use anyhow::{Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatMessage, NetworkLogEntry, NetworkLogStore, Outcome, Sender, Session};
use crate::core::{AppConfig, EndpointName};
use crate::net::{ReqwestTransport, Transport, cancel_pair};

const HELP: &str = "\
Type a message to send it. Commands:
  /reset               Clear the conversation and the network log
  /logs                Show the network log, newest first
  /toggle <id>         Expand or collapse a log entry
  /expand              Expand every log entry
  /collapse            Collapse every log entry
  /replay <id>         Send an earlier message again
  /use <endpoint>      Switch between primary and secondary
  /url <url>           Set the selected endpoint's URL
  /key <credential>    Set the selected endpoint's credential
  /help                Show this help
  /quit                Exit
Ctrl-C cancels a request in flight.";

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Send(String),
    Reset,
    Logs,
    Toggle(u64),
    Expand,
    Collapse,
    Replay(u64),
    Use(EndpointName),
    Url(String),
    Key(String),
    Help,
    Quit,
}

fn parse_id(arg: &str) -> Result<u64> {
    arg.parse()
        .map_err(|_| anyhow!("Expected a numeric id, got '{}'", arg))
}

impl ReplCommand {
    fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return Ok(ReplCommand::Send(line.to_string()));
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match (name, arg) {
            ("reset", _) => Ok(ReplCommand::Reset),
            ("logs", _) => Ok(ReplCommand::Logs),
            ("toggle", id) => Ok(ReplCommand::Toggle(parse_id(id)?)),
            ("expand", _) => Ok(ReplCommand::Expand),
            ("collapse", _) => Ok(ReplCommand::Collapse),
            ("replay", id) => Ok(ReplCommand::Replay(parse_id(id)?)),
            ("use", endpoint) => Ok(ReplCommand::Use(endpoint.parse()?)),
            ("url", url) if !url.is_empty() => Ok(ReplCommand::Url(url.to_string())),
            ("key", key) if !key.is_empty() => Ok(ReplCommand::Key(key.to_string())),
            ("help", _) => Ok(ReplCommand::Help),
            ("quit", _) | ("exit", _) => Ok(ReplCommand::Quit),
            _ => Err(anyhow!("Unknown command '{}', try /help", trimmed)),
        }
    }
}

fn render_message(msg: &ChatMessage) -> String {
    let who = match (msg.sender, msg.is_error) {
        (Sender::User, _) => "you",
        (Sender::Bot, false) => "bot",
        (Sender::Bot, true) => "bot!",
    };
    format!("[{}] #{} {}: {}", msg.timestamp, msg.id, who, msg.text)
}

fn render_log_entry(entry: &NetworkLogEntry, expanded: bool) -> String {
    let timing = match entry.response_time_ms {
        Some(ms) if entry.is_slow() => format!("{}ms (slow)", ms),
        Some(ms) => format!("{}ms", ms),
        None => String::from("-"),
    };
    let mut out = format!(
        "{} #{} [{}] {} {} {} {} {}",
        if expanded { "v" } else { ">" },
        entry.id,
        entry.endpoint_label,
        entry.method,
        entry.resource_path,
        entry.status_code,
        entry.status_text,
        timing,
    );
    if expanded {
        out.push_str(&format!(
            "\n  [{}]\n{}\n{}\n\n{}\n\n{}\n{}\n\n{}",
            entry.timestamp,
            entry.request_line(),
            entry.request_headers,
            entry.request_body,
            entry.status_line(),
            entry.response_headers,
            entry.response_body,
        ));
    }
    out
}

fn render_log(log: &NetworkLogStore) -> String {
    if log.is_empty() {
        return String::from("No requests yet.");
    }
    log.entries()
        .iter()
        .map(|e| render_log_entry(e, log.is_expanded(e.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Send with Ctrl-C wired to the cancel handle. The send is always
/// driven to completion so the cancellation gets recorded.
async fn send_interruptible<T: Transport + ?Sized>(
    session: &mut Session,
    transport: &T,
    text: &str,
) -> Result<Outcome> {
    let (handle, token) = cancel_pair();
    let send = session.send(transport, text, token);
    tokio::pin!(send);

    let outcome = loop {
        tokio::select! {
            outcome = &mut send => break outcome,
            _ = tokio::signal::ctrl_c() => handle.cancel(),
        }
    };
    Ok(outcome?)
}

pub async fn run(endpoint: Option<EndpointName>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let config = AppConfig::default();
    let transport = ReqwestTransport::new(config.request_timeout);
    let mut session = Session::from_config(&config);
    if let Some(name) = endpoint {
        session.config_mut().select(name);
    }

    for msg in session.messages() {
        println!("{}", render_message(msg));
    }

    loop {
        let selected = session.config().selected;
        let readline = rl.readline(&format!("{}>>> ", selected.label()));
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        let text = match command {
            ReplCommand::Send(text) => text,
            ReplCommand::Replay(id) => match session.replay_text(id) {
                Ok(text) => text,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            },
            ReplCommand::Reset => {
                session.reset();
                for msg in session.messages() {
                    println!("{}", render_message(msg));
                }
                continue;
            }
            ReplCommand::Logs => {
                println!("{}", render_log(session.network_log()));
                continue;
            }
            ReplCommand::Toggle(id) => {
                match session.toggle_log(id) {
                    Some(_) => println!("{}", render_log(session.network_log())),
                    None => println!("No log entry #{}", id),
                }
                continue;
            }
            ReplCommand::Expand => {
                session.expand_all_logs();
                println!("{}", render_log(session.network_log()));
                continue;
            }
            ReplCommand::Collapse => {
                session.collapse_all_logs();
                println!("{}", render_log(session.network_log()));
                continue;
            }
            ReplCommand::Use(name) => {
                session.config_mut().select(name);
                println!("Using {} [{}]", name, name.label());
                continue;
            }
            ReplCommand::Url(url) => {
                session.config_mut().set_url(selected, &url);
                println!("Set {} URL", selected);
                continue;
            }
            ReplCommand::Key(key) => {
                session.config_mut().set_credential(selected, &key);
                println!("Set {} credential", selected);
                continue;
            }
            ReplCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            ReplCommand::Quit => break,
        };

        match send_interruptible(&mut session, &transport, &text).await {
            Ok(_) => {
                if let Some(reply) = session.messages().last() {
                    println!("{}", render_message(reply));
                }
            }
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{OutboundRequest, ResponseBody, TransportResponse};

    #[test]
    fn test_parse_plain_text_is_a_send() {
        assert_eq!(
            ReplCommand::parse("Hello there").unwrap(),
            ReplCommand::Send("Hello there".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/reset").unwrap(), ReplCommand::Reset);
        assert_eq!(ReplCommand::parse(" /logs ").unwrap(), ReplCommand::Logs);
        assert_eq!(
            ReplCommand::parse("/toggle 3").unwrap(),
            ReplCommand::Toggle(3)
        );
        assert_eq!(
            ReplCommand::parse("/replay 2").unwrap(),
            ReplCommand::Replay(2)
        );
        assert_eq!(
            ReplCommand::parse("/use egw").unwrap(),
            ReplCommand::Use(EndpointName::Secondary)
        );
        assert_eq!(
            ReplCommand::parse("/url https://dir.example.com").unwrap(),
            ReplCommand::Url("https://dir.example.com".to_string())
        );
        assert_eq!(ReplCommand::parse("/quit").unwrap(), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(ReplCommand::parse("/toggle abc").is_err());
        assert!(ReplCommand::parse("/use tertiary").is_err());
        assert!(ReplCommand::parse("/key").is_err());
        assert!(ReplCommand::parse("/frobnicate").is_err());
    }

    fn entry(elapsed_ms: u64) -> NetworkLogEntry {
        let request = OutboundRequest {
            method: http::Method::POST,
            url: String::from("https://dir.example.com/chat/completions?api-version=2024-06-01"),
            headers: vec![(String::from("Authorization"), String::from("Bearer sk"))],
            body: String::from("{}"),
        };
        let response = TransportResponse {
            status: 200,
            status_text: String::from("OK"),
            headers: Vec::new(),
            body: ResponseBody::Unparseable,
            elapsed_ms,
        };
        NetworkLogEntry::from_response(&request, EndpointName::Primary, &response)
    }

    #[test]
    fn test_render_log_entry_collapsed() {
        let rendered = render_log_entry(&entry(120), false);
        assert_eq!(rendered, "> #0 [DIR] POST /chat/completions 200 OK 120ms");
    }

    #[test]
    fn test_render_log_entry_expanded() {
        let rendered = render_log_entry(&entry(2500), true);
        assert!(rendered.starts_with("v #0 [DIR] POST /chat/completions 200 OK 2500ms (slow)"));
        assert!(rendered.contains("Authorization: *******"));
        assert!(rendered.contains("HTTP/1.1 200 OK"));
        assert!(rendered.contains("No response body"));
        assert!(!rendered.contains("Bearer sk"));
    }

    #[test]
    fn test_render_empty_log() {
        assert_eq!(render_log(&NetworkLogStore::new()), "No requests yet.");
    }
}
