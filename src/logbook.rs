//! Logbook collaborator
//!
//! The logbook is a separate application. A submission is a log intent
//! (action + one extra holding the message) delivered by launching the
//! logbook program. Delivery is fire-and-forget: the child is not awaited.

use std::io::ErrorKind;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use crate::config::LogbookConfig;

#[derive(Debug, Error)]
pub enum LogbookError {
    /// The logbook program is not installed
    #[error("LogBook application is not installed on this device ({program})")]
    NotInstalled { program: String },

    #[error("Failed to launch LogBook application {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
}

/// One message addressed to the logbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogIntent {
    pub action: String,
    pub extra_key: String,
    pub message: String,
}

impl LogIntent {
    pub fn new(config: &LogbookConfig, message: impl Into<String>) -> Self {
        Self {
            action: config.action.clone(),
            extra_key: config.extra_key.clone(),
            message: message.into(),
        }
    }

    /// Arguments appended after the configured program arguments
    pub fn to_args(&self) -> [&str; 3] {
        [self.action.as_str(), self.extra_key.as_str(), self.message.as_str()]
    }
}

/// Launch the logbook with the given message
pub async fn send(config: LogbookConfig, message: String) -> Result<(), LogbookError> {
    let intent = LogIntent::new(&config, message);

    let spawned = Command::new(&config.program)
        .args(&config.args)
        .args(intent.to_args())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(child) => {
            info!(
                "Sent {} bytes to logbook ({}, pid {:?})",
                intent.message.len(),
                intent.action,
                child.id()
            );
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(LogbookError::NotInstalled {
            program: config.program,
        }),
        Err(source) => Err(LogbookError::Launch {
            program: config.program,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_uses_configured_names() {
        let config = LogbookConfig::default();
        let intent = LogIntent::new(&config, r#"{"task":"Memory","solution":[]}"#);

        assert_eq!(
            intent.to_args(),
            [
                "ch.apprun.intent.LOG",
                "ch.apprun.logmessage",
                r#"{"task":"Memory","solution":[]}"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_logbook_is_not_installed() {
        let config = LogbookConfig {
            program: "memory-test-no-such-logbook".to_string(),
            ..LogbookConfig::default()
        };

        let err = send(config, "edited by hand".to_string()).await.unwrap_err();
        assert!(matches!(err, LogbookError::NotInstalled { ref program } if program == "memory-test-no-such-logbook"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_installed_logbook_launches() {
        let config = LogbookConfig {
            program: "true".to_string(),
            ..LogbookConfig::default()
        };

        assert!(send(config, "payload".to_string()).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_logbook_receives_message_verbatim() {
        use std::time::Duration;

        let dir = tempfile::TempDir::new().unwrap();
        let received = dir.path().join("received.txt");
        // sh -c <script> <$0> <action> <extra_key> <message>
        let config = LogbookConfig {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"printf '%s|%s|%s' "$1" "$2" "$3" > "$0.tmp" && mv "$0.tmp" "$0""#.to_string(),
                received.to_string_lossy().to_string(),
            ],
            ..LogbookConfig::default()
        };
        let message = r#"{"task": "Memory", "solution": [["it's", "a \"b\""]]}  edited by hand"#;

        send(config, message.to_string()).await.unwrap();

        // Delivery is not awaited, so wait for the child to write
        let mut contents = None;
        for _ in 0..100 {
            if let Ok(text) = std::fs::read_to_string(&received) {
                contents = Some(text);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(
            contents.as_deref(),
            Some(format!("ch.apprun.intent.LOG|ch.apprun.logmessage|{}", message).as_str())
        );
    }
}
