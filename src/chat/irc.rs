//! IRC-style chat connection: handshake, keep-alive, and the listener loop

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{ChatSender, Command, parse_line};
use crate::config::ChatConfig;
use crate::moderation::ModerationFilter;
use crate::queue::QuestionQueue;
use crate::{Error, Result};

/// Keep-alive marker at the start of an inbound frame
const KEEPALIVE_MARKER: &str = "PING";

/// Fixed keep-alive reply
const KEEPALIVE_REPLY: &str = "PONG :tmi.twitch.tv";

/// Outbound half of the connection, cloneable across tasks
#[derive(Clone)]
pub struct IrcSender {
    writer: Arc<Mutex<OwnedWriteHalf>>,
    channel: String,
}

impl IrcSender {
    /// Send one raw protocol line
    ///
    /// # Errors
    ///
    /// Returns error if the write fails
    pub async fn send_raw(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .map_err(|e| Error::Chat(format!("send failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl ChatSender for IrcSender {
    async fn send_message(&self, text: &str) -> Result<()> {
        self.send_raw(&format!("PRIVMSG {} :{text}", self.channel))
            .await
    }
}

/// Owns the chat connection and the inbound read loop
pub struct IrcClient {
    reader: BufReader<OwnedReadHalf>,
    sender: IrcSender,
    repo_url: Option<String>,
}

impl IrcClient {
    /// Connect and perform the credential/nickname/join handshake
    ///
    /// # Errors
    ///
    /// Returns error if the connection or any handshake line fails
    pub async fn connect(config: &ChatConfig) -> Result<Self> {
        let address = format!("{}:{}", config.server, config.port);
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|e| Error::Chat(format!("connect to {address} failed: {e}")))?;

        let (read_half, write_half) = stream.into_split();
        let sender = IrcSender {
            writer: Arc::new(Mutex::new(write_half)),
            channel: config.channel.clone(),
        };

        sender.send_raw(&format!("PASS {}", config.token)).await?;
        sender.send_raw(&format!("NICK {}", config.nickname)).await?;
        sender.send_raw(&format!("JOIN {}", config.channel)).await?;

        tracing::info!(server = %config.server, channel = %config.channel, "connected to chat");

        Ok(Self {
            reader: BufReader::new(read_half),
            sender,
            repo_url: config.repo_url.clone(),
        })
    }

    /// Clone the outbound half
    #[must_use]
    pub fn sender(&self) -> IrcSender {
        self.sender.clone()
    }

    /// Spawn the listener task: read frames until the connection closes
    ///
    /// Accepted questions land in `queue`; there is no reconnection — when
    /// the peer closes the socket the task ends and the process keeps
    /// running without chat intake.
    pub fn spawn_listener(
        self,
        moderation: Arc<ModerationFilter>,
        queue: Arc<QuestionQueue>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            listen_loop(self.reader, self.sender, self.repo_url, moderation, queue).await;
        })
    }
}

/// Read lines until EOF, handling keep-alives and commands
async fn listen_loop(
    mut reader: BufReader<OwnedReadHalf>,
    sender: IrcSender,
    repo_url: Option<String>,
    moderation: Arc<ModerationFilter>,
    queue: Arc<QuestionQueue>,
) {
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                tracing::warn!("chat connection closed by peer");
                break;
            }
            Ok(_) => {
                let frame = line.trim_end_matches(['\r', '\n']);
                if let Err(e) =
                    handle_frame(frame, &sender, repo_url.as_deref(), &moderation, &queue).await
                {
                    tracing::error!(error = %e, "error handling chat frame");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chat read error");
            }
        }
    }
}

/// Dispatch one inbound frame
async fn handle_frame(
    frame: &str,
    sender: &IrcSender,
    repo_url: Option<&str>,
    moderation: &ModerationFilter,
    queue: &QuestionQueue,
) -> Result<()> {
    if frame.starts_with(KEEPALIVE_MARKER) {
        return sender.send_raw(KEEPALIVE_REPLY).await;
    }

    match parse_line(frame) {
        Some(Command::Ask { user, text }) => {
            if moderation.screen(sender, &user, &text).await? {
                tracing::info!(user = %user, text = %text, "queued question");
                queue.enqueue(Some(user), text);
            }
        }
        Some(Command::RepoLink { user }) => match repo_url {
            Some(url) => {
                sender
                    .send_message(&format!(
                        "@{user} Here is the link to the GitHub repo: {url}"
                    ))
                    .await?;
            }
            None => {
                tracing::debug!(user = %user, "repo link requested but no repo_url configured");
            }
        },
        None => {
            tracing::trace!(frame, "ignored chat line");
        }
    }

    Ok(())
}
