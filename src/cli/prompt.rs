//! Interactive credential prompt on stdin/stderr

use crate::auth::CredentialPrompt;
use crate::error::Error;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// Asks for a replacement token on a terminal. An empty line cancels.
pub struct LinePrompt<R, W> {
    io: Mutex<(R, W)>,
}

/// Prompt reading stdin and writing to stderr
pub type StdinPrompt = LinePrompt<BufReader<tokio::io::Stdin>, tokio::io::Stderr>;

impl StdinPrompt {
    /// Prompt on the process terminal
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> LinePrompt<R, W> {
    /// Prompt over arbitrary reader/writer
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }
}

#[async_trait]
impl<R, W> CredentialPrompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn request_credential(&self, reason: &Error) -> Option<String> {
        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;

        let message = format!(
            "Canvas request failed ({reason}).\nEnter a new Canvas access token (empty to cancel): "
        );
        if writer.write_all(message.as_bytes()).await.is_err() || writer.flush().await.is_err() {
            return None;
        }

        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let token = line.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
        }
    }
}
