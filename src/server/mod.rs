//! JSON-lines command server over stdin and stdout.
//!
//! This module exposes the contact service to another process: one JSON
//! request per input line, one JSON response per output line. Logs never go
//! to stdout.

pub mod handlers;

pub use handlers::{CommandHandler, Request, Response};

use crate::error::{ServerError, ServerResult};
use crate::services::ContactService;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Run the command server on stdin and stdout.
///
/// Returns when stdin reaches end of file, or on an I/O error.
///
/// # Arguments
/// * `handler` - The configured command handler
pub async fn run_server<S: ContactService>(handler: &mut CommandHandler<S>) -> ServerResult<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(handler, stdin, stdout).await
}

/// Serve requests from `reader`, writing one response line per request to
/// `writer`. Blank lines are ignored. A line that is not valid UTF-8 gets an
/// error response like any other malformed request.
pub async fn serve<S, R, W>(
    handler: &mut CommandHandler<S>,
    mut reader: R,
    mut writer: W,
) -> ServerResult<()>
where
    S: ContactService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("Command server started");

    let mut buf = Vec::new();
    let mut handled = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handler.handle_line(line),
            Err(e) => {
                tracing::warn!(error = %e, "Command line is not valid UTF-8");
                Response::failure(ServerError::InvalidEncoding(e))
            }
        };

        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    tracing::info!(handled, "Command server reached end of input");
    Ok(())
}
