use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use intellidoc_engine::InteractiveSession;

const BANNER: &str =
    "Ask about the analyzed project. /clear resets the conversation, /exit quits.\n";

/// Line-oriented chat loop. Ends on `/exit` or end of input.
pub async fn run_chat<R, W>(
    session: &mut InteractiveSession,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(BANNER.as_bytes()).await?;
    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "/exit" | "/quit" => break,
            "/clear" => {
                session.clear();
                output.write_all(b"Conversation cleared.\n").await?;
            }
            message => {
                let answer = session.ask(message).await;
                output.write_all(format!("{answer}\n").as_bytes()).await?;
            }
        }
    }
    output.flush().await?;
    tracing::info!(turns = session.turns().len(), "chat session ended");
    Ok(())
}
