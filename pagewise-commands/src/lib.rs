pub mod browse;
pub mod render;
pub mod session;
pub mod utility;

use tokio::io::{AsyncWrite, AsyncWriteExt};

pub use session::{BrowseSession, CompletionSender, FetchCompletion, completion_channel};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::usage::META,
    utility::quit::META,
    browse::show::META,
    browse::more::META,
    browse::refresh::META,
    browse::filter::META,
    browse::navigate::FIRST_META,
    browse::navigate::PREV_META,
    browse::navigate::NEXT_META,
    browse::navigate::LAST_META,
    browse::navigate::PAGE_META,
    browse::size::META,
    browse::select::META,
    // Add new commands here
];

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A command line split into its name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub arg1: Option<String>,
    pub arg_tail: Option<String>,
}

/// Split `line` into a lowercased command name, its first argument and the
/// remaining text. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<ParsedCommand> {
    let content = line.trim();
    if content.is_empty() {
        return None;
    }

    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let name = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, arg_tail) = match rest {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args
                .next()
                .filter(|arg| !arg.is_empty())
                .map(ToOwned::to_owned);
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty())
                .map(ToOwned::to_owned);

            (first, tail)
        }
        None => (None, None),
    };

    Some(ParsedCommand {
        name,
        arg1,
        arg_tail,
    })
}

pub async fn handle_line<W>(
    session: &mut BrowseSession,
    out: &mut W,
    line: &str,
) -> anyhow::Result<Flow>
where
    W: AsyncWrite + Unpin + Send,
{
    let Some(command) = parse_command(line) else {
        return Ok(Flow::Continue);
    };

    let arg1 = command.arg1.as_deref();
    let arg_tail = command.arg_tail.as_deref();

    match command.name.as_str() {
        "help" => utility::help::run(out, arg1).await?,
        "usage" => utility::usage::run(out, arg1).await?,
        "quit" | "exit" => return Ok(Flow::Quit),

        "show" => browse::show::run(session, out).await?,
        "more" => browse::more::run(session, out).await?,
        "refresh" => browse::refresh::run(session, out).await?,
        "filter" => browse::filter::run(session, out, arg1, arg_tail).await?,
        "first" | "prev" | "next" | "last" => {
            browse::navigate::run(session, out, &command.name).await?
        }
        "page" => browse::navigate::jump(session, out, arg1).await?,
        "size" => browse::size::run(session, out, arg1).await?,
        "select" => browse::select::run(session, out, arg1).await?,
        // Add new commands here
        other => {
            let text = format!("Unknown command: `{other}`. Type `help` for a list.");
            reply(out, &text).await?;
        }
    }

    Ok(Flow::Continue)
}

/// Hand a finished fetch to the session and print whatever it renders.
pub async fn handle_completion<W>(
    session: &mut BrowseSession,
    out: &mut W,
    completion: FetchCompletion,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    if let Some(text) = session.on_completion(completion) {
        reply(out, &text).await?;
    }

    Ok(())
}

/// Write `text` as one message, newline terminated.
pub(crate) async fn reply<W>(out: &mut W, text: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    out.write_all(text.trim_end().as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_arguments() {
        let parsed = parse_command("  FILTER status  Dirty pins ").unwrap();
        assert_eq!(parsed.name, "filter");
        assert_eq!(parsed.arg1.as_deref(), Some("status"));
        assert_eq!(parsed.arg_tail.as_deref(), Some("Dirty pins"));
    }

    #[test]
    fn bare_command_has_no_arguments() {
        let parsed = parse_command("next").unwrap();
        assert_eq!(parsed.arg1, None);
        assert_eq!(parsed.arg_tail, None);
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|command| command.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }
}
