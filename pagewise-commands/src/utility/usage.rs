use tokio::io::AsyncWrite;

use crate::{COMMANDS, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "usage <command>",
};

/// Show usage for a specific command.
///
/// A missing argument returns this command's usage; an unknown command
/// returns a short not-found message.
pub async fn run<W>(out: &mut W, arg1: Option<&str>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let Some(raw_name) = arg1 else {
        let usage = format!("Usage: `{}`", META.usage);
        reply(out, &usage).await?;
        return Ok(());
    };

    let lookup = raw_name.trim().to_ascii_lowercase();
    let text = match COMMANDS.iter().find(|command| command.name == lookup) {
        Some(command) => format!("Usage: `{}`", command.usage),
        None => format!("Unknown command: `{lookup}`"),
    };
    reply(out, &text).await?;

    Ok(())
}
