use pagewise_core::QueryParams;
use tokio::io::AsyncWrite;

use crate::{BrowseSession, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "filter",
    desc: "Show only records whose field equals a value; `filter off` clears it.",
    category: "browse",
    usage: "filter <field> <value> | filter off",
};

/// Start a new browse session with changed query parameters.
pub async fn run<W>(
    session: &mut BrowseSession,
    out: &mut W,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let query = match (arg1, arg_tail) {
        (Some(off), None) if off.eq_ignore_ascii_case("off") => QueryParams::default(),
        (Some(field), Some(value)) => QueryParams::filtered(field, value),
        _ => {
            let usage = format!("Usage: `{}`", META.usage);
            reply(out, &usage).await?;
            return Ok(());
        }
    };

    let ticket = session.controller_mut().begin_refresh(query);
    session.spawn_fetch(ticket);
    reply(out, &session.render()).await?;

    Ok(())
}
