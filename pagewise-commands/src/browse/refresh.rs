use tokio::io::AsyncWrite;

use crate::{BrowseSession, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "refresh",
    desc: "Discard loaded records and reload from the first page.",
    category: "browse",
    usage: "refresh",
};

pub async fn run<W>(session: &mut BrowseSession, out: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let ticket = session.controller_mut().begin_reload();
    session.spawn_fetch(ticket);
    reply(out, &session.render()).await?;

    Ok(())
}
