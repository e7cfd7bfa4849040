use tokio::io::AsyncWrite;

use crate::{BrowseSession, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "show",
    desc: "Render the current table.",
    category: "browse",
    usage: "show",
};

pub async fn run<W>(session: &mut BrowseSession, out: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    reply(out, &session.render()).await
}
