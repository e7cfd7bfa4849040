use pagewise_core::BrowseMode;
use tokio::io::AsyncWrite;

use crate::{BrowseSession, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "more",
    desc: "Load the next page and append it to the table.",
    category: "browse",
    usage: "more",
};

/// Request the next cursor page. Ignored while a fetch is in flight or when
/// the source has nothing more.
pub async fn run<W>(session: &mut BrowseSession, out: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    if session.mode() == BrowseMode::Paged {
        reply(out, "`more` is only available in load-more mode; use `next` and `prev`.").await?;
        return Ok(());
    }

    let Some(ticket) = session.controller_mut().begin_load_more() else {
        let text = if session.controller().is_loading() {
            "A fetch is already in flight."
        } else {
            "Nothing more to load."
        };
        reply(out, text).await?;
        return Ok(());
    };

    session.spawn_fetch(ticket);
    reply(out, &session.render()).await?;

    Ok(())
}
