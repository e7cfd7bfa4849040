use tokio::io::AsyncWrite;

use super::PAGED_ONLY;
use crate::{BrowseSession, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "size",
    desc: "Change how many records each page shows.",
    category: "browse",
    usage: "size <n>",
};

pub async fn run<W>(
    session: &mut BrowseSession,
    out: &mut W,
    arg1: Option<&str>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let Some(navigator) = session.navigator_mut() else {
        reply(out, PAGED_ONLY).await?;
        return Ok(());
    };

    let Some(size) = arg1.and_then(|raw| raw.trim().parse::<usize>().ok()) else {
        let usage = format!("Usage: `{}`", META.usage);
        reply(out, &usage).await?;
        return Ok(());
    };

    if navigator.set_items_per_page(size).is_err() {
        let allowed = navigator
            .allowed_page_sizes()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let text = format!("Page size {size} is not allowed. Choose one of: {allowed}.");
        reply(out, &text).await?;
        return Ok(());
    }

    reply(out, &session.render()).await
}
