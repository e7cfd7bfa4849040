use pagewise_paging::parse_page_number;
use tokio::io::AsyncWrite;
use tracing::debug;

use super::PAGED_ONLY;
use crate::{BrowseSession, CommandMeta, reply};

pub const FIRST_META: CommandMeta = CommandMeta {
    name: "first",
    desc: "Go to the first page.",
    category: "browse",
    usage: "first",
};

pub const PREV_META: CommandMeta = CommandMeta {
    name: "prev",
    desc: "Go to the previous page.",
    category: "browse",
    usage: "prev",
};

pub const NEXT_META: CommandMeta = CommandMeta {
    name: "next",
    desc: "Go to the next page.",
    category: "browse",
    usage: "next",
};

pub const LAST_META: CommandMeta = CommandMeta {
    name: "last",
    desc: "Go to the last page.",
    category: "browse",
    usage: "last",
};

pub const PAGE_META: CommandMeta = CommandMeta {
    name: "page",
    desc: "Jump to a page.",
    category: "browse",
    usage: "page <n>",
};

/// Step the navigator. Boundaries are no-ops; the table is re-rendered either way.
pub async fn run<W>(session: &mut BrowseSession, out: &mut W, command: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let Some(navigator) = session.navigator_mut() else {
        reply(out, PAGED_ONLY).await?;
        return Ok(());
    };

    let moved = match command {
        "first" => navigator.first(),
        "prev" => navigator.previous(),
        "next" => navigator.next(),
        "last" => navigator.last(),
        _ => false,
    };
    if !moved {
        debug!(command, page = navigator.current_page(), "navigation had no effect");
    }

    reply(out, &session.render()).await
}

/// Jump to a one-based page.
pub async fn jump<W>(
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

    let Some(requested_page) = arg1.and_then(parse_page_number) else {
        let usage = format!("Usage: `{}` (page starts at 1)", PAGE_META.usage);
        reply(out, &usage).await?;
        return Ok(());
    };

    let total = navigator.page_count();
    if requested_page > total {
        let text = format!("Page {requested_page} does not exist. Available pages: 1-{total}.");
        reply(out, &text).await?;
        return Ok(());
    }

    navigator.set_external_page(Some(requested_page));
    reply(out, &session.render()).await
}
