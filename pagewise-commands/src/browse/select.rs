use tokio::io::AsyncWrite;
use tracing::info;

use crate::{BrowseSession, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "select",
    desc: "Show every field of a visible row.",
    category: "browse",
    usage: "select <row>",
};

/// Print the full record behind a visible row, including fields that no
/// column shows. Rows are numbered from 1 in display order.
pub async fn run<W>(
    session: &mut BrowseSession,
    out: &mut W,
    arg1: Option<&str>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let Some(row) = arg1.and_then(|raw| raw.trim().parse::<usize>().ok()) else {
        let usage = format!("Usage: `{}` (rows start at 1)", META.usage);
        reply(out, &usage).await?;
        return Ok(());
    };

    let Some((index, record)) = session.visible_record(row) else {
        let visible = session.table_view().rows.len();
        let text = if visible == 0 {
            "There are no rows to select.".to_owned()
        } else {
            format!("Row {row} is not on screen. Visible rows: 1-{visible}.")
        };
        reply(out, &text).await?;
        return Ok(());
    };

    info!(row, index, "row selected");

    let width = record.fields().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    let mut lines = vec![format!("Row {row}")];
    lines.extend(
        record
            .fields()
            .map(|(key, value)| format!("{key:<width$} : {value}").trim_end().to_owned()),
    );

    reply(out, &lines.join("\n")).await
}
