use tokio::io::AsyncWrite;

use crate::{COMMANDS, CommandMeta, reply};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "help [category]",
};

/// Render the command catalog, optionally limited to one category.
pub async fn run<W>(out: &mut W, arg1: Option<&str>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let category = arg1.map(str::to_ascii_lowercase);

    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    if let Some(wanted) = category.as_deref()
        && !categories.contains(&wanted)
    {
        let text = format!(
            "Unknown category `{wanted}`. Available: {}.",
            categories.join(", ")
        );
        reply(out, &text).await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    reply(out, &grouped_help_description(&commands)).await?;

    Ok(())
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| category.is_none_or(|wanted| cmd.category == wanted))
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("  {:<8} {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
