use crate::CommandMeta;

/// Handled directly by the input loop.
pub const META: CommandMeta = CommandMeta {
    name: "quit",
    desc: "Leave the browser (alias: exit).",
    category: "utility",
    usage: "quit",
};
