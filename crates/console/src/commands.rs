//! Line commands driving the tracker, one per input line.

use grailtracker_core::{AppContext, Group, Item, ItemId, Rarity, TrackerError};

/// Help text printed for `help` and unknown commands.
pub const HELP: &str = "\
commands:
  search <words>   find items (all words must match)
  found <id>       mark an item found
  missing <id>     mark an item missing
  toggle <id>      flip an item's found state
  compact <id>     drop an item's history from the log
  compact-all      rewrite the log to one entry per found item
  stats            show collection progress
  help             show this text
  quit             exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Found(ItemId),
    Missing(ItemId),
    Toggle(ItemId),
    Compact(ItemId),
    CompactAll,
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(n, r)| (n, r.trim()))
            .unwrap_or((line, ""));

        let command = match name {
            "search" | "s" => Command::Search(rest.to_string()),
            "found" | "f" => Command::Found(parse_id(rest)?),
            "missing" | "m" => Command::Missing(parse_id(rest)?),
            "toggle" | "t" => Command::Toggle(parse_id(rest)?),
            "compact" => Command::Compact(parse_id(rest)?),
            "compact-all" => Command::CompactAll,
            "stats" => Command::Stats,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{}'", other)),
        };
        Ok(Some(command))
    }
}

fn parse_id(raw: &str) -> Result<ItemId, String> {
    raw.parse()
        .map_err(|_| format!("expected an item id, got '{}'", raw))
}

/// Run a command against the tracker and render its output.
pub fn execute(context: &mut AppContext, command: &Command) -> Result<String, TrackerError> {
    let output = match command {
        Command::Search(query) => {
            let items = context.search(query);
            if items.is_empty() {
                "no matches".to_string()
            } else {
                items
                    .iter()
                    .map(|item| render_item(item, context.is_found(item.id)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Found(id) => {
            context.mark_found(*id)?;
            format!("{} marked found", describe(context, *id))
        }
        Command::Missing(id) => {
            context.mark_missing(*id)?;
            format!("{} marked missing", describe(context, *id))
        }
        Command::Toggle(id) => {
            let found = context.toggle(*id)?;
            let state = if found { "found" } else { "missing" };
            format!("{} marked {}", describe(context, *id), state)
        }
        Command::Compact(id) => {
            context.compact(*id)?;
            format!("history of item {} compacted", id)
        }
        Command::CompactAll => {
            context.compact_all()?;
            "log compacted".to_string()
        }
        Command::Stats => render_stats(context),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(output)
}

fn describe(context: &AppContext, id: ItemId) -> String {
    context
        .catalog()
        .get(id)
        .map(|item| item.name.clone())
        .unwrap_or_else(|| format!("item {}", id))
}

fn render_item(item: &Item, found: bool) -> String {
    let mark = if found { "x" } else { " " };
    format!(
        "[{}] {:>4} {} - {} ({})",
        mark, item.id, item.name, item.base, item.rarity
    )
}

/// Checklist summary, one line per group.
pub fn render_stats(context: &AppContext) -> String {
    let counts = context.get_counts_by_rarity_and_slot();
    let mut lines: Vec<String> = Group::ALL
        .iter()
        .map(|&group| {
            let tally = counts.group(group).to_string();
            format!("[+] {:<8}{:>19}", group.label(), tally)
        })
        .collect();

    let sets_by_slot: Vec<String> = counts
        .iter_rarity_and_slot()
        .filter(|(rarity, _, _)| *rarity == Rarity::Set)
        .map(|(_, slot, tally)| format!("{} {}", slot, tally))
        .collect();
    if !sets_by_slot.is_empty() {
        lines.push(format!("    sets by slot: {}", sets_by_slot.join(", ")));
    }
    lines.join("\n")
}
