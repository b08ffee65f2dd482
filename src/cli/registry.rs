use strsim::levenshtein;

use super::context::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One shell command: its help text and the function that runs it.
pub struct CommandEntry {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub run: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        summary: &'static str,
        usage: &'static str,
        run: CommandHandler,
    ) -> Self {
        Self {
            name,
            summary,
            usage,
            aliases: &[],
            run,
        }
    }

    pub fn aliased(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    fn answers_to(&self, word: &str) -> bool {
        self.name == word || self.aliases.contains(&word)
    }
}

/// The shell's command table in registration order, which is also help order.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Adds a command; a later entry with the same name replaces the earlier one in place.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    /// Finds a command by name or alias, ignoring case.
    pub fn resolve(&self, word: &str) -> Option<&CommandEntry> {
        let word = word.to_lowercase();
        let word = word.as_str();
        self.entries.iter().find(|entry| entry.answers_to(&word))
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Every word the shell accepts, for tab completion.
    pub fn words(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .flat_map(|entry| std::iter::once(entry.name).chain(entry.aliases.iter().copied()))
            .collect()
    }

    /// Closest command name to a mistyped word, if any lies within `max_distance` edits.
    pub fn closest(&self, word: &str, max_distance: usize) -> Option<&'static str> {
        let word = word.to_lowercase();
        let word = word.as_str();
        self.entries
            .iter()
            .flat_map(|entry| {
                std::iter::once(entry.name)
                    .chain(entry.aliases.iter().copied())
                    .map(move |candidate| (levenshtein(candidate, word), entry.name))
            })
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= max_distance)
            .map(|(_, name)| name)
    }
}
