// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use crate::error::CommandError;
use crate::selector::{DisplayCount, GenreFilter, SortOption};

/// Usage lines shown by the `help` command
pub const HELP: &[(&str, &str)] = &[
    (
        "search <text>",
        "show titles containing <text>; without text, clear the search",
    ),
    ("sort <a-z|z-a|most-recent|oldest>", "change the ordering"),
    ("genre <id|all>", "restrict to one genre"),
    ("more (or empty line)", "reveal more results"),
    ("show <n>", "reveal exactly <n> results"),
    ("reset", "restore the initial selectors"),
    ("genres", "list genre ids"),
    ("help", "show this help"),
    ("quit", "leave"),
];

/// A single interactive instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Sort(SortOption),
    Genre(GenreFilter),
    More,
    Show(DisplayCount),
    Reset,
    Genres,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" | "more" | "m" => Ok(Command::More),
            "search" | "s" | "/" => Ok(Command::Search(rest.to_string())),
            "sort" | "o" => {
                require(rest, "sort", "sort <a-z|z-a|most-recent|oldest>")?;
                Ok(Command::Sort(SortOption::from_key(rest)))
            }
            "genre" | "g" => {
                require(rest, "genre", "genre <id|all>")?;
                Ok(Command::Genre(GenreFilter::from_key(rest)))
            }
            "show" => {
                require(rest, "show", "show <n>")?;
                rest.parse::<usize>()
                    .ok()
                    .and_then(DisplayCount::new)
                    .map(Command::Show)
                    .ok_or_else(|| CommandError::InvalidCount(rest.to_string()))
            }
            "reset" => Ok(Command::Reset),
            "genres" => Ok(Command::Genres),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn require(arg: &str, command: &'static str, usage: &'static str) -> Result<(), CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument { command, usage })
    } else {
        Ok(())
    }
}
