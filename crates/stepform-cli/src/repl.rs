//! The line command language of the interactive driver.
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use stepform::{Focus, Level};

/// One driver command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Step forward.
    Next,
    /// Step back.
    Prev,
    /// Submit.
    Submit,
    /// Press the confirm key with the given focus.
    Enter(Focus),
    /// Click a control.
    Click(String),
    /// Record an input's validity.
    Valid(String, bool),
    /// Record an input's inclusion.
    Include(String, bool),
    /// Print the position, or one level's active items.
    Show(Option<Level>),
    /// Leave the driver.
    Quit,
}

/// Parse `true`/`false` and the usual shorthands.
fn flag(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("expected true or false, got {s:?}")),
    }
}

/// Parse a focus target.
fn focus(s: &str) -> Result<Focus> {
    Ok(match s {
        "root" | "form" => Focus::Root,
        "input" => Focus::Input,
        "button" => Focus::Button,
        "outside" => Focus::Outside,
        _ => bail!("unknown focus {s:?}: expected root, input, button or outside"),
    })
}

/// Parse a level name.
fn level(s: &str) -> Result<Level> {
    Level::ALL
        .into_iter()
        .find(|l| l.name() == s || format!("{}s", l.name()) == s)
        .ok_or_else(|| anyhow!("unknown level {s:?}"))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        Ok(match words.as_slice() {
            ["next" | "n"] => Self::Next,
            ["prev" | "p"] => Self::Prev,
            ["submit"] => Self::Submit,
            ["enter"] => Self::Enter(Focus::Input),
            ["enter", f] => Self::Enter(focus(f)?),
            ["click", id] => Self::Click((*id).to_string()),
            ["valid", id, v] => Self::Valid((*id).to_string(), flag(v)?),
            ["include", id, v] => Self::Include((*id).to_string(), flag(v)?),
            ["show"] => Self::Show(None),
            ["show", l] => Self::Show(Some(level(l)?)),
            ["quit" | "q" | "exit"] => Self::Quit,
            [] => bail!("empty command"),
            _ => bail!("unknown command: {line}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses() -> Result<()> {
        assert_eq!("next".parse::<Command>()?, Command::Next);
        assert_eq!("  p ".parse::<Command>()?, Command::Prev);
        assert_eq!("enter".parse::<Command>()?, Command::Enter(Focus::Input));
        assert_eq!("enter button".parse::<Command>()?, Command::Enter(Focus::Button));
        assert_eq!(
            "valid email-input no".parse::<Command>()?,
            Command::Valid("email-input".into(), false)
        );
        assert_eq!(
            "include website-input on".parse::<Command>()?,
            Command::Include("website-input".into(), true)
        );
        assert_eq!("show fields".parse::<Command>()?, Command::Show(Some(Level::Field)));
        assert_eq!("show".parse::<Command>()?, Command::Show(None));
        Ok(())
    }

    #[test]
    fn rejects() {
        for bad in ["", "jump", "valid x maybe", "enter sideways", "show rows", "click"] {
            assert!(bad.parse::<Command>().is_err(), "{bad:?} parsed");
        }
    }
}
