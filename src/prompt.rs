//!
//! src/prompt.rs
//!
//! Capability for the interactive confirmation step so the resolver
//! stays testable without a terminal
//!
//!

use std::io::{BufRead, Write};

use crate::errors::AlbumizerError;

/// Blocking confirmation of a single field. Implementations return the
/// final value; an empty reply keeps the pre-filled default.
pub trait Prompt {
    /// Confirm a free-text field with `default` pre-filled; `None` when
    /// the field has no derived default and the user leaves it blank.
    fn confirm_field(
        &self,
        label: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, AlbumizerError>;

    /// Yes/no question, `default_yes` selected on an empty reply.
    fn confirm(&self, question: &str, default_yes: bool) -> Result<bool, AlbumizerError>;
}

/// Reads replies from stdin, one line per field.
pub struct InteractivePrompt;

impl InteractivePrompt {
    fn read_reply(&self, shown: &str) -> Result<String, AlbumizerError> {
        print!("{shown}");
        std::io::stdout().flush()?;

        let mut reply = String::new();
        std::io::stdin().lock().read_line(&mut reply)?;
        Ok(reply.trim().to_string())
    }
}

impl Prompt for InteractivePrompt {
    fn confirm_field(
        &self,
        label: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, AlbumizerError> {
        let shown = match default {
            Some(value) => format!("{label} [{value}]: "),
            None => format!("{label}: "),
        };
        let reply = self.read_reply(&shown)?;

        if reply.is_empty() {
            Ok(default.map(str::to_string))
        } else {
            Ok(Some(reply))
        }
    }

    fn confirm(&self, question: &str, default_yes: bool) -> Result<bool, AlbumizerError> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let reply = self.read_reply(&format!("{question} [{hint}]: "))?;

        match reply.to_ascii_lowercase().as_str() {
            "" => Ok(default_yes),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(AlbumizerError::Prompt(format!(
                "expected y or n, got '{other}'"
            ))),
        }
    }
}

/// Non-interactive mode: every field keeps its derived default and
/// every question takes its default answer.
pub struct AcceptDefaults;

impl Prompt for AcceptDefaults {
    fn confirm_field(
        &self,
        _label: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, AlbumizerError> {
        Ok(default.map(str::to_string))
    }

    fn confirm(&self, _question: &str, default_yes: bool) -> Result<bool, AlbumizerError> {
        Ok(default_yes)
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Replays a fixed sequence of replies, one per confirm_field call.
    pub struct ScriptedPrompt {
        replies: RefCell<VecDeque<Option<String>>>,
    }

    impl ScriptedPrompt {
        pub fn new<I: IntoIterator<Item = Option<&'static str>>>(replies: I) -> Self {
            Self {
                replies: RefCell::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm_field(
            &self,
            label: &str,
            default: Option<&str>,
        ) -> Result<Option<String>, AlbumizerError> {
            let reply = self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted reply left for '{label}'"));
            match reply {
                Some(text) => Ok(Some(text)),
                None => Ok(default.map(str::to_string)),
            }
        }

        fn confirm(&self, _question: &str, default_yes: bool) -> Result<bool, AlbumizerError> {
            Ok(default_yes)
        }
    }
}
