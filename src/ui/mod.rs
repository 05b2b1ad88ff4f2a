//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts behind the [ConfirmationPort] trait

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_release, display_status, display_success, display_warning,
};

/// Yes/no decisions the provisioning workflow needs from the user.
///
/// Workflow code depends on this trait rather than on stdin so it can run
/// unattended (`--yes`) or under test.
pub trait ConfirmationPort {
    /// Ask `prompt`; `Ok(true)` means the user agreed
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

impl<F> ConfirmationPort for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Prompts on stdout and reads the answer from stdin.
pub struct TerminalPrompt;

impl ConfirmationPort for TerminalPrompt {
    /// Displays the given prompt followed by "(y/N): ".
    /// Default is "no" if user presses Enter.
    fn confirm(&self, prompt: &str) -> Result<bool> {
        print!("\n{} (y/N): ", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(parse_choice(&input))
    }
}

/// Answers yes to every prompt
pub struct AssumeYes;

impl ConfirmationPort for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Interprets a typed answer: anything starting with `y` or `Y` is yes.
pub fn parse_choice(input: &str) -> bool {
    input
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}
