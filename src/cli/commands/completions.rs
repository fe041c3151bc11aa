//! Shell completion generation
//!
//! Generates shell completion scripts for supported shells.

use clap::CommandFactory;
use clap_complete::Shell as ClapShell;

use crate::cli::args::{Cli, CompletionsArgs, Shell};

/// Maps the CLI's shell names onto `clap_complete`'s.
const fn to_clap_shell(shell: Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    }
}

/// Generate and print a shell completion script to stdout.
pub fn run(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(
        to_clap_shell(args.shell),
        &mut cmd,
        "flagpole",
        &mut std::io::stdout(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_mention_subcommands() {
        let mut buf = Vec::new();
        clap_complete::generate(
            to_clap_shell(Shell::Bash),
            &mut Cli::command(),
            "flagpole",
            &mut buf,
        );
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("countdown"));
        assert!(script.contains("system-change"));
    }
}
