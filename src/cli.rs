use crate::shell::AppShell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    About,
    ConfigureGeneral,
    ConfigureVoice,
    ConfigureText,
    Configure,
    Close,
}

/// Resolution order when one invocation carries several recognized flags.
/// The specific `--configure-*` variants sit above the bare `--configure`,
/// and `--close` only wins when nothing else matched.
const PRECEDENCE: [Command; 7] = [
    Command::Help,
    Command::About,
    Command::ConfigureGeneral,
    Command::ConfigureVoice,
    Command::ConfigureText,
    Command::Configure,
    Command::Close,
];

/// Total parse of an argument line. Tokens are matched exactly, so
/// `--configure` can never shadow `--configure-voice` regardless of order.
pub fn parse_command(line: &str) -> Option<Command> {
    let present: Vec<Command> = line
        .split_whitespace()
        .filter_map(command_from_token)
        .collect();
    PRECEDENCE.iter().copied().find(|cmd| present.contains(cmd))
}

fn command_from_token(token: &str) -> Option<Command> {
    match token {
        "--help" => Some(Command::Help),
        "--about" => Some(Command::About),
        "--configure-general" => Some(Command::ConfigureGeneral),
        "--configure-voice" => Some(Command::ConfigureVoice),
        "--configure-text" => Some(Command::ConfigureText),
        "--configure" => Some(Command::Configure),
        "--close" => Some(Command::Close),
        _ => None,
    }
}

/// Parse and act on an argument line; unrecognized input is silently ignored.
pub fn dispatch(line: &str, shell: &impl AppShell) {
    if let Some(command) = parse_command(line) {
        handle_command(command, shell);
    }
}

pub fn handle_command(command: Command, shell: &impl AppShell) {
    match command {
        // Served by the desktop entry and the README, nothing to do in-process.
        Command::Help | Command::About => {}
        Command::ConfigureGeneral => shell.present_general_settings(),
        Command::ConfigureVoice => shell.present_voice_settings(),
        Command::ConfigureText => shell.present_text_settings(),
        Command::Configure => {
            shell.present_text_settings();
            shell.present_voice_settings();
            shell.present_general_settings();
        }
        Command::Close => shell.terminate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingShell {
        voice: Cell<u32>,
        text: Cell<u32>,
        general: Cell<u32>,
        closed: Cell<u32>,
        terminated: Cell<u32>,
    }

    impl AppShell for RecordingShell {
        fn present_voice_settings(&self) {
            self.voice.set(self.voice.get() + 1);
        }
        fn present_text_settings(&self) {
            self.text.set(self.text.get() + 1);
        }
        fn present_general_settings(&self) {
            self.general.set(self.general.get() + 1);
        }
        fn close(&self) {
            self.closed.set(self.closed.get() + 1);
        }
        fn terminate(&self) {
            self.terminated.set(self.terminated.get() + 1);
        }
    }

    #[test]
    fn parse_matches_every_token() {
        assert_eq!(parse_command("--help"), Some(Command::Help));
        assert_eq!(parse_command("--about"), Some(Command::About));
        assert_eq!(
            parse_command("--configure-general"),
            Some(Command::ConfigureGeneral)
        );
        assert_eq!(
            parse_command("--configure-voice"),
            Some(Command::ConfigureVoice)
        );
        assert_eq!(
            parse_command("--configure-text"),
            Some(Command::ConfigureText)
        );
        assert_eq!(parse_command("--configure"), Some(Command::Configure));
        assert_eq!(parse_command("--close"), Some(Command::Close));
    }

    #[test]
    fn parse_ignores_unknown_tokens_and_whitespace() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("unknown-token"), None);
        assert_eq!(parse_command("--configure-voices"), None);
        assert_eq!(
            parse_command("  --configure-voice  "),
            Some(Command::ConfigureVoice)
        );
    }

    #[test]
    fn specific_configure_beats_the_generic_flag() {
        assert_eq!(
            parse_command("--configure --configure-voice"),
            Some(Command::ConfigureVoice)
        );
        assert_eq!(
            parse_command("--configure-voice --configure"),
            Some(Command::ConfigureVoice)
        );
    }

    #[test]
    fn configure_flags_beat_close() {
        assert_eq!(
            parse_command("--close --configure-text"),
            Some(Command::ConfigureText)
        );
    }

    #[test]
    fn configure_presents_all_three_settings_once() {
        let shell = RecordingShell::default();
        dispatch(" --configure ", &shell);
        assert_eq!(shell.voice.get(), 1);
        assert_eq!(shell.text.get(), 1);
        assert_eq!(shell.general.get(), 1);
        assert_eq!(shell.terminated.get(), 0);
    }

    #[test]
    fn close_terminates_without_presenting() {
        let shell = RecordingShell::default();
        dispatch("--close", &shell);
        assert_eq!(shell.terminated.get(), 1);
        assert_eq!(shell.voice.get(), 0);
        assert_eq!(shell.text.get(), 0);
        assert_eq!(shell.general.get(), 0);
    }

    #[test]
    fn unknown_input_invokes_nothing() {
        let shell = RecordingShell::default();
        dispatch("unknown-token", &shell);
        dispatch("", &shell);
        assert_eq!(shell.voice.get(), 0);
        assert_eq!(shell.text.get(), 0);
        assert_eq!(shell.general.get(), 0);
        assert_eq!(shell.closed.get(), 0);
        assert_eq!(shell.terminated.get(), 0);
    }

    #[test]
    fn help_and_about_are_inert() {
        let shell = RecordingShell::default();
        dispatch("--help", &shell);
        dispatch("--about", &shell);
        assert_eq!(shell.voice.get(), 0);
        assert_eq!(shell.general.get(), 0);
        assert_eq!(shell.terminated.get(), 0);
    }
}
