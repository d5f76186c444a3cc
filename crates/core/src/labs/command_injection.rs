//! Command injection through a vulnerable ping utility.

use super::{Lab, LabCore, LabKind, OPENED_LAB, SUBMITTED};

pub const FLAG: &str = "flag{command_injection_complete}";

const SEPARATORS: &[&str] = &[";", "&&", "||", "|"];

#[derive(Debug)]
pub struct CommandInjectionLab {
    core: LabCore,
}

impl CommandInjectionLab {
    pub fn new() -> Self {
        Self {
            core: LabCore::new(&[
                (OPENED_LAB, "Start lab"),
                ("found_injection", "Find injection point"),
                ("executed_command", "Execute injected command"),
                ("extracted_flag", "Extract flag"),
                (SUBMITTED, "Submit flag"),
            ]),
        }
    }
}

impl Default for CommandInjectionLab {
    fn default() -> Self {
        Self::new()
    }
}

impl Lab for CommandInjectionLab {
    fn kind(&self) -> LabKind {
        LabKind::CommandInjection
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn handle(&mut self, input: &str) -> Vec<String> {
        let core = &mut self.core;
        core.append_log(format!("Ping command: ping {input}"));
        let lower = input.to_lowercase();

        if !SEPARATORS.iter().any(|s| lower.contains(s)) {
            core.info("Try injecting additional commands using ; && || or |");
            return vec![
                format!("PING {input} (127.0.0.1): 56 data bytes"),
                "64 bytes from 127.0.0.1: icmp_seq=0 ttl=64 time=0.456 ms".into(),
                "64 bytes from 127.0.0.1: icmp_seq=1 ttl=64 time=0.234 ms".into(),
                "--- ping statistics ---".into(),
                "2 packets transmitted, 2 packets received, 0.0% packet loss".into(),
            ];
        }

        core.append_log("Command injection detected!");
        core.check("found_injection");

        let target = input
            .split(|c| matches!(c, ';' | '&' | '|'))
            .next()
            .unwrap_or_default()
            .trim();
        let mut output = vec![
            format!("PING {target} (127.0.0.1): 56 data bytes"),
            "64 bytes from 127.0.0.1: icmp_seq=0 ttl=64 time=0.123 ms".into(),
            "--- ping statistics ---".into(),
            "1 packets transmitted, 1 packets received, 0.0% packet loss".into(),
        ];

        if lower.contains("cat") && (lower.contains("flag") || lower.contains("secret")) {
            core.append_log("Additional command executed successfully!");
            core.append_log(format!("Reading secret file: {FLAG}"));
            core.check("executed_command");
            core.check("extracted_flag");
            core.success("Command injection successful! Flag revealed.");
            output.push(FLAG.to_string());
        } else if lower.contains("ls") {
            core.append_log("Additional command executed successfully!");
            core.append_log("Directory listing: index.html flag.txt secret.txt");
            core.check("executed_command");
            core.info("Directory listing executed. Try reading flag.txt");
            output.push("index.html flag.txt secret.txt".into());
        } else if lower.contains("whoami") {
            core.append_log("Additional command executed successfully!");
            core.append_log("Current user: www-data");
            core.check("executed_command");
            core.info("User information retrieved. Try listing files.");
            output.push("www-data".into());
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use crate::labs::{LabKind, LabSession};

    use super::FLAG;

    fn started() -> LabSession {
        let mut session = LabSession::new(LabKind::CommandInjection);
        session.start();
        session
    }

    #[test]
    fn plain_ping_finds_nothing() {
        let mut session = started();
        let out = session.input("127.0.0.1").unwrap();
        assert!(out.output[0].starts_with("PING 127.0.0.1"));
        assert!(!session.core().is_checked("found_injection"));
    }

    #[test]
    fn separator_alone_marks_injection() {
        let mut session = started();
        session.input("127.0.0.1; echo").unwrap();
        assert!(session.core().is_checked("found_injection"));
        assert!(!session.core().is_checked("executed_command"));
    }

    #[test]
    fn whoami_and_ls_execute() {
        let mut session = started();
        let out = session.input("127.0.0.1 && whoami").unwrap();
        assert_eq!(out.output.last().map(String::as_str), Some("www-data"));
        assert!(session.core().is_checked("executed_command"));

        let out = session.input("127.0.0.1 | ls").unwrap();
        assert!(out.output.last().unwrap().contains("flag.txt"));
    }

    #[test]
    fn cat_flag_reveals_flag() {
        let mut session = started();
        let out = session.input("127.0.0.1; cat flag.txt").unwrap();
        assert!(out.output.contains(&FLAG.to_string()));
        assert!(session.core().is_checked("extracted_flag"));
        assert!(!session.core().completed);

        assert!(session.submit_flag(FLAG).unwrap().accepted);
        assert!(session.core().completed);
    }
}
