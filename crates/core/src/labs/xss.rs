//! Reflected XSS in a simulated search page.

use super::{Lab, LabCore, LabKind, OPENED_LAB, SUBMITTED};

pub const FLAG: &str = "flag{xss_lab_complete}";

const INJECTION_MARKERS: &[&str] = &["<script>", "javascript:", "onerror="];
const SCRIPT_SINKS: &[&str] = &["alert", "document.cookie"];

#[derive(Debug)]
pub struct XssLab {
    core: LabCore,
}

impl XssLab {
    pub fn new() -> Self {
        Self {
            core: LabCore::new(&[
                (OPENED_LAB, "Start lab"),
                ("found_reflection", "Find reflected input"),
                ("executed_script", "Execute script"),
                ("extracted_cookies", "Extract cookies"),
                (SUBMITTED, "Submit flag"),
            ]),
        }
    }
}

impl Default for XssLab {
    fn default() -> Self {
        Self::new()
    }
}

impl Lab for XssLab {
    fn kind(&self) -> LabKind {
        LabKind::Xss
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn handle(&mut self, input: &str) -> Vec<String> {
        let core = &mut self.core;
        core.append_log(format!("Search query: {input}"));
        let lower = input.to_lowercase();

        if !INJECTION_MARKERS.iter().any(|m| lower.contains(m)) {
            core.info("Try injecting JavaScript code in the search field.");
            return vec![
                format!("Search results for: {input}"),
                String::new(),
                format!("No results found for \"{input}\". Try searching for something else."),
            ];
        }

        core.append_log("XSS payload detected in search!");
        core.check("found_reflection");

        if SCRIPT_SINKS.iter().any(|s| lower.contains(s)) {
            core.append_log("Script executed successfully!");
            core.append_log("Cookies extracted: session=abc123; user=admin");
            core.append_log(format!("FLAG: {FLAG}"));
            core.check("executed_script");
            core.check("extracted_cookies");
            core.success("XSS exploit successful! Flag revealed in logs.");
        }

        vec![format!("Search results for: {input}")]
    }
}
